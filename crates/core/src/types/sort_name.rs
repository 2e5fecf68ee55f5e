//! Sort-name normalization
//!
//! Titles are sorted by a normalized key rather than their display name so
//! that punctuation and leading articles do not affect ordering.

use serde::{Deserialize, Serialize};

/// Rules used to derive a sort name from a display name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortNameRules {
    /// Sequences replaced with a single space
    pub replace_characters: Vec<String>,
    /// Sequences removed outright
    pub remove_characters: Vec<String>,
    /// Whole words removed wherever they stand alone
    pub remove_words: Vec<String>,
}

impl SortNameRules {
    pub fn new(
        replace_characters: Vec<String>,
        remove_characters: Vec<String>,
        remove_words: Vec<String>,
    ) -> Self {
        Self {
            replace_characters,
            remove_characters,
            remove_words,
        }
    }

    /// Produces the sort name for `name`
    ///
    /// Characters are removed before replacements are applied, and words are
    /// removed last, each at the start, middle and end of the string.
    pub fn apply(&self, name: &str) -> String {
        let mut sortable = name.trim().to_lowercase();

        for search in self.remove_characters.iter().filter(|s| !s.is_empty()) {
            sortable = sortable.replace(&search.to_lowercase(), "");
        }

        for search in self.replace_characters.iter().filter(|s| !s.is_empty()) {
            sortable = sortable.replace(&search.to_lowercase(), " ");
        }

        for word in self.remove_words.iter().filter(|w| !w.trim().is_empty()) {
            let word = word.trim().to_lowercase();

            if let Some(rest) = sortable.strip_prefix(&format!("{} ", word)) {
                sortable = rest.to_string();
            }

            sortable = sortable.replace(&format!(" {} ", word), " ");

            if let Some(rest) = sortable.strip_suffix(&format!(" {}", word)) {
                sortable = rest.to_string();
            }
        }

        sortable
    }
}

impl Default for SortNameRules {
    fn default() -> Self {
        Self {
            replace_characters: vec![".".to_string(), "+".to_string(), "%".to_string()],
            remove_characters: vec![
                ",".to_string(),
                "&".to_string(),
                "-".to_string(),
                "{".to_string(),
                "}".to_string(),
                "'".to_string(),
            ],
            remove_words: vec!["the".to_string(), "a".to_string(), "an".to_string()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sort(name: &str) -> String {
        SortNameRules::default().apply(name)
    }

    #[test]
    fn test_leading_article_removed() {
        assert_eq!(sort("The Hobbit"), "hobbit");
        assert_eq!(sort("A Tale of Two Cities"), "tale of two cities");
        assert_eq!(sort("An Apple a Day"), "apple day");
    }

    #[test]
    fn test_middle_article_removed() {
        assert_eq!(sort("The Lord of the Rings"), "lord of rings");
        assert_eq!(sort("Back to the Future"), "back to future");
    }

    #[test]
    fn test_trailing_article_removed() {
        assert_eq!(sort("Catcher in the Rye, The"), "catcher in rye");
    }

    #[test]
    fn test_article_inside_word_kept() {
        assert_eq!(sort("Theatre"), "theatre");
        assert_eq!(sort("Anathem"), "anathem");
    }

    #[test]
    fn test_remove_characters() {
        assert_eq!(sort("Spider-Man"), "spiderman");
        assert_eq!(sort("Le Morte d'Arthur"), "le morte darthur");
        assert_eq!(sort("Dune, Messiah"), "dune messiah");
    }

    #[test]
    fn test_replace_characters() {
        assert_eq!(sort("Vol.1"), "vol 1");
        assert_eq!(sort("C+Plus"), "c plus");
    }

    #[test]
    fn test_trims_and_lowercases() {
        assert_eq!(sort("  Neuromancer  "), "neuromancer");
    }

    #[test]
    fn test_empty_name() {
        assert_eq!(sort(""), "");
        assert_eq!(sort("   "), "");
    }

    #[test]
    fn test_empty_rules_only_normalize_case() {
        let rules = SortNameRules::new(Vec::new(), Vec::new(), Vec::new());
        assert_eq!(rules.apply(" The Hobbit "), "the hobbit");
    }

    #[test]
    fn test_blank_entries_ignored() {
        let rules = SortNameRules::new(
            vec![String::new()],
            vec![String::new()],
            vec!["  ".to_string()],
        );
        assert_eq!(rules.apply("The Hobbit"), "the hobbit");
    }

    #[test]
    fn test_rules_are_case_insensitive() {
        let rules = SortNameRules::new(Vec::new(), Vec::new(), vec!["THE".to_string()]);
        assert_eq!(rules.apply("The Hobbit"), "hobbit");
    }
}
