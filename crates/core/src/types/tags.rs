//! The free-text tag capability

/// Capability for items that carry user-editable tags
pub trait HasTags {
    fn tags(&self) -> &[String];

    fn tags_mut(&mut self) -> &mut Vec<String>;

    /// Adds a tag unless it is blank or already present (ignoring case)
    ///
    /// Returns true if the tag was added.
    fn add_tag(&mut self, tag: &str) -> bool {
        let tag = tag.trim();
        if tag.is_empty() || self.has_tag(tag) {
            return false;
        }
        self.tags_mut().push(tag.to_string());
        true
    }

    /// Removes every occurrence of a tag (ignoring case)
    ///
    /// Returns true if anything was removed.
    fn remove_tag(&mut self, tag: &str) -> bool {
        let tag = tag.trim();
        let tags = self.tags_mut();
        let before = tags.len();
        tags.retain(|existing| !existing.eq_ignore_ascii_case(tag));
        tags.len() != before
    }

    fn has_tag(&self, tag: &str) -> bool {
        let tag = tag.trim();
        self.tags().iter().any(|existing| existing.eq_ignore_ascii_case(tag))
    }
}
