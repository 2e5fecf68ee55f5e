//! Domain types for mediahub
//!
//! This module contains the library entity model organized by responsibility:
//! - `item`: Item identity, the composed `BaseItem` and the `LibraryItem` capability
//! - `book`: The `Book` media item
//! - `media_type`: Media type tags
//! - `tags`: The `HasTags` capability
//! - `sort_name`: Sort-name normalization rules
//! - `common`: Shared traits and utilities

mod book;
mod common;
mod item;
mod media_type;
mod sort_name;
mod tags;

// Re-export all public types
pub use book::Book;
pub use common::{Timestamp, Validator};
pub use item::{BaseItem, ItemId, LibraryItem};
pub use media_type::MediaType;
pub use sort_name::SortNameRules;
pub use tags::HasTags;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_types_are_exported() {
        let _item_id: ItemId = ItemId::new();
        let _book: Book = Book::new("Dune", "/library/books/Dune/Dune.epub");
        let _rules: SortNameRules = SortNameRules::default();
        assert_eq!(MediaType::Book.as_str(), "Book");
    }

    #[test]
    fn test_capabilities_are_object_safe() {
        let book = Book::new("Dune", "/library/books/Dune/Dune.epub");
        let item: &dyn LibraryItem = &book;
        let tagged: &dyn HasTags = &book;
        assert_eq!(item.media_type(), Some(MediaType::Book));
        assert!(tagged.tags().is_empty());
    }
}
