//! Entity model for the mediahub media library
//!
//! Library items are plain owned records. Behaviour that the server shares
//! across item kinds (tags, meta location, sort names) is expressed as
//! capability traits over a composed [`BaseItem`].

pub mod error;
pub mod types;

// Re-export commonly used types
pub use error::{CoreError, Result};
pub use types::{
    BaseItem, Book, HasTags, ItemId, LibraryItem, MediaType, SortNameRules, Timestamp, Validator,
};
