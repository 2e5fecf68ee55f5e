//! The book media item

use crate::types::{BaseItem, HasTags, LibraryItem, MediaType, Validator};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A book in the media library
///
/// Metadata for a book is kept beside the book file, so its meta location is
/// the directory containing `path` rather than the path itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    #[serde(flatten)]
    pub item: BaseItem,
    pub tags: Vec<String>,
    pub series_name: Option<String>,
}

impl Book {
    /// Creates a new book with no tags and no series
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            item: BaseItem::new(name, path),
            tags: Vec::new(),
            series_name: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.item.path
    }

    pub fn is_in_mixed_folder(&self) -> bool {
        self.item.is_in_mixed_folder
    }
}

impl LibraryItem for Book {
    fn base(&self) -> &BaseItem {
        &self.item
    }

    fn base_mut(&mut self) -> &mut BaseItem {
        &mut self.item
    }

    fn media_type(&self) -> Option<MediaType> {
        Some(MediaType::Book)
    }

    /// The directory containing the book's path
    ///
    /// Recomputed on every call. An empty path or a filesystem root has no
    /// parent and yields `None`; a bare file name yields the empty relative
    /// directory.
    fn meta_location(&self) -> Option<&Path> {
        self.item.path.parent()
    }

    fn use_parent_path_to_create_resolve_args(&self) -> bool {
        !self.item.is_in_mixed_folder
    }
}

impl HasTags for Book {
    fn tags(&self) -> &[String] {
        &self.tags
    }

    fn tags_mut(&mut self) -> &mut Vec<String> {
        &mut self.tags
    }
}

impl Validator for Book {
    fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = match self.item.validate() {
            Ok(()) => Vec::new(),
            Err(errors) => errors,
        };

        if self.item.path.as_os_str().is_empty() {
            errors.push("Book path cannot be empty".to_string());
        }

        if let Some(series) = &self.series_name {
            if series.trim().is_empty() {
                errors.push("Series name cannot be blank when set".to_string());
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
