//! Item identity and the shared base record composed into every library item

use crate::error::CoreError;
use crate::types::{MediaType, SortNameRules, Timestamp, Validator};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Unique identifier for a library item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemId(Uuid);

impl ItemId {
    /// Creates a new random ItemId
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates an ItemId from a UUID string
    pub fn from_string(s: &str) -> crate::Result<Self> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|source| CoreError::InvalidItemId {
                value: s.to_string(),
                source,
            })
    }

    /// Returns the ItemId as a string
    pub fn as_string(&self) -> String {
        self.0.to_string()
    }
}

impl Default for ItemId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// State shared by every catalogued item, composed into concrete item types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseItem {
    pub id: ItemId,
    pub name: String,
    /// Location of the item on disk; empty for virtual items
    pub path: PathBuf,
    /// True when the item shares its folder with unrelated media
    pub is_in_mixed_folder: bool,
    /// Overrides the computed sort name when set
    pub forced_sort_name: Option<String>,
    pub date_created: Timestamp,
    pub date_modified: Timestamp,
}

impl BaseItem {
    /// Creates a base record with a fresh id and both timestamps set to now
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        let now = Timestamp::now();
        Self {
            id: ItemId::new(),
            name: name.into(),
            path: path.into(),
            is_in_mixed_folder: false,
            forced_sort_name: None,
            date_created: now,
            date_modified: now,
        }
    }

    /// Records a modification
    pub fn touch(&mut self) {
        self.date_modified = Timestamp::now();
    }
}

impl Validator for BaseItem {
    fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.name.trim().is_empty() {
            errors.push("Name cannot be empty".to_string());
        }

        if self.date_modified < self.date_created {
            errors.push("Modification date precedes creation date".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Behaviour common to every library item
///
/// Concrete items hold a [`BaseItem`] and override the provided methods where
/// their semantics differ.
pub trait LibraryItem {
    fn base(&self) -> &BaseItem;

    fn base_mut(&mut self) -> &mut BaseItem;

    /// The media type tag, if the item is playable media
    fn media_type(&self) -> Option<MediaType> {
        None
    }

    /// Where metadata for this item lives
    ///
    /// Defaults to the item's own path; `None` when the path is empty.
    fn meta_location(&self) -> Option<&Path> {
        let path = self.base().path.as_path();
        if path.as_os_str().is_empty() {
            None
        } else {
            Some(path)
        }
    }

    /// Whether resolving this item should start from its parent directory
    fn use_parent_path_to_create_resolve_args(&self) -> bool {
        false
    }

    /// Name used for stable alphabetical ordering
    fn sort_name(&self, rules: &SortNameRules) -> String {
        let base = self.base();
        match base.forced_sort_name.as_deref() {
            Some(forced) if !forced.trim().is_empty() => forced.to_string(),
            _ => rules.apply(&base.name),
        }
    }
}

impl LibraryItem for BaseItem {
    fn base(&self) -> &BaseItem {
        self
    }

    fn base_mut(&mut self) -> &mut BaseItem {
        self
    }
}
