//! Media type tags carried by library items

use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The kind of media an item represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaType {
    Video,
    Audio,
    Game,
    Book,
}

impl MediaType {
    /// All media types, in declaration order
    pub const ALL: [MediaType; 4] = [Self::Video, Self::Audio, Self::Game, Self::Book];

    /// Returns the stable string form used by clients and persisted data
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Video => "Video",
            Self::Audio => "Audio",
            Self::Game => "Game",
            Self::Book => "Book",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|media_type| media_type.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| CoreError::InvalidMediaType {
                value: s.to_string(),
            })
    }
}
