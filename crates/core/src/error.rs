//! Error types for the mediahub entity model

use thiserror::Error;

/// Result alias used throughout the core crate
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors raised while constructing or parsing entity values
#[derive(Error, Debug)]
pub enum CoreError {
    /// An item id string was not a valid UUID
    #[error("Invalid item id '{value}': {source}")]
    InvalidItemId {
        value: String,
        #[source]
        source: uuid::Error,
    },

    /// A media type string did not name a known media type
    #[error("Unknown media type: '{value}'")]
    InvalidMediaType { value: String },
}

impl CoreError {
    /// Returns a short message suitable for showing to an administrator
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidItemId { value, .. } => {
                format!("'{}' is not a valid item id", value)
            }
            Self::InvalidMediaType { value } => format!(
                "'{}' is not a media type (expected Video, Audio, Game or Book)",
                value
            ),
        }
    }
}
