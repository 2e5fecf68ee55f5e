//! MediaHub server configuration
//!
//! Loads, validates, migrates and persists the settings of a media server.
//! Every setting has a compiled-in default, so a missing or partial file still
//! produces a usable configuration.
//!
//! # Architecture
//!
//! - **Sections**: `ServerConfiguration` and the `ApplicationConfiguration` it
//!   nests implement `ConfigSection` for validation and merging
//! - **Graceful degradation**: invalid values are reported on load and rejected on save
//! - **Atomic writes**: config files are never left half written
//! - **Migrations**: older file layouts are upgraded before decoding
//!
//! # Example
//!
//! ```rust,no_run
//! use mediahub_config::{ConfigManager, ServerConfiguration};
//!
//! let manager = ConfigManager::new().expect("Failed to initialize config");
//! let config = manager.load().unwrap_or_else(|e| {
//!     eprintln!("Config error: {}, using defaults", e);
//!     ServerConfiguration::default()
//! });
//!
//! println!("HTTP port: {}", config.http_server_port_number);
//! ```

mod error;
mod manager;
mod migration;
mod persistence;
mod validation;

pub mod backup;
pub mod overrides;
pub mod watcher;

pub mod application_config;
pub mod options;
pub mod server_config;

pub use error::{ConfigError, ConfigResult, ValidationError};
pub use manager::ConfigManager;
pub use persistence::ConfigPersistence;
pub use validation::{ConfigSection, Validator};

pub use application_config::{ApplicationConfiguration, UpdateLevel};
pub use options::{ImageDownloadOptions, ImageSavingConvention, ManualLoginCategory, WeatherUnits};
pub use server_config::{BuildProfile, ServerConfiguration};

/// Current config file format version for migrations
pub const CONFIG_VERSION: u32 = 2;
