//! Configuration manager - main API for config operations

use crate::backup::ConfigBackupManager;
use crate::overrides;
use crate::persistence::ConfigPersistence;
use crate::watcher::ConfigWatcher;
use crate::{ConfigError, ConfigResult, ServerConfiguration};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// File name of the server configuration inside the config directory
pub const CONFIG_FILE_NAME: &str = "server.toml";

/// Directory for timestamped backups inside the config directory
pub const BACKUP_DIR_NAME: &str = "backups";

/// Main configuration manager
///
/// This is the primary interface for loading, saving and managing the server
/// configuration. It owns the file locations; persistence and backups do the I/O.
pub struct ConfigManager {
    persistence: ConfigPersistence,
    config_dir: PathBuf,
}

impl ConfigManager {
    /// Creates a config manager using the platform config directory
    ///
    /// - Linux: `~/.config/mediahub/`
    /// - macOS: `~/Library/Application Support/mediahub/`
    /// - Windows: `%APPDATA%\mediahub\`
    pub fn new() -> ConfigResult<Self> {
        let config_dir = Self::default_config_dir()?;
        Ok(Self::with_directory(config_dir))
    }

    /// Creates a config manager with a custom config directory
    pub fn with_directory(config_dir: impl Into<PathBuf>) -> Self {
        let config_dir = config_dir.into();
        let persistence = ConfigPersistence::new(config_dir.join(CONFIG_FILE_NAME));

        Self {
            persistence,
            config_dir,
        }
    }

    fn default_config_dir() -> ConfigResult<PathBuf> {
        ProjectDirs::from("", "", "mediahub")
            .map(|dirs| dirs.config_dir().to_path_buf())
            .ok_or_else(|| ConfigError::PathResolutionError {
                reason: "Could not determine user config directory".to_string(),
            })
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Returns the full config file path
    pub fn config_path(&self) -> &Path {
        self.persistence.config_path()
    }

    /// Loads the configuration from file
    ///
    /// A missing file yields the defaults. A corrupted file is an error.
    pub fn load(&self) -> ConfigResult<ServerConfiguration> {
        self.persistence.load()
    }

    /// Loads the configuration, falling back to defaults on any error
    pub fn load_or_default(&self) -> ServerConfiguration {
        match self.load() {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Failed to load config: {}, using defaults", e.full_message());
                ServerConfiguration::default()
            }
        }
    }

    /// Validates and atomically saves the configuration
    pub fn save(&self, config: &ServerConfiguration) -> ConfigResult<()> {
        self.persistence.save(config)
    }

    /// Loads the configuration, applies `update_fn` and saves the result
    ///
    /// Nothing is written if the updated configuration fails validation.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// # use mediahub_config::ConfigManager;
    /// # let manager = ConfigManager::new().unwrap();
    /// manager.update(|config| {
    ///     config.http_server_port_number = 8200;
    /// }).expect("Failed to update config");
    /// ```
    pub fn update<F>(&self, update_fn: F) -> ConfigResult<ServerConfiguration>
    where
        F: FnOnce(&mut ServerConfiguration),
    {
        let mut config = self.load()?;
        update_fn(&mut config);
        self.save(&config)?;
        Ok(config)
    }

    /// Writes a default config file if none exists
    ///
    /// Returns `Ok(true)` if a new file was created.
    pub fn initialize(&self) -> ConfigResult<bool> {
        if self.config_path().exists() {
            log::info!(
                "Config file already exists at {}",
                self.config_path().display()
            );
            return Ok(false);
        }

        self.persistence.generate_default()?;
        Ok(true)
    }

    /// Overwrites the config file with the defaults
    pub fn reset(&self) -> ConfigResult<()> {
        self.save(&ServerConfiguration::default())
    }

    /// Validates the current config file
    ///
    /// Returns one message per problem; an empty list means valid.
    pub fn validate(&self) -> ConfigResult<Vec<String>> {
        let config = self.load()?;

        match config.validate_all() {
            Ok(()) => Ok(Vec::new()),
            Err(errors) => Ok(errors.iter().map(|e| e.to_string()).collect()),
        }
    }

    /// Loads the configuration and applies `MEDIAHUB_*` environment overrides
    ///
    /// The overrides are not written back to the file.
    pub fn load_with_env_overrides(&self) -> ConfigResult<ServerConfiguration> {
        let mut config = self.load()?;
        overrides::apply_env_overrides(&mut config);

        if let Err(errors) = config.validate_all() {
            log::warn!(
                "Config validation warnings after env overrides: {}",
                crate::error::join_errors(&errors)
            );
        }

        Ok(config)
    }

    /// Backup manager for this config file
    pub fn backup_manager(&self) -> ConfigBackupManager {
        ConfigBackupManager::new(self.config_dir.join(BACKUP_DIR_NAME))
    }

    /// Loads the configuration and returns a watcher for the config file
    pub fn watcher(&self) -> ConfigResult<ConfigWatcher> {
        let config = self.load()?;
        ConfigWatcher::new(self.config_path().to_path_buf(), config)
    }
}
