//! File system persistence for the server configuration
//!
//! This module handles reading and writing config files with:
//! - Atomic writes (no partial/corrupted files)
//! - A copy of the previous file before every overwrite
//! - Migration of older file layouts on load
//! - Directory creation

use crate::error::join_errors;
use crate::migration;
use crate::{ConfigError, ConfigResult, ServerConfiguration};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Parses config file contents, migrating older layouts to the current one
///
/// Returns the configuration and whether a migration was applied. Empty or
/// whitespace-only contents are treated as corruption, not as defaults.
pub(crate) fn parse_config(
    contents: &str,
    path: &Path,
) -> ConfigResult<(ServerConfiguration, bool)> {
    if contents.trim().is_empty() {
        return Err(ConfigError::ReadError {
            path: path.to_path_buf(),
            source: std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                "Config file is empty or contains only whitespace",
            ),
        });
    }

    let mut table: toml::Table =
        toml::from_str(contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;

    let migrated = migration::migrate_to_latest(&mut table)?;

    let config = toml::Value::Table(table)
        .try_into::<ServerConfiguration>()
        .map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;

    Ok((config, migrated))
}

/// Handles configuration file persistence
pub struct ConfigPersistence {
    config_path: PathBuf,
}

impl ConfigPersistence {
    /// Creates a new persistence handler for the given config file path
    pub fn new(config_path: PathBuf) -> Self {
        Self { config_path }
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Loads configuration from file
    ///
    /// If the file doesn't exist, returns the default config.
    /// If the file is empty or corrupted, returns an error.
    pub fn load(&self) -> ConfigResult<ServerConfiguration> {
        if !self.config_path.exists() {
            log::info!(
                "Config file not found at {}, using defaults",
                self.config_path.display()
            );
            return Ok(ServerConfiguration::default());
        }

        let contents =
            fs::read_to_string(&self.config_path).map_err(|e| ConfigError::ReadError {
                path: self.config_path.clone(),
                source: e,
            })?;

        let (config, migrated) = parse_config(&contents, &self.config_path)?;

        if migrated {
            log::info!("Saving migrated config");
            if let Err(e) = self.save(&config) {
                // The migrated config is still usable; the file is rewritten on the next save
                log::warn!("Could not save migrated config: {}", e.full_message());
            }
        }

        // Invalid values are reported but kept so the administrator can fix them
        if let Err(errors) = config.validate_all() {
            log::warn!("Config validation warnings: {}", join_errors(&errors));
        }

        Ok(config)
    }

    /// Saves configuration to file atomically
    ///
    /// The config is validated first. It is written to a temporary file in
    /// the same directory and renamed over the old file.
    pub fn save(&self, config: &ServerConfiguration) -> ConfigResult<()> {
        if let Err(errors) = config.validate_all() {
            return Err(ConfigError::ValidationError(join_errors(&errors)));
        }

        if let Some(parent) = self.config_path.parent() {
            self.ensure_directory_exists(parent)?;
        }

        if self.config_path.exists() {
            self.backup_config()?;
        }

        let toml_string = config.to_toml_pretty()?;

        let temp_file = self.create_temp_file()?;
        self.write_atomic(temp_file, &toml_string)?;

        log::info!("Config saved to {}", self.config_path.display());
        Ok(())
    }

    /// Path of the copy taken before each overwrite
    pub fn backup_path(&self) -> PathBuf {
        self.config_path.with_extension("toml.backup")
    }

    /// Ensures a directory exists, creating it if necessary
    fn ensure_directory_exists(&self, path: &Path) -> ConfigResult<()> {
        if !path.as_os_str().is_empty() && !path.exists() {
            fs::create_dir_all(path).map_err(|e| ConfigError::DirectoryCreationError {
                path: path.to_path_buf(),
                source: e,
            })?;
            log::info!("Created config directory: {}", path.display());
        }
        Ok(())
    }

    /// Copies the current config file next to itself
    fn backup_config(&self) -> ConfigResult<()> {
        let backup_path = self.backup_path();
        fs::copy(&self.config_path, &backup_path)
            .map_err(|e| ConfigError::BackupError { source: e })?;
        log::debug!("Backed up config to {}", backup_path.display());
        Ok(())
    }

    /// Creates a temporary file in the same directory as the config file
    fn create_temp_file(&self) -> ConfigResult<NamedTempFile> {
        let dir = self
            .config_path
            .parent()
            .ok_or_else(|| ConfigError::PathResolutionError {
                reason: "Config path has no parent directory".to_string(),
            })?;

        let dir = if dir.as_os_str().is_empty() {
            Path::new(".")
        } else {
            dir
        };

        NamedTempFile::new_in(dir).map_err(ConfigError::IoError)
    }

    /// Writes content to a temporary file and atomically renames it
    fn write_atomic(&self, mut temp_file: NamedTempFile, content: &str) -> ConfigResult<()> {
        temp_file
            .write_all(content.as_bytes())
            .map_err(ConfigError::IoError)?;

        temp_file.flush().map_err(ConfigError::IoError)?;

        temp_file
            .persist(&self.config_path)
            .map_err(|e| ConfigError::WriteError {
                path: self.config_path.clone(),
                source: e.error,
            })?;

        Ok(())
    }

    /// Writes the default config file
    pub fn generate_default(&self) -> ConfigResult<()> {
        self.save(&ServerConfiguration::default())?;

        log::info!("Generated default config at {}", self.config_path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CONFIG_VERSION;
    use std::fs;
    use tempfile::TempDir;

    fn setup_test_dir() -> (TempDir, PathBuf) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("server.toml");
        (temp_dir, config_path)
    }

    #[test]
    fn test_load_nonexistent_returns_default() {
        let (_temp_dir, config_path) = setup_test_dir();
        let persistence = ConfigPersistence::new(config_path);

        let config = persistence.load().expect("Should load default config");
        assert_eq!(config, ServerConfiguration::default());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let (_temp_dir, config_path) = setup_test_dir();
        let persistence = ConfigPersistence::new(config_path);

        let mut config = ServerConfiguration::default();
        config.http_server_port_number = 8200;
        config.sort_remove_words.push("of".to_string());

        persistence.save(&config).expect("Should save config");
        let loaded = persistence.load().expect("Should load config");

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_save_creates_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("subdir").join("server.toml");
        let persistence = ConfigPersistence::new(config_path.clone());

        persistence
            .save(&ServerConfiguration::default())
            .expect("Should create directory and save");

        assert!(config_path.exists());
    }

    #[test]
    fn test_backup_created_on_overwrite() {
        let (_temp_dir, config_path) = setup_test_dir();
        let persistence = ConfigPersistence::new(config_path);

        let config = ServerConfiguration::default();
        persistence.save(&config).expect("Should save config");
        assert!(!persistence.backup_path().exists());

        persistence.save(&config).expect("Should save config again");
        assert!(persistence.backup_path().exists());
    }

    #[test]
    fn test_invalid_toml_returns_parse_error() {
        let (_temp_dir, config_path) = setup_test_dir();
        fs::write(&config_path, "this is not valid TOML {{{").expect("Should write file");

        let persistence = ConfigPersistence::new(config_path);
        let result = persistence.load();

        assert!(matches!(result, Err(ConfigError::ParseError { .. })));
    }

    #[test]
    fn test_wrong_type_returns_parse_error() {
        let (_temp_dir, config_path) = setup_test_dir();
        fs::write(&config_path, "Version = 2\nHttpServerPortNumber = \"eighty\"\n")
            .expect("Should write file");

        let persistence = ConfigPersistence::new(config_path);
        assert!(matches!(
            persistence.load(),
            Err(ConfigError::ParseError { .. })
        ));
    }

    #[test]
    fn test_empty_file_returns_read_error() {
        let (_temp_dir, config_path) = setup_test_dir();
        fs::write(&config_path, "  \n\t").expect("Should write file");

        let persistence = ConfigPersistence::new(config_path);
        assert!(matches!(
            persistence.load(),
            Err(ConfigError::ReadError { .. })
        ));
    }

    #[test]
    fn test_validate_before_save() {
        let (_temp_dir, config_path) = setup_test_dir();
        let persistence = ConfigPersistence::new(config_path.clone());

        let mut config = ServerConfiguration::default();
        config.min_resume_pct = 95;

        let result = persistence.save(&config);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
        assert!(!config_path.exists());
    }

    #[test]
    fn test_load_keeps_invalid_values() {
        let (_temp_dir, config_path) = setup_test_dir();
        fs::write(&config_path, "Version = 2\nMinResumePct = 95\n").expect("Should write file");

        let persistence = ConfigPersistence::new(config_path);
        let config = persistence.load().expect("Invalid values only warn");
        assert_eq!(config.min_resume_pct, 95);
    }

    #[test]
    fn test_legacy_file_is_migrated_and_rewritten() {
        let (_temp_dir, config_path) = setup_test_dir();
        fs::write(&config_path, "HttpServerPortNumber = 9000\nRunAtStartup = true\n")
            .expect("Should write file");

        let persistence = ConfigPersistence::new(config_path.clone());
        let config = persistence.load().expect("Should migrate");
        assert_eq!(config.version, CONFIG_VERSION);
        assert_eq!(config.http_server_port_number, 9000);
        assert!(config.application.run_at_startup);

        let rewritten = fs::read_to_string(&config_path).expect("Should read");
        assert!(rewritten.contains("[Application]"));
        assert!(persistence.backup_path().exists());
    }

    #[test]
    fn test_generate_default() {
        let (_temp_dir, config_path) = setup_test_dir();
        let persistence = ConfigPersistence::new(config_path.clone());

        persistence
            .generate_default()
            .expect("Should generate default config");

        assert!(config_path.exists());

        let loaded = persistence.load().expect("Should load generated config");
        assert_eq!(loaded, ServerConfiguration::default());
    }
}
