//! Configuration backup and restore utilities
//!
//! Timestamped snapshots of the server configuration with automatic rotation.

use crate::error::join_errors;
use crate::persistence::parse_config;
use crate::{ConfigError, ConfigResult, ServerConfiguration};
use std::fs;
use std::path::{Path, PathBuf};

/// File name prefix shared by every backup
const BACKUP_PREFIX: &str = "server_";

/// Upper bound on backups sharing one timestamp
const MAX_SAME_STAMP: u32 = 10_000;

/// Manages configuration backups
pub struct ConfigBackupManager {
    backup_dir: PathBuf,
    max_backups: usize,
}

impl ConfigBackupManager {
    /// Creates a new backup manager
    ///
    /// Backups are stored in the specified directory.
    pub fn new(backup_dir: PathBuf) -> Self {
        Self {
            backup_dir,
            max_backups: 10,
        }
    }

    /// Sets the maximum number of backups to keep
    pub fn with_max_backups(mut self, max: usize) -> Self {
        self.max_backups = max.max(1);
        self
    }

    pub fn backup_dir(&self) -> &Path {
        &self.backup_dir
    }

    /// Creates a backup of the given config
    ///
    /// Returns the path to the backup file.
    pub fn create_backup(&self, config: &ServerConfiguration) -> ConfigResult<PathBuf> {
        self.ensure_backup_dir()?;

        let backup_path = self.next_backup_path()?;
        let toml_string = config.to_toml_pretty()?;
        fs::write(&backup_path, toml_string).map_err(|e| ConfigError::WriteError {
            path: backup_path.clone(),
            source: e,
        })?;

        log::info!("Created config backup at {}", backup_path.display());

        self.rotate_backups()?;

        Ok(backup_path)
    }

    /// Copies a config file into the backup directory byte for byte
    ///
    /// Used when the file no longer parses and cannot go through
    /// `create_backup`.
    pub fn backup_file(&self, config_path: &Path) -> ConfigResult<PathBuf> {
        self.ensure_backup_dir()?;

        let backup_path = self.next_backup_path()?;
        fs::copy(config_path, &backup_path).map_err(|e| ConfigError::BackupError { source: e })?;

        log::info!(
            "Copied {} to {}",
            config_path.display(),
            backup_path.display()
        );

        self.rotate_backups()?;

        Ok(backup_path)
    }

    /// Restores config from a backup file
    pub fn restore_from_backup(&self, backup_path: &Path) -> ConfigResult<ServerConfiguration> {
        if !backup_path.exists() {
            return Err(ConfigError::PathResolutionError {
                reason: format!("Backup file not found: {}", backup_path.display()),
            });
        }

        let contents = fs::read_to_string(backup_path).map_err(|e| ConfigError::ReadError {
            path: backup_path.to_path_buf(),
            source: e,
        })?;

        let (config, _) = parse_config(&contents, backup_path)?;

        if let Err(errors) = config.validate_all() {
            log::warn!(
                "Restored config has validation warnings: {}",
                join_errors(&errors)
            );
        }

        log::info!("Restored config from {}", backup_path.display());

        Ok(config)
    }

    /// Lists all available backups, newest first
    pub fn list_backups(&self) -> ConfigResult<Vec<BackupInfo>> {
        if !self.backup_dir.exists() {
            return Ok(Vec::new());
        }

        let mut backups = Vec::new();

        for entry in fs::read_dir(&self.backup_dir)? {
            let path = entry?.path();

            if !path.is_file() || path.extension().and_then(|s| s.to_str()) != Some("toml") {
                continue;
            }

            let Some(filename) = path.file_name().and_then(|s| s.to_str()) else {
                continue;
            };

            if filename.starts_with(BACKUP_PREFIX) {
                let metadata = fs::metadata(&path)?;
                let created = metadata.created().or_else(|_| metadata.modified())?;

                backups.push(BackupInfo {
                    filename: filename.to_string(),
                    path: path.clone(),
                    created,
                    size_bytes: metadata.len(),
                });
            }
        }

        // Names embed the timestamp, so they order the same way the backups were taken
        backups.sort_by(|a, b| b.filename.cmp(&a.filename));

        Ok(backups)
    }

    /// Returns the newest backup, if any
    pub fn latest_backup(&self) -> ConfigResult<Option<BackupInfo>> {
        Ok(self.list_backups()?.into_iter().next())
    }

    /// Deletes a specific backup
    pub fn delete_backup(&self, backup_path: &Path) -> ConfigResult<()> {
        if !backup_path.starts_with(&self.backup_dir) {
            return Err(ConfigError::PathResolutionError {
                reason: "Backup path is not in the backup directory".to_string(),
            });
        }

        fs::remove_file(backup_path).map_err(|e| ConfigError::WriteError {
            path: backup_path.to_path_buf(),
            source: e,
        })?;

        log::info!("Deleted backup at {}", backup_path.display());

        Ok(())
    }

    /// Deletes all backups
    pub fn delete_all_backups(&self) -> ConfigResult<usize> {
        let backups = self.list_backups()?;
        let count = backups.len();

        for backup in backups {
            self.delete_backup(&backup.path)?;
        }

        log::info!("Deleted {} backup(s)", count);

        Ok(count)
    }

    /// Picks a file name that sorts after every existing backup
    ///
    /// Backups taken within the same millisecond get a zero-padded counter
    /// suffix. If the clock went backwards, the first free name is used.
    fn next_backup_path(&self) -> ConfigResult<PathBuf> {
        let stem = format!(
            "{}{}",
            BACKUP_PREFIX,
            chrono::Local::now().format("%Y%m%d_%H%M%S_%3f")
        );
        let latest = self.latest_backup()?.map(|info| info.filename);
        let mut fallback = None;

        for counter in 0..MAX_SAME_STAMP {
            let filename = if counter == 0 {
                format!("{}.toml", stem)
            } else {
                format!("{}_{:04}.toml", stem, counter)
            };
            let path = self.backup_dir.join(&filename);

            if path.exists() {
                continue;
            }

            if latest.as_ref().is_none_or(|latest| filename > *latest) {
                return Ok(path);
            }

            fallback.get_or_insert(path);
        }

        fallback.ok_or_else(|| ConfigError::PathResolutionError {
            reason: format!("No free backup name for {}", stem),
        })
    }

    /// Ensures the backup directory exists
    fn ensure_backup_dir(&self) -> ConfigResult<()> {
        if !self.backup_dir.exists() {
            fs::create_dir_all(&self.backup_dir).map_err(|e| {
                ConfigError::DirectoryCreationError {
                    path: self.backup_dir.clone(),
                    source: e,
                }
            })?;
            log::info!("Created backup directory: {}", self.backup_dir.display());
        }
        Ok(())
    }

    /// Rotates backups, keeping only the most recent ones
    fn rotate_backups(&self) -> ConfigResult<()> {
        let backups = self.list_backups()?;

        if backups.len() > self.max_backups {
            let to_delete = backups.len() - self.max_backups;
            for backup in backups.iter().skip(self.max_backups) {
                self.delete_backup(&backup.path)?;
            }

            log::info!("Rotated backups, deleted {} old backup(s)", to_delete);
        }

        Ok(())
    }
}

/// Information about a config backup
#[derive(Debug, Clone)]
pub struct BackupInfo {
    /// Full path to the backup file
    pub path: PathBuf,
    /// Filename of the backup
    pub filename: String,
    /// Creation timestamp
    pub created: std::time::SystemTime,
    /// File size in bytes
    pub size_bytes: u64,
}

impl BackupInfo {
    /// Returns a human-readable timestamp
    pub fn created_timestamp(&self) -> String {
        use std::time::UNIX_EPOCH;

        self.created
            .duration_since(UNIX_EPOCH)
            .ok()
            .and_then(|d| {
                chrono::DateTime::from_timestamp(d.as_secs() as i64, 0)
                    .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
            })
            .unwrap_or_else(|| "Unknown".to_string())
    }

    /// Returns file size in a human-readable format
    pub fn size_human(&self) -> String {
        let bytes = self.size_bytes as f64;
        if bytes < 1024.0 {
            format!("{} B", bytes)
        } else if bytes < 1024.0 * 1024.0 {
            format!("{:.1} KB", bytes / 1024.0)
        } else {
            format!("{:.1} MB", bytes / (1024.0 * 1024.0))
        }
    }
}
