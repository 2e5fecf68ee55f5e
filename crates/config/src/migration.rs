//! Configuration migration system
//!
//! Migrations operate on the raw TOML table before it is deserialized, so keys
//! that the current layout no longer knows about can still be moved.
//! When CONFIG_VERSION is incremented, add a migration here.

use crate::application_config::ApplicationConfiguration;
use crate::{ConfigError, ConfigResult, CONFIG_VERSION};
use toml::{Table, Value};

/// Key holding the file format version
pub const VERSION_KEY: &str = "Version";

/// Version assumed for files written before the version key existed
pub const LEGACY_VERSION: u32 = 1;

/// Trait for config migrations
pub trait Migration {
    /// Returns the version this migration upgrades TO
    fn target_version(&self) -> u32;

    /// Performs the migration in place
    fn migrate(&self, table: &mut Table) -> ConfigResult<()>;
}

/// Reads the file format version of a raw config table
pub fn detect_version(table: &Table) -> u32 {
    table
        .get(VERSION_KEY)
        .and_then(Value::as_integer)
        .and_then(|v| u32::try_from(v).ok())
        .unwrap_or(LEGACY_VERSION)
}

/// Migrates a raw config table from its version to the latest version
///
/// Returns true if the table was changed.
pub fn migrate_to_latest(table: &mut Table) -> ConfigResult<bool> {
    let version = detect_version(table);

    if version == CONFIG_VERSION {
        return Ok(false);
    }

    if version > CONFIG_VERSION {
        log::warn!(
            "Config version {} is newer than supported version {}. Attempting to use as-is.",
            version,
            CONFIG_VERSION
        );
        return Ok(false);
    }

    log::info!(
        "Migrating config from version {} to {}",
        version,
        CONFIG_VERSION
    );

    let mut current_version = version;

    while current_version < CONFIG_VERSION {
        let next_version = current_version + 1;

        match get_migration(next_version) {
            Some(migration) => {
                migration.migrate(table)?;
                log::info!("Applied migration to version {}", migration.target_version());
            }
            None => log::warn!(
                "No migration defined for version {}, skipping",
                next_version
            ),
        }

        current_version = next_version;
    }

    table.insert(
        VERSION_KEY.to_string(),
        Value::Integer(i64::from(CONFIG_VERSION)),
    );

    Ok(true)
}

/// Returns the migration for a specific version, if one exists
fn get_migration(version: u32) -> Option<Box<dyn Migration>> {
    match version {
        2 => Some(Box::new(NestApplicationSettings)),
        _ => None,
    }
}

/// Version 2 moved the base application settings into an `Application` table
///
/// Version 1 files kept them at the top level next to the server settings.
/// Keys already present in `Application` win over top-level leftovers.
struct NestApplicationSettings;

impl Migration for NestApplicationSettings {
    fn target_version(&self) -> u32 {
        2
    }

    fn migrate(&self, table: &mut Table) -> ConfigResult<()> {
        let moved: Vec<(String, Value)> = ApplicationConfiguration::KEYS
            .iter()
            .filter_map(|key| table.remove(*key).map(|value| (key.to_string(), value)))
            .collect();

        if moved.is_empty() {
            return Ok(());
        }

        let application = table
            .entry("Application")
            .or_insert(Value::Table(Table::new()))
            .as_table_mut()
            .ok_or_else(|| ConfigError::MigrationError {
                version: self.target_version(),
                reason: "Application is not a table".to_string(),
            })?;

        for (key, value) in moved {
            if !application.contains_key(&key) {
                application.insert(key, value);
            }
        }

        Ok(())
    }
}
