//! Subcommand implementations
//!
//! Each command writes its report to `out` so the binary prints to stdout and
//! tests can capture the text.

use anyhow::{bail, Context, Result};
use console::style;
use mediahub_config::ConfigManager;
use mediahub_core::{Book, LibraryItem};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Write a default config file if none exists
pub fn init(manager: &ConfigManager, out: &mut impl Write) -> Result<()> {
    let created = manager
        .initialize()
        .context("Failed to write the default config")?;

    if created {
        writeln!(
            out,
            "{} Created {}",
            style("✓").green().bold(),
            manager.config_path().display()
        )?;
    } else {
        writeln!(
            out,
            "Config already exists at {}",
            manager.config_path().display()
        )?;
    }

    Ok(())
}

/// Print the effective configuration
pub fn show(manager: &ConfigManager, format: &str, out: &mut impl Write) -> Result<()> {
    let config = manager
        .load_with_env_overrides()
        .context("Failed to load config")?;

    let rendered = match format {
        "toml" => config.to_toml_pretty()?,
        "json" => config.to_json_pretty()?,
        other => bail!("Unsupported format: {}", other),
    };

    writeln!(out, "{}", rendered.trim_end())?;
    Ok(())
}

/// Report validation problems
///
/// Returns `false` when the config file has problems.
pub fn validate(manager: &ConfigManager, out: &mut impl Write) -> Result<bool> {
    let errors = manager.validate().context("Failed to load config")?;

    if errors.is_empty() {
        writeln!(
            out,
            "{} {} is valid",
            style("✓").green().bold(),
            manager.config_path().display()
        )?;
        return Ok(true);
    }

    writeln!(
        out,
        "{} {} problem(s) in {}",
        style("✗").red().bold(),
        style(errors.len()).bold(),
        manager.config_path().display()
    )?;
    for error in &errors {
        writeln!(out, "  - {}", error)?;
    }

    Ok(false)
}

/// Restore the defaults, keeping a backup of the current file
pub fn reset(manager: &ConfigManager, out: &mut impl Write) -> Result<()> {
    if manager.config_path().exists() {
        let backups = manager.backup_manager();
        let backup = match manager.load() {
            Ok(current) => backups.create_backup(&current),
            Err(e) => {
                log::warn!(
                    "Current config is unreadable ({}), copying it as-is",
                    e.full_message()
                );
                backups.backup_file(manager.config_path())
            }
        }
        .context("Failed to back up current config")?;
        writeln!(out, "Backed up current config to {}", backup.display())?;
    }

    manager.reset().context("Failed to reset config")?;
    writeln!(out, "{} Config reset to defaults", style("✓").green().bold())?;
    Ok(())
}

/// Change the HTTP port and optionally the legacy web socket port
pub fn set_port(
    manager: &ConfigManager,
    http: u16,
    websocket: Option<u16>,
    out: &mut impl Write,
) -> Result<()> {
    let config = manager
        .update(|config| {
            config.http_server_port_number = http;
            if let Some(port) = websocket {
                config.legacy_web_socket_port_number = port;
            }
        })
        .context("Failed to update ports")?;

    writeln!(
        out,
        "{} HTTP port {}, web socket port {}",
        style("✓").green().bold(),
        config.http_server_port_number,
        config.legacy_web_socket_port_number
    )?;
    Ok(())
}

/// Take a timestamped backup of the current config
pub fn backup(manager: &ConfigManager, out: &mut impl Write) -> Result<()> {
    let config = manager.load().context("Failed to load config")?;
    let path = manager
        .backup_manager()
        .create_backup(&config)
        .context("Failed to create backup")?;

    writeln!(
        out,
        "{} Backup written to {}",
        style("✓").green().bold(),
        path.display()
    )?;
    Ok(())
}

/// List backups, newest first
pub fn list_backups(manager: &ConfigManager, out: &mut impl Write) -> Result<()> {
    let backups = manager
        .backup_manager()
        .list_backups()
        .context("Failed to list backups")?;

    if backups.is_empty() {
        writeln!(out, "No backups. Use 'backup' to create one.")?;
        return Ok(());
    }

    writeln!(out, "\n{} Backups", style(backups.len()).bold().cyan())?;
    writeln!(out, "{}", "=".repeat(60))?;
    for info in backups {
        writeln!(
            out,
            "{}  {}  {}",
            info.filename,
            style(info.created_timestamp()).dim(),
            info.size_human()
        )?;
    }

    Ok(())
}

/// Restore the config from a backup file
///
/// A bare file name is looked up in the backup directory.
pub fn restore(manager: &ConfigManager, file: &Path, out: &mut impl Write) -> Result<()> {
    let backups = manager.backup_manager();
    let path = resolve_backup_path(backups.backup_dir(), file);

    let config = backups
        .restore_from_backup(&path)
        .with_context(|| format!("Failed to read backup {}", path.display()))?;
    manager
        .save(&config)
        .context("Failed to save restored config")?;

    writeln!(
        out,
        "{} Restored config from {}",
        style("✓").green().bold(),
        path.display()
    )?;
    Ok(())
}

/// Print the sort name for `name` under the configured rules
pub fn sort_name(manager: &ConfigManager, name: &str, out: &mut impl Write) -> Result<()> {
    let config = manager.load().context("Failed to load config")?;
    writeln!(out, "{}", config.sort_name_rules().apply(name))?;
    Ok(())
}

/// Print the meta location of a book stored at `path`
pub fn meta_location(path: &Path, out: &mut impl Write) -> Result<()> {
    let name = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let book = Book::new(name, path);

    writeln!(out, "{}", describe_location(book.meta_location()))?;
    Ok(())
}

fn resolve_backup_path(backup_dir: &Path, file: &Path) -> PathBuf {
    if file.exists() || file.components().count() > 1 {
        file.to_path_buf()
    } else {
        backup_dir.join(file)
    }
}

fn describe_location(location: Option<&Path>) -> String {
    match location {
        None => "(none)".to_string(),
        Some(dir) if dir.as_os_str().is_empty() => ".".to_string(),
        Some(dir) => dir.display().to_string(),
    }
}
