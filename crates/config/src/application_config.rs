//! Base application settings shared by every mediahub process

use crate::validation::{ConfigSection, ValidationError, Validator};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Release channel used when checking for updates
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum UpdateLevel {
    #[default]
    Release,
    Beta,
    Dev,
}

impl std::fmt::Display for UpdateLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UpdateLevel::Release => write!(f, "release"),
            UpdateLevel::Beta => write!(f, "beta"),
            UpdateLevel::Dev => write!(f, "dev"),
        }
    }
}

/// Application-level settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "PascalCase")]
pub struct ApplicationConfiguration {
    /// Log at debug level instead of info
    pub enable_debug_level_logging: bool,

    /// Install updates automatically
    pub enable_auto_update: bool,

    /// Channel to take updates from
    pub system_update_level: UpdateLevel,

    /// Start with the operating system
    pub run_at_startup: bool,

    pub is_startup_wizard_completed: bool,

    /// Days to keep rotated log files
    pub log_file_retention_days: u32,

    /// Overrides the default cache directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_path: Option<PathBuf>,
}

impl Default for ApplicationConfiguration {
    fn default() -> Self {
        Self {
            enable_debug_level_logging: false,
            enable_auto_update: true,
            system_update_level: UpdateLevel::Release,
            run_at_startup: false,
            is_startup_wizard_completed: false,
            log_file_retention_days: 3,
            cache_path: None,
        }
    }
}

impl ApplicationConfiguration {
    /// Persisted key names of every application setting
    pub const KEYS: [&'static str; 7] = [
        "EnableDebugLevelLogging",
        "EnableAutoUpdate",
        "SystemUpdateLevel",
        "RunAtStartup",
        "IsStartupWizardCompleted",
        "LogFileRetentionDays",
        "CachePath",
    ];

    /// Filter string for the `log` facade matching these settings
    pub fn log_filter(&self) -> &'static str {
        if self.enable_debug_level_logging {
            "debug"
        } else {
            "info"
        }
    }
}

impl ConfigSection for ApplicationConfiguration {
    fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut results = vec![Validator::in_range(
            self.log_file_retention_days,
            1,
            365,
            "Application.LogFileRetentionDays",
        )];

        if let Some(ref cache_path) = self.cache_path {
            if cache_path.as_os_str().is_empty() {
                results.push(Err(ValidationError::new(
                    "Application.CachePath",
                    "must not be empty when set",
                )));
            }
        }

        Validator::collect_errors(results)
    }

    fn merge(&mut self, other: Self) {
        self.enable_debug_level_logging = other.enable_debug_level_logging;
        self.enable_auto_update = other.enable_auto_update;
        self.system_update_level = other.system_update_level;
        self.run_at_startup = other.run_at_startup;
        self.is_startup_wizard_completed = other.is_startup_wizard_completed;
        self.log_file_retention_days = other.log_file_retention_days;
        self.cache_path = other.cache_path;
    }

    fn section_name(&self) -> &'static str {
        "Application"
    }
}
