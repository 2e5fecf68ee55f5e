//! Configuration file watcher for hot-reloading
//!
//! A running server polls its config file and swaps in the new settings
//! without restarting.

use crate::error::join_errors;
use crate::persistence::parse_config;
use crate::{ConfigError, ConfigResult, ServerConfiguration};
use std::path::PathBuf;
use std::sync::mpsc::RecvTimeoutError;
use std::sync::{Arc, RwLock};
use std::thread;
use std::time::{Duration, SystemTime};

/// Configuration watcher that detects file changes
pub struct ConfigWatcher {
    config_path: PathBuf,
    current_config: Arc<RwLock<ServerConfiguration>>,
    last_modified: SystemTime,
    /// Modification time of the version that last failed to reload
    failed_modified: Option<SystemTime>,
    check_interval: Duration,
}

impl ConfigWatcher {
    /// Creates a new config watcher
    pub fn new(config_path: PathBuf, initial_config: ServerConfiguration) -> ConfigResult<Self> {
        let last_modified = std::fs::metadata(&config_path)
            .and_then(|m| m.modified())
            .unwrap_or_else(|_| SystemTime::now());

        Ok(Self {
            config_path,
            current_config: Arc::new(RwLock::new(initial_config)),
            last_modified,
            failed_modified: None,
            check_interval: Duration::from_secs(2),
        })
    }

    /// Sets the check interval for file modifications
    pub fn with_check_interval(mut self, interval: Duration) -> Self {
        self.check_interval = interval;
        self
    }

    /// Returns a handle to the current configuration
    ///
    /// This can be cloned and shared across threads.
    pub fn config_handle(&self) -> Arc<RwLock<ServerConfiguration>> {
        Arc::clone(&self.current_config)
    }

    /// Returns a copy of the current configuration
    pub fn snapshot(&self) -> ConfigResult<ServerConfiguration> {
        self.current_config
            .read()
            .map(|config| config.clone())
            .map_err(|_| ConfigError::LockPoisoned)
    }

    /// Checks if the config file has been modified and reloads if needed
    ///
    /// Returns true if config was reloaded, false if no changes detected.
    pub fn check_and_reload(&mut self) -> ConfigResult<bool> {
        let metadata = std::fs::metadata(&self.config_path)?;
        let modified = metadata.modified()?;

        if modified > self.last_modified {
            if self.failed_modified != Some(modified) {
                log::info!("Config file modified, reloading...");
            }

            match self.reload_config() {
                Ok(()) => {
                    self.last_modified = modified;
                    self.failed_modified = None;
                    log::info!("Config reloaded successfully");
                    Ok(true)
                }
                Err(e) => {
                    // last_modified stays put so the next tick retries
                    if self.failed_modified == Some(modified) {
                        log::debug!("Config still fails to reload: {}", e.full_message());
                    } else {
                        log::error!("Failed to reload config: {}", e.full_message());
                        self.failed_modified = Some(modified);
                    }
                    Err(e)
                }
            }
        } else {
            Ok(false)
        }
    }

    /// Reloads the configuration from disk
    fn reload_config(&self) -> ConfigResult<()> {
        let contents = std::fs::read_to_string(&self.config_path).map_err(|e| {
            ConfigError::ReadError {
                path: self.config_path.clone(),
                source: e,
            }
        })?;

        let (new_config, migrated) = parse_config(&contents, &self.config_path)?;

        if migrated {
            log::warn!(
                "Reloaded config at {} uses an older layout; it is rewritten on the next save",
                self.config_path.display()
            );
        }

        if let Err(errors) = new_config.validate_all() {
            log::warn!(
                "Config validation warnings after reload: {}",
                join_errors(&errors)
            );
        }

        let mut config = self
            .current_config
            .write()
            .map_err(|_| ConfigError::LockPoisoned)?;

        *config = new_config;

        Ok(())
    }

    /// Starts watching for config changes in a background thread
    ///
    /// Returns a handle that can be used to stop watching.
    pub fn start_watching(mut self) -> WatchHandle {
        let (tx, rx) = std::sync::mpsc::channel();

        let handle = thread::spawn(move || {
            log::info!("Config watcher started for {}", self.config_path.display());

            loop {
                if let Err(e) = self.check_and_reload() {
                    if self.failed_modified.is_none() {
                        log::error!("Error checking config: {}", e.full_message());
                    }
                }

                match rx.recv_timeout(self.check_interval) {
                    Err(RecvTimeoutError::Timeout) => continue,
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            }

            log::info!("Config watcher stopped");
        });

        WatchHandle {
            stop_tx: tx,
            thread_handle: Some(handle),
        }
    }
}

/// Handle for a running config watcher
///
/// Dropping this handle will stop the watcher thread.
pub struct WatchHandle {
    stop_tx: std::sync::mpsc::Sender<()>,
    thread_handle: Option<thread::JoinHandle<()>>,
}

impl WatchHandle {
    /// Stops the watcher and waits for the thread to finish
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        let _ = self.stop_tx.send(());
        if let Some(handle) = self.thread_handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for WatchHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn setup_test_config() -> (TempDir, PathBuf) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("server.toml");

        let toml_string = ServerConfiguration::default()
            .to_toml_pretty()
            .expect("Failed to serialize");
        fs::write(&config_path, toml_string).expect("Failed to write config");

        (temp_dir, config_path)
    }

    fn write_port(config_path: &std::path::Path, port: u16) {
        let mut config = ServerConfiguration::default();
        config.http_server_port_number = port;
        let toml_string = config.to_toml_pretty().expect("Failed to serialize");
        fs::write(config_path, toml_string).expect("Failed to write config");
    }

    #[test]
    fn test_watcher_creation() {
        let (_temp_dir, config_path) = setup_test_config();
        let watcher = ConfigWatcher::new(config_path, ServerConfiguration::default());
        assert!(watcher.is_ok());
    }

    #[test]
    fn test_check_no_changes() {
        let (_temp_dir, config_path) = setup_test_config();
        let mut watcher = ConfigWatcher::new(config_path, ServerConfiguration::default())
            .expect("Failed to create watcher");

        let reloaded = watcher.check_and_reload().expect("Check failed");
        assert!(!reloaded);
    }

    #[test]
    fn test_check_with_changes() {
        let (_temp_dir, config_path) = setup_test_config();
        let mut watcher = ConfigWatcher::new(config_path.clone(), ServerConfiguration::default())
            .expect("Failed to create watcher");
        watcher.last_modified = SystemTime::UNIX_EPOCH;

        write_port(&config_path, 9100);

        let reloaded = watcher.check_and_reload().expect("Check failed");
        assert!(reloaded);

        let handle = watcher.config_handle();
        let config = handle.read().expect("Failed to read config");
        assert_eq!(config.http_server_port_number, 9100);
    }

    #[test]
    fn test_failed_reload_keeps_previous_config() {
        let (_temp_dir, config_path) = setup_test_config();
        let mut watcher = ConfigWatcher::new(config_path.clone(), ServerConfiguration::default())
            .expect("Failed to create watcher");
        watcher.last_modified = SystemTime::UNIX_EPOCH;

        fs::write(&config_path, "not [valid toml").expect("Failed to write config");

        assert!(watcher.check_and_reload().is_err());
        assert_eq!(watcher.last_modified, SystemTime::UNIX_EPOCH);

        let snapshot = watcher.snapshot().expect("Failed to read config");
        assert_eq!(snapshot, ServerConfiguration::default());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let mut watcher = ConfigWatcher::new(
            temp_dir.path().join("missing.toml"),
            ServerConfiguration::default(),
        )
        .expect("Failed to create watcher");

        assert!(matches!(
            watcher.check_and_reload(),
            Err(ConfigError::IoError(_))
        ));
    }

    #[test]
    fn test_config_handle_shared() {
        let (_temp_dir, config_path) = setup_test_config();
        let watcher = ConfigWatcher::new(config_path, ServerConfiguration::default())
            .expect("Failed to create watcher");

        let handle1 = watcher.config_handle();
        let handle2 = watcher.config_handle();
        assert!(Arc::ptr_eq(&handle1, &handle2));
    }

    #[test]
    fn test_custom_check_interval() {
        let (_temp_dir, config_path) = setup_test_config();
        let watcher = ConfigWatcher::new(config_path, ServerConfiguration::default())
            .expect("Failed to create watcher")
            .with_check_interval(Duration::from_millis(100));

        assert_eq!(watcher.check_interval, Duration::from_millis(100));
    }

    #[test]
    fn test_watcher_thread_picks_up_changes() {
        let (_temp_dir, config_path) = setup_test_config();
        let mut watcher = ConfigWatcher::new(config_path.clone(), ServerConfiguration::default())
            .expect("Failed to create watcher")
            .with_check_interval(Duration::from_millis(20));
        watcher.last_modified = SystemTime::UNIX_EPOCH;
        let shared = watcher.config_handle();

        write_port(&config_path, 9200);
        let handle = watcher.start_watching();

        let mut port = 0;
        for _ in 0..100 {
            port = shared.read().expect("Failed to read").http_server_port_number;
            if port == 9200 {
                break;
            }
            thread::sleep(Duration::from_millis(10));
        }

        handle.stop();
        assert_eq!(port, 9200);
    }

    #[test]
    fn test_repeated_failure_remembers_modification_time() {
        let (_temp_dir, config_path) = setup_test_config();
        let mut watcher = ConfigWatcher::new(config_path.clone(), ServerConfiguration::default())
            .expect("Failed to create watcher");
        watcher.last_modified = SystemTime::UNIX_EPOCH;

        fs::write(&config_path, "not [valid toml").expect("Failed to write config");
        let modified = fs::metadata(&config_path)
            .and_then(|m| m.modified())
            .expect("Failed to read mtime");

        assert!(watcher.check_and_reload().is_err());
        assert_eq!(watcher.failed_modified, Some(modified));
        assert!(watcher.check_and_reload().is_err());
        assert_eq!(watcher.failed_modified, Some(modified));

        write_port(&config_path, 9300);
        watcher.last_modified = SystemTime::UNIX_EPOCH;
        assert!(watcher.check_and_reload().expect("Check failed"));
        assert_eq!(watcher.failed_modified, None);
    }

    #[test]
    fn test_stop_does_not_wait_for_interval() {
        let (_temp_dir, config_path) = setup_test_config();
        let watcher = ConfigWatcher::new(config_path, ServerConfiguration::default())
            .expect("Failed to create watcher")
            .with_check_interval(Duration::from_secs(30));
        let handle = watcher.start_watching();
        thread::sleep(Duration::from_millis(50));

        let started = std::time::Instant::now();
        handle.stop();
        assert!(started.elapsed() < Duration::from_secs(5));
    }
}
