//! Environment variable overrides
//!
//! Containerized deployments set a handful of settings through the
//! environment instead of editing the config file. Variables follow the
//! pattern `MEDIAHUB_<SETTING>`.

use crate::ServerConfiguration;
use std::path::PathBuf;

pub const HTTP_PORT: &str = "MEDIAHUB_HTTP_PORT";
pub const WEBSOCKET_PORT: &str = "MEDIAHUB_WEBSOCKET_PORT";
pub const METADATA_LANGUAGE: &str = "MEDIAHUB_METADATA_LANGUAGE";
pub const METADATA_COUNTRY: &str = "MEDIAHUB_METADATA_COUNTRY";
pub const ENABLE_DEVELOPER_TOOLS: &str = "MEDIAHUB_ENABLE_DEVELOPER_TOOLS";
pub const DASHBOARD_SOURCE_PATH: &str = "MEDIAHUB_DASHBOARD_SOURCE_PATH";

/// Applies overrides from the process environment
///
/// Returns the number of settings that were overridden.
pub fn apply_env_overrides(config: &mut ServerConfiguration) -> usize {
    apply_overrides_from(config, |key| std::env::var(key).ok())
}

/// Applies overrides read through `lookup`
///
/// Values that fail to parse are skipped with a warning.
pub fn apply_overrides_from<F>(config: &mut ServerConfiguration, lookup: F) -> usize
where
    F: Fn(&str) -> Option<String>,
{
    let mut applied = 0;

    if let Some(port) = parsed(&lookup, HTTP_PORT, |v| v.parse::<u16>().ok()) {
        config.http_server_port_number = port;
        applied += 1;
    }

    if let Some(port) = parsed(&lookup, WEBSOCKET_PORT, |v| v.parse::<u16>().ok()) {
        config.legacy_web_socket_port_number = port;
        applied += 1;
    }

    if let Some(language) = parsed(&lookup, METADATA_LANGUAGE, non_blank) {
        config.preferred_metadata_language = language;
        applied += 1;
    }

    if let Some(country) = parsed(&lookup, METADATA_COUNTRY, non_blank) {
        config.metadata_country_code = country.to_uppercase();
        applied += 1;
    }

    if let Some(enabled) = parsed(&lookup, ENABLE_DEVELOPER_TOOLS, parse_bool) {
        config.enable_developer_tools = enabled;
        applied += 1;
    }

    if let Some(path) = parsed(&lookup, DASHBOARD_SOURCE_PATH, |v| {
        non_blank(v).map(PathBuf::from)
    }) {
        config.dashboard_source_path = Some(path);
        applied += 1;
    }

    if applied > 0 {
        log::info!("Applied {} config override(s) from the environment", applied);
    }

    applied
}

fn parsed<F, T, P>(lookup: &F, key: &str, parse: P) -> Option<T>
where
    F: Fn(&str) -> Option<String>,
    P: FnOnce(&str) -> Option<T>,
{
    let raw = lookup(key)?;
    let value = parse(raw.trim());
    if value.is_none() {
        log::warn!("Ignoring {}: cannot use value '{}'", key, raw);
    }
    value
}

fn non_blank(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BuildProfile;
    use std::collections::HashMap;

    fn apply(vars: &[(&str, &str)]) -> (ServerConfiguration, usize) {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let mut config = ServerConfiguration::new(BuildProfile::Release);
        let applied = apply_overrides_from(&mut config, |key| vars.get(key).cloned());
        (config, applied)
    }

    #[test]
    fn test_no_overrides() {
        let (config, applied) = apply(&[]);
        assert_eq!(applied, 0);
        assert_eq!(config, ServerConfiguration::new(BuildProfile::Release));
    }

    #[test]
    fn test_port_overrides() {
        let (config, applied) = apply(&[(HTTP_PORT, "9000"), (WEBSOCKET_PORT, " 9001 ")]);
        assert_eq!(applied, 2);
        assert_eq!(config.http_server_port_number, 9000);
        assert_eq!(config.legacy_web_socket_port_number, 9001);
    }

    #[test]
    fn test_invalid_port_ignored() {
        let (config, applied) = apply(&[(HTTP_PORT, "99999")]);
        assert_eq!(applied, 0);
        assert_eq!(config.http_server_port_number, 8096);
    }

    #[test]
    fn test_locale_overrides() {
        let (config, _) = apply(&[(METADATA_LANGUAGE, "de"), (METADATA_COUNTRY, "de")]);
        assert_eq!(config.preferred_metadata_language, "de");
        assert_eq!(config.metadata_country_code, "DE");
    }

    #[test]
    fn test_blank_values_ignored() {
        let (config, applied) = apply(&[(METADATA_LANGUAGE, "  "), (DASHBOARD_SOURCE_PATH, "")]);
        assert_eq!(applied, 0);
        assert_eq!(config.preferred_metadata_language, "en");
        assert_eq!(config.dashboard_source_path, None);
    }

    #[test]
    fn test_developer_tools_override() {
        let (config, _) = apply(&[(ENABLE_DEVELOPER_TOOLS, "yes")]);
        assert!(config.enable_developer_tools);

        let (config, applied) = apply(&[(ENABLE_DEVELOPER_TOOLS, "maybe")]);
        assert_eq!(applied, 0);
        assert!(!config.enable_developer_tools);
    }

    #[test]
    fn test_dashboard_path_override() {
        let (config, _) = apply(&[(DASHBOARD_SOURCE_PATH, "/srv/dashboard")]);
        assert_eq!(
            config.dashboard_source_path,
            Some(PathBuf::from("/srv/dashboard"))
        );
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool("off"), Some(false));
        assert_eq!(parse_bool(""), None);
    }
}
