//! The server configuration record
//!
//! Every setting is independently defaulted. Field names are persisted in
//! PascalCase so existing configuration files and admin clients keep working.

use crate::application_config::ApplicationConfiguration;
use crate::options::{
    ImageDownloadOptions, ImageSavingConvention, ManualLoginCategory, WeatherUnits,
};
use crate::validation::{ConfigSection, ValidationError, Validator};
use crate::{ConfigResult, CONFIG_VERSION};
use mediahub_core::SortNameRules;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// The kind of build the server was compiled as
///
/// Some defaults differ between debug and release builds. Passing the profile
/// in explicitly keeps those defaults visible and testable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildProfile {
    Debug,
    Release,
}

impl BuildProfile {
    /// The profile of the running binary
    pub fn current() -> Self {
        if cfg!(debug_assertions) {
            BuildProfile::Debug
        } else {
            BuildProfile::Release
        }
    }
}

/// Settings for one server process
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "PascalCase")]
pub struct ServerConfiguration {
    /// Config file format version
    pub version: u32,

    // Display and locale
    /// Zip code or city used when displaying weather
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weather_location: Option<String>,
    pub weather_unit: WeatherUnits,
    pub preferred_metadata_language: String,
    pub metadata_country_code: String,
    pub season_zero_display_name: String,

    // Networking
    pub http_server_port_number: u16,
    pub legacy_web_socket_port_number: u16,
    pub enable_http_level_logging: bool,

    // Metadata
    pub metadata_refresh_days: u32,
    pub save_local_meta: bool,
    pub refresh_item_images: bool,
    pub enable_internet_providers: bool,
    /// Item types that never have internet providers run against them
    pub internet_provider_exclude_types: Vec<String>,
    pub enable_tv_db_updates: bool,
    pub enable_tmdb_updates: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items_by_name_path: Option<PathBuf>,
    pub enable_people_prefix_sub_folders: bool,
    pub recent_item_days: u32,

    // Images
    pub max_backdrops: u32,
    pub min_movie_backdrop_download_width: u32,
    pub min_series_backdrop_download_width: u32,
    pub image_saving_convention: ImageSavingConvention,
    pub enable_video_image_extraction: bool,

    // Sort names
    /// Replaced with a space when creating a sort name
    pub sort_replace_characters: Vec<String>,
    /// Removed when creating a sort name
    pub sort_remove_characters: Vec<String>,
    /// Removed as whole words when creating a sort name
    pub sort_remove_words: Vec<String>,

    // Playback resume
    /// Minimum percentage played before playstate is saved
    pub min_resume_pct: u8,
    /// Past this percentage playstate resets and the item counts as played
    pub max_resume_pct: u8,
    /// Items shorter than this never save playstate
    pub min_resume_duration_seconds: u32,

    /// Seconds to wait after a file system change before rescanning
    pub file_watcher_delay: u32,

    // Developer and diagnostics
    pub show_log_window: bool,
    pub enable_developer_tools: bool,
    pub enable_dashboard_response_caching: bool,
    /// Serve the dashboard from this directory instead of the bundled copy
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dashboard_source_path: Option<PathBuf>,

    // Access control
    pub manual_login_clients: Vec<ManualLoginCategory>,

    // Tables follow the plain values so the TOML output stays flat at the top.
    pub download_movie_images: ImageDownloadOptions,
    pub download_series_images: ImageDownloadOptions,
    pub download_season_images: ImageDownloadOptions,
    pub download_music_artist_images: ImageDownloadOptions,
    pub download_music_album_images: ImageDownloadOptions,

    /// Base application settings
    pub application: ApplicationConfiguration,
}

impl ServerConfiguration {
    /// Creates a configuration with the compiled-in defaults for `profile`
    pub fn new(profile: BuildProfile) -> Self {
        Self {
            version: CONFIG_VERSION,

            weather_location: None,
            weather_unit: WeatherUnits::Fahrenheit,
            preferred_metadata_language: "en".to_string(),
            metadata_country_code: "US".to_string(),
            season_zero_display_name: "Specials".to_string(),

            http_server_port_number: 8096,
            legacy_web_socket_port_number: 8945,
            enable_http_level_logging: true,

            metadata_refresh_days: 30,
            save_local_meta: false,
            refresh_item_images: false,
            // Initial installs need providers to populate the library
            enable_internet_providers: true,
            internet_provider_exclude_types: Vec::new(),
            enable_tv_db_updates: false,
            enable_tmdb_updates: false,
            items_by_name_path: None,
            enable_people_prefix_sub_folders: false,
            recent_item_days: 10,

            max_backdrops: 3,
            min_movie_backdrop_download_width: 1280,
            min_series_backdrop_download_width: 1280,
            image_saving_convention: ImageSavingConvention::Legacy,
            enable_video_image_extraction: true,

            sort_replace_characters: vec![".".to_string(), "+".to_string(), "%".to_string()],
            sort_remove_characters: vec![
                ",".to_string(),
                "&".to_string(),
                "-".to_string(),
                "{".to_string(),
                "}".to_string(),
                "'".to_string(),
            ],
            sort_remove_words: vec!["the".to_string(), "a".to_string(), "an".to_string()],

            min_resume_pct: 5,
            max_resume_pct: 90,
            min_resume_duration_seconds: 5 * 60,

            file_watcher_delay: 8,

            show_log_window: false,
            enable_developer_tools: profile == BuildProfile::Debug,
            enable_dashboard_response_caching: true,
            dashboard_source_path: None,

            manual_login_clients: Vec::new(),

            download_movie_images: ImageDownloadOptions::default(),
            download_series_images: ImageDownloadOptions::default(),
            download_season_images: ImageDownloadOptions::without_backdrops(),
            download_music_artist_images: ImageDownloadOptions::default(),
            download_music_album_images: ImageDownloadOptions::default(),

            application: ApplicationConfiguration::default(),
        }
    }

    /// Sort-name rules built from the three sort lists
    pub fn sort_name_rules(&self) -> SortNameRules {
        SortNameRules::new(
            self.sort_replace_characters.clone(),
            self.sort_remove_characters.clone(),
            self.sort_remove_words.clone(),
        )
    }

    /// Returns true if internet providers may run for items of `item_type`
    pub fn internet_providers_enabled_for(&self, item_type: &str) -> bool {
        self.enable_internet_providers
            && !self
                .internet_provider_exclude_types
                .iter()
                .any(|excluded| excluded.eq_ignore_ascii_case(item_type))
    }

    /// Validates this record and every section it composes
    pub fn validate_all(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(mut e) = self.validate() {
            errors.append(&mut e);
        }

        if let Err(mut e) = self.application.validate() {
            errors.append(&mut e);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Renders the configuration as pretty TOML
    pub fn to_toml_pretty(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Renders the configuration as pretty JSON for admin clients
    pub fn to_json_pretty(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Default for ServerConfiguration {
    fn default() -> Self {
        Self::new(BuildProfile::current())
    }
}

impl ConfigSection for ServerConfiguration {
    fn validate(&self) -> Result<(), Vec<ValidationError>> {
        Validator::collect_errors(vec![
            Validator::in_range(self.http_server_port_number, 1, u16::MAX, "HttpServerPortNumber"),
            Validator::in_range(
                self.legacy_web_socket_port_number,
                1,
                u16::MAX,
                "LegacyWebSocketPortNumber",
            ),
            Validator::distinct(
                self.legacy_web_socket_port_number,
                self.http_server_port_number,
                "LegacyWebSocketPortNumber",
                "HttpServerPortNumber",
            ),
            Validator::in_range(self.min_resume_pct, 0, 100, "MinResumePct"),
            Validator::in_range(self.max_resume_pct, 0, 100, "MaxResumePct"),
            Validator::less_than(
                self.min_resume_pct,
                self.max_resume_pct,
                "MinResumePct",
                "MaxResumePct",
            ),
            Validator::not_empty(&self.preferred_metadata_language, "PreferredMetadataLanguage"),
            Validator::not_empty(&self.metadata_country_code, "MetadataCountryCode"),
            Validator::not_empty(&self.season_zero_display_name, "SeasonZeroDisplayName"),
        ])
    }

    fn merge(&mut self, other: Self) {
        let ServerConfiguration {
            version,
            weather_location,
            weather_unit,
            preferred_metadata_language,
            metadata_country_code,
            season_zero_display_name,
            http_server_port_number,
            legacy_web_socket_port_number,
            enable_http_level_logging,
            metadata_refresh_days,
            save_local_meta,
            refresh_item_images,
            enable_internet_providers,
            internet_provider_exclude_types,
            enable_tv_db_updates,
            enable_tmdb_updates,
            items_by_name_path,
            enable_people_prefix_sub_folders,
            recent_item_days,
            max_backdrops,
            min_movie_backdrop_download_width,
            min_series_backdrop_download_width,
            image_saving_convention,
            enable_video_image_extraction,
            sort_replace_characters,
            sort_remove_characters,
            sort_remove_words,
            min_resume_pct,
            max_resume_pct,
            min_resume_duration_seconds,
            file_watcher_delay,
            show_log_window,
            enable_developer_tools,
            enable_dashboard_response_caching,
            dashboard_source_path,
            manual_login_clients,
            download_movie_images,
            download_series_images,
            download_season_images,
            download_music_artist_images,
            download_music_album_images,
            application,
        } = other;

        self.version = version;
        self.weather_location = weather_location;
        self.weather_unit = weather_unit;
        self.preferred_metadata_language = preferred_metadata_language;
        self.metadata_country_code = metadata_country_code;
        self.season_zero_display_name = season_zero_display_name;
        self.http_server_port_number = http_server_port_number;
        self.legacy_web_socket_port_number = legacy_web_socket_port_number;
        self.enable_http_level_logging = enable_http_level_logging;
        self.metadata_refresh_days = metadata_refresh_days;
        self.save_local_meta = save_local_meta;
        self.refresh_item_images = refresh_item_images;
        self.enable_internet_providers = enable_internet_providers;
        self.internet_provider_exclude_types = internet_provider_exclude_types;
        self.enable_tv_db_updates = enable_tv_db_updates;
        self.enable_tmdb_updates = enable_tmdb_updates;
        self.items_by_name_path = items_by_name_path;
        self.enable_people_prefix_sub_folders = enable_people_prefix_sub_folders;
        self.recent_item_days = recent_item_days;
        self.max_backdrops = max_backdrops;
        self.min_movie_backdrop_download_width = min_movie_backdrop_download_width;
        self.min_series_backdrop_download_width = min_series_backdrop_download_width;
        self.image_saving_convention = image_saving_convention;
        self.enable_video_image_extraction = enable_video_image_extraction;
        self.sort_replace_characters = sort_replace_characters;
        self.sort_remove_characters = sort_remove_characters;
        self.sort_remove_words = sort_remove_words;
        self.min_resume_pct = min_resume_pct;
        self.max_resume_pct = max_resume_pct;
        self.min_resume_duration_seconds = min_resume_duration_seconds;
        self.file_watcher_delay = file_watcher_delay;
        self.show_log_window = show_log_window;
        self.enable_developer_tools = enable_developer_tools;
        self.enable_dashboard_response_caching = enable_dashboard_response_caching;
        self.dashboard_source_path = dashboard_source_path;
        self.manual_login_clients = manual_login_clients;
        self.download_movie_images = download_movie_images;
        self.download_series_images = download_series_images;
        self.download_season_images = download_season_images;
        self.download_music_artist_images = download_music_artist_images;
        self.download_music_album_images = download_music_album_images;
        self.application.merge(application);
    }

    fn section_name(&self) -> &'static str {
        "Server"
    }
}
