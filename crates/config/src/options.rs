//! Value types referenced by the server configuration

use serde::{Deserialize, Serialize};

/// Unit used when displaying weather
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum WeatherUnits {
    #[default]
    Fahrenheit,
    Celsius,
}

impl std::fmt::Display for WeatherUnits {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WeatherUnits::Fahrenheit => write!(f, "fahrenheit"),
            WeatherUnits::Celsius => write!(f, "celsius"),
        }
    }
}

/// Client families that are shown a manual login form instead of a user list
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ManualLoginCategory {
    Mobile,
    Theater,
}

impl std::fmt::Display for ManualLoginCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ManualLoginCategory::Mobile => write!(f, "mobile"),
            ManualLoginCategory::Theater => write!(f, "theater"),
        }
    }
}

/// File naming convention for images saved next to media
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum ImageSavingConvention {
    #[default]
    Legacy,
    Compatible,
}

impl std::fmt::Display for ImageSavingConvention {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImageSavingConvention::Legacy => write!(f, "legacy"),
            ImageSavingConvention::Compatible => write!(f, "compatible"),
        }
    }
}

/// Which kinds of artwork to download for one media category
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "PascalCase")]
pub struct ImageDownloadOptions {
    pub art: bool,
    pub backdrops: bool,
    pub banner: bool,
    pub logo: bool,
    pub thumb: bool,
    pub disc: bool,
}

impl ImageDownloadOptions {
    /// Default options with backdrop downloads turned off
    pub fn without_backdrops() -> Self {
        Self {
            backdrops: false,
            ..Self::default()
        }
    }

    /// Returns true if at least one kind of artwork is downloaded
    pub fn any_enabled(&self) -> bool {
        self.art || self.backdrops || self.banner || self.logo || self.thumb || self.disc
    }
}

impl Default for ImageDownloadOptions {
    fn default() -> Self {
        Self {
            art: true,
            backdrops: true,
            banner: true,
            logo: true,
            thumb: true,
            disc: true,
        }
    }
}
