//! Configuration types for Fanart.
//!
//! This module provides the configuration types and loading functionality.
//! The configuration file supports JSONC format (JSON with comments).
//! Both single-line (`//`) and multi-line (`/* */`) comments are allowed.

use std::fs;
use std::path::{Path, PathBuf};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::constants::{APP_ID, catalog};
use crate::utils::path::expand_and_resolve;

/// Tick cadence and staleness settings for the now-playing engine.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct RefreshConfig {
    /// Milliseconds between two ticks of the now-playing driver.
    pub interval_ms: u64,

    /// Number of ticks without an identity change after which the candidate
    /// set is reloaded anyway (picks up artwork added on disk).
    pub max_refresh_ticks: u32,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval_ms: 1000,
            max_refresh_ticks: 30,
        }
    }
}

/// Feature switches for music fanart resolution.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct MusicConfig {
    /// Fall back to genre fanart when the artist has none.
    pub genre_fallback: bool,

    /// Also publish the current backdrop to the overlay property.
    pub overlay: bool,

    /// Fall back to a random default backdrop when nothing else matches.
    pub default_backdrops: bool,

    /// Allow the pictures slideshow to override artist fanart when the skin enables it.
    pub slideshow: bool,

    /// Publish an artist/album thumbnail for the playing track.
    pub artist_thumbs: bool,
}

impl Default for MusicConfig {
    fn default() -> Self {
        Self {
            genre_fallback: true,
            overlay: false,
            default_backdrops: true,
            slideshow: false,
            artist_thumbs: true,
        }
    }
}

/// Directory scan settings.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct ScanConfig {
    /// Minimum image resolution as `WIDTHxHEIGHT`. `0x0` disables the check.
    pub min_resolution: String,

    /// Watch the fanart folders and rescan a category when its folder changes.
    pub watch: bool,

    /// Music library folders scanned for fanart stored next to the audio files.
    pub music_folders: Vec<String>,

    /// Regex applied to the path of an image relative to its music folder.
    /// Must contain a named group `artist` and may contain `album`.
    pub music_folders_regex: String,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            min_resolution: "0x0".to_string(),
            watch: false,
            music_folders: Vec::new(),
            music_folders_regex: r"^(?P<artist>[^/]+)/(?P<album>[^/]+)/(?:fanart|backdrop)[^/]*\.jpg$"
                .to_string(),
        }
    }
}

impl ScanConfig {
    /// Parses `min_resolution` into `(width, height)`.
    ///
    /// Malformed values are treated as "no minimum".
    #[must_use]
    pub fn min_resolution(&self) -> (u32, u32) {
        let value = self.min_resolution.trim().to_lowercase();
        let Some((w, h)) = value.split_once('x') else {
            return (0, 0);
        };

        match (w.trim().parse::<u32>(), h.trim().parse::<u32>()) {
            (Ok(w), Ok(h)) => (w, h),
            _ => (0, 0),
        }
    }
}

/// Animated artwork catalog settings.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct CatalogConfig {
    /// Enable the animated catalog client.
    pub enabled: bool,

    /// Base URL of the feed; resources are fetched as `{baseUrl}/{resource}`.
    pub base_url: String,

    /// Preferred language code (English is always considered too).
    pub language: String,

    /// Days after which the cached catalog is downloaded again.
    pub refresh_days: u64,

    /// Network timeout in seconds for downloads and probes.
    pub timeout_secs: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            base_url: catalog::DEFAULT_BASE_URL.to_string(),
            language: catalog::FALLBACK_LANGUAGE.to_string(),
            refresh_days: 30,
            timeout_secs: 10,
        }
    }
}

/// Root configuration structure for Fanart.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase")]
pub struct FanartConfig {
    /// Root of the fanart folder tree (`UserDef/...`, `Scraper/...`, `Music/...`).
    /// Defaults to the platform data directory.
    pub fanart_root: String,

    /// Tick settings.
    pub refresh: RefreshConfig,

    /// Music fanart switches.
    pub music: MusicConfig,

    /// Directory scan settings.
    pub scan: ScanConfig,

    /// Animated catalog settings.
    pub catalog: CatalogConfig,

    /// Host window ids that display now-playing fanart.
    pub windows: Vec<i32>,
}

impl FanartConfig {
    /// Returns the resolved fanart root folder.
    ///
    /// Relative paths are resolved against `config_dir` when given.
    #[must_use]
    pub fn fanart_root(&self, config_dir: Option<&Path>) -> PathBuf {
        if self.fanart_root.trim().is_empty() {
            return dirs::data_dir().map_or_else(|| PathBuf::from(APP_ID), |data| data.join(APP_ID));
        }

        let base = config_dir.map_or_else(PathBuf::new, Path::to_path_buf);
        expand_and_resolve(&self.fanart_root, &base)
    }

    /// Returns the configured music folders, resolved like `fanart_root`.
    #[must_use]
    pub fn music_folders(&self, config_dir: Option<&Path>) -> Vec<PathBuf> {
        let base = config_dir.map_or_else(PathBuf::new, Path::to_path_buf);
        self.scan
            .music_folders
            .iter()
            .map(|folder| expand_and_resolve(folder, &base))
            .filter(|folder| !folder.as_os_str().is_empty())
            .collect()
    }

    /// Returns whether `window_id` displays now-playing fanart.
    #[must_use]
    pub fn uses_fanart_window(&self, window_id: i32) -> bool { self.windows.contains(&window_id) }
}

/// Errors that can occur when loading the configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// No configuration file was found in any of the expected locations.
    NotFound,
    /// The configuration file exists but could not be read.
    IoError(std::io::Error),
    /// The configuration file contains invalid JSON.
    ParseError(serde_json::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound => write!(
                f,
                "No configuration file found. Expected at ~/.config/fanart/config.jsonc, \
                the platform config directory, or ~/.fanart.jsonc"
            ),
            Self::IoError(err) => write!(f, "Failed to read configuration file: {err}"),
            Self::ParseError(err) => write!(f, "Failed to parse configuration file: {err}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::IoError(err) => Some(err),
            Self::ParseError(err) => Some(err),
            Self::NotFound => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self { Self::IoError(err) }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self { Self::ParseError(err) }
}

/// Configuration file names to search for (in priority order).
const CONFIG_FILE_NAMES: &[&str] = &["config.jsonc", "config.json"];

/// Legacy configuration file names in home directory.
const LEGACY_CONFIG_FILE_NAMES: &[&str] = &[".fanart.jsonc", ".fanart.json"];

/// Returns the possible configuration file paths in priority order.
///
/// 1. `$XDG_CONFIG_HOME/fanart/config.jsonc` or `config.json` (if set)
/// 2. `~/.config/fanart/config.jsonc` or `config.json`
/// 3. The platform config directory (`~/Library/Application Support/fanart` on macOS)
/// 4. `~/.fanart.jsonc` or `~/.fanart.json`
#[must_use]
pub fn config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
        let app_dir = PathBuf::from(xdg_config).join(APP_ID);
        for filename in CONFIG_FILE_NAMES {
            paths.push(app_dir.join(filename));
        }
    }

    if let Some(home) = dirs::home_dir() {
        let app_dir = home.join(".config").join(APP_ID);
        for filename in CONFIG_FILE_NAMES {
            let path = app_dir.join(filename);
            if !paths.contains(&path) {
                paths.push(path);
            }
        }
    }

    if let Some(config_dir) = dirs::config_dir() {
        let app_dir = config_dir.join(APP_ID);
        for filename in CONFIG_FILE_NAMES {
            let path = app_dir.join(filename);
            if !paths.contains(&path) {
                paths.push(path);
            }
        }
    }

    if let Some(home) = dirs::home_dir() {
        for filename in LEGACY_CONFIG_FILE_NAMES {
            paths.push(home.join(filename));
        }
    }

    paths
}

/// Loads the configuration from a specific file.
///
/// # Errors
///
/// Returns `ConfigError::NotFound` if the file does not exist,
/// `ConfigError::IoError` if it cannot be read and
/// `ConfigError::ParseError` if it is not valid JSONC.
pub fn load_config_from_path(path: &PathBuf) -> Result<(FanartConfig, PathBuf), ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound);
    }

    let file = fs::File::open(path)?;
    let reader = json_comments::StripComments::new(file);
    let config: FanartConfig = serde_json::from_reader(reader)?;
    Ok((config, path.clone()))
}

/// Loads the configuration from the first available config file.
///
/// # Errors
///
/// Returns `ConfigError::NotFound` if no configuration file exists in any of
/// the expected locations, otherwise the error of the first existing file.
pub fn load_config() -> Result<(FanartConfig, PathBuf), ConfigError> {
    for path in config_paths() {
        if path.exists() {
            return load_config_from_path(&path);
        }
    }

    Err(ConfigError::NotFound)
}
