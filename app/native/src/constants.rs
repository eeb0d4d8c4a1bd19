//! Application-wide constants.
//!
//! Host property names and control ids are fixed by the skins that consume
//! them, so they live here rather than in configuration.

/// Application identifier used for cache and config directories.
pub const APP_ID: &str = "fanart";

/// Prefix applied to the names of spawned worker threads.
pub const THREAD_PREFIX: &str = "fanart";

/// Host property names written by the now-playing engine.
pub mod properties {
    /// First backdrop display slot.
    pub const BACKDROP_1: &str = "music.backdrop1.play";
    /// Second backdrop display slot.
    pub const BACKDROP_2: &str = "music.backdrop2.play";
    /// Artist or album thumbnail for the playing track.
    pub const ARTIST_THUMB: &str = "music.artisthumb.play";
    /// Overlay copy of the current backdrop.
    pub const OVERLAY: &str = "music.overlay.play";
    /// Set to `true` while a directory scan is running.
    pub const DIRECTORY_SCAN: &str = "directory.scan";
    /// Skin switch enabling the pictures slideshow override.
    pub const SKIN_SLIDESHOW_ENABLED: &str = "#skin.fanarthandler.pictures.slideshow.enabled";
}

/// Host control ids toggled by the visibility state machine.
pub mod controls {
    /// "Fanart available" indicator control.
    pub const INDICATOR: i32 = 91_919_294;
    /// First backdrop image control.
    pub const SLOT_A: i32 = 91_919_295;
    /// Second backdrop image control.
    pub const SLOT_B: i32 = 91_919_296;
}

/// Animated catalog defaults.
pub mod catalog {
    /// Base URL of the animated artwork feed.
    pub const DEFAULT_BASE_URL: &str = "http://www.consiliumb.com/animatedgifs";
    /// Catalog document name, both remotely and in the cache folder.
    pub const CATALOG_FILENAME: &str = "movies.json";
    /// Refresh marker stored next to the cached catalog.
    pub const MARKER_FILENAME: &str = "marker.json";
    /// Suffix of the full-size animated file on the server.
    pub const ORIGINAL_SUFFIX: &str = "_original.gif";
    /// Fallback language that is always considered.
    pub const FALLBACK_LANGUAGE: &str = "EN";
}
