//! Configuration template generation.
//!
//! Generates a commented configuration template with all available options.

use std::fs;
use std::path::Path;

/// Generates a configuration template with all options commented out.
#[must_use]
pub fn generate_config_template() -> String {
    r#"// Fanart Configuration File
// ==========================
// This file uses JSONC format (JSON with comments).
// All options below are commented out and show their default values.
// Uncomment and modify the options you want to configure.

{
  // Root of the fanart folder tree. Relative paths are resolved against
  // the directory of this file. Empty = platform data directory.
  // "fanartRoot": "",

  // ============================================================================
  // Now-playing refresh
  // ============================================================================
  // "refresh": {
  //   // Milliseconds between ticks
  //   "intervalMs": 1000,
  //
  //   // Ticks without a track change before the fanart list is reloaded
  //   "maxRefreshTicks": 30
  // },

  // ============================================================================
  // Music fanart
  // ============================================================================
  // "music": {
  //   "genreFallback": true,
  //   "overlay": false,
  //   "defaultBackdrops": true,
  //   "slideshow": false,
  //   "artistThumbs": true
  // },

  // ============================================================================
  // Directory scan
  // ============================================================================
  // "scan": {
  //   // Skip images smaller than this (WIDTHxHEIGHT, 0x0 = keep everything)
  //   "minResolution": "0x0",
  //
  //   // Rescan a category when files change in its folder
  //   "watch": false,
  //
  //   // Music library folders with fanart stored next to the audio files
  //   "musicFolders": [],
  //
  //   // Relative path regex with named groups `artist` and `album`
  //   "musicFoldersRegex": "^(?P<artist>[^/]+)/(?P<album>[^/]+)/(?:fanart|backdrop)[^/]*\\.jpg$"
  // },

  // ============================================================================
  // Animated artwork catalog
  // ============================================================================
  // "catalog": {
  //   "enabled": false,
  //   "baseUrl": "http://www.consiliumb.com/animatedgifs",
  //   "language": "EN",
  //   "refreshDays": 30,
  //   "timeoutSecs": 10
  // },

  // Host window ids that show now-playing fanart
  // "windows": []
}
"#
    .to_string()
}

/// Writes the configuration template to `path`, creating parent directories.
///
/// # Errors
///
/// Returns an error if the directories or the file cannot be written.
pub fn create_config_file(path: &Path) -> Result<(), std::io::Error> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    fs::write(path, generate_config_template())
}
