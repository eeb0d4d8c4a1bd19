//! Interfaces to the media-center host.
//!
//! The engine never talks to a GUI directly: it writes named properties,
//! toggles controls by numeric id and reads the player state through these
//! traits. The CLI provides a console implementation; tests use recording fakes.

use std::collections::{BTreeMap, BTreeSet};

use crate::playback::PlaybackIdentity;

/// Receives string properties.
pub trait PropertySink: Send + Sync {
    fn set_property(&self, name: &str, value: &str);
}

/// Reads host properties such as skin switches.
pub trait PropertySource: Send + Sync {
    /// Returns the property value, or an empty string when unset.
    fn get_property(&self, name: &str) -> String;
}

/// Shows and hides controls of a host window.
pub trait VisibilitySink: Send + Sync {
    fn show_control(&self, window: i32, control: i32);
    fn hide_control(&self, window: i32, control: i32);
}

/// Reports the active host window.
pub trait WindowState: Send + Sync {
    /// Returns the active window id, or `None` when no valid window is active.
    fn active_window(&self) -> Option<i32>;
}

/// Tags and state of the current track.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NowPlaying {
    pub artist: String,
    pub album: Option<String>,
    pub genre: Option<String>,
    pub playing: bool,
    pub paused: bool,
}

impl NowPlaying {
    /// Returns whether the track is loaded in the player.
    #[must_use]
    pub const fn is_active(&self) -> bool { self.playing || self.paused }
}

/// Reads the host player.
pub trait PlayerState: Send + Sync {
    fn now_playing(&self) -> Option<NowPlaying>;
}

/// Everything the now-playing driver needs from the host.
pub trait Host: PropertySink + PropertySource + VisibilitySink + WindowState + PlayerState {}

impl<T> Host for T where T: PropertySink + PropertySource + VisibilitySink + WindowState + PlayerState {}

/// Fetches artwork for the current track in the background.
pub trait NowPlayingScraper: Send + Sync {
    /// Starts a scrape for `identity`. Returns false when the scraper is busy.
    fn start(&self, identity: &PlaybackIdentity) -> bool;

    /// Returns and clears the "new artwork arrived" signal.
    fn take_trigger_refresh(&self) -> bool;

    fn stop(&self);
}

/// Scraper used when no online source is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopScraper;

impl NowPlayingScraper for NoopScraper {
    fn start(&self, _identity: &PlaybackIdentity) -> bool { true }

    fn take_trigger_refresh(&self) -> bool { false }

    fn stop(&self) {}
}

/// Properties staged during a tick and flushed to the host in one pass.
#[derive(Debug, Default)]
pub struct PropertyBuffer {
    staged: BTreeMap<String, String>,
    written: BTreeSet<String>,
}

impl PropertyBuffer {
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Stages `value` for `name`, replacing any value staged earlier this tick.
    pub fn stage(&mut self, name: &str, value: &str) {
        self.staged.insert(name.to_string(), value.to_string());
    }

    /// Returns the value staged for `name`, if any.
    #[must_use]
    pub fn staged(&self, name: &str) -> Option<&str> { self.staged.get(name).map(String::as_str) }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.staged.is_empty() }

    /// Writes every staged property to `sink` and remembers which ones now
    /// hold an image.
    pub fn flush<S: PropertySink + ?Sized>(&mut self, sink: &S) {
        for (name, value) in std::mem::take(&mut self.staged) {
            sink.set_property(&name, &value);
            if value.is_empty() {
                self.written.remove(&name);
            } else {
                self.written.insert(name);
            }
        }
    }

    /// Empties every property that was flushed with an image and drops
    /// anything still staged.
    pub fn clear_written<S: PropertySink + ?Sized>(&mut self, sink: &S) {
        self.staged.clear();
        for name in std::mem::take(&mut self.written) {
            sink.set_property(&name, "");
        }
    }
}
