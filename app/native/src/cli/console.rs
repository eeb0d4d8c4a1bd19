//! Host implementation that prints to the terminal.

use std::collections::BTreeMap;

use colored::Colorize;
use parking_lot::Mutex;

use crate::constants::controls;
use crate::host::{NowPlaying, PlayerState, PropertySink, PropertySource, VisibilitySink, WindowState};

/// Window id the console host reports as active.
pub const CONSOLE_WINDOW: i32 = 0;

fn control_name(control: i32) -> String {
    match control {
        controls::INDICATOR => "indicator".to_string(),
        controls::SLOT_A => "slot A".to_string(),
        controls::SLOT_B => "slot B".to_string(),
        other => other.to_string(),
    }
}

/// Console host: plays a fixed track in a single window and echoes every
/// property write and control change.
#[derive(Debug)]
pub struct ConsoleHost {
    track: Mutex<Option<NowPlaying>>,
    properties: Mutex<BTreeMap<String, String>>,
    window: i32,
    quiet: bool,
}

impl ConsoleHost {
    #[must_use]
    pub fn new(track: NowPlaying) -> Self {
        Self {
            track: Mutex::new(Some(track)),
            properties: Mutex::new(BTreeMap::new()),
            window: CONSOLE_WINDOW,
            quiet: false,
        }
    }

    /// Host that records without printing.
    #[must_use]
    pub fn quiet(track: NowPlaying) -> Self { Self { quiet: true, ..Self::new(track) } }

    #[must_use]
    pub const fn window(&self) -> i32 { self.window }

    /// Starts playing `track`.
    pub fn play(&self, track: NowPlaying) { *self.track.lock() = Some(track); }

    /// Stops the track; following ticks see an idle player.
    pub fn stop_track(&self) { *self.track.lock() = None; }

    /// Last value written for `name`.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<String> { self.properties.lock().get(name).cloned() }
}

impl PropertySink for ConsoleHost {
    fn set_property(&self, name: &str, value: &str) {
        self.properties.lock().insert(name.to_string(), value.to_string());
        if self.quiet {
            return;
        }
        if value.is_empty() {
            println!("  {} {}", "set".dimmed(), format!("{name} = \"\"").dimmed());
        } else {
            println!("  {} {} = {}", "set".cyan(), name, value.green());
        }
    }
}

impl PropertySource for ConsoleHost {
    fn get_property(&self, name: &str) -> String { self.properties.lock().get(name).cloned().unwrap_or_default() }
}

impl VisibilitySink for ConsoleHost {
    fn show_control(&self, window: i32, control: i32) {
        if !self.quiet {
            println!("  {} {} (window {window})", "show".yellow(), control_name(control));
        }
    }

    fn hide_control(&self, window: i32, control: i32) {
        if !self.quiet {
            println!("  {} {} (window {window})", "hide".magenta(), control_name(control));
        }
    }
}

impl WindowState for ConsoleHost {
    fn active_window(&self) -> Option<i32> { Some(self.window) }
}

impl PlayerState for ConsoleHost {
    fn now_playing(&self) -> Option<NowPlaying> { self.track.lock().clone() }
}
