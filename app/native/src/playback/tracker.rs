//! Detection of playback identity changes and refresh staleness.

use super::identity::PlaybackIdentity;

/// Remembers the last seen identity and counts ticks since the last reload.
#[derive(Debug)]
pub struct PlaybackContextTracker {
    last: Option<PlaybackIdentity>,
    forced: bool,
    ticks: u32,
    max_ticks: u32,
}

impl PlaybackContextTracker {
    #[must_use]
    pub const fn new(max_ticks: u32) -> Self {
        Self {
            last: None,
            forced: false,
            ticks: 0,
            max_ticks,
        }
    }

    /// Returns true when `current` differs from the last seen identity, or when
    /// an invalidation was forced, and records `current` as last seen.
    pub fn has_changed(&mut self, current: &PlaybackIdentity) -> bool {
        let changed = self.forced || self.differs(current);
        if changed {
            self.last = Some(current.clone());
            self.forced = false;
        }
        changed
    }

    /// Returns whether `current` differs from the last seen identity without
    /// recording it.
    #[must_use]
    pub fn differs(&self, current: &PlaybackIdentity) -> bool {
        self.last.as_ref().is_none_or(|last| !last.same_as(current))
    }

    /// Makes the next [`has_changed`](Self::has_changed) return true and marks
    /// a reload as due.
    pub fn force_invalidate(&mut self) {
        self.forced = true;
        self.ticks = self.max_ticks;
    }

    /// Returns whether a reload is due, either forced or because the tick
    /// counter reached its maximum.
    #[must_use]
    pub const fn reload_due(&self) -> bool { self.forced || self.ticks >= self.max_ticks }

    pub const fn increase_ticks(&mut self) { self.ticks = self.ticks.saturating_add(1); }

    pub const fn reset_ticks(&mut self) { self.ticks = 0; }

    #[must_use]
    pub const fn ticks(&self) -> u32 { self.ticks }

    #[must_use]
    pub const fn max_ticks(&self) -> u32 { self.max_ticks }

    /// Forgets the last identity and all counters.
    pub fn clear(&mut self) {
        self.last = None;
        self.forced = false;
        self.ticks = 0;
    }
}
