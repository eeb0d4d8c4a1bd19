//! Visibility of the fanart controls.
//!
//! Host calls are issued only on real transitions. Two image slots alternate
//! so that a new image fades in over the previous one.

use std::path::Path;

use crate::constants::{controls, properties};
use crate::host::VisibilitySink;

/// Visibility of the "fanart available" indicator control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indicator {
    Unknown,
    Hidden,
    Shown,
}

/// One of the two alternating image controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    A,
    B,
}

impl Slot {
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::A => Self::B,
            Self::B => Self::A,
        }
    }

    #[must_use]
    pub const fn control(self) -> i32 {
        match self {
            Self::A => controls::SLOT_A,
            Self::B => controls::SLOT_B,
        }
    }

    /// Property the slot's image is read from.
    #[must_use]
    pub const fn property(self) -> &'static str {
        match self {
            Self::A => properties::BACKDROP_1,
            Self::B => properties::BACKDROP_2,
        }
    }
}

/// Which image control is visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageVisibility {
    Unknown,
    Hidden,
    Shown(Slot),
}

#[derive(Debug)]
pub struct VisibilityStateMachine {
    indicator: Indicator,
    image: ImageVisibility,
    active: Slot,
    /// Slot the last resolved image was written to.
    written: Option<Slot>,
}

impl Default for VisibilityStateMachine {
    fn default() -> Self { Self::new() }
}

impl VisibilityStateMachine {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            indicator: Indicator::Unknown,
            image: ImageVisibility::Unknown,
            active: Slot::A,
            written: None,
        }
    }

    /// Slot the next resolved image is written to.
    #[must_use]
    pub const fn active_slot(&self) -> Slot { self.active }

    #[must_use]
    pub const fn indicator(&self) -> Indicator { self.indicator }

    #[must_use]
    pub const fn image(&self) -> ImageVisibility { self.image }

    /// Chooses the slot for `path`. A repeat of the previous image never
    /// lands in the slot it was written to last, so the change stays visible.
    pub fn slot_for(&mut self, path: &Path, previous: Option<&Path>) -> Slot {
        if previous == Some(path) && self.written == Some(self.active) {
            self.active = self.active.toggled();
        }
        self.written = Some(self.active);
        self.active
    }

    /// Applies the availability of fanart to the host controls.
    ///
    /// Returns false when a slot should have been shown but no valid window
    /// was active.
    pub fn apply<S: VisibilitySink + ?Sized>(&mut self, available: bool, window: Option<i32>, sink: &S) -> bool {
        if available {
            self.mark_available(window, sink);
            self.show_active_slot(window, sink)
        } else {
            self.mark_unavailable(window, sink);
            self.hide_slots(window, sink);
            true
        }
    }

    /// Shows the indicator unless it is already shown.
    pub fn mark_available<S: VisibilitySink + ?Sized>(&mut self, window: Option<i32>, sink: &S) {
        let Some(window) = window else { return };
        if self.indicator != Indicator::Shown {
            sink.show_control(window, controls::INDICATOR);
            self.indicator = Indicator::Shown;
        }
    }

    /// Hides the indicator unless it is already hidden.
    pub fn mark_unavailable<S: VisibilitySink + ?Sized>(&mut self, window: Option<i32>, sink: &S) {
        let Some(window) = window else { return };
        if self.indicator != Indicator::Hidden {
            sink.hide_control(window, controls::INDICATOR);
            self.indicator = Indicator::Hidden;
        }
    }

    /// Hides both slots and restarts alternation at slot A.
    pub fn hide_slots<S: VisibilitySink + ?Sized>(&mut self, window: Option<i32>, sink: &S) {
        self.active = Slot::A;
        let Some(window) = window else { return };
        if self.image != ImageVisibility::Hidden {
            sink.hide_control(window, controls::SLOT_A);
            sink.hide_control(window, controls::SLOT_B);
            self.image = ImageVisibility::Hidden;
        }
    }

    fn show_active_slot<S: VisibilitySink + ?Sized>(&mut self, window: Option<i32>, sink: &S) -> bool {
        let Some(window) = window else { return false };
        let slot = self.active;

        if self.image != ImageVisibility::Shown(slot) {
            sink.show_control(window, slot.control());
            sink.hide_control(window, slot.toggled().control());
            self.image = ImageVisibility::Shown(slot);
        }
        self.active = slot.toggled();
        true
    }

    /// Forgets what the host shows, so the next transition is always emitted.
    pub fn reset(&mut self) { *self = Self::new(); }
}

#[cfg(test)]
mod tests {
    use parking_lot::Mutex;

    use super::*;

    #[derive(Default)]
    struct Calls(Mutex<Vec<(&'static str, i32)>>);

    impl VisibilitySink for Calls {
        fn show_control(&self, _window: i32, control: i32) { self.0.lock().push(("show", control)); }

        fn hide_control(&self, _window: i32, control: i32) { self.0.lock().push(("hide", control)); }
    }

    impl Calls {
        fn count(&self, kind: &str, control: i32) -> usize {
            self.0.lock().iter().filter(|(k, c)| *k == kind && *c == control).count()
        }
    }

    #[test]
    fn test_mark_available_twice_shows_once() {
        let calls = Calls::default();
        let mut machine = VisibilityStateMachine::new();
        machine.mark_available(Some(1), &calls);
        machine.mark_available(Some(1), &calls);
        assert_eq!(calls.count("show", controls::INDICATOR), 1);
        assert_eq!(machine.indicator(), Indicator::Shown);
    }

    #[test]
    fn test_first_transition_always_emits() {
        let calls = Calls::default();
        let mut machine = VisibilityStateMachine::new();
        machine.apply(false, Some(1), &calls);
        assert_eq!(calls.count("hide", controls::INDICATOR), 1);
        assert_eq!(calls.count("hide", controls::SLOT_A), 1);
        assert_eq!(calls.count("hide", controls::SLOT_B), 1);

        machine.apply(false, Some(1), &calls);
        assert_eq!(calls.0.lock().len(), 3);
    }

    #[test]
    fn test_slots_alternate_and_are_exclusive() {
        let calls = Calls::default();
        let mut machine = VisibilityStateMachine::new();

        assert_eq!(machine.active_slot(), Slot::A);
        assert!(machine.apply(true, Some(1), &calls));
        assert_eq!(machine.image(), ImageVisibility::Shown(Slot::A));
        assert_eq!(calls.count("hide", controls::SLOT_B), 1);
        assert_eq!(machine.active_slot(), Slot::B);

        machine.apply(true, Some(1), &calls);
        assert_eq!(machine.image(), ImageVisibility::Shown(Slot::B));
        assert_eq!(calls.count("hide", controls::SLOT_A), 1);
        assert_eq!(machine.active_slot(), Slot::A);
    }

    #[test]
    fn test_repeated_path_toggles_slot() {
        let mut machine = VisibilityStateMachine::new();
        let path = Path::new("/a.jpg");

        assert_eq!(machine.slot_for(path, None), Slot::A);
        assert_eq!(machine.slot_for(path, Some(path)), Slot::B);
        assert_eq!(machine.slot_for(Path::new("/b.jpg"), Some(path)), Slot::B);
    }

    #[test]
    fn test_repeat_after_show_keeps_alternating() {
        let calls = Calls::default();
        let mut machine = VisibilityStateMachine::new();
        let path = Path::new("/a.jpg");

        assert_eq!(machine.slot_for(path, None), Slot::A);
        machine.apply(true, Some(1), &calls);
        assert_eq!(machine.slot_for(path, Some(path)), Slot::B);
        machine.apply(true, Some(1), &calls);
        assert_eq!(machine.slot_for(path, Some(path)), Slot::A);
    }

    #[test]
    fn test_unavailable_resets_to_slot_a() {
        let calls = Calls::default();
        let mut machine = VisibilityStateMachine::new();
        machine.apply(true, Some(1), &calls);
        assert_eq!(machine.active_slot(), Slot::B);

        machine.apply(false, Some(1), &calls);
        assert_eq!(machine.active_slot(), Slot::A);
        assert_eq!(machine.image(), ImageVisibility::Hidden);
    }

    #[test]
    fn test_invalid_window_skips_calls() {
        let calls = Calls::default();
        let mut machine = VisibilityStateMachine::new();
        assert!(!machine.apply(true, None, &calls));
        assert!(calls.0.lock().is_empty());
        assert_eq!(machine.indicator(), Indicator::Unknown);
        assert_eq!(machine.active_slot(), Slot::A);
    }

    #[test]
    fn test_slot_properties() {
        assert_eq!(Slot::A.property(), properties::BACKDROP_1);
        assert_eq!(Slot::B.property(), properties::BACKDROP_2);
        assert_eq!(Slot::A.toggled(), Slot::B);
    }
}
