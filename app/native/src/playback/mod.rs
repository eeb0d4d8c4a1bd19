//! Playback identity and change tracking.

pub mod identity;
pub mod tracker;

pub use identity::PlaybackIdentity;
pub use tracker::PlaybackContextTracker;
