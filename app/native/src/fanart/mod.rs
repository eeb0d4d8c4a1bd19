//! Fanart resolution and rotation engine.

pub mod playing;
pub mod resolver;
pub mod rotation;
pub mod thumbs;
pub mod ticker;
pub mod visibility;

pub use playing::NowPlayingDriver;
pub use resolver::{FanartResolver, Resolution, ResolverOptions, Source};
pub use rotation::{RotationCursor, RotationState};
pub use ticker::Ticker;
pub use visibility::{ImageVisibility, Indicator, Slot, VisibilityStateMachine};
