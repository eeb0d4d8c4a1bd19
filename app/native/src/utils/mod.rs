//! Shared helpers: path expansion and thread management.

pub mod path;
pub mod thread;

pub use thread::{CancellationToken, spawn_named_thread};
