//! Directory scanning: folder enumeration, the background worker and the
//! folder watcher.

pub mod folders;
pub mod watcher;
pub mod worker;

pub use folders::ScanTarget;
pub use watcher::FolderWatcher;
pub use worker::{ScanEvent, ScanOptions, ScanSummary, ScanWorker, spawn_property_listener};
