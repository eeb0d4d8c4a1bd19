//! Animated artwork catalog.
//!
//! A JSON catalog of animated posters and backgrounds keyed by IMDb id is
//! downloaded into the cache folder and queried with a language preference.

pub mod client;
pub mod remote;
pub mod types;

pub use client::{CatalogClient, CatalogState, select_entry};
pub use remote::{CatalogRemote, HttpRemote};
use thiserror::Error;
pub use types::{AnimatedCatalog, ArtworkKind, CatalogEntry, CatalogMarker, CatalogMovie};

/// Errors raised while fetching or reading the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The server answered with an error status.
    #[error("{url} returned HTTP {code}")]
    Status { url: String, code: u16 },
    /// The request did not reach the server or the body could not be read.
    #[error("transport error: {0}")]
    Transport(String),
    #[error("catalog I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("catalog is malformed: {0}")]
    Parse(#[from] serde_json::Error),
}
