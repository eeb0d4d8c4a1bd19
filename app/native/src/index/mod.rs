//! Image index: categories, key normalization and the lookup store.

pub mod category;
pub mod keys;
pub mod store;

pub use category::{AfterImport, CATEGORY_FOLDERS, Category, CategoryFolder, MUSIC_FOLDER_PROGRESS};
pub use keys::{file_keys, normalize_key, split_values};
pub use store::{FanartIndex, ImageIndexStore, IndexEntry};
use thiserror::Error;

/// Errors raised by the image index.
#[derive(Debug, Error)]
pub enum IndexError {
    /// The index cannot be used right now.
    #[error("index unavailable: {0}")]
    Unavailable(String),
    /// Reading or writing the persisted index failed.
    #[error("index I/O failed: {0}")]
    Io(#[from] std::io::Error),
    /// The persisted index could not be (de)serialized.
    #[error("index file is malformed: {0}")]
    Parse(#[from] serde_json::Error),
}
