//! Cache directory utilities.
//!
//! Provides a centralized way to get the application's cache directory.
//! Uses the platform cache directory (`~/.cache/fanart` on Linux,
//! `~/Library/Caches/fanart` on macOS) with a fallback to `/tmp/fanart/`.
//!
//! The persisted image index and the animated catalog both live here.

use std::path::{Path, PathBuf};

use crate::constants::APP_ID;

/// File name of the persisted image index.
pub const INDEX_FILENAME: &str = "index.json";

/// Returns the root cache directory for the application.
#[must_use]
pub fn get_cache_dir() -> PathBuf {
    dirs::cache_dir().map_or_else(|| PathBuf::from(format!("/tmp/{APP_ID}")), |cache| cache.join(APP_ID))
}

/// Returns a cache subdirectory for the given component.
///
/// # Arguments
///
/// * `subdir` - The subdirectory name within the app's cache directory (e.g., `animated`)
#[must_use]
pub fn get_cache_subdir(subdir: &str) -> PathBuf { get_cache_dir().join(subdir) }

/// Returns the path of the persisted image index.
#[must_use]
pub fn index_path() -> PathBuf { get_cache_dir().join(INDEX_FILENAME) }

/// Writes `contents` to `path` through a sibling temporary file and a rename,
/// so readers never observe a half-written file.
///
/// # Errors
///
/// Returns an error if the parent directory cannot be created or the write
/// or rename fails.
pub fn write_atomic(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    std::fs::write(&tmp, contents)?;
    std::fs::rename(&tmp, path)
}

/// Clears the entire cache directory.
///
/// # Returns
///
/// * `Ok(bytes_freed)` - The approximate number of bytes freed
/// * `Err(error)` - If the operation failed
///
/// # Errors
///
/// Returns an error if files cannot be removed. A missing cache directory is
/// not an error and returns `Ok(0)`.
pub fn clear_cache() -> std::io::Result<u64> {
    let cache_dir = get_cache_dir();

    if !cache_dir.exists() {
        return Ok(0);
    }

    let bytes_freed = calculate_dir_size(&cache_dir)?;
    std::fs::remove_dir_all(&cache_dir)?;

    Ok(bytes_freed)
}

/// Calculates the total size of a directory in bytes.
fn calculate_dir_size(path: &Path) -> std::io::Result<u64> {
    let mut total = 0u64;

    if path.is_dir() {
        for entry in std::fs::read_dir(path)? {
            let entry = entry?;
            let path = entry.path();
            if path.is_dir() {
                total += calculate_dir_size(&path)?;
            } else {
                total += entry.metadata().map(|m| m.len()).unwrap_or(0);
            }
        }
    }

    Ok(total)
}

/// Formats a byte count as a human-readable string.
#[must_use]
#[allow(clippy::cast_precision_loss)] // Precision loss is acceptable for human-readable output
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{bytes} bytes")
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_get_cache_dir_contains_app_id() {
        let path = get_cache_dir();
        assert!(path.to_string_lossy().contains(APP_ID));
    }

    #[test]
    fn test_get_cache_subdir_contains_component() {
        let path = get_cache_subdir("animated");
        let path_str = path.to_string_lossy();
        assert!(path_str.contains("animated"));
        assert!(path_str.contains(APP_ID));
    }

    #[test]
    fn test_index_path_file_name() {
        assert_eq!(index_path().file_name().and_then(|n| n.to_str()), Some(INDEX_FILENAME));
    }

    #[test]
    fn test_write_atomic_creates_parents_and_replaces() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("nested").join("index.json");

        write_atomic(&target, b"first").unwrap();
        write_atomic(&target, b"second").unwrap();

        assert_eq!(std::fs::read_to_string(&target).unwrap(), "second");
        assert!(!temp.path().join("nested").join("index.json.tmp").exists());
    }

    #[test]
    fn test_calculate_dir_size_counts_nested_files() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("a.bin"), [0u8; 10]).unwrap();
        std::fs::create_dir(temp.path().join("sub")).unwrap();
        std::fs::write(temp.path().join("sub").join("b.bin"), [0u8; 5]).unwrap();

        assert_eq!(calculate_dir_size(temp.path()).unwrap(), 15);
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0), "0 bytes");
        assert_eq!(format_bytes(1023), "1023 bytes");
        assert_eq!(format_bytes(1536), "1.50 KB");
        assert_eq!(format_bytes(1024 * 1024), "1.00 MB");
        assert_eq!(format_bytes(1024 * 1024 * 1024), "1.00 GB");
    }
}
