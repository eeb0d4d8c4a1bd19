//! Path utilities for shell-like path expansion.
//!
//! Configured folders (fanart root, music folders) may use `~` and may be
//! relative to the configuration file directory.

use std::path::{Path, PathBuf};

/// Expands shell-like paths (tilde) to absolute paths.
///
/// The path can be:
/// - Absolute (starts with `/`): returned as-is
/// - Home-relative (starts with `~`): expanded to the user's home directory
/// - Relative: returned as-is (use `expand_and_resolve` for base directory resolution)
///
/// # Examples
///
/// ```ignore
/// use fanart_lib::utils::path::expand;
///
/// let root = expand("~/.local/share/fanart");
/// assert!(!root.to_string_lossy().starts_with("~"));
/// ```
#[must_use]
pub fn expand(path: &str) -> PathBuf {
    let path = path.trim();

    if path.is_empty() {
        return PathBuf::new();
    }

    let expanded = shellexpand::tilde(path);
    PathBuf::from(expanded.as_ref())
}

/// Expands shell-like paths and resolves relative paths against a base directory.
///
/// Tilde paths are expanded, not resolved against `base_dir`.
#[must_use]
pub fn expand_and_resolve(path: &str, base_dir: &Path) -> PathBuf {
    let path = path.trim();

    if path.is_empty() {
        return PathBuf::new();
    }

    let expanded = expand(path);
    if expanded.is_absolute() {
        return expanded;
    }

    base_dir.join(expanded)
}

/// Returns whether `haystack` contains `needle` when both are compared as
/// lowercase strings with `/` separators.
///
/// Used to decide whether a scan request targets a category folder.
#[must_use]
pub fn contains_ignore_case(haystack: &Path, needle: &Path) -> bool {
    let normalize = |p: &Path| p.to_string_lossy().replace('\\', "/").to_lowercase();
    let needle = normalize(needle);
    !needle.is_empty() && normalize(haystack).contains(needle.trim_end_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_empty() {
        assert_eq!(expand(""), PathBuf::new());
        assert_eq!(expand("   "), PathBuf::new());
    }

    #[test]
    fn test_expand_absolute_path() {
        assert_eq!(expand("/srv/fanart"), PathBuf::from("/srv/fanart"));
    }

    #[test]
    fn test_expand_tilde_path() {
        let result = expand("~/fanart/UserDef");
        assert!(!result.to_string_lossy().starts_with('~'));
        assert!(result.to_string_lossy().ends_with("fanart/UserDef"));
    }

    #[test]
    fn test_expand_and_resolve_relative() {
        let base = PathBuf::from("/config/dir");
        assert_eq!(expand_and_resolve("fanart", &base), PathBuf::from("/config/dir/fanart"));
    }

    #[test]
    fn test_expand_and_resolve_absolute_and_tilde() {
        let base = PathBuf::from("/config/dir");
        assert_eq!(expand_and_resolve("/abs", &base), PathBuf::from("/abs"));

        let home = expand_and_resolve("~/music", &base);
        assert!(!home.to_string_lossy().contains("/config/dir"));
    }

    #[test]
    fn test_contains_ignore_case() {
        let root = Path::new("/Fanart/UserDef/Music/Queen (1).jpg");
        assert!(contains_ignore_case(root, Path::new("/fanart/userdef/music")));
        assert!(!contains_ignore_case(root, Path::new("/fanart/scraper/music")));
        assert!(!contains_ignore_case(root, Path::new("")));
    }
}
