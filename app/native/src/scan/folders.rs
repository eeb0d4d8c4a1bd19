//! Enumeration of fanart folders into index entries.

use std::fs;
use std::path::{Path, PathBuf};

use natord::compare;
use rayon::prelude::*;
use regex::Regex;
use walkdir::WalkDir;

use crate::index::{Category, CategoryFolder, IndexEntry, file_keys, normalize_key};
use crate::utils::path::contains_ignore_case;

/// What a scan request covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanTarget {
    All,
    /// Only the categories whose folder lies inside this path.
    Folder(PathBuf),
}

impl ScanTarget {
    #[must_use]
    pub const fn is_all(&self) -> bool { matches!(self, Self::All) }

    /// Returns whether the category folder is part of this request.
    #[must_use]
    pub fn includes(&self, root: &Path, folder: &CategoryFolder) -> bool {
        match self {
            Self::All => true,
            Self::Folder(path) => contains_ignore_case(path, &root.join(folder.folder)),
        }
    }
}

impl std::fmt::Display for ScanTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => f.write_str("All"),
            Self::Folder(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Returns whether the file name ends with the mask's literal suffix.
fn matches_mask(path: &Path, mask: &str) -> bool {
    let suffix = mask.trim_start_matches('*').to_lowercase();
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.to_lowercase().ends_with(&suffix))
}

/// Lists files in `dir` (not recursive) matching `mask`, in natural order.
#[must_use]
pub fn list_matching(dir: &Path, mask: &str) -> Vec<PathBuf> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut files: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && matches_mask(path, mask))
        .collect();

    files.sort_by(|a, b| compare(a.to_string_lossy().as_ref(), b.to_string_lossy().as_ref()));
    files
}

/// Returns whether the image is at least `min` in both dimensions.
///
/// A `(0, 0)` minimum accepts every file without reading it.
#[must_use]
pub fn meets_min_resolution(path: &Path, min: (u32, u32)) -> bool {
    if min == (0, 0) {
        return true;
    }

    match image::image_dimensions(path) {
        Ok((width, height)) => width >= min.0 && height >= min.1,
        Err(err) => {
            tracing::debug!(path = %path.display(), error = %err, "scan: unreadable image skipped");
            false
        }
    }
}

/// Builds the index entries of one category folder.
#[must_use]
pub fn collect_category(root: &Path, folder: &CategoryFolder, min: (u32, u32)) -> Vec<IndexEntry> {
    let files = list_matching(&root.join(folder.folder), folder.mask);
    let total = files.len();

    let entries: Vec<IndexEntry> = files
        .into_par_iter()
        .filter(|path| meets_min_resolution(path, min))
        .filter_map(|path| {
            let (key, secondary) = file_keys(&path, folder.category)?;
            Some(IndexEntry::new(path, key, secondary))
        })
        .collect();

    tracing::debug!(
        category = %folder.category,
        found = total,
        kept = entries.len(),
        "scan: folder enumerated"
    );
    entries
}

/// Builds `MusicFolder` entries from music library folders.
///
/// Each file path, relative to its music folder and with `/` separators, is
/// matched against `pattern`; the `artist` group is required, `album` optional.
#[must_use]
pub fn collect_music_folders(folders: &[PathBuf], pattern: &Regex, min: (u32, u32)) -> Vec<IndexEntry> {
    let mut entries = Vec::new();

    for folder in folders {
        let mut files: Vec<(PathBuf, String, Option<String>)> = WalkDir::new(folder)
            .follow_links(true)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| {
                let relative = entry.path().strip_prefix(folder).ok()?;
                let relative = relative.to_string_lossy().replace('\\', "/");
                let caps = pattern.captures(&relative)?;
                let artist = normalize_key(caps.name("artist")?.as_str());
                if artist.is_empty() {
                    return None;
                }
                let album = caps.name("album").map(|m| normalize_key(m.as_str())).filter(|a| !a.is_empty());
                Some((entry.into_path(), artist, album))
            })
            .collect();

        files.sort_by(|a, b| compare(a.0.to_string_lossy().as_ref(), b.0.to_string_lossy().as_ref()));

        entries.extend(
            files
                .into_par_iter()
                .filter(|(path, _, _)| meets_min_resolution(path, min))
                .map(|(path, key, album)| IndexEntry::new(path, key, album))
                .collect::<Vec<_>>(),
        );
    }

    tracing::debug!(category = %Category::MusicFolder, kept = entries.len(), "scan: music folders enumerated");
    entries
}
