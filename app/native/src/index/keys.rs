//! Key normalization for index lookups.
//!
//! File names and now-playing tags are reduced to the same normalized form so
//! that `The Beatles`, `beatles` and `Beatles (3)` all meet on one key.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use super::category::Category;

/// Characters that separate several artists (or genres) in one tag.
const MULTI_VALUE_SEPARATORS: [char; 2] = ['|', ';'];

/// Separator between artist and album in album-scoped file names.
const ALBUM_SEPARATOR: &str = " - ";

/// Matches trailing duplicate counters such as ` (3)` or `_12`.
static COUNTER_SUFFIX: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^(?P<name>.*?)(?:\s*\(\d+\)|_\d+)$").ok());

/// Normalizes a free-form name into an index key.
///
/// Lowercases, trims, collapses inner whitespace and drops a leading `the `.
#[must_use]
pub fn normalize_key(raw: &str) -> String {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase();
    match collapsed.strip_prefix("the ") {
        Some(rest) if !rest.is_empty() => rest.to_string(),
        _ => collapsed,
    }
}

/// Splits a multi-value tag (`Queen | David Bowie`) into trimmed, non-empty parts.
#[must_use]
pub fn split_values(raw: &str) -> Vec<String> {
    raw.split(MULTI_VALUE_SEPARATORS)
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Removes a trailing duplicate counter from a file stem.
fn strip_counter(stem: &str) -> &str {
    COUNTER_SUFFIX
        .as_ref()
        .and_then(|re| re.captures(stem))
        .and_then(|caps| caps.name("name"))
        .map_or(stem, |m| m.as_str())
}

/// Derives the normalized `(key, secondary)` pair for an image file.
///
/// Returns `None` when the file name yields an empty key.
#[must_use]
pub fn file_keys(path: &Path, category: Category) -> Option<(String, Option<String>)> {
    let stem = path.file_stem()?.to_str()?.trim();

    let stem = if category.is_thumb() {
        stem.strip_suffix('L').unwrap_or(stem)
    } else {
        stem
    };
    let stem = strip_counter(stem).trim();

    let album_split = if category.has_album_key() { stem.split_once(ALBUM_SEPARATOR) } else { None };
    if let Some((artist, album)) = album_split {
        let key = normalize_key(artist);
        let album = normalize_key(album);
        if key.is_empty() {
            return None;
        }
        return Some((key, (!album.is_empty()).then_some(album)));
    }

    let key = normalize_key(stem);
    (!key.is_empty()).then_some((key, None))
}
