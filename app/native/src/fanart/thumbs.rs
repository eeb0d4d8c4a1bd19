//! Artist thumbnail selection for `music.artisthumb.play`.

use std::collections::HashSet;
use std::path::PathBuf;

use rand::Rng;

use super::visibility::Slot;
use crate::index::{Category, ImageIndexStore, split_values};

/// Returns the full artist tag followed by each individual artist, without
/// case-insensitive duplicates.
#[must_use]
pub fn artist_keys(artist: &str) -> Vec<String> {
    let artist = artist.trim();
    if artist.is_empty() {
        return Vec::new();
    }

    let mut seen = HashSet::new();
    std::iter::once(artist.to_string())
        .chain(split_values(artist))
        .filter(|key| seen.insert(key.to_lowercase()))
        .collect()
}

fn push_unique(list: &mut Vec<PathBuf>, found: Vec<PathBuf>) {
    for path in found {
        if !list.contains(&path) {
            list.push(path);
        }
    }
}

/// Collects thumbnail candidates: album thumbs first, artist thumbs only when
/// no album thumb exists.
#[must_use]
pub fn thumb_candidates(store: &dyn ImageIndexStore, artist: &str, album: Option<&str>) -> Vec<PathBuf> {
    let keys = artist_keys(artist);
    let mut candidates = Vec::new();

    if let Some(album) = album.filter(|a| !a.trim().is_empty()) {
        for key in &keys {
            match store.lookup(Category::MusicAlbumThumb, key, Some(album), false) {
                Ok(found) => push_unique(&mut candidates, found),
                Err(err) => tracing::warn!(error = %err, key = %key, album, "thumbs: album lookup failed"),
            }
        }
    }

    if candidates.is_empty() {
        for key in &keys {
            match store.lookup(Category::MusicArtistThumb, key, None, false) {
                Ok(found) => push_unique(&mut candidates, found),
                Err(err) => tracing::warn!(error = %err, key = %key, "thumbs: artist lookup failed"),
            }
        }
    }

    candidates
}

/// Picks one thumbnail. Two candidates alternate with the display slot, more
/// than two are picked at random.
pub fn pick_thumb<R: Rng + ?Sized>(candidates: &[PathBuf], slot: Slot, rng: &mut R) -> Option<PathBuf> {
    match candidates.len() {
        0 => None,
        1 => Some(candidates[0].clone()),
        2 => Some(candidates[usize::from(slot == Slot::B)].clone()),
        len => Some(candidates[rng.random_range(0..len)].clone()),
    }
}
