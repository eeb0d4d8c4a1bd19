//! In-memory image index with JSON persistence.
//!
//! Each category is held as an immutable snapshot behind an `Arc`. Importing a
//! category builds a new snapshot and swaps it in under the write lock, so a
//! reader either sees the old table or the new one, never a partial import.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};

use super::IndexError;
use super::category::Category;
use super::keys::normalize_key;
use crate::cache::write_atomic;

/// Version written to the persisted index file.
const INDEX_VERSION: u32 = 1;

/// A single indexed image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub path: PathBuf,
    /// Normalized primary key (artist, movie title, genre...).
    pub key: String,
    /// Normalized secondary key (album), when the file is album-scoped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary: Option<String>,
}

impl IndexEntry {
    #[must_use]
    pub const fn new(path: PathBuf, key: String, secondary: Option<String>) -> Self {
        Self { path, key, secondary }
    }
}

/// Read and write access to the image index.
///
/// Lookups take raw keys; implementations normalize them.
pub trait ImageIndexStore: Send + Sync {
    /// Returns the images for `primary` (and `secondary`, if given).
    ///
    /// In music mode album-scoped images come first, followed by the images
    /// that apply to the artist as a whole.
    ///
    /// # Errors
    ///
    /// Returns an error when the index cannot be read.
    fn lookup(
        &self,
        category: Category,
        primary: &str,
        secondary: Option<&str>,
        music_mode: bool,
    ) -> Result<Vec<PathBuf>, IndexError>;

    /// Returns every image of a category.
    ///
    /// # Errors
    ///
    /// Returns an error when the index cannot be read.
    fn category_images(&self, category: Category) -> Result<Vec<PathBuf>, IndexError>;

    /// Drops the cached lookups of a category. The indexed entries stay.
    fn remove_category(&self, category: Category);

    /// Rebuilds the cached lookups of a category.
    ///
    /// With `force_rebuild`, entries whose files no longer exist are pruned first.
    ///
    /// # Errors
    ///
    /// Returns an error when the index cannot be updated.
    fn refresh_category(&self, category: Category, force_rebuild: bool) -> Result<(), IndexError>;

    /// Replaces every entry of a category and returns the new entry count.
    ///
    /// # Errors
    ///
    /// Returns an error when the index cannot be updated.
    fn import_category(&self, category: Category, entries: Vec<IndexEntry>) -> Result<usize, IndexError>;

    /// Writes the index to durable storage, if the implementation has any.
    ///
    /// # Errors
    ///
    /// Returns an error when the index cannot be written.
    fn persist(&self) -> Result<(), IndexError> { Ok(()) }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct LookupKey {
    category: Category,
    primary: String,
    secondary: Option<String>,
    music_mode: bool,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct PersistedIndex {
    version: u32,
    #[serde(default)]
    categories: HashMap<Category, Vec<IndexEntry>>,
}

/// Default [`ImageIndexStore`] implementation.
#[derive(Debug, Default)]
pub struct FanartIndex {
    tables: RwLock<HashMap<Category, Arc<Vec<IndexEntry>>>>,
    /// Lock order: `tables` before `lookups`.
    lookups: Mutex<HashMap<LookupKey, Arc<Vec<PathBuf>>>>,
    path: Option<PathBuf>,
}

impl FanartIndex {
    /// Creates an empty index that is never persisted.
    #[must_use]
    pub fn in_memory() -> Self { Self::default() }

    /// Opens the index stored at `path`.
    ///
    /// A missing file yields an empty index bound to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn open(path: &Path) -> Result<Self, IndexError> {
        let index = Self {
            path: Some(path.to_path_buf()),
            ..Self::default()
        };

        if !path.exists() {
            tracing::debug!(path = %path.display(), "index: no persisted index, starting empty");
            return Ok(index);
        }

        let contents = std::fs::read(path)?;
        let persisted: PersistedIndex = serde_json::from_slice(&contents)?;
        if persisted.version != INDEX_VERSION {
            tracing::warn!(
                found = persisted.version,
                expected = INDEX_VERSION,
                "index: unsupported index version, starting empty"
            );
            return Ok(index);
        }

        {
            let mut tables = index.tables.write();
            for (category, entries) in persisted.categories {
                tables.insert(category, Arc::new(entries));
            }
        }

        tracing::debug!(path = %path.display(), entries = index.len(), "index: loaded");
        Ok(index)
    }

    /// Writes the index to its backing file, if it has one.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save(&self) -> Result<(), IndexError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let categories = self
            .tables
            .read()
            .iter()
            .map(|(category, entries)| (*category, entries.as_ref().clone()))
            .collect();
        let persisted = PersistedIndex { version: INDEX_VERSION, categories };

        let json = serde_json::to_vec_pretty(&persisted)?;
        write_atomic(path, &json)?;
        tracing::debug!(path = %path.display(), "index: saved");
        Ok(())
    }

    /// Returns the backing file path, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> { self.path.as_deref() }

    /// Returns the total number of indexed images.
    #[must_use]
    pub fn len(&self) -> usize { self.tables.read().values().map(|t| t.len()).sum() }

    /// Returns whether the index holds no images.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.len() == 0 }

    /// Returns the number of images per category, sorted by category.
    #[must_use]
    pub fn category_counts(&self) -> Vec<(Category, usize)> {
        let mut counts: Vec<_> =
            self.tables.read().iter().map(|(category, entries)| (*category, entries.len())).collect();
        counts.sort_by_key(|(category, _)| *category);
        counts
    }

    /// Returns a snapshot of a category's entries.
    #[must_use]
    pub fn entries(&self, category: Category) -> Arc<Vec<IndexEntry>> {
        self.tables.read().get(&category).cloned().unwrap_or_default()
    }

    fn invalidate_lookups(&self, category: Category) {
        self.lookups.lock().retain(|key, _| key.category != category);
    }
}

/// Filters a category table for one lookup.
fn select(entries: &[IndexEntry], primary: &str, secondary: Option<&str>, music_mode: bool) -> Vec<PathBuf> {
    let matching = entries.iter().filter(|e| e.key == primary);

    if !music_mode {
        return matching
            .filter(|e| secondary.is_none() || e.secondary.as_deref() == secondary)
            .map(|e| e.path.clone())
            .collect();
    }

    let (scoped, general): (Vec<&IndexEntry>, Vec<&IndexEntry>) = match secondary {
        Some(album) => matching
            .filter(|e| e.secondary.is_none() || e.secondary.as_deref() == Some(album))
            .partition(|e| e.secondary.is_some()),
        None => matching.partition(|e| e.secondary.is_some()),
    };

    if secondary.is_some() {
        scoped.into_iter().chain(general).map(|e| e.path.clone()).collect()
    } else {
        general.into_iter().chain(scoped).map(|e| e.path.clone()).collect()
    }
}

impl ImageIndexStore for FanartIndex {
    fn lookup(
        &self,
        category: Category,
        primary: &str,
        secondary: Option<&str>,
        music_mode: bool,
    ) -> Result<Vec<PathBuf>, IndexError> {
        let primary = normalize_key(primary);
        if primary.is_empty() {
            return Ok(Vec::new());
        }
        let secondary = secondary.map(normalize_key).filter(|s| !s.is_empty());
        let key = LookupKey { category, primary, secondary, music_mode };

        // Held for the whole lookup so an import cannot slip in between
        // computing a result and caching it.
        let tables = self.tables.read();
        if let Some(hit) = self.lookups.lock().get(&key) {
            return Ok(hit.as_ref().clone());
        }

        let result = tables.get(&category).map_or_else(Vec::new, |entries| {
            select(entries, &key.primary, key.secondary.as_deref(), music_mode)
        });
        self.lookups.lock().insert(key, Arc::new(result.clone()));
        drop(tables);

        Ok(result)
    }

    fn category_images(&self, category: Category) -> Result<Vec<PathBuf>, IndexError> {
        Ok(self.entries(category).iter().map(|e| e.path.clone()).collect())
    }

    fn remove_category(&self, category: Category) {
        let _tables = self.tables.read();
        self.invalidate_lookups(category);
        tracing::trace!(%category, "index: lookups dropped");
    }

    fn refresh_category(&self, category: Category, force_rebuild: bool) -> Result<(), IndexError> {
        let mut tables = self.tables.write();

        let current = if force_rebuild { tables.get(&category).cloned() } else { None };
        if let Some(entries) = current {
            let kept: Vec<IndexEntry> = entries.iter().filter(|e| e.path.exists()).cloned().collect();
            let pruned = entries.len() - kept.len();
            if pruned > 0 {
                tracing::debug!(%category, pruned, "index: pruned missing files");
            }
            tables.insert(category, Arc::new(kept));
        }

        self.invalidate_lookups(category);

        let Some(entries) = tables.get(&category).cloned() else {
            return Ok(());
        };

        let music_mode = category.is_music();
        let distinct: HashSet<&str> = entries.iter().map(|e| e.key.as_str()).collect();
        let mut lookups = self.lookups.lock();
        for primary in distinct {
            let result = select(&entries, primary, None, music_mode);
            let key = LookupKey {
                category,
                primary: primary.to_string(),
                secondary: None,
                music_mode,
            };
            lookups.insert(key, Arc::new(result));
        }

        Ok(())
    }

    fn import_category(&self, category: Category, entries: Vec<IndexEntry>) -> Result<usize, IndexError> {
        let count = entries.len();
        let mut tables = self.tables.write();
        if entries.is_empty() {
            tables.remove(&category);
        } else {
            tables.insert(category, Arc::new(entries));
        }
        self.invalidate_lookups(category);
        drop(tables);

        tracing::debug!(%category, count, "index: category imported");
        Ok(count)
    }

    fn persist(&self) -> Result<(), IndexError> { self.save() }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn entry(path: &str, key: &str, secondary: Option<&str>) -> IndexEntry {
        IndexEntry::new(PathBuf::from(path), key.to_string(), secondary.map(ToString::to_string))
    }

    fn music_index() -> FanartIndex {
        let index = FanartIndex::in_memory();
        index
            .import_category(Category::MusicFanartScraped, vec![
                entry("/f/queen1.jpg", "queen", None),
                entry("/f/queen-opera.jpg", "queen", Some("a night at the opera")),
                entry("/f/queen2.jpg", "queen", None),
                entry("/f/queen-innuendo.jpg", "queen", Some("innuendo")),
                entry("/f/bowie.jpg", "david bowie", None),
            ])
            .unwrap();
        index
    }

    #[test]
    fn test_lookup_normalizes_keys() {
        let index = music_index();
        let found = index.lookup(Category::MusicFanartScraped, "  QUEEN ", None, false).unwrap();
        assert_eq!(found.len(), 4);
        assert!(index.lookup(Category::MusicFanartScraped, "", None, false).unwrap().is_empty());
    }

    #[test]
    fn test_lookup_music_mode_puts_album_first() {
        let index = music_index();
        let found = index
            .lookup(Category::MusicFanartScraped, "Queen", Some("A Night at the Opera"), true)
            .unwrap();
        assert_eq!(found, vec![
            PathBuf::from("/f/queen-opera.jpg"),
            PathBuf::from("/f/queen1.jpg"),
            PathBuf::from("/f/queen2.jpg"),
        ]);
    }

    #[test]
    fn test_lookup_music_mode_without_album_puts_artist_first() {
        let index = music_index();
        let found = index.lookup(Category::MusicFanartScraped, "Queen", None, true).unwrap();
        assert_eq!(found.len(), 4);
        assert_eq!(found[0], PathBuf::from("/f/queen1.jpg"));
        assert_eq!(found[1], PathBuf::from("/f/queen2.jpg"));
    }

    #[test]
    fn test_lookup_unknown_category_is_empty() {
        let index = music_index();
        assert!(index.lookup(Category::Games, "queen", None, false).unwrap().is_empty());
    }

    #[test]
    fn test_import_replaces_and_invalidates() {
        let index = music_index();
        assert_eq!(index.lookup(Category::MusicFanartScraped, "queen", None, false).unwrap().len(), 4);

        index
            .import_category(Category::MusicFanartScraped, vec![entry("/f/new.jpg", "queen", None)])
            .unwrap();
        assert_eq!(index.lookup(Category::MusicFanartScraped, "queen", None, false).unwrap(), vec![
            PathBuf::from("/f/new.jpg")
        ]);

        index.import_category(Category::MusicFanartScraped, Vec::new()).unwrap();
        assert!(index.category_counts().is_empty());
    }

    #[test]
    fn test_refresh_force_prunes_missing_files() {
        let temp = TempDir::new().unwrap();
        let present = temp.path().join("present.jpg");
        std::fs::write(&present, b"x").unwrap();

        let index = FanartIndex::in_memory();
        index
            .import_category(Category::Weather, vec![
                IndexEntry::new(present.clone(), "sunny".to_string(), None),
                IndexEntry::new(temp.path().join("gone.jpg"), "sunny".to_string(), None),
            ])
            .unwrap();

        index.refresh_category(Category::Weather, false).unwrap();
        assert_eq!(index.category_images(Category::Weather).unwrap().len(), 2);

        index.refresh_category(Category::Weather, true).unwrap();
        assert_eq!(index.category_images(Category::Weather).unwrap(), vec![present]);
    }

    #[test]
    fn test_remove_category_keeps_entries() {
        let index = music_index();
        index.remove_category(Category::MusicFanartScraped);
        assert_eq!(index.len(), 5);
    }

    #[test]
    fn test_save_and_open_round_trip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("index.json");

        let index = FanartIndex::open(&path).unwrap();
        assert!(index.is_empty());
        index.import_category(Category::Holiday, vec![entry("/h/xmas.jpg", "christmas", None)]).unwrap();
        index.save().unwrap();

        let reopened = FanartIndex::open(&path).unwrap();
        assert_eq!(reopened.category_counts(), vec![(Category::Holiday, 1)]);
        assert_eq!(reopened.lookup(Category::Holiday, "Christmas", None, false).unwrap(), vec![
            PathBuf::from("/h/xmas.jpg")
        ]);
    }

    #[test]
    fn test_open_rejects_garbage() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("index.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(FanartIndex::open(&path), Err(IndexError::Parse(_))));
    }
}
