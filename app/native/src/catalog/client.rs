//! Catalog download, caching and lookup.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use super::remote::{CatalogRemote, HttpRemote};
use super::types::{AnimatedCatalog, ArtworkKind, CatalogEntry, CatalogMarker};
use super::CatalogError;
use crate::cache::{get_cache_subdir, write_atomic};
use crate::config::CatalogConfig;
use crate::constants::catalog::{CATALOG_FILENAME, FALLBACK_LANGUAGE, MARKER_FILENAME, ORIGINAL_SUFFIX};

const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

/// Cache subdirectory holding the catalog and its marker.
pub const CACHE_SUBDIR: &str = "animated";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogState {
    NotLoaded,
    Loaded,
    LoadFailed,
}

pub struct CatalogClient {
    remote: Arc<dyn CatalogRemote>,
    base_url: String,
    language: String,
    refresh_days: u64,
    dir: PathBuf,
    state: CatalogState,
    catalog: Option<AnimatedCatalog>,
}

impl std::fmt::Debug for CatalogClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogClient")
            .field("base_url", &self.base_url)
            .field("dir", &self.dir)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

fn now_secs() -> u64 { SystemTime::now().duration_since(UNIX_EPOCH).map_or(0, |d| d.as_secs()) }

/// Picks the entry of `kind` to show for `language`.
///
/// Among entries in the preferred language and entries in English, the
/// largest wins. On equal size the English entry wins.
#[must_use]
pub fn select_entry<'a>(entries: &'a [CatalogEntry], kind: ArtworkKind, language: &str) -> Option<&'a CatalogEntry> {
    let language = language.trim().to_uppercase();
    if language.is_empty() {
        return None;
    }

    let largest = |lang: &str| {
        entries
            .iter()
            .filter(|e| e.kind == kind.as_str() && e.language.trim().eq_ignore_ascii_case(lang))
            .fold(None::<&CatalogEntry>, |best, e| match best {
                Some(b) if b.size >= e.size => Some(b),
                _ => Some(e),
            })
    };

    let preferred = if language == FALLBACK_LANGUAGE { None } else { largest(&language) };
    let english = largest(FALLBACK_LANGUAGE);

    match (preferred, english) {
        (Some(p), Some(en)) => Some(if en.size >= p.size { en } else { p }),
        (p, en) => en.or(p),
    }
}

impl CatalogClient {
    /// Creates a client storing its files in `dir`.
    #[must_use]
    pub fn new(remote: Arc<dyn CatalogRemote>, config: &CatalogConfig, dir: impl Into<PathBuf>) -> Self {
        Self {
            remote,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            language: config.language.clone(),
            refresh_days: config.refresh_days,
            dir: dir.into(),
            state: CatalogState::NotLoaded,
            catalog: None,
        }
    }

    /// Creates a client using HTTP and the cache folder.
    #[must_use]
    pub fn from_config(config: &CatalogConfig) -> Self {
        let remote = HttpRemote::new(Duration::from_secs(config.timeout_secs));
        Self::new(Arc::new(remote), config, get_cache_subdir(CACHE_SUBDIR))
    }

    #[must_use]
    pub fn catalog_path(&self) -> PathBuf { self.dir.join(CATALOG_FILENAME) }

    #[must_use]
    pub fn marker_path(&self) -> PathBuf { self.dir.join(MARKER_FILENAME) }

    #[must_use]
    pub const fn state(&self) -> CatalogState { self.state }

    #[must_use]
    pub fn is_loaded(&self) -> bool { self.catalog.is_some() }

    #[must_use]
    pub fn is_empty(&self) -> bool { self.catalog.as_ref().is_none_or(|c| c.movies.is_empty()) }

    /// Configured preferred language.
    #[must_use]
    pub fn language(&self) -> &str { &self.language }

    #[must_use]
    pub const fn catalog(&self) -> Option<&AnimatedCatalog> { self.catalog.as_ref() }

    fn url(&self, resource: &str) -> String { format!("{}/{resource}", self.base_url) }

    fn read_marker(&self) -> Option<CatalogMarker> {
        let contents = std::fs::read(self.marker_path()).ok()?;
        serde_json::from_slice(&contents).ok()
    }

    /// Returns whether the cached catalog is missing a marker or is older than
    /// the configured refresh period.
    #[must_use]
    pub fn needs_refresh(&self) -> bool {
        self.read_marker().is_none_or(|marker| {
            now_secs().saturating_sub(marker.last_download) >= self.refresh_days.saturating_mul(SECONDS_PER_DAY)
        })
    }

    /// Downloads the catalog unless a fresh copy is cached.
    ///
    /// Returns whether a usable catalog file is present afterwards.
    pub fn download(&self) -> bool {
        if self.catalog_path().exists() && !self.needs_refresh() {
            return true;
        }
        self.force_download()
    }

    /// Downloads the catalog and replaces the cached copy.
    pub fn force_download(&self) -> bool {
        match self.fetch() {
            Ok(()) => {
                tracing::debug!(path = %self.catalog_path().display(), "catalog: downloaded");
                true
            }
            Err(err) => {
                tracing::error!(error = %err, url = %self.url(CATALOG_FILENAME), "catalog: download failed");
                false
            }
        }
    }

    /// Downloads the catalog and its refresh marker into the cache folder.
    ///
    /// # Errors
    ///
    /// Returns an error if the download or either write fails.
    pub fn fetch(&self) -> Result<(), CatalogError> {
        let body = self.remote.download(&self.url(CATALOG_FILENAME))?;
        write_atomic(&self.catalog_path(), &body)?;

        let marker = CatalogMarker { last_download: now_secs() };
        write_atomic(&self.marker_path(), &serde_json::to_vec(&marker)?)?;
        Ok(())
    }

    /// Loads the cached catalog, downloading it first when absent.
    ///
    /// Failures are logged and leave the client in [`CatalogState::LoadFailed`].
    pub fn load(&mut self) {
        if !self.catalog_path().exists() && !self.download() {
            self.state = CatalogState::LoadFailed;
            return;
        }

        match Self::read_catalog(&self.catalog_path()) {
            Ok(catalog) => {
                tracing::debug!(
                    version = catalog.version,
                    updated = %catalog.last_updated,
                    language = %self.language,
                    movies = catalog.movies.len(),
                    "catalog: loaded"
                );
                self.catalog = Some(catalog);
                self.state = CatalogState::Loaded;
            }
            Err(err) => {
                tracing::warn!(error = %err, path = %self.catalog_path().display(), "catalog: not loaded, format changed or file corrupted");
                self.catalog = None;
                self.state = CatalogState::LoadFailed;
            }
        }
    }

    fn read_catalog(path: &Path) -> Result<AnimatedCatalog, CatalogError> {
        let contents = std::fs::read(path)?;
        Ok(serde_json::from_slice(&contents)?)
    }

    /// Drops the loaded catalog.
    pub fn unload(&mut self) {
        self.catalog = None;
        self.state = CatalogState::NotLoaded;
    }

    /// Resolves the animated artwork URL of a movie.
    ///
    /// Movies missing from the catalog are probed on the server under their
    /// conventional file name.
    #[must_use]
    pub fn resolve(&self, imdb_id: &str, kind: ArtworkKind, language: &str) -> Option<String> {
        let imdb_id = imdb_id.trim();
        if imdb_id.is_empty() {
            tracing::debug!(%kind, "catalog: empty IMDb id");
            return None;
        }

        let Some(catalog) = self.catalog.as_ref().filter(|c| !c.movies.is_empty()) else {
            tracing::debug!(imdb_id, "catalog: not loaded or empty");
            return None;
        };

        if let Some(movie) = catalog.movies.iter().find(|m| m.imdbid == imdb_id) {
            let entry = select_entry(&movie.entries, kind, language)?;
            let image = entry.image.trim();
            if image.is_empty() {
                return None;
            }
            return Some(self.url(&image.replace(".gif", ORIGINAL_SUFFIX)));
        }

        let url = self.url(&format!("{imdb_id}_{kind}_0{ORIGINAL_SUFFIX}"));
        if self.remote.exists(&url) {
            tracing::debug!(imdb_id, %url, "catalog: file on server but not in catalog, catalog outdated");
            return Some(url);
        }
        None
    }
}
