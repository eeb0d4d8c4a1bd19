//! Resolution of the image to show for the current playback identity.
//!
//! Tiers are tried in order and the first one that yields a file wins:
//! slideshow override, primary identity, genre, random default backdrop.
//! Store failures are logged and treated as an empty tier.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::seq::{IndexedRandom, SliceRandom};
use rand::{Rng, SeedableRng};

use super::rotation::RotationCursor;
use super::thumbs;
use super::visibility::Slot;
use crate::config::MusicConfig;
use crate::constants::properties;
use crate::host::{PropertyBuffer, PropertySource};
use crate::index::{Category, ImageIndexStore, split_values};
use crate::playback::{PlaybackContextTracker, PlaybackIdentity};

/// Feature switches of a resolver.
#[derive(Debug, Clone)]
pub struct ResolverOptions {
    /// Categories searched for the primary and genre tiers.
    pub categories: Vec<Category>,
    pub music_mode: bool,
    pub genre_fallback: bool,
    pub overlay: bool,
    pub default_backdrops: bool,
    pub slideshow: bool,
    pub artist_thumbs: bool,
}

impl ResolverOptions {
    /// Options for now-playing music fanart.
    #[must_use]
    pub fn music(config: &MusicConfig) -> Self {
        Self {
            categories: Category::MUSIC_FANART.to_vec(),
            music_mode: true,
            genre_fallback: config.genre_fallback,
            overlay: config.overlay,
            default_backdrops: config.default_backdrops,
            slideshow: config.slideshow,
            artist_thumbs: config.artist_thumbs,
        }
    }
}

impl Default for ResolverOptions {
    fn default() -> Self { Self::music(&MusicConfig::default()) }
}

/// Tier a resolved image came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Slideshow,
    Primary,
    Genre,
    DefaultBackdrop,
}

/// Outcome of one refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub path: Option<PathBuf>,
    pub source: Option<Source>,
    /// File resolved by the refresh before this one.
    pub previous: Option<PathBuf>,
    pub identity_changed: bool,
}

impl Resolution {
    #[must_use]
    pub const fn available(&self) -> bool { self.path.is_some() }

    /// Returns whether the same file was resolved twice in a row.
    #[must_use]
    pub fn is_repeat(&self) -> bool { self.path.is_some() && self.path == self.previous }
}

pub struct FanartResolver {
    store: Arc<dyn ImageIndexStore>,
    options: ResolverOptions,
    tracker: PlaybackContextTracker,
    cursor: RotationCursor,
    primary: Option<Vec<PathBuf>>,
    genre: Option<Vec<PathBuf>>,
    rng: StdRng,
}

impl std::fmt::Debug for FanartResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FanartResolver")
            .field("options", &self.options)
            .field("tracker", &self.tracker)
            .field("cursor", &self.cursor)
            .finish_non_exhaustive()
    }
}

/// Appends `found` to `list`, skipping paths already present.
fn extend_unique(list: &mut Vec<PathBuf>, found: Vec<PathBuf>) {
    for path in found {
        if !list.contains(&path) {
            list.push(path);
        }
    }
}

impl FanartResolver {
    #[must_use]
    pub fn new(store: Arc<dyn ImageIndexStore>, options: ResolverOptions, max_ticks: u32) -> Self {
        Self::with_rng(store, options, max_ticks, StdRng::from_rng(&mut rand::rng()))
    }

    /// Creates a resolver with a fixed seed, for reproducible shuffles.
    #[must_use]
    pub fn with_seed(store: Arc<dyn ImageIndexStore>, options: ResolverOptions, max_ticks: u32, seed: u64) -> Self {
        Self::with_rng(store, options, max_ticks, StdRng::seed_from_u64(seed))
    }

    fn with_rng(store: Arc<dyn ImageIndexStore>, options: ResolverOptions, max_ticks: u32, rng: StdRng) -> Self {
        Self {
            store,
            options,
            tracker: PlaybackContextTracker::new(max_ticks),
            cursor: RotationCursor::new(),
            primary: None,
            genre: None,
            rng,
        }
    }

    #[must_use]
    pub const fn options(&self) -> &ResolverOptions { &self.options }

    #[must_use]
    pub const fn tracker(&self) -> &PlaybackContextTracker { &self.tracker }

    #[must_use]
    pub const fn cursor(&self) -> &RotationCursor { &self.cursor }

    /// Returns whether `identity` differs from the one last refreshed.
    #[must_use]
    pub fn identity_differs(&self, identity: &PlaybackIdentity) -> bool { self.tracker.differs(identity) }

    /// Returns whether the next tick must run a refresh.
    #[must_use]
    pub fn is_reload_due(&self, identity: &PlaybackIdentity) -> bool {
        self.tracker.differs(identity) || self.tracker.reload_due()
    }

    /// Forces the next refresh to reload candidates from the store.
    pub fn force_invalidate(&mut self) {
        self.tracker.force_invalidate();
        self.drop_candidates();
    }

    pub fn increase_ticks(&mut self) { self.tracker.increase_ticks(); }

    pub fn reset_ticks(&mut self) { self.tracker.reset_ticks(); }

    /// Forgets the identity, candidates, rotation and tick counter.
    pub fn clear(&mut self) {
        self.tracker.clear();
        self.drop_candidates();
    }

    fn drop_candidates(&mut self) {
        self.primary = None;
        self.genre = None;
        self.cursor.reset();
    }

    /// Resolves the image for `identity`.
    pub fn refresh<S: PropertySource + ?Sized>(&mut self, identity: &PlaybackIdentity, skin: &S) -> Resolution {
        let previous = self.cursor.state().previous_file.clone();
        let identity_changed = self.tracker.has_changed(identity);
        if identity_changed {
            tracing::debug!(artist = %identity.primary, album = ?identity.secondary, "resolver: identity changed");
            self.drop_candidates();
        }

        let resolved = self
            .resolve_slideshow(skin)
            .map(|p| (p, Source::Slideshow))
            .or_else(|| self.resolve_primary(identity).map(|p| (p, Source::Primary)))
            .or_else(|| self.resolve_genre(identity).map(|p| (p, Source::Genre)))
            .or_else(|| self.resolve_default_backdrop().map(|p| (p, Source::DefaultBackdrop)));

        self.tracker.reset_ticks();

        let (path, source) = resolved.map_or((None, None), |(p, s)| (Some(p), Some(s)));
        tracing::trace!(path = ?path, source = ?source, "resolver: refreshed");
        Resolution {
            path,
            source,
            previous,
            identity_changed,
        }
    }

    /// Stages the resolution into the slot property, and the overlay when enabled.
    pub fn emit(&self, resolution: &Resolution, slot: Slot, buffer: &mut PropertyBuffer) {
        if let Some(path) = &resolution.path {
            let value = path.to_string_lossy();
            buffer.stage(slot.property(), &value);
            if self.options.overlay {
                buffer.stage(properties::OVERLAY, &value);
            }
        } else {
            buffer.stage(properties::BACKDROP_1, "");
            buffer.stage(properties::BACKDROP_2, "");
            if self.options.overlay {
                buffer.stage(properties::OVERLAY, "");
            }
        }
    }

    /// Picks the artist thumbnail for `identity`, if thumbnails are enabled.
    pub fn resolve_artist_thumb(&mut self, identity: &PlaybackIdentity, slot: Slot) -> Option<PathBuf> {
        if !self.options.artist_thumbs {
            return None;
        }
        let candidates = thumbs::thumb_candidates(self.store.as_ref(), &identity.primary, identity.secondary.as_deref());
        thumbs::pick_thumb(&candidates, slot, &mut self.rng)
    }

    fn resolve_slideshow<S: PropertySource + ?Sized>(&mut self, skin: &S) -> Option<PathBuf> {
        if !self.options.slideshow {
            return None;
        }
        let enabled = skin.get_property(properties::SKIN_SLIDESHOW_ENABLED);
        if !enabled.trim().eq_ignore_ascii_case("true") {
            return None;
        }
        self.random_from(Category::Pictures)
    }

    fn resolve_primary(&mut self, identity: &PlaybackIdentity) -> Option<PathBuf> {
        if identity.is_empty() {
            return None;
        }

        if self.primary.as_ref().is_none_or(Vec::is_empty) {
            let keys = thumbs::artist_keys(&identity.primary);
            let loaded = self.load_candidates(&keys, identity.secondary.as_deref());
            self.primary = Some(loaded);
        }

        let candidates = self.primary.as_deref().unwrap_or_default();
        self.cursor.next(candidates)
    }

    fn resolve_genre(&mut self, identity: &PlaybackIdentity) -> Option<PathBuf> {
        if !self.options.genre_fallback {
            return None;
        }
        let genre = identity.genre.as_deref()?;

        if self.genre.as_ref().is_none_or(Vec::is_empty) {
            let keys = split_values(genre);
            let loaded = self.load_candidates(&keys, None);
            self.genre = Some(loaded);
        }

        let candidates = self.genre.as_deref().unwrap_or_default();
        self.cursor.next(candidates)
    }

    fn resolve_default_backdrop(&mut self) -> Option<PathBuf> {
        if !self.options.default_backdrops {
            return None;
        }
        self.random_from(Category::DefaultBackdrop)
    }

    /// Loads candidates for `keys` from every configured category, shuffled
    /// when the rotation has no position yet.
    fn load_candidates(&mut self, keys: &[String], secondary: Option<&str>) -> Vec<PathBuf> {
        let mut candidates = Vec::new();

        for category in &self.options.categories {
            for key in keys {
                match self.store.lookup(*category, key, secondary, self.options.music_mode) {
                    Ok(found) => extend_unique(&mut candidates, found),
                    Err(err) => {
                        tracing::warn!(error = %err, %category, key = %key, "resolver: lookup failed");
                    }
                }
            }
        }

        if self.cursor.state().is_unset() {
            candidates.shuffle(&mut self.rng);
        }

        tracing::debug!(keys = ?keys, count = candidates.len(), "resolver: candidates loaded");
        candidates
    }

    /// Picks a random image of `category`, avoiding the previous file when
    /// there is a choice.
    fn random_from(&mut self, category: Category) -> Option<PathBuf> {
        let pool = match self.store.category_images(category) {
            Ok(pool) => pool,
            Err(err) => {
                tracing::warn!(error = %err, %category, "resolver: random pool unavailable");
                return None;
            }
        };

        let picked = pick_avoiding(&pool, self.cursor.state().previous_file.as_deref(), &mut self.rng)?;
        self.cursor.record_file(&picked);
        Some(picked)
    }
}

/// Picks uniformly from `pool`, never returning `previous` unless it is the
/// only image.
fn pick_avoiding<R: Rng + ?Sized>(pool: &[PathBuf], previous: Option<&Path>, rng: &mut R) -> Option<PathBuf> {
    if pool.len() > 1 {
        if let Some(previous) = previous {
            let others: Vec<&PathBuf> = pool.iter().filter(|p| p.as_path() != previous).collect();
            if !others.is_empty() {
                return others.choose(rng).map(|p| (*p).clone());
            }
        }
    }
    pool.choose(rng).cloned()
}
