//! Fanart - now-playing fanart resolution, rotation and indexing.
//!
//! The library holds the engine: an index of local images by category and
//! key, a resolver that picks and rotates backdrops for the current track,
//! the visibility state machine driving the host's image slots, the directory
//! scan worker and the animated artwork catalog client. The host (a media
//! center) is reached only through the traits in [`host`].

pub mod cache;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod fanart;
pub mod host;
pub mod index;
pub mod playback;
pub mod scan;
pub mod schema;
pub mod utils;

use std::sync::Arc;
use std::time::Duration;

use crate::config::FanartConfig;
use crate::fanart::{FanartResolver, NowPlayingDriver, ResolverOptions, Ticker};
use crate::host::{Host, NowPlayingScraper};
use crate::index::ImageIndexStore;
use crate::utils::CancellationToken;

/// Starts the now-playing engine for `host`.
///
/// A named thread ticks the driver at `refresh.intervalMs` until `stopping`
/// is cancelled or the returned [`Ticker`] is stopped. Returns `None` if the
/// thread could not be spawned.
pub fn run<H: Host + ?Sized + 'static>(
    host: Arc<H>,
    store: Arc<dyn ImageIndexStore>,
    scraper: Option<Arc<dyn NowPlayingScraper>>,
    config: &FanartConfig,
    stopping: CancellationToken,
) -> Option<Ticker> {
    let resolver = FanartResolver::new(store, ResolverOptions::music(&config.music), config.refresh.max_refresh_ticks);
    let mut driver = NowPlayingDriver::new(host, resolver, config.windows.iter().copied(), stopping.clone());
    if let Some(scraper) = scraper {
        driver = driver.with_scraper(scraper);
    }

    tracing::info!(windows = ?config.windows, interval_ms = config.refresh.interval_ms, "fanart: now-playing started");
    Ticker::start(Duration::from_millis(config.refresh.interval_ms), stopping, move || driver.tick())
}
