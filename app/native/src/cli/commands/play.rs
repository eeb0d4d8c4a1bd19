//! Play CLI command.
//!
//! Runs the now-playing driver against a [`ConsoleHost`] for a fixed track.

use std::sync::Arc;
use std::time::Duration;

use colored::Colorize;

use super::open_index;
use crate::cli::console::ConsoleHost;
use crate::config;
use crate::error::FanartError;
use crate::fanart::{FanartResolver, NowPlayingDriver, ResolverOptions};
use crate::host::NowPlaying;
use crate::index::ImageIndexStore;
use crate::utils::CancellationToken;

/// Track and tick count of a `fanart play` run.
#[derive(Debug, Clone)]
pub struct PlayRequest {
    pub artist: String,
    pub album: Option<String>,
    pub genre: Option<String>,
    pub ticks: u32,
    pub realtime: bool,
}

/// Execute the play command.
///
/// # Errors
///
/// Returns an error if the index cannot be opened or the arguments are invalid.
pub fn execute(request: &PlayRequest) -> Result<(), FanartError> {
    if request.artist.trim().is_empty() {
        return Err(FanartError::InvalidArguments("--artist must not be empty".to_string()));
    }
    if request.ticks == 0 {
        return Err(FanartError::InvalidArguments("--ticks must be at least 1".to_string()));
    }

    let config = config::get_config();
    let index: Arc<dyn ImageIndexStore> = open_index()?;

    let host = Arc::new(ConsoleHost::new(NowPlaying {
        artist: request.artist.clone(),
        album: request.album.clone(),
        genre: request.genre.clone(),
        playing: true,
        paused: false,
    }));
    let resolver = FanartResolver::new(
        index,
        ResolverOptions::music(&config.music),
        config.refresh.max_refresh_ticks,
    );
    let mut driver = NowPlayingDriver::new(Arc::clone(&host), resolver, [host.window()], CancellationToken::new());

    let interval = Duration::from_millis(config.refresh.interval_ms);
    for tick in 1..=request.ticks {
        println!("{}", format!("Tick {tick}").bold());
        driver.tick();
        if !driver.is_available() {
            println!("  {}", "No fanart available for this track.".dimmed());
        }
        if request.realtime && tick < request.ticks {
            std::thread::sleep(interval);
        }
    }

    Ok(())
}
