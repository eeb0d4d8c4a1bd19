//! End-to-end now-playing tests: scan a fanart tree, then tick the driver
//! against a recording console host.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use fanart_lib::cli::ConsoleHost;
use fanart_lib::constants::properties;
use fanart_lib::fanart::{FanartResolver, NowPlayingDriver, ResolverOptions};
use fanart_lib::host::NowPlaying;
use fanart_lib::index::{FanartIndex, ImageIndexStore};
use fanart_lib::scan::{ScanOptions, ScanTarget, ScanWorker};
use fanart_lib::utils::CancellationToken;
use tempfile::TempDir;

fn fanart_tree(files: &[&str]) -> TempDir {
    let temp = TempDir::new().unwrap();
    for file in files {
        let path = temp.path().join(file);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"").unwrap();
    }
    temp
}

fn scanned_index(root: &Path) -> Arc<dyn ImageIndexStore> {
    let index: Arc<dyn ImageIndexStore> = Arc::new(FanartIndex::in_memory());
    let worker = ScanWorker::new(Arc::clone(&index), ScanOptions::for_root(root), CancellationToken::new());
    let summary = worker.run(&ScanTarget::All).unwrap();
    assert!(!summary.cancelled);
    index
}

fn track(artist: &str, genre: Option<&str>) -> NowPlaying {
    NowPlaying {
        artist: artist.to_string(),
        genre: genre.map(str::to_string),
        playing: true,
        ..NowPlaying::default()
    }
}

fn driver(host: &Arc<ConsoleHost>, index: Arc<dyn ImageIndexStore>, max_ticks: u32) -> NowPlayingDriver<ConsoleHost> {
    let resolver = FanartResolver::with_seed(index, ResolverOptions::default(), max_ticks, 7);
    NowPlayingDriver::new(Arc::clone(host), resolver, [host.window()], CancellationToken::new())
}

fn property(host: &ConsoleHost, name: &str) -> String { host.property(name).unwrap_or_default() }

#[test]
fn queen_track_gets_backdrop_and_thumb() {
    let tree = fanart_tree(&[
        "Scraper/music/Queen (1).jpg",
        "Scraper/music/Queen (2).jpg",
        "Music/Artists/QueenL.jpg",
        "UserDef/default/curtain.jpg",
    ]);
    let host = Arc::new(ConsoleHost::quiet(track("Queen", None)));
    let mut driver = driver(&host, scanned_index(tree.path()), 30);

    driver.tick();

    assert!(driver.is_available());
    let backdrop = property(&host, properties::BACKDROP_1);
    assert!(backdrop.contains("Queen ("), "unexpected backdrop {backdrop}");
    assert!(property(&host, properties::ARTIST_THUMB).ends_with("QueenL.jpg"));
}

#[test]
fn rotation_alternates_slots_between_images() {
    let tree = fanart_tree(&["Scraper/music/Queen (1).jpg", "Scraper/music/Queen (2).jpg"]);
    let host = Arc::new(ConsoleHost::quiet(track("Queen", None)));
    let mut driver = driver(&host, scanned_index(tree.path()), 1);

    driver.tick();
    let first = property(&host, properties::BACKDROP_1);

    // max ticks reached after one tick: the next one rotates into slot B
    driver.tick();
    let second = property(&host, properties::BACKDROP_2);

    assert!(!first.is_empty());
    assert!(!second.is_empty());
    assert_ne!(first, second);
}

#[test]
fn unknown_artist_falls_back_to_genre_then_default() {
    let tree = fanart_tree(&["UserDef/genres/Rock.jpg", "UserDef/default/curtain.jpg"]);
    let index = scanned_index(tree.path());

    let host = Arc::new(ConsoleHost::quiet(track("Nobody Known", Some("Rock"))));
    let mut by_genre = driver(&host, Arc::clone(&index), 30);
    by_genre.tick();
    assert!(property(&host, properties::BACKDROP_1).ends_with("Rock.jpg"));

    let host = Arc::new(ConsoleHost::quiet(track("Nobody Known", Some("Jazz"))));
    let mut by_default = driver(&host, index, 30);
    by_default.tick();
    assert!(property(&host, properties::BACKDROP_1).ends_with("curtain.jpg"));
}

#[test]
fn nothing_found_leaves_fanart_unavailable() {
    let tree = fanart_tree(&["UserDef/weather/sunny.jpg"]);
    let host = Arc::new(ConsoleHost::quiet(track("Nobody Known", None)));
    let mut driver = driver(&host, scanned_index(tree.path()), 30);

    driver.tick();

    assert!(!driver.is_available());
    assert_eq!(property(&host, properties::BACKDROP_1), "");
}

#[test]
fn stopping_playback_clears_properties_and_resumes_cleanly() {
    let tree = fanart_tree(&["Scraper/music/Queen (1).jpg"]);
    let host = Arc::new(ConsoleHost::quiet(track("Queen", None)));
    let mut driver = driver(&host, scanned_index(tree.path()), 30);

    driver.tick();
    assert!(!property(&host, properties::BACKDROP_1).is_empty());

    host.stop_track();
    driver.tick();
    assert!(!driver.is_playing());
    assert_eq!(property(&host, properties::BACKDROP_1), "");
    assert_eq!(property(&host, properties::ARTIST_THUMB), "");

    host.play(track("Queen", None));
    driver.tick();
    assert!(driver.is_playing());
    assert!(!property(&host, properties::BACKDROP_1).is_empty());
}
