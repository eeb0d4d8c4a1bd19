//! Now-playing tick driver.
//!
//! Called once per tick, it reads the player, decides whether the fanart has
//! to be resolved again and pushes the outcome to the host.

use std::collections::HashSet;
use std::sync::Arc;

use super::resolver::FanartResolver;
use super::visibility::VisibilityStateMachine;
use crate::constants::properties;
use crate::host::{Host, NoopScraper, NowPlayingScraper, PropertyBuffer};
use crate::playback::PlaybackIdentity;
use crate::utils::CancellationToken;

/// What a tick found in the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Playback {
    Stopped,
    Unchanged,
    Refreshed,
}

pub struct NowPlayingDriver<H: Host + ?Sized> {
    host: Arc<H>,
    scraper: Arc<dyn NowPlayingScraper>,
    resolver: FanartResolver,
    visibility: VisibilityStateMachine,
    buffer: PropertyBuffer,
    windows: HashSet<i32>,
    stopping: CancellationToken,
    available: bool,
    playing: bool,
    blank: bool,
    scrape_pending: bool,
}

impl<H: Host + ?Sized> NowPlayingDriver<H> {
    /// Creates a driver for the given fanart windows.
    pub fn new(
        host: Arc<H>,
        resolver: FanartResolver,
        windows: impl IntoIterator<Item = i32>,
        stopping: CancellationToken,
    ) -> Self {
        Self {
            host,
            scraper: Arc::new(NoopScraper),
            resolver,
            visibility: VisibilityStateMachine::new(),
            buffer: PropertyBuffer::new(),
            windows: windows.into_iter().collect(),
            stopping,
            available: false,
            playing: false,
            blank: false,
            scrape_pending: false,
        }
    }

    /// Replaces the now-playing scraper.
    #[must_use]
    pub fn with_scraper(mut self, scraper: Arc<dyn NowPlayingScraper>) -> Self {
        self.scraper = scraper;
        self
    }

    #[must_use]
    pub const fn is_available(&self) -> bool { self.available }

    #[must_use]
    pub const fn is_playing(&self) -> bool { self.playing }

    #[must_use]
    pub const fn resolver(&self) -> &FanartResolver { &self.resolver }

    #[must_use]
    pub const fn visibility(&self) -> &VisibilityStateMachine { &self.visibility }

    /// Runs one tick.
    pub fn tick(&mut self) {
        if self.stopping.is_cancelled() {
            return;
        }

        let Some(window) = self.host.active_window() else {
            return;
        };

        let playback = if self.windows.contains(&window) { self.refresh_playing() } else { Playback::Unchanged };

        if self.available {
            self.resolver.increase_ticks();
        } else if playback == Playback::Stopped {
            self.empty_all_properties();
        } else {
            self.release(false);
        }

        self.buffer.flush(self.host.as_ref());
        self.show_image(playback == Playback::Refreshed);
    }

    /// Reads the player and refreshes the fanart when due.
    fn refresh_playing(&mut self) -> Playback {
        let now = self.host.now_playing();

        if self.scraper.take_trigger_refresh() {
            tracing::debug!("playing: scraper delivered new artwork, forcing reload");
            self.resolver.force_invalidate();
        }

        let Some(now) = now.filter(|n| !n.artist.trim().is_empty() && n.is_active()) else {
            self.available = false;
            return Playback::Stopped;
        };

        self.playing = true;
        let identity = PlaybackIdentity::from_now_playing(&now);

        if self.resolver.identity_differs(&identity) {
            self.scrape_pending = true;
        }
        if self.scrape_pending {
            self.scrape_pending = !self.scraper.start(&identity);
            if self.scrape_pending {
                tracing::trace!(artist = %identity.primary, "playing: scraper busy, retrying next tick");
            }
        }

        if !self.resolver.is_reload_due(&identity) {
            return Playback::Unchanged;
        }

        let thumb = self.resolver.resolve_artist_thumb(&identity, self.visibility.active_slot());
        self.buffer.stage(
            properties::ARTIST_THUMB,
            &thumb.map(|p| p.to_string_lossy().into_owned()).unwrap_or_default(),
        );

        let resolution = self.resolver.refresh(&identity, self.host.as_ref());
        let slot = match &resolution.path {
            Some(path) => self.visibility.slot_for(path, resolution.previous.as_deref()),
            None => self.visibility.active_slot(),
        };
        self.resolver.emit(&resolution, slot, &mut self.buffer);
        self.available = resolution.available();
        self.blank = false;
        Playback::Refreshed
    }

    /// Applies visibility. Slots only change on ticks that resolved an image.
    fn show_image(&mut self, refreshed: bool) {
        let window = self.host.active_window();

        if !self.available {
            self.visibility.apply(false, window, self.host.as_ref());
            return;
        }

        if refreshed {
            if !self.visibility.apply(true, window, self.host.as_ref()) {
                self.resolver.reset_ticks();
            }
        } else {
            self.visibility.mark_available(window, self.host.as_ref());
        }
    }

    /// Clears everything shown for the last track. Does nothing unless
    /// something was playing.
    pub fn empty_all_properties(&mut self) { self.release(true); }

    /// Hides the fanart and blanks the play properties. A `clean` release
    /// also stops the scraper and forgets the track, otherwise the track
    /// stays current so the scraper is not restarted for it.
    fn release(&mut self, clean: bool) {
        if !self.playing || (!clean && self.blank) {
            return;
        }

        let window = self.host.active_window();
        self.visibility.mark_unavailable(window, self.host.as_ref());
        self.visibility.hide_slots(window, self.host.as_ref());

        self.buffer.clear_written(self.host.as_ref());
        for name in [
            properties::OVERLAY,
            properties::ARTIST_THUMB,
            properties::BACKDROP_1,
            properties::BACKDROP_2,
        ] {
            self.host.set_property(name, "");
        }
        self.available = false;
        self.blank = true;

        if clean {
            self.scraper.stop();
            self.resolver.clear();
            self.playing = false;
            self.scrape_pending = false;
            tracing::debug!("playing: playback stopped, properties cleared");
        } else {
            tracing::debug!("playing: no fanart for the current track");
        }
    }
}

#[cfg(test)]
mod tests {
    use parking_lot::Mutex;

    use super::*;
    use crate::constants::controls;
    use crate::fanart::resolver::ResolverOptions;
    use crate::fanart::visibility::Slot;
    use crate::host::{NowPlaying, PlayerState, PropertySink, PropertySource, VisibilitySink, WindowState};
    use crate::index::{Category, FanartIndex, ImageIndexStore, IndexEntry};

    const WINDOW: i32 = 501;

    #[derive(Default)]
    struct FakeHost {
        window: Mutex<Option<i32>>,
        now: Mutex<Option<NowPlaying>>,
        properties: Mutex<Vec<(String, String)>>,
        controls: Mutex<Vec<(bool, i32)>>,
    }

    impl FakeHost {
        fn playing(artist: &str) -> Self {
            let host = Self::default();
            *host.window.lock() = Some(WINDOW);
            host.play(artist);
            host
        }

        fn play(&self, artist: &str) {
            *self.now.lock() = Some(NowPlaying {
                artist: artist.to_string(),
                playing: true,
                ..NowPlaying::default()
            });
        }

        fn last(&self, name: &str) -> Option<String> {
            self.properties.lock().iter().rev().find(|(n, _)| n == name).map(|(_, v)| v.clone())
        }
    }

    impl PropertySink for FakeHost {
        fn set_property(&self, name: &str, value: &str) {
            self.properties.lock().push((name.to_string(), value.to_string()));
        }
    }

    impl PropertySource for FakeHost {
        fn get_property(&self, _name: &str) -> String { String::new() }
    }

    impl VisibilitySink for FakeHost {
        fn show_control(&self, _window: i32, control: i32) { self.controls.lock().push((true, control)); }

        fn hide_control(&self, _window: i32, control: i32) { self.controls.lock().push((false, control)); }
    }

    impl WindowState for FakeHost {
        fn active_window(&self) -> Option<i32> { *self.window.lock() }
    }

    impl PlayerState for FakeHost {
        fn now_playing(&self) -> Option<NowPlaying> { self.now.lock().clone() }
    }

    #[derive(Default)]
    struct BusyOnceScraper {
        starts: Mutex<u32>,
        trigger: Mutex<bool>,
    }

    impl NowPlayingScraper for BusyOnceScraper {
        fn start(&self, _identity: &PlaybackIdentity) -> bool {
            let mut starts = self.starts.lock();
            *starts += 1;
            *starts > 1
        }

        fn take_trigger_refresh(&self) -> bool { std::mem::take(&mut *self.trigger.lock()) }

        fn stop(&self) {}
    }

    #[derive(Default)]
    struct CountingScraper {
        starts: Mutex<u32>,
        stops: Mutex<u32>,
    }

    impl NowPlayingScraper for CountingScraper {
        fn start(&self, _identity: &PlaybackIdentity) -> bool {
            *self.starts.lock() += 1;
            true
        }

        fn take_trigger_refresh(&self) -> bool { false }

        fn stop(&self) { *self.stops.lock() += 1; }
    }

    fn driver(host: &Arc<FakeHost>, max_ticks: u32) -> NowPlayingDriver<FakeHost> {
        let index = FanartIndex::in_memory();
        let entries = (0..2)
            .map(|i| IndexEntry::new(format!("/queen/{i}.jpg").into(), "queen".to_string(), None))
            .collect();
        index.import_category(Category::MusicFanartScraped, entries).unwrap();
        let store: Arc<dyn ImageIndexStore> = Arc::new(index);

        let resolver = FanartResolver::with_seed(store, ResolverOptions::default(), max_ticks, 9);
        NowPlayingDriver::new(Arc::clone(host), resolver, [WINDOW], CancellationToken::new())
    }

    #[test]
    fn test_first_tick_shows_slot_a() {
        let host = Arc::new(FakeHost::playing("Queen"));
        let mut driver = driver(&host, 30);
        driver.tick();

        assert!(driver.is_available());
        assert!(host.last(properties::BACKDROP_1).unwrap().starts_with("/queen"));
        let calls = host.controls.lock().clone();
        assert_eq!(calls, vec![(true, controls::INDICATOR), (true, controls::SLOT_A), (false, controls::SLOT_B)]);
    }

    #[test]
    fn test_rotation_waits_for_max_ticks() {
        let host = Arc::new(FakeHost::playing("Queen"));
        let mut driver = driver(&host, 3);

        driver.tick();
        driver.tick();
        driver.tick();
        assert_eq!(host.last(properties::BACKDROP_2), None);

        driver.tick();
        assert!(host.last(properties::BACKDROP_2).unwrap().starts_with("/queen"));
        assert_eq!(driver.visibility().active_slot(), Slot::A);
    }

    #[test]
    fn test_single_image_alternates_slots() {
        let host = Arc::new(FakeHost::playing("Queen"));
        let index = FanartIndex::in_memory();
        index
            .import_category(Category::MusicFanartScraped, vec![IndexEntry::new(
                "/queen/only.jpg".into(),
                "queen".to_string(),
                None,
            )])
            .unwrap();
        let store: Arc<dyn ImageIndexStore> = Arc::new(index);
        let resolver = FanartResolver::with_seed(store, ResolverOptions::default(), 1, 3);
        let mut driver = NowPlayingDriver::new(Arc::clone(&host), resolver, [WINDOW], CancellationToken::new());

        for _ in 0..4 {
            driver.tick();
        }

        let written: Vec<String> = host
            .properties
            .lock()
            .iter()
            .filter(|(name, value)| value == "/queen/only.jpg" && name.starts_with("music.backdrop"))
            .map(|(name, _)| name.clone())
            .collect();
        assert_eq!(written, vec![
            properties::BACKDROP_1,
            properties::BACKDROP_2,
            properties::BACKDROP_1,
            properties::BACKDROP_2
        ]);

        let shown: Vec<i32> = host.controls.lock().iter().filter(|(show, _)| *show).map(|(_, c)| *c).collect();
        assert_eq!(shown, vec![
            controls::INDICATOR,
            controls::SLOT_A,
            controls::SLOT_B,
            controls::SLOT_A,
            controls::SLOT_B
        ]);
    }

    #[test]
    fn test_stop_clears_properties_once() {
        let host = Arc::new(FakeHost::playing("Queen"));
        let mut driver = driver(&host, 30);
        driver.tick();

        *host.now.lock() = None;
        driver.tick();
        assert!(!driver.is_playing());
        assert_eq!(host.last(properties::BACKDROP_1).as_deref(), Some(""));
        assert_eq!(host.last(properties::ARTIST_THUMB).as_deref(), Some(""));

        let writes = host.properties.lock().len();
        driver.tick();
        assert_eq!(host.properties.lock().len(), writes);
    }

    #[test]
    fn test_track_without_fanart_keeps_scraper_running() {
        let host = Arc::new(FakeHost::playing("Nobody"));
        let scraper = Arc::new(CountingScraper::default());
        let mut driver = driver(&host, 30).with_scraper(Arc::clone(&scraper) as Arc<dyn NowPlayingScraper>);

        driver.tick();
        let writes = host.properties.lock().len();
        for _ in 0..4 {
            driver.tick();
        }

        assert!(!driver.is_available());
        assert!(driver.is_playing());
        assert_eq!(*scraper.starts.lock(), 1);
        assert_eq!(*scraper.stops.lock(), 0);
        assert_eq!(host.properties.lock().len(), writes);
        assert_eq!(host.last(properties::BACKDROP_1).as_deref(), Some(""));

        *host.now.lock() = None;
        driver.tick();
        assert!(!driver.is_playing());
        assert_eq!(*scraper.stops.lock(), 1);
    }

    #[test]
    fn test_invalid_window_skips_tick() {
        let host = Arc::new(FakeHost::playing("Queen"));
        *host.window.lock() = None;
        let mut driver = driver(&host, 30);
        driver.tick();

        assert!(host.properties.lock().is_empty());
        assert!(host.controls.lock().is_empty());
    }

    #[test]
    fn test_other_window_does_not_refresh() {
        let host = Arc::new(FakeHost::playing("Queen"));
        *host.window.lock() = Some(1);
        let mut driver = driver(&host, 30);
        driver.tick();
        assert!(!driver.is_available());
        assert!(host.properties.lock().is_empty());
    }

    #[test]
    fn test_busy_scraper_is_retried_and_trigger_forces_reload() {
        let host = Arc::new(FakeHost::playing("Queen"));
        let scraper = Arc::new(BusyOnceScraper::default());
        let mut driver = driver(&host, 30).with_scraper(Arc::clone(&scraper) as Arc<dyn NowPlayingScraper>);

        driver.tick();
        driver.tick();
        assert_eq!(*scraper.starts.lock(), 2);

        let before = host.properties.lock().len();
        driver.tick();
        assert_eq!(host.properties.lock().len(), before);

        *scraper.trigger.lock() = true;
        driver.tick();
        assert!(host.properties.lock().len() > before);
    }

    #[test]
    fn test_cancelled_token_stops_ticks() {
        let host = Arc::new(FakeHost::playing("Queen"));
        let token = CancellationToken::new();
        let index: Arc<dyn ImageIndexStore> = Arc::new(FanartIndex::in_memory());
        let resolver = FanartResolver::with_seed(index, ResolverOptions::default(), 30, 1);
        let mut driver = NowPlayingDriver::new(Arc::clone(&host), resolver, [WINDOW], token.clone());

        token.cancel();
        driver.tick();
        assert!(host.properties.lock().is_empty());
    }
}
