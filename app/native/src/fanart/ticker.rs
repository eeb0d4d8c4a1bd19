//! Fixed-cadence tick thread.

use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use crate::utils::{CancellationToken, spawn_named_thread};

/// Longest uninterrupted sleep, so a stop request is seen promptly.
const SLEEP_SLICE: Duration = Duration::from_millis(50);

/// Runs a tick function on a named thread until stopped.
#[derive(Debug)]
pub struct Ticker {
    own: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

/// Sleeps for `duration`, waking early when either token is cancelled.
fn sleep_unless_cancelled(duration: Duration, a: &CancellationToken, b: &CancellationToken) {
    let deadline = Instant::now() + duration;
    loop {
        if a.is_cancelled() || b.is_cancelled() {
            return;
        }
        let now = Instant::now();
        if now >= deadline {
            return;
        }
        std::thread::sleep(SLEEP_SLICE.min(deadline - now));
    }
}

impl Ticker {
    /// Starts calling `tick` every `interval` until `stopping` is cancelled or
    /// [`stop`](Self::stop) is called.
    ///
    /// Returns `None` if the thread could not be spawned.
    pub fn start<F>(interval: Duration, stopping: CancellationToken, mut tick: F) -> Option<Self>
    where F: FnMut() + Send + 'static {
        let own = CancellationToken::new();
        let thread_own = own.clone();

        let handle = spawn_named_thread("ticker", move || {
            tracing::debug!(interval_ms = interval.as_millis(), "ticker: started");
            while !stopping.is_cancelled() && !thread_own.is_cancelled() {
                tick();
                sleep_unless_cancelled(interval, &stopping, &thread_own);
            }
            tracing::debug!("ticker: stopped");
        })?;

        Some(Self { own, handle: Some(handle) })
    }

    /// Stops the thread and waits for the running tick to finish.
    pub fn stop(&mut self) {
        self.own.cancel();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::warn!("ticker: tick thread panicked");
            }
        }
    }

    #[must_use]
    pub fn is_running(&self) -> bool { self.handle.as_ref().is_some_and(|h| !h.is_finished()) }
}

impl Drop for Ticker {
    fn drop(&mut self) { self.stop(); }
}
