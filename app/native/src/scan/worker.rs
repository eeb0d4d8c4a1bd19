//! Background directory scan.
//!
//! A scan walks the category folders in a fixed order, imports each folder
//! as a whole into the store and reports progress on a channel. Only one scan
//! runs at a time: a request made while a scan is running is refused.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, Sender, channel};
use std::thread::JoinHandle;

use parking_lot::Mutex;
use regex::Regex;

use super::folders::{ScanTarget, collect_category, collect_music_folders};
use crate::config::FanartConfig;
use crate::constants::properties;
use crate::host::PropertySink;
use crate::index::{AfterImport, CATEGORY_FOLDERS, Category, CategoryFolder, ImageIndexStore, MUSIC_FOLDER_PROGRESS};
use crate::utils::{CancellationToken, spawn_named_thread};

/// Events published while a scan runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanEvent {
    Started { target: ScanTarget },
    Progress { percent: u8, message: String },
    Finished(ScanSummary),
}

/// Outcome of a scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanSummary {
    /// Categories imported, with their entry counts.
    pub imported: Vec<(Category, usize)>,
    pub cancelled: bool,
}

impl ScanSummary {
    #[must_use]
    pub fn total(&self) -> usize { self.imported.iter().map(|(_, n)| n).sum() }
}

/// Folders and filters a scan works with.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    pub root: PathBuf,
    pub min_resolution: (u32, u32),
    pub music_folders: Vec<PathBuf>,
    pub music_pattern: Option<Regex>,
}

impl ScanOptions {
    /// Builds scan options from configuration. An invalid music folder regex
    /// is logged and disables music folder scanning.
    #[must_use]
    pub fn from_config(config: &FanartConfig, config_dir: Option<&Path>) -> Self {
        let pattern = config.scan.music_folders_regex.trim();
        let music_pattern = if pattern.is_empty() {
            None
        } else {
            match Regex::new(pattern) {
                Ok(re) => Some(re),
                Err(err) => {
                    tracing::warn!(error = %err, pattern, "scan: invalid music folder regex");
                    None
                }
            }
        };

        Self {
            root: config.fanart_root(config_dir),
            min_resolution: config.scan.min_resolution(),
            music_folders: config.music_folders(config_dir),
            music_pattern,
        }
    }

    /// Options scanning `root` only, without music folders or size filter.
    #[must_use]
    pub fn for_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            min_resolution: (0, 0),
            music_folders: Vec::new(),
            music_pattern: None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Step {
    Category(&'static CategoryFolder),
    MusicFolders,
}

impl Step {
    const fn progress(self) -> u8 {
        match self {
            Self::Category(folder) => folder.progress,
            Self::MusicFolders => MUSIC_FOLDER_PROGRESS,
        }
    }

    fn message(self) -> String {
        let label = match self {
            Self::Category(folder) => folder.label,
            Self::MusicFolders => "Music (Folder)",
        };
        format!("Importing local fanart for {label}...")
    }
}

/// Category folders in progress order, with the music folder step in place.
fn steps() -> Vec<Step> {
    let mut steps: Vec<Step> = CATEGORY_FOLDERS.iter().map(Step::Category).collect();
    let at = steps.iter().position(|s| s.progress() > MUSIC_FOLDER_PROGRESS).unwrap_or(steps.len());
    steps.insert(at, Step::MusicFolders);
    steps
}

/// Clears the running flag when a scan ends, even by unwinding.
struct RunningGuard<'a>(&'a AtomicBool);

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) { self.0.store(false, Ordering::SeqCst); }
}

struct WorkerInner {
    store: Arc<dyn ImageIndexStore>,
    options: ScanOptions,
    running: AtomicBool,
    cancel: AtomicBool,
    stopping: CancellationToken,
    listeners: Mutex<Vec<Sender<ScanEvent>>>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

/// Handle to the scan worker. Clones share the same worker.
#[derive(Clone)]
pub struct ScanWorker {
    inner: Arc<WorkerInner>,
}

impl std::fmt::Debug for ScanWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScanWorker")
            .field("root", &self.inner.options.root)
            .field("running", &self.is_running())
            .finish_non_exhaustive()
    }
}

impl ScanWorker {
    #[must_use]
    pub fn new(store: Arc<dyn ImageIndexStore>, options: ScanOptions, stopping: CancellationToken) -> Self {
        Self {
            inner: Arc::new(WorkerInner {
                store,
                options,
                running: AtomicBool::new(false),
                cancel: AtomicBool::new(false),
                stopping,
                listeners: Mutex::new(Vec::new()),
                handle: Mutex::new(None),
            }),
        }
    }

    #[must_use]
    pub fn options(&self) -> &ScanOptions { &self.inner.options }

    /// Returns a channel receiving the events of every following scan.
    #[must_use]
    pub fn subscribe(&self) -> Receiver<ScanEvent> {
        let (tx, rx) = channel();
        self.inner.listeners.lock().push(tx);
        rx
    }

    #[must_use]
    pub fn is_running(&self) -> bool { self.inner.running.load(Ordering::SeqCst) }

    /// Starts a scan on a background thread.
    ///
    /// Returns false without doing anything when a scan is already running.
    pub fn start(&self, target: ScanTarget) -> bool {
        if !self.try_acquire(&target) {
            return false;
        }

        let inner = Arc::clone(&self.inner);
        let spawned = spawn_named_thread("scan", move || {
            let _running = RunningGuard(&inner.running);
            inner.scan(&target);
        });

        match spawned {
            Some(handle) => {
                *self.inner.handle.lock() = Some(handle);
                true
            }
            None => {
                self.inner.running.store(false, Ordering::SeqCst);
                false
            }
        }
    }

    /// Runs a scan on the calling thread.
    ///
    /// Returns `None` when a scan is already running.
    pub fn run(&self, target: &ScanTarget) -> Option<ScanSummary> {
        if !self.try_acquire(target) {
            return None;
        }
        let _running = RunningGuard(&self.inner.running);
        Some(self.inner.scan(target))
    }

    /// Asks the running scan to stop before its next category.
    pub fn cancel(&self) {
        if self.is_running() {
            tracing::info!("scan: cancellation requested");
            self.inner.cancel.store(true, Ordering::SeqCst);
        }
    }

    /// Waits for the background scan started last, if any.
    pub fn join(&self) {
        let handle = self.inner.handle.lock().take();
        if let Some(handle) = handle {
            if handle.join().is_err() {
                tracing::error!("scan: worker thread panicked");
            }
        }
    }

    fn try_acquire(&self, target: &ScanTarget) -> bool {
        if self.inner.running.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst).is_err() {
            tracing::debug!(%target, "scan: already running, request dropped");
            return false;
        }
        self.inner.cancel.store(false, Ordering::SeqCst);
        true
    }
}

impl WorkerInner {
    fn emit(&self, event: &ScanEvent) {
        self.listeners.lock().retain(|tx| tx.send(event.clone()).is_ok());
    }

    fn should_stop(&self) -> bool { self.stopping.is_cancelled() || self.cancel.load(Ordering::SeqCst) }

    fn scan(&self, target: &ScanTarget) -> ScanSummary {
        let mut summary = ScanSummary::default();
        if self.stopping.is_cancelled() {
            summary.cancelled = true;
            return summary;
        }

        tracing::info!(%target, root = %self.options.root.display(), "scan: refreshing local fanart");
        self.emit(&ScanEvent::Started { target: target.clone() });

        let mut imported_categories = HashSet::new();
        for step in steps() {
            if self.should_stop() {
                tracing::info!("scan: stopped before completion");
                summary.cancelled = true;
                break;
            }

            self.emit(&ScanEvent::Progress {
                percent: step.progress(),
                message: step.message(),
            });

            let imported = match step {
                Step::Category(folder)
                    if target.includes(&self.options.root, folder)
                        && imported_categories.insert(folder.category) =>
                {
                    self.import_category(folder.category)
                }
                Step::MusicFolders if target.is_all() => self.import_music_folders(),
                _ => None,
            };
            if let Some(imported) = imported {
                summary.imported.push(imported);
            }
        }

        if !summary.cancelled && !summary.imported.is_empty() {
            if let Err(err) = self.store.persist() {
                tracing::warn!(error = %err, "scan: failed to persist index");
            }
        }

        self.emit(&ScanEvent::Progress {
            percent: 100,
            message: "Done / Idle".to_string(),
        });
        tracing::info!(total = summary.total(), cancelled = summary.cancelled, "scan: done");
        self.emit(&ScanEvent::Finished(summary.clone()));
        summary
    }

    /// Imports every folder feeding `category` in one replacement, so that
    /// folders sharing a category do not overwrite each other.
    fn import_category(&self, category: Category) -> Option<(Category, usize)> {
        let mut entries = Vec::new();
        let mut after_import = AfterImport::Invalidate;
        for folder in category.folders() {
            entries.extend(collect_category(&self.options.root, folder, self.options.min_resolution));
            after_import = folder.after_import;
        }

        let count = match self.store.import_category(category, entries) {
            Ok(count) => count,
            Err(err) => {
                tracing::warn!(error = %err, %category, "scan: import failed");
                return None;
            }
        };

        match after_import {
            AfterImport::Refresh => {
                if let Err(err) = self.store.refresh_category(category, false) {
                    tracing::warn!(error = %err, %category, "scan: refresh failed");
                }
            }
            AfterImport::Invalidate => self.store.remove_category(category),
        }

        Some((category, count))
    }

    fn import_music_folders(&self) -> Option<(Category, usize)> {
        let pattern = self.options.music_pattern.as_ref()?;
        if self.options.music_folders.is_empty() {
            return None;
        }

        let category = Category::MusicFolder;
        let entries = collect_music_folders(&self.options.music_folders, pattern, self.options.min_resolution);
        match self.store.import_category(category, entries) {
            Ok(count) => {
                self.store.remove_category(category);
                Some((category, count))
            }
            Err(err) => {
                tracing::warn!(error = %err, %category, "scan: import failed");
                None
            }
        }
    }
}

/// Mirrors scan start and end into the host `directory.scan` property.
pub fn spawn_property_listener(events: Receiver<ScanEvent>, sink: Arc<dyn PropertySink>) -> Option<JoinHandle<()>> {
    spawn_named_thread("scan-listener", move || {
        for event in events {
            match event {
                ScanEvent::Started { .. } => sink.set_property(properties::DIRECTORY_SCAN, "true"),
                ScanEvent::Finished(_) => sink.set_property(properties::DIRECTORY_SCAN, "false"),
                ScanEvent::Progress { .. } => {}
            }
        }
    })
}
