//! Rescans category folders when their files change.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{RecvTimeoutError, channel};
use std::thread::JoinHandle;
use std::time::Duration;

use notify::{RecommendedWatcher, RecursiveMode, Watcher};

use super::folders::ScanTarget;
use super::worker::ScanWorker;
use crate::index::CATEGORY_FOLDERS;
use crate::utils::path::contains_ignore_case;
use crate::utils::{CancellationToken, spawn_named_thread};

/// Quiet period after the last file event before a rescan is requested.
const SCAN_DEBOUNCE_MS: u64 = 200;

/// Returns the category folder that contains `changed`, if any.
fn category_folder_for(root: &Path, changed: &Path) -> Option<PathBuf> {
    CATEGORY_FOLDERS
        .iter()
        .map(|folder| root.join(folder.folder))
        .find(|folder| contains_ignore_case(changed, folder))
}

/// Builds the scan request for a batch of changed folders.
fn target_for(folders: &BTreeSet<PathBuf>) -> Option<ScanTarget> {
    match folders.len() {
        0 => None,
        1 => folders.iter().next().cloned().map(ScanTarget::Folder),
        _ => Some(ScanTarget::All),
    }
}

/// Watches the fanart root and feeds debounced folder rescans to a worker.
#[derive(Debug)]
pub struct FolderWatcher {
    own: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl FolderWatcher {
    /// Starts watching `worker`'s fanart root.
    ///
    /// Returns `None` if the root does not exist or the watcher could not be created.
    pub fn start(worker: ScanWorker, stopping: CancellationToken) -> Option<Self> {
        let root = worker.options().root.clone();
        if !root.is_dir() {
            tracing::warn!(root = %root.display(), "watcher: fanart root missing, not watching");
            return None;
        }

        let (tx, rx) = channel();
        let mut watcher: RecommendedWatcher = match notify::recommended_watcher(tx) {
            Ok(watcher) => watcher,
            Err(err) => {
                tracing::warn!(error = %err, "watcher: failed to create file watcher");
                return None;
            }
        };
        if let Err(err) = watcher.watch(&root, RecursiveMode::Recursive) {
            tracing::warn!(error = %err, root = %root.display(), "watcher: failed to watch fanart root");
            return None;
        }

        let own = CancellationToken::new();
        let thread_own = own.clone();
        let debounce = Duration::from_millis(SCAN_DEBOUNCE_MS);

        let handle = spawn_named_thread("folder-watcher", move || {
            // Dropping the watcher ends the event stream.
            let _watcher = watcher;
            let mut pending = BTreeSet::new();

            while !stopping.is_cancelled() && !thread_own.is_cancelled() {
                match rx.recv_timeout(debounce) {
                    Ok(Ok(event)) => {
                        pending.extend(event.paths.iter().filter_map(|p| category_folder_for(&root, p)));
                    }
                    Ok(Err(err)) => tracing::warn!(error = %err, "watcher: watch error"),
                    Err(RecvTimeoutError::Timeout) => {
                        let Some(target) = target_for(&pending) else { continue };
                        pending.clear();
                        if worker.start(target.clone()) {
                            tracing::info!(%target, "watcher: rescan requested");
                        } else {
                            tracing::debug!(%target, "watcher: scan busy, change dropped");
                        }
                    }
                    Err(RecvTimeoutError::Disconnected) => break,
                }
            }
        })?;

        Some(Self { own, handle: Some(handle) })
    }

    pub fn stop(&mut self) {
        self.own.cancel();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::warn!("watcher: thread panicked");
            }
        }
    }
}

impl Drop for FolderWatcher {
    fn drop(&mut self) { self.stop(); }
}
