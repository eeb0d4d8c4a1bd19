//! Scan CLI command.

use std::path::Path;
use std::sync::Arc;

use colored::Colorize;

use super::open_index;
use crate::config;
use crate::error::FanartError;
use crate::index::ImageIndexStore;
use crate::scan::{FolderWatcher, ScanEvent, ScanOptions, ScanSummary, ScanTarget, ScanWorker};
use crate::utils::CancellationToken;
use crate::utils::path::expand_and_resolve;

/// Execute the scan command.
///
/// # Errors
///
/// Returns an error if the index cannot be opened or the scan cannot start.
pub fn execute(folder: Option<&Path>, watch: bool) -> Result<(), FanartError> {
    let config = config::get_config();
    let options = ScanOptions::from_config(config, config::get_config_dir());

    if !options.root.is_dir() {
        return Err(FanartError::ScanError(format!(
            "Fanart root does not exist: {}",
            options.root.display()
        )));
    }

    let target = match folder {
        Some(path) => {
            let cwd = std::env::current_dir()?;
            ScanTarget::Folder(expand_and_resolve(&path.to_string_lossy(), &cwd))
        }
        None => ScanTarget::All,
    };

    let store: Arc<dyn ImageIndexStore> = open_index()?;
    let stopping = CancellationToken::new();
    let worker = ScanWorker::new(store, options, stopping.clone());

    let summary = run_with_progress(&worker, target)?;
    print_summary(&summary);

    if watch || config.scan.watch {
        let Some(_watcher) = FolderWatcher::start(worker.clone(), stopping) else {
            return Err(FanartError::ScanError("Failed to watch the fanart root".to_string()));
        };
        println!("{}", "Watching for changes. Press Ctrl-C to stop.".dimmed());
        let events = worker.subscribe();
        for event in events {
            print_event(&event);
        }
    }

    Ok(())
}

/// Runs one scan in the background and prints its events until it finishes.
fn run_with_progress(worker: &ScanWorker, target: ScanTarget) -> Result<ScanSummary, FanartError> {
    let events = worker.subscribe();
    if !worker.start(target) {
        return Err(FanartError::ScanError("A scan is already running".to_string()));
    }

    let mut summary = ScanSummary::default();
    for event in &events {
        print_event(&event);
        if let ScanEvent::Finished(finished) = event {
            summary = finished;
            break;
        }
    }
    worker.join();
    Ok(summary)
}

fn print_event(event: &ScanEvent) {
    match event {
        ScanEvent::Started { target } => println!("{} {target}", "Scanning".bold()),
        ScanEvent::Progress { percent, message } => println!("  {:>3}% {message}", percent.to_string().yellow()),
        ScanEvent::Finished(summary) if summary.cancelled => println!("{}", "Scan cancelled.".red()),
        ScanEvent::Finished(summary) => println!("{} {} images", "Scan finished:".green(), summary.total()),
    }
}

fn print_summary(summary: &ScanSummary) {
    for (category, count) in &summary.imported {
        println!("  {category:<20} {count}");
    }
}
