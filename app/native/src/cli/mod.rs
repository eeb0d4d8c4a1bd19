//! CLI module for Fanart.
//!
//! The `fanart` binary drives the engine from the command line: it scans the
//! fanart folders into the persisted index, inspects that index, simulates
//! now-playing ticks against a console host and manages the animated catalog.

mod commands;
mod console;
mod output;

pub use commands::Cli;
pub use console::ConsoleHost;
