//! CLI command definitions using Clap.
//!
//! This module defines all CLI commands and their arguments, organized into
//! domain-specific submodules:
//!
//! - `cache` - Cache management commands
//! - `catalog` - Animated catalog commands
//! - `config_cmd` - Configuration file commands
//! - `index` - Image index inspection commands
//! - `play` - Now-playing simulation
//! - `scan` - Directory scan

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{Generator, Shell, generate};

use crate::error::FanartError;
use crate::index::FanartIndex;
use crate::{cache, config, schema};

pub mod cache_cmd;
pub mod catalog;
pub mod config_cmd;
pub mod index;
pub mod play;
pub mod scan;

pub use cache_cmd::CacheCommands;
pub use catalog::CatalogCommands;
pub use config_cmd::ConfigCommands;
pub use index::IndexCommands;

/// Application version from Cargo.toml.
const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Fanart CLI - now-playing fanart resolution and indexing.
#[derive(Parser, Debug)]
#[command(name = "fanart")]
#[command(author, version = APP_VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to a custom configuration file.
    ///
    /// Overrides the default configuration file search paths.
    /// Supports JSONC format (JSON with comments).
    #[arg(long, short, global = true, value_name = "PATH")]
    pub config: Option<String>,

    /// Enable debug logging (overrides `FANART_LOG`).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
#[command(next_display_order = None)]
pub enum Commands {
    /// Scan the fanart folders into the image index.
    ///
    /// Scans every category folder under the fanart root, or only the
    /// categories whose folder lies inside --folder, and persists the index.
    #[command(after_long_help = r#"Examples:
  fanart scan                                   # Scan everything
  fanart scan --folder ~/fanart/Scraper/music   # Scan one category folder
  fanart scan --watch                           # Scan, then rescan on file changes"#)]
    Scan {
        /// Only scan categories whose folder is inside this path.
        #[arg(long, short, value_name = "PATH")]
        folder: Option<PathBuf>,

        /// Keep running and rescan folders when their files change.
        #[arg(long, short)]
        watch: bool,
    },

    /// Image index inspection commands.
    #[command(subcommand)]
    Index(IndexCommands),

    /// Simulate now-playing ticks against a console host.
    ///
    /// Prints every property write and control visibility change the engine
    /// makes while the given track plays.
    #[command(after_long_help = r#"Examples:
  fanart play --artist Queen                          # One tick
  fanart play --artist "Queen|David Bowie" --ticks 5  # Five ticks
  fanart play --artist Queen --album "A Night at the Opera" --genre Rock"#)]
    Play {
        /// Artist tag of the track. Several artists are separated by `|`.
        #[arg(long, short)]
        artist: String,

        /// Album tag of the track.
        #[arg(long, short = 'b')]
        album: Option<String>,

        /// Genre tag of the track.
        #[arg(long, short)]
        genre: Option<String>,

        /// Number of ticks to run.
        #[arg(long, short, default_value_t = 1)]
        ticks: u32,

        /// Wait the configured refresh interval between ticks.
        #[arg(long)]
        realtime: bool,
    },

    /// Animated artwork catalog commands.
    #[command(subcommand)]
    Catalog(CatalogCommands),

    /// Cache management commands.
    ///
    /// Manage the application's cache directory.
    #[command(subcommand)]
    Cache(CacheCommands),

    /// Configuration file management commands.
    ///
    /// Initialize, view, and manage the configuration file.
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Output Fanart configuration JSON Schema.
    ///
    /// Outputs a JSON Schema to stdout that describes the structure of the
    /// configuration file. Can be redirected to a file for use with editors
    /// that support JSON Schema validation.
    Schema,

    /// Generate shell completions.
    ///
    /// Outputs shell completion script to stdout for the specified shell.
    ///
    /// Usage:
    ///   eval "$(fanart completions --shell zsh)"
    ///   fanart completions --shell fish > ~/.config/fish/completions/fanart.fish
    Completions {
        /// The shell to generate completions for.
        #[arg(long, short, value_enum)]
        shell: Shell,
    },
}

/// Opens the persisted image index.
fn open_index() -> Result<Arc<FanartIndex>, FanartError> {
    let path = cache::index_path();
    let index = FanartIndex::open(&path)?;
    tracing::debug!(path = %path.display(), images = index.len(), "index: opened");
    Ok(Arc::new(index))
}

impl Cli {
    /// Returns the custom config path if specified via --config flag.
    #[must_use]
    pub fn config_path(&self) -> Option<PathBuf> { self.config.as_ref().map(PathBuf::from) }

    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command execution fails.
    pub fn execute(&self) -> Result<(), FanartError> {
        if let Some(path_buf) = self.config_path() {
            if !path_buf.exists() {
                return Err(FanartError::ConfigError(format!(
                    "Configuration file not found: {}",
                    path_buf.display()
                )));
            }
            config::set_custom_config_path(path_buf);
        }

        match &self.command {
            Commands::Scan { folder, watch } => scan::execute(folder.as_deref(), *watch),
            Commands::Index(cmd) => index::execute(cmd),
            Commands::Play { artist, album, genre, ticks, realtime } => play::execute(&play::PlayRequest {
                artist: artist.clone(),
                album: album.clone(),
                genre: genre.clone(),
                ticks: *ticks,
                realtime: *realtime,
            }),
            Commands::Catalog(cmd) => catalog::execute(cmd),
            Commands::Cache(cmd) => cache_cmd::execute(cmd),
            Commands::Config(cmd) => config_cmd::execute(cmd),

            Commands::Schema => {
                println!("{}", schema::generate_schema_json());
                Ok(())
            }

            Commands::Completions { shell } => {
                Self::print_completions(*shell);
                Ok(())
            }
        }
    }

    /// Print shell completions to stdout.
    fn print_completions<G: Generator>(generator: G) {
        let mut cmd = Self::command();
        generate(generator, &mut cmd, "fanart", &mut io::stdout());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() { Cli::command().debug_assert(); }

    #[test]
    fn test_cli_parses_scan_folder() {
        let cli = Cli::try_parse_from(["fanart", "scan", "--folder", "/tmp/fanart/UserDef/music"]).unwrap();
        match cli.command {
            Commands::Scan { folder, watch } => {
                assert_eq!(folder, Some(PathBuf::from("/tmp/fanart/UserDef/music")));
                assert!(!watch);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_parses_play() {
        let cli = Cli::try_parse_from([
            "fanart", "play", "--artist", "Queen", "--album", "Innuendo", "--ticks", "3",
        ])
        .unwrap();
        match cli.command {
            Commands::Play { artist, album, genre, ticks, realtime } => {
                assert_eq!(artist, "Queen");
                assert_eq!(album.as_deref(), Some("Innuendo"));
                assert!(genre.is_none());
                assert_eq!(ticks, 3);
                assert!(!realtime);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_play_requires_artist() {
        assert!(Cli::try_parse_from(["fanart", "play"]).is_err());
    }

    #[test]
    fn test_cli_global_flags() {
        let cli = Cli::try_parse_from(["fanart", "schema", "--verbose", "--config", "/tmp/c.jsonc"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.config_path(), Some(PathBuf::from("/tmp/c.jsonc")));
        assert!(matches!(cli.command, Commands::Schema));
    }

    #[test]
    fn test_cli_parses_index_lookup() {
        let cli = Cli::try_parse_from([
            "fanart", "index", "lookup", "music-fanart-scraped", "Queen", "--album", "Innuendo",
        ])
        .unwrap();
        assert!(matches!(cli.command, Commands::Index(IndexCommands::Lookup { .. })));
    }

    #[test]
    fn test_cli_parses_catalog_lookup() {
        let cli = Cli::try_parse_from(["fanart", "catalog", "lookup", "--imdb", "tt0133093", "--kind", "background"])
            .unwrap();
        assert!(matches!(cli.command, Commands::Catalog(CatalogCommands::Lookup { .. })));
    }

    #[test]
    fn test_cli_parses_cache_and_config() {
        let cli = Cli::try_parse_from(["fanart", "cache", "clear"]).unwrap();
        assert!(matches!(cli.command, Commands::Cache(CacheCommands::Clear)));

        let cli = Cli::try_parse_from(["fanart", "config", "show"]).unwrap();
        assert!(matches!(cli.command, Commands::Config(ConfigCommands::Show)));
    }

    #[test]
    fn test_missing_custom_config_is_an_error() {
        let cli = Cli::try_parse_from(["fanart", "schema", "--config", "/nonexistent/fanart.jsonc"]).unwrap();
        assert!(matches!(cli.execute(), Err(FanartError::ConfigError(_))));
    }
}
