//! Animated catalog CLI commands.

use clap::Subcommand;
use colored::Colorize;

use crate::catalog::{ArtworkKind, CatalogClient, CatalogState};
use crate::config;
use crate::error::FanartError;

/// Catalog subcommands.
#[derive(Subcommand, Debug)]
#[command(next_display_order = None)]
pub enum CatalogCommands {
    /// Download the catalog again, ignoring the refresh period.
    Refresh,

    /// Resolve the animated artwork URL of a movie.
    #[command(after_long_help = r#"Examples:
  fanart catalog lookup --imdb tt0133093
  fanart catalog lookup --imdb tt0133093 --kind background --lang FR"#)]
    Lookup {
        /// IMDb id of the movie.
        #[arg(long)]
        imdb: String,

        /// Artwork kind: poster or background.
        #[arg(long, short, default_value = "poster")]
        kind: ArtworkKind,

        /// Preferred language. Defaults to the configured language.
        #[arg(long, short)]
        lang: Option<String>,
    },
}

/// Execute catalog subcommands.
///
/// # Errors
///
/// Returns an error if the catalog cannot be downloaded or loaded.
pub fn execute(cmd: &CatalogCommands) -> Result<(), FanartError> {
    let config = config::get_config();
    let mut client = CatalogClient::from_config(&config.catalog);

    match cmd {
        CatalogCommands::Refresh => {
            client.fetch()?;
            client.load();
            let movies = client.catalog().map_or(0, |c| c.movies.len());
            println!("Catalog downloaded to {} ({movies} movies).", client.catalog_path().display());
            Ok(())
        }
        CatalogCommands::Lookup { imdb, kind, lang } => {
            client.load();
            if client.state() == CatalogState::LoadFailed {
                return Err(FanartError::CommandError("The animated catalog could not be loaded".to_string()));
            }

            let language = lang.clone().unwrap_or_else(|| client.language().to_string());
            match client.resolve(imdb, *kind, &language) {
                Some(url) => println!("{url}"),
                None => println!("{}", format!("No animated {kind} for {imdb}.").dimmed()),
            }
            Ok(())
        }
    }
}
