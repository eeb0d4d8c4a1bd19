//! Index CLI commands.
//!
//! Inspect the persisted image index without running a scan.

use clap::Subcommand;
use colored::Colorize;
use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Modify, Style};
use tabled::{Table, Tabled};

use super::open_index;
use crate::cli::output;
use crate::error::FanartError;
use crate::index::{Category, ImageIndexStore};

/// Index subcommands.
#[derive(Subcommand, Debug)]
#[command(next_display_order = None)]
pub enum IndexCommands {
    /// List categories with their image counts.
    #[command(after_long_help = r#"Examples:
  fanart index list          # Table of categories
  fanart index list --json   # JSON output"#)]
    List {
        /// Output as JSON.
        #[arg(long, short)]
        json: bool,
    },

    /// Look up the images indexed for a key.
    ///
    /// Music categories return album images first, then artist-wide images.
    #[command(after_long_help = r#"Examples:
  fanart index lookup musicFanartScraped Queen
  fanart index lookup music-fanart-album Queen --album Innuendo
  fanart index lookup movie-scraped tt0133093"#)]
    Lookup {
        /// Category name, e.g. `musicFanartScraped` or `music-fanart-scraped`.
        category: Category,

        /// Artist name, movie id or other key.
        key: String,

        /// Album name for album-scoped categories.
        #[arg(long, short)]
        album: Option<String>,

        /// Output as JSON.
        #[arg(long, short)]
        json: bool,
    },
}

/// Execute index subcommands.
///
/// # Errors
///
/// Returns an error if the index cannot be opened or read.
pub fn execute(cmd: &IndexCommands) -> Result<(), FanartError> {
    match cmd {
        IndexCommands::List { json } => execute_list(*json),
        IndexCommands::Lookup { category, key, album, json } => {
            execute_lookup(*category, key, album.as_deref(), *json)
        }
    }
}

fn execute_list(json: bool) -> Result<(), FanartError> {
    #[derive(Tabled)]
    struct CategoryRow {
        #[tabled(rename = "Category")]
        category: String,
        #[tabled(rename = "Folder")]
        folder: String,
        #[tabled(rename = "Images")]
        images: usize,
    }

    let index = open_index()?;
    let counts: Vec<(Category, usize)> =
        Category::ALL.iter().map(|&category| (category, index.entries(category).len())).collect();

    if json {
        let value: serde_json::Map<String, serde_json::Value> =
            counts.iter().map(|(category, count)| (category.to_string(), serde_json::json!(count))).collect();
        output::print_highlighted_json(&serde_json::Value::Object(value));
        return Ok(());
    }

    if index.is_empty() {
        println!("{}", "The index is empty. Run 'fanart scan' first.".dimmed());
        return Ok(());
    }

    let rows: Vec<CategoryRow> = counts
        .iter()
        .map(|(category, count)| CategoryRow {
            category: category.to_string(),
            folder: folder_column(*category),
            images: *count,
        })
        .collect();

    let table = Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::last()).with(Alignment::right()))
        .to_string();

    println!("{}", format!("Images ({})", index.len()).bold());
    println!("{table}");
    Ok(())
}

fn folder_column(category: Category) -> String {
    let folders: Vec<&str> = category.folders().map(|f| f.folder).collect();
    if folders.is_empty() {
        "-".to_string()
    } else {
        folders.join(", ")
    }
}

fn execute_lookup(category: Category, key: &str, album: Option<&str>, json: bool) -> Result<(), FanartError> {
    let index = open_index()?;
    let images = index.lookup(category, key, album, category.is_music())?;

    if json {
        let paths: Vec<String> = images.iter().map(|p| p.display().to_string()).collect();
        output::print_highlighted_json(&serde_json::json!(paths));
        return Ok(());
    }

    if images.is_empty() {
        println!("{}", format!("No images for '{key}' in {category}.").dimmed());
        return Ok(());
    }

    for path in &images {
        println!("{}", output::truncate(&path.display().to_string(), 160));
    }
    Ok(())
}
