//! Cache CLI commands.

use clap::Subcommand;

use crate::cache;
use crate::error::FanartError;

/// Cache subcommands for managing the application's cache.
#[derive(Subcommand, Debug)]
#[command(next_display_order = None)]
pub enum CacheCommands {
    /// Clear the application's cache directory.
    ///
    /// Removes the image index and the animated catalog. The next scan
    /// rebuilds the index.
    #[command(after_long_help = r#"Examples:
  fanart cache clear   # Clear all cached data"#)]
    Clear,

    /// Show the cache directory location.
    #[command(after_long_help = r#"Examples:
  fanart cache path    # Print the cache directory path"#)]
    Path,
}

/// Execute cache subcommands.
///
/// # Errors
///
/// Returns an error if the cache directory cannot be removed.
pub fn execute(cmd: &CacheCommands) -> Result<(), FanartError> {
    match cmd {
        CacheCommands::Clear => {
            if !cache::get_cache_dir().exists() {
                println!("Cache directory does not exist. Nothing to clear.");
                return Ok(());
            }

            let bytes_freed = cache::clear_cache()
                .map_err(|err| FanartError::CacheError(format!("Failed to clear cache: {err}")))?;
            println!("Cache cleared successfully. Freed {}.", cache::format_bytes(bytes_freed));
        }
        CacheCommands::Path => println!("{}", cache::get_cache_dir().display()),
    }
    Ok(())
}
