//! Fanart categories and the folders they are scanned from.

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A category of indexed images.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    Weather,
    Holiday,
    Pictures,
    MovieManual,
    MovieScraped,
    MusicAlbumThumb,
    MusicArtistThumb,
    MusicFanartManual,
    MusicFanartAlbum,
    MusicFanartScraped,
    /// Fanart found next to audio files in the music library.
    MusicFolder,
    Games,
    Sports,
    Tv,
    Plugins,
    ShowTimes,
    DefaultBackdrop,
}

/// What the scan worker does with a category once its files are imported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AfterImport {
    /// Rebuild the cached lookups eagerly.
    Refresh,
    /// Drop the cached lookups; they are rebuilt on demand.
    Invalidate,
}

/// Static description of a scanned category folder.
#[derive(Debug, Clone, Copy)]
pub struct CategoryFolder {
    pub category: Category,
    /// Folder relative to the fanart root, `/` separated.
    pub folder: &'static str,
    /// File mask, `*` followed by a literal suffix.
    pub mask: &'static str,
    pub after_import: AfterImport,
    /// Progress percentage reported when the step starts.
    pub progress: u8,
    pub label: &'static str,
}

/// Scan steps in the order they run.
pub const CATEGORY_FOLDERS: &[CategoryFolder] = &[
    CategoryFolder {
        category: Category::Weather,
        folder: "UserDef/weather",
        mask: "*.jpg",
        after_import: AfterImport::Refresh,
        progress: 0,
        label: "Weather",
    },
    CategoryFolder {
        category: Category::Holiday,
        folder: "UserDef/holidays",
        mask: "*.jpg",
        after_import: AfterImport::Refresh,
        progress: 2,
        label: "Holidays",
    },
    CategoryFolder {
        category: Category::Pictures,
        folder: "UserDef/pictures",
        mask: "*.jpg",
        after_import: AfterImport::Refresh,
        progress: 4,
        label: "Pictures",
    },
    CategoryFolder {
        category: Category::MovieManual,
        folder: "UserDef/movies",
        mask: "*.jpg",
        after_import: AfterImport::Refresh,
        progress: 10,
        label: "Movies (User)",
    },
    CategoryFolder {
        category: Category::MovieScraped,
        folder: "Scraper/movies",
        mask: "*.jpg",
        after_import: AfterImport::Refresh,
        progress: 16,
        label: "Movies (Scraper)",
    },
    CategoryFolder {
        category: Category::MusicAlbumThumb,
        folder: "Music/Albums",
        mask: "*L.jpg",
        after_import: AfterImport::Invalidate,
        progress: 22,
        label: "Music (Albums)",
    },
    CategoryFolder {
        category: Category::MusicArtistThumb,
        folder: "Music/Artists",
        mask: "*L.jpg",
        after_import: AfterImport::Invalidate,
        progress: 28,
        label: "Music (Artists)",
    },
    CategoryFolder {
        category: Category::MusicFanartManual,
        folder: "UserDef/music",
        mask: "*.jpg",
        after_import: AfterImport::Refresh,
        progress: 34,
        label: "Music (User)",
    },
    CategoryFolder {
        category: Category::MusicFanartAlbum,
        folder: "UserDef/albums",
        mask: "*.jpg",
        after_import: AfterImport::Invalidate,
        progress: 40,
        label: "Music (User Album)",
    },
    CategoryFolder {
        category: Category::MusicFanartManual,
        folder: "UserDef/genres",
        mask: "*.jpg",
        after_import: AfterImport::Refresh,
        progress: 46,
        label: "Music (User Genre)",
    },
    CategoryFolder {
        category: Category::MusicFanartScraped,
        folder: "Scraper/music",
        mask: "*.jpg",
        after_import: AfterImport::Refresh,
        progress: 52,
        label: "Music (Scraper)",
    },
    CategoryFolder {
        category: Category::Games,
        folder: "UserDef/games",
        mask: "*.jpg",
        after_import: AfterImport::Refresh,
        progress: 64,
        label: "Games",
    },
    CategoryFolder {
        category: Category::Sports,
        folder: "UserDef/scorecenter",
        mask: "*.jpg",
        after_import: AfterImport::Refresh,
        progress: 70,
        label: "Scorecenter",
    },
    CategoryFolder {
        category: Category::Tv,
        folder: "UserDef/tv",
        mask: "*.jpg",
        after_import: AfterImport::Refresh,
        progress: 76,
        label: "TV",
    },
    CategoryFolder {
        category: Category::Plugins,
        folder: "UserDef/plugins",
        mask: "*.jpg",
        after_import: AfterImport::Refresh,
        progress: 82,
        label: "Plugins",
    },
    CategoryFolder {
        category: Category::ShowTimes,
        folder: "UserDef/showtimes",
        mask: "*.jpg",
        after_import: AfterImport::Refresh,
        progress: 94,
        label: "ShowTimes",
    },
    CategoryFolder {
        category: Category::DefaultBackdrop,
        folder: "UserDef/default",
        mask: "*.jpg",
        after_import: AfterImport::Refresh,
        progress: 98,
        label: "Default backdrops",
    },
];

/// Progress reported before the music library folders are scanned.
pub const MUSIC_FOLDER_PROGRESS: u8 = 58;

impl Category {
    /// Every category, in declaration order.
    pub const ALL: &'static [Self] = &[
        Self::Weather,
        Self::Holiday,
        Self::Pictures,
        Self::MovieManual,
        Self::MovieScraped,
        Self::MusicAlbumThumb,
        Self::MusicArtistThumb,
        Self::MusicFanartManual,
        Self::MusicFanartAlbum,
        Self::MusicFanartScraped,
        Self::MusicFolder,
        Self::Games,
        Self::Sports,
        Self::Tv,
        Self::Plugins,
        Self::ShowTimes,
        Self::DefaultBackdrop,
    ];

    /// Categories searched for now-playing music fanart, most specific first.
    pub const MUSIC_FANART: &'static [Self] = &[
        Self::MusicFanartAlbum,
        Self::MusicFanartManual,
        Self::MusicFanartScraped,
        Self::MusicFolder,
    ];

    /// Returns whether file names in this category encode `Artist - Album`.
    #[must_use]
    pub const fn has_album_key(self) -> bool {
        matches!(self, Self::MusicAlbumThumb | Self::MusicFanartAlbum | Self::MusicFolder)
    }

    /// Returns whether lookups in this category use music mode (album-aware).
    #[must_use]
    pub const fn is_music(self) -> bool {
        matches!(
            self,
            Self::MusicAlbumThumb
                | Self::MusicArtistThumb
                | Self::MusicFanartManual
                | Self::MusicFanartAlbum
                | Self::MusicFanartScraped
                | Self::MusicFolder
        )
    }

    /// Returns whether file names carry the large-thumbnail `L` suffix.
    #[must_use]
    pub const fn is_thumb(self) -> bool {
        matches!(self, Self::MusicAlbumThumb | Self::MusicArtistThumb)
    }

    /// Returns the first scan folder of the category, if it has one.
    #[must_use]
    pub fn folder(self) -> Option<&'static CategoryFolder> { self.folders().next() }

    /// Returns every scan folder feeding the category, in scan order.
    pub fn folders(self) -> impl Iterator<Item = &'static CategoryFolder> {
        CATEGORY_FOLDERS.iter().filter(move |f| f.category == self)
    }

    /// Returns the camelCase name used in configuration and the index file.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Weather => "weather",
            Self::Holiday => "holiday",
            Self::Pictures => "pictures",
            Self::MovieManual => "movieManual",
            Self::MovieScraped => "movieScraped",
            Self::MusicAlbumThumb => "musicAlbumThumb",
            Self::MusicArtistThumb => "musicArtistThumb",
            Self::MusicFanartManual => "musicFanartManual",
            Self::MusicFanartAlbum => "musicFanartAlbum",
            Self::MusicFanartScraped => "musicFanartScraped",
            Self::MusicFolder => "musicFolder",
            Self::Games => "games",
            Self::Sports => "sports",
            Self::Tv => "tv",
            Self::Plugins => "plugins",
            Self::ShowTimes => "showTimes",
            Self::DefaultBackdrop => "defaultBackdrop",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().replace(['-', '_'], "").to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str().to_lowercase() == wanted)
            .ok_or_else(|| format!("Unknown category: {s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_user_music_has_two_folders() {
        for folder in CATEGORY_FOLDERS {
            let expected = if folder.category == Category::MusicFanartManual { 2 } else { 1 };
            assert_eq!(folder.category.folders().count(), expected, "folders of {}", folder.category);
            assert!(folder.mask.starts_with('*'));
        }

        let manual: Vec<&str> = Category::MusicFanartManual.folders().map(|f| f.folder).collect();
        assert_eq!(manual, vec!["UserDef/music", "UserDef/genres"]);
    }

    #[test]
    fn test_progress_is_monotonic() {
        let mut last = 0;
        for folder in CATEGORY_FOLDERS {
            assert!(folder.progress >= last, "{} goes backwards", folder.label);
            last = folder.progress;
        }
        assert!(last < 100);
    }

    #[test]
    fn test_music_folder_has_no_fixed_folder() {
        assert!(Category::MusicFolder.folder().is_none());
        assert_eq!(Category::MusicArtistThumb.folder().map(|f| f.mask), Some("*L.jpg"));
    }

    #[test]
    fn test_from_str_accepts_display_and_kebab_case() {
        for category in Category::ALL {
            assert_eq!(category.to_string().parse::<Category>().unwrap(), *category);
        }
        assert_eq!("music-fanart-scraped".parse::<Category>().unwrap(), Category::MusicFanartScraped);
        assert!("nope".parse::<Category>().is_err());
    }

    #[test]
    fn test_serde_name_matches_as_str() {
        for category in Category::ALL {
            let json = serde_json::to_string(category).unwrap();
            assert_eq!(json, format!("\"{}\"", category.as_str()));
        }
    }

    #[test]
    fn test_category_flags() {
        assert!(Category::MusicFanartAlbum.has_album_key());
        assert!(!Category::MusicFanartScraped.has_album_key());
        assert!(Category::MusicArtistThumb.is_thumb());
        assert!(!Category::MovieScraped.is_music());
        assert!(Category::MUSIC_FANART.iter().all(|c| c.is_music()));
    }
}
