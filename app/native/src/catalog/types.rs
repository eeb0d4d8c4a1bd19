//! Catalog document types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

/// Accepts either a JSON string or a number for identifier-like fields.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where D: Deserializer<'de> {
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    })
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnimatedCatalog {
    pub version: u32,
    pub last_updated: String,
    pub previous_updated: String,
    #[serde(rename = "baseURL")]
    pub base_url: String,
    pub movies: Vec<CatalogMovie>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogMovie {
    #[serde(deserialize_with = "lenient_string")]
    pub imdbid: String,
    #[serde(deserialize_with = "lenient_string")]
    pub tmdbid: String,
    pub title: String,
    #[serde(deserialize_with = "lenient_string")]
    pub year: String,
    pub entries: Vec<CatalogEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CatalogEntry {
    pub id: i64,
    pub source: String,
    pub image: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub date_added: String,
    pub contributed_by: String,
    pub language: String,
    pub size: u64,
}

/// Records when the catalog was last downloaded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogMarker {
    /// Seconds since the Unix epoch.
    pub last_download: u64,
}

/// Artwork kinds that can be resolved from the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtworkKind {
    Poster,
    Background,
}

impl ArtworkKind {
    /// Entry `type` value in the catalog.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Poster => "poster",
            Self::Background => "background",
        }
    }
}

impl fmt::Display for ArtworkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for ArtworkKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "poster" => Ok(Self::Poster),
            "background" | "fanart" => Ok(Self::Background),
            other => Err(format!("Unsupported artwork kind: {other}")),
        }
    }
}
