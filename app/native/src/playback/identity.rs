//! Identity of what is currently playing.

use crate::host::NowPlaying;

/// The keys that decide which candidate images apply.
///
/// Two identities are the same when their primary and secondary keys match
/// after trimming, ignoring case. The genre never takes part in the comparison.
#[derive(Debug, Clone, Default)]
pub struct PlaybackIdentity {
    pub primary: String,
    pub secondary: Option<String>,
    pub genre: Option<String>,
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|v| !v.is_empty()).map(ToString::to_string)
}

impl PlaybackIdentity {
    /// Identity of a music track.
    #[must_use]
    pub fn music(artist: &str, album: Option<&str>, genre: Option<&str>) -> Self {
        Self {
            primary: artist.trim().to_string(),
            secondary: non_empty(album),
            genre: non_empty(genre),
        }
    }

    /// Identity keyed on a single media item (a movie title, for instance).
    #[must_use]
    pub fn item(key: &str) -> Self {
        Self {
            primary: key.trim().to_string(),
            ..Self::default()
        }
    }

    /// Builds the identity of the host's current track.
    #[must_use]
    pub fn from_now_playing(now: &NowPlaying) -> Self {
        Self::music(&now.artist, now.album.as_deref(), now.genre.as_deref())
    }

    /// Returns whether there is nothing to look up.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.primary.trim().is_empty() }

    /// Compares two identities the way the rotation engine does.
    #[must_use]
    pub fn same_as(&self, other: &Self) -> bool {
        eq_ignore_case(&self.primary, &other.primary)
            && eq_ignore_case(
                self.secondary.as_deref().unwrap_or_default(),
                other.secondary.as_deref().unwrap_or_default(),
            )
    }
}

impl PartialEq for PlaybackIdentity {
    fn eq(&self, other: &Self) -> bool { self.same_as(other) }
}

impl Eq for PlaybackIdentity {}

fn eq_ignore_case(a: &str, b: &str) -> bool { a.trim().to_lowercase() == b.trim().to_lowercase() }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_ignores_case_and_whitespace() {
        let a = PlaybackIdentity::music("Queen", Some("A Night at the Opera"), Some("Rock"));
        let b = PlaybackIdentity::music(" queen ", Some("a night at the OPERA"), None);
        assert_eq!(a, b);
    }

    #[test]
    fn test_identity_album_matters() {
        let a = PlaybackIdentity::music("Queen", Some("Innuendo"), None);
        let b = PlaybackIdentity::music("Queen", Some("Jazz"), None);
        assert_ne!(a, b);
    }

    #[test]
    fn test_empty_album_equals_missing_album() {
        let a = PlaybackIdentity::music("Queen", Some("  "), None);
        assert_eq!(a.secondary, None);
        assert_eq!(a, PlaybackIdentity::item("Queen"));
    }

    #[test]
    fn test_from_now_playing() {
        let now = NowPlaying {
            artist: "Queen".to_string(),
            album: Some("Jazz".to_string()),
            genre: Some("Rock".to_string()),
            playing: true,
            paused: false,
        };
        let identity = PlaybackIdentity::from_now_playing(&now);
        assert_eq!(identity.primary, "Queen");
        assert_eq!(identity.genre.as_deref(), Some("Rock"));
        assert!(!identity.is_empty());
        assert!(PlaybackIdentity::default().is_empty());
    }
}
