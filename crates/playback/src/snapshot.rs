//! Normalization of the currently-playing response body.

use serde::Deserialize;

/// The provider's `currently_playing_type` value for advertisement content.
const AD_CONTENT_TYPE: &str = "ad";

/// Normalized result of one successful now-playing query.
///
/// Produced fresh per poll, never persisted. When `is_ad` is true the
/// track fields are guaranteed empty; see [`CurrentlyPlayingBody`].
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackSnapshot {
    pub is_ad: bool,
    pub title: Option<String>,
    pub artists: Vec<String>,
    pub duration_ms: u64,
    pub progress_ms: u64,
    pub track_id: Option<String>,
}

impl PlaybackSnapshot {
    /// One-line description for status output and track-change logging.
    pub fn describe(&self) -> String {
        match (&self.title, self.artists.is_empty()) {
            (Some(title), false) => format!("{title} by {}", self.artists.join(", ")),
            (Some(title), true) => title.clone(),
            (None, _) => "(unknown)".to_string(),
        }
    }
}

/// Wire shape of the 200 response. Every field is optional; the service
/// omits the track item entirely for advertisements.
#[derive(Debug, Deserialize)]
pub(crate) struct CurrentlyPlayingBody {
    #[serde(default)]
    currently_playing_type: Option<String>,
    #[serde(default)]
    item: Option<TrackItem>,
    #[serde(default)]
    progress_ms: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct TrackItem {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    duration_ms: Option<u64>,
    #[serde(default)]
    artists: Vec<ArtistRef>,
}

#[derive(Debug, Deserialize)]
struct ArtistRef {
    name: String,
}

impl From<CurrentlyPlayingBody> for PlaybackSnapshot {
    fn from(body: CurrentlyPlayingBody) -> Self {
        let is_ad = body.currently_playing_type.as_deref() == Some(AD_CONTENT_TYPE);
        // An ad frame that still carries a track item is not trusted; ad
        // snapshots never expose track metadata.
        let item = if is_ad { None } else { body.item };
        let progress_ms = body.progress_ms.unwrap_or(0);

        match item {
            Some(item) => Self {
                is_ad,
                title: item.name,
                artists: item.artists.into_iter().map(|artist| artist.name).collect(),
                duration_ms: item.duration_ms.unwrap_or(0),
                progress_ms,
                track_id: item.id,
            },
            None => Self {
                is_ad,
                title: None,
                artists: Vec::new(),
                duration_ms: 0,
                progress_ms,
                track_id: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> PlaybackSnapshot {
        serde_json::from_str::<CurrentlyPlayingBody>(json)
            .expect("fixture should deserialize")
            .into()
    }

    #[test]
    fn track_body_populates_metadata() {
        let snapshot = parse(
            r#"{
                "currently_playing_type": "track",
                "progress_ms": 4500,
                "item": {
                    "name": "Weird Fishes",
                    "id": "3H3cOQ6LBLSvmcaV7QkZEu",
                    "duration_ms": 318000,
                    "artists": [{"name": "Radiohead"}]
                }
            }"#,
        );

        assert!(!snapshot.is_ad);
        assert_eq!(snapshot.title.as_deref(), Some("Weird Fishes"));
        assert_eq!(snapshot.artists, vec!["Radiohead".to_string()]);
        assert_eq!(snapshot.duration_ms, 318000);
        assert_eq!(snapshot.progress_ms, 4500);
        assert_eq!(snapshot.track_id.as_deref(), Some("3H3cOQ6LBLSvmcaV7QkZEu"));
    }

    #[test]
    fn ad_body_has_no_metadata() {
        let snapshot = parse(
            r#"{"currently_playing_type": "ad", "item": null, "progress_ms": 1200}"#,
        );

        assert!(snapshot.is_ad);
        assert_eq!(snapshot.title, None);
        assert_eq!(snapshot.track_id, None);
        assert!(snapshot.artists.is_empty());
        assert_eq!(snapshot.duration_ms, 0);
        assert_eq!(snapshot.progress_ms, 1200);
    }

    #[test]
    fn ad_body_with_stray_item_is_stripped() {
        let snapshot = parse(
            r#"{
                "currently_playing_type": "ad",
                "item": {"name": "Not a track", "id": "x", "duration_ms": 30000, "artists": []}
            }"#,
        );

        assert!(snapshot.is_ad);
        assert_eq!(snapshot.title, None);
        assert_eq!(snapshot.track_id, None);
        assert!(snapshot.artists.is_empty());
    }

    #[test]
    fn empty_body_defaults() {
        let snapshot = parse("{}");

        assert!(!snapshot.is_ad);
        assert_eq!(snapshot.title, None);
        assert_eq!(snapshot.progress_ms, 0);
    }

    #[test]
    fn describe_joins_artists() {
        let snapshot = parse(
            r#"{
                "currently_playing_type": "track",
                "item": {
                    "name": "Silver Soul",
                    "artists": [{"name": "Beach House"}, {"name": "Someone Else"}]
                }
            }"#,
        );

        assert_eq!(snapshot.describe(), "Silver Soul by Beach House, Someone Else");
    }
}
