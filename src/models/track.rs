use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::NOT_AVAILABLE;

/// A catalog track with the audio features used for clustering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackItem {
    pub id: String,
    pub name: String,
    pub artist: String,
    pub artist_id: String,
    pub album: String,
    pub release_date: String,
    pub energy: f64,
    pub tempo: f64,
    pub valence: f64,
    pub url: String,
    pub album_art_url: String,
}

impl TrackItem {
    /// Feature vector in (energy, tempo, valence) order
    pub fn features(&self) -> [f64; 3] {
        [self.energy, self.tempo, self.valence]
    }
}

/// A recommended track, in ranking order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackRecommendation {
    pub name: String,
    pub album: String,
    pub artist: String,
    pub album_art_url: String,
    pub url: String,
    pub distance: f64,
}

impl TrackRecommendation {
    pub fn from_track(track: &TrackItem, distance: f64) -> Self {
        Self {
            name: track.name.clone(),
            album: track.album.clone(),
            artist: track.artist.clone(),
            album_art_url: track.album_art_url.clone(),
            url: track.url.clone(),
            distance,
        }
    }
}

// ============================================================================
// Spotify Web API Types
// ============================================================================

/// Response from GET /tracks/{id}
#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyTrack {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub artists: Vec<SpotifyArtist>,
    pub album: SpotifyAlbum,
    #[serde(default)]
    pub external_urls: HashMap<String, String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyArtist {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyAlbum {
    pub name: String,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub images: Vec<SpotifyImage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyImage {
    pub url: String,
}

/// Response from GET /audio-features/{id}
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct SpotifyAudioFeatures {
    pub energy: f64,
    pub tempo: f64,
    pub valence: f64,
}

/// Response from GET /artists/{id}/related-artists
#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyRelatedArtists {
    #[serde(default)]
    pub artists: Vec<SpotifyArtist>,
}

/// Response from GET /artists/{id}/top-tracks
#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyTopTracks {
    #[serde(default)]
    pub tracks: Vec<SpotifyTrack>,
}

impl TrackItem {
    /// Joins track metadata with its audio features; only the first artist is kept
    pub fn from_spotify(track: SpotifyTrack, features: SpotifyAudioFeatures) -> Self {
        let (artist, artist_id) = track
            .artists
            .into_iter()
            .next()
            .map(|a| (a.name, a.id))
            .unwrap_or_else(|| (NOT_AVAILABLE.to_string(), NOT_AVAILABLE.to_string()));

        TrackItem {
            id: track.id,
            name: track.name,
            artist,
            artist_id,
            album: track.album.name,
            release_date: track
                .album
                .release_date
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            energy: features.energy,
            tempo: features.tempo,
            valence: features.valence,
            url: track
                .external_urls
                .get("spotify")
                .cloned()
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            album_art_url: track
                .album
                .images
                .into_iter()
                .next()
                .map(|image| image.url)
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRACK_JSON: &str = r#"{
        "id": "3n3Ppam7vgaVa1iaRUc9Lp",
        "name": "Mr. Brightside",
        "artists": [
            {"id": "0C0XlULifJtAgn6ZNCW2eu", "name": "The Killers"},
            {"id": "other", "name": "Someone Else"}
        ],
        "album": {
            "name": "Hot Fuss",
            "release_date": "2004-06-15",
            "images": [{"url": "https://i.scdn.co/image/large"}, {"url": "https://i.scdn.co/image/small"}]
        },
        "external_urls": {"spotify": "https://open.spotify.com/track/3n3Ppam7vgaVa1iaRUc9Lp"}
    }"#;

    #[test]
    fn test_track_item_from_spotify() {
        let track: SpotifyTrack = serde_json::from_str(TRACK_JSON).unwrap();
        let features: SpotifyAudioFeatures =
            serde_json::from_str(r#"{"energy": 0.918, "tempo": 148.03, "valence": 0.24, "danceability": 0.35}"#)
                .unwrap();

        let item = TrackItem::from_spotify(track, features);
        assert_eq!(item.artist, "The Killers");
        assert_eq!(item.artist_id, "0C0XlULifJtAgn6ZNCW2eu");
        assert_eq!(item.album, "Hot Fuss");
        assert_eq!(item.album_art_url, "https://i.scdn.co/image/large");
        assert_eq!(item.url, "https://open.spotify.com/track/3n3Ppam7vgaVa1iaRUc9Lp");
        assert_eq!(item.features(), [0.918, 148.03, 0.24]);
    }

    #[test]
    fn test_track_item_missing_artwork_defaults_to_na() {
        let json = r#"{"id": "x", "name": "Demo", "album": {"name": "Tapes"}}"#;
        let track: SpotifyTrack = serde_json::from_str(json).unwrap();
        let features = SpotifyAudioFeatures {
            energy: 0.1,
            tempo: 90.0,
            valence: 0.2,
        };

        let item = TrackItem::from_spotify(track, features);
        assert_eq!(item.artist, NOT_AVAILABLE);
        assert_eq!(item.album_art_url, NOT_AVAILABLE);
        assert_eq!(item.release_date, NOT_AVAILABLE);
        assert_eq!(item.url, NOT_AVAILABLE);
    }
}
