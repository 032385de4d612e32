use serde::{Deserialize, Serialize};
use std::fmt::Display;

pub mod book;
pub mod corpus;
pub mod movie;
pub mod track;

pub use book::{BookRecommendation, BookRecord};
pub use corpus::{CorpusItem, ExtendedCorpus};
pub use movie::{MovieRecommendation, MovieRecord};
pub use track::{TrackItem, TrackRecommendation};

/// Placeholder for fields a catalog did not return.
///
/// Applied only when converting provider payloads into records, so the ranking
/// core never sees a missing value.
pub const NOT_AVAILABLE: &str = "N/A";

/// Identifier of a single item in an external catalog, extracted from a user link
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExternalId {
    /// Google Books volume ID (e.g., "zyTCAlFPjgYC")
    GoogleBooks(String),
    /// IMDb title ID (e.g., "tt1375666")
    Imdb(String),
    /// Spotify track ID (e.g., "3n3Ppam7vgaVa1iaRUc9Lp")
    SpotifyTrack(String),
}

impl ExternalId {
    pub fn kind(&self) -> MediaKind {
        match self {
            ExternalId::GoogleBooks(_) => MediaKind::Books,
            ExternalId::Imdb(_) => MediaKind::Movies,
            ExternalId::SpotifyTrack(_) => MediaKind::Tracks,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ExternalId::GoogleBooks(id) | ExternalId::Imdb(id) | ExternalId::SpotifyTrack(id) => id,
        }
    }
}

impl Display for ExternalId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Books,
    Movies,
    Tracks,
}

impl Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            MediaKind::Books => "books",
            MediaKind::Movies => "movies",
            MediaKind::Tracks => "tracks",
        };
        f.write_str(name)
    }
}

/// Record returned by a metadata provider, tagged by domain
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ItemRecord {
    Book(BookRecord),
    Movie(MovieRecord),
    Track(TrackItem),
}

/// Result of one recommendation query, ready for serialization
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Recommendations {
    Books {
        query: BookRecord,
        recommendations: Vec<BookRecommendation>,
    },
    Movies {
        query: MovieRecord,
        recommendations: Vec<MovieRecommendation>,
    },
    Tracks {
        query: TrackItem,
        recommendations: Vec<TrackRecommendation>,
    },
}

impl Recommendations {
    pub fn len(&self) -> usize {
        match self {
            Recommendations::Books {
                recommendations, ..
            } => recommendations.len(),
            Recommendations::Movies {
                recommendations, ..
            } => recommendations.len(),
            Recommendations::Tracks {
                recommendations, ..
            } => recommendations.len(),
        }
    }

    /// Fewer neighbors than requested is a valid, degenerate answer
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
