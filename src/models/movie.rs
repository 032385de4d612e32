use serde::{Deserialize, Serialize};

use super::{CorpusItem, NOT_AVAILABLE};

/// Movie metadata as resolved from an external catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieRecord {
    pub title: String,
    pub description: String,
    pub genres: Vec<String>,
    pub director: String,
    pub poster: String,
}

impl From<&MovieRecord> for CorpusItem {
    fn from(movie: &MovieRecord) -> Self {
        CorpusItem {
            title: movie.title.clone(),
            description: movie.description.clone(),
            genres: movie.genres.clone(),
            creator: movie.director.clone(),
            poster: Some(movie.poster.clone()),
        }
    }
}

/// A recommended movie, in ranking order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovieRecommendation {
    pub title: String,
    pub genres: Vec<String>,
    pub description: String,
    pub director: String,
    pub poster: String,
    pub score: f64,
}

impl MovieRecommendation {
    pub fn from_corpus(item: &CorpusItem, score: f64) -> Self {
        Self {
            title: item.title.clone(),
            genres: item.genres.clone(),
            description: item.description.clone(),
            director: item.creator.clone(),
            poster: item
                .poster
                .clone()
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            score,
        }
    }
}

/// Splits an IMDb/OMDb genre cell ("Action, Thriller") into labels
pub fn split_genres(raw: &str) -> Vec<String> {
    raw.split(", ")
        .map(str::trim)
        .filter(|genre| !genre.is_empty())
        .map(str::to_string)
        .collect()
}

// ============================================================================
// OMDb API Types
// ============================================================================

/// Response from GET /?i={imdb_id}
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OmdbMovie {
    /// "True" or "False"
    pub response: String,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub plot: Option<String>,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub director: Option<String>,
    #[serde(default)]
    pub poster: Option<String>,
}

impl OmdbMovie {
    pub fn found(&self) -> bool {
        self.response.eq_ignore_ascii_case("true")
    }
}

impl From<OmdbMovie> for MovieRecord {
    fn from(movie: OmdbMovie) -> Self {
        let or_na = |value: Option<String>| value.unwrap_or_else(|| NOT_AVAILABLE.to_string());
        let genres = split_genres(movie.genre.as_deref().unwrap_or(NOT_AVAILABLE));

        MovieRecord {
            title: or_na(movie.title),
            description: or_na(movie.plot),
            genres: if genres.is_empty() {
                vec![NOT_AVAILABLE.to_string()]
            } else {
                genres
            },
            director: or_na(movie.director),
            poster: or_na(movie.poster),
        }
    }
}
