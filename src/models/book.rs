use serde::{Deserialize, Serialize};

use super::{CorpusItem, NOT_AVAILABLE};

/// Book metadata as resolved from an external catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookRecord {
    pub title: String,
    /// All authors joined with ", "
    pub author: String,
    pub description: String,
    pub genres: Vec<String>,
    pub average_rating: Option<f64>,
}

impl From<&BookRecord> for CorpusItem {
    fn from(book: &BookRecord) -> Self {
        CorpusItem {
            title: book.title.clone(),
            description: book.description.clone(),
            genres: book.genres.clone(),
            creator: book.author.clone(),
            poster: None,
        }
    }
}

/// A recommended book, in ranking order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookRecommendation {
    pub title: String,
    pub author: String,
    pub description: String,
    pub genres: Vec<String>,
    pub score: f64,
    pub cover_url: String,
    pub link: String,
}

impl BookRecommendation {
    pub fn from_corpus(item: &CorpusItem, score: f64) -> Self {
        Self {
            title: item.title.clone(),
            author: item.creator.clone(),
            description: item.description.clone(),
            genres: item.genres.clone(),
            score,
            cover_url: NOT_AVAILABLE.to_string(),
            link: NOT_AVAILABLE.to_string(),
        }
    }
}

/// Cover art and catalog page for a book, as found by a title/author search
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookLinks {
    pub cover_url: String,
    pub info_link: String,
}

impl Default for BookLinks {
    fn default() -> Self {
        Self {
            cover_url: NOT_AVAILABLE.to_string(),
            info_link: NOT_AVAILABLE.to_string(),
        }
    }
}

// ============================================================================
// Google Books API Types
// ============================================================================

/// Response from GET /volumes/{id}
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleVolume {
    #[serde(default)]
    pub volume_info: GoogleVolumeInfo,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleVolumeInfo {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub authors: Option<Vec<String>>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub categories: Option<Vec<String>>,
    #[serde(default)]
    pub average_rating: Option<f64>,
    #[serde(default)]
    pub info_link: Option<String>,
    #[serde(default)]
    pub image_links: Option<GoogleImageLinks>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GoogleImageLinks {
    #[serde(default)]
    pub thumbnail: Option<String>,
}

/// Response from GET /volumes?q=
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleVolumeSearch {
    #[serde(default)]
    pub items: Vec<GoogleVolume>,
}

impl From<GoogleVolume> for BookRecord {
    fn from(volume: GoogleVolume) -> Self {
        let info = volume.volume_info;
        let or_na = |value: Option<String>| value.unwrap_or_else(|| NOT_AVAILABLE.to_string());
        let list_or_na = |value: Option<Vec<String>>| match value {
            Some(values) if !values.is_empty() => values,
            _ => vec![NOT_AVAILABLE.to_string()],
        };

        BookRecord {
            title: or_na(info.title),
            author: list_or_na(info.authors).join(", "),
            description: or_na(info.description),
            genres: list_or_na(info.categories),
            average_rating: info.average_rating,
        }
    }
}

impl From<&GoogleVolumeInfo> for BookLinks {
    fn from(info: &GoogleVolumeInfo) -> Self {
        let cover_url = info
            .image_links
            .as_ref()
            .and_then(|links| links.thumbnail.clone())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());

        BookLinks {
            cover_url,
            info_link: info
                .info_link
                .clone()
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_google_volume_to_book_record() {
        let json = r#"{
            "id": "zyTCAlFPjgYC",
            "volumeInfo": {
                "title": "The Google Story",
                "authors": ["David A. Vise", "Mark Malseed"],
                "description": "Here is the story behind one of the most remarkable Internet successes.",
                "categories": ["Browsers (Computer programs)"],
                "averageRating": 3.5
            }
        }"#;

        let volume: GoogleVolume = serde_json::from_str(json).unwrap();
        let book: BookRecord = volume.into();
        assert_eq!(book.title, "The Google Story");
        assert_eq!(book.author, "David A. Vise, Mark Malseed");
        assert_eq!(book.genres, vec!["Browsers (Computer programs)"]);
        assert_eq!(book.average_rating, Some(3.5));
    }

    #[test]
    fn test_google_volume_missing_fields_default_to_na() {
        let volume: GoogleVolume = serde_json::from_str(r#"{"volumeInfo": {"title": "Bare"}}"#).unwrap();
        let book: BookRecord = volume.into();
        assert_eq!(book.title, "Bare");
        assert_eq!(book.author, NOT_AVAILABLE);
        assert_eq!(book.description, NOT_AVAILABLE);
        assert_eq!(book.genres, vec![NOT_AVAILABLE]);
        assert_eq!(book.average_rating, None);
    }

    #[test]
    fn test_book_links_from_volume_info() {
        let info: GoogleVolumeInfo = serde_json::from_str(
            r#"{
                "infoLink": "https://books.google.com/books?id=abc",
                "imageLinks": {"thumbnail": "http://books.google.com/thumb.jpg"}
            }"#,
        )
        .unwrap();

        let links = BookLinks::from(&info);
        assert_eq!(links.cover_url, "http://books.google.com/thumb.jpg");
        assert_eq!(links.info_link, "https://books.google.com/books?id=abc");
    }

    #[test]
    fn test_book_links_without_images() {
        let links = BookLinks::from(&GoogleVolumeInfo::default());
        assert_eq!(links, BookLinks::default());
    }
}
