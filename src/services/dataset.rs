//! Reference corpora loaded once at startup
//!
//! Books come from a Goodreads export, movies from an IMDb export. Both are
//! converted into `CorpusItem`s in file order, which is the order ties are
//! broken in when ranking.

use serde::Deserialize;
use std::io::Read;
use std::path::Path;

use crate::{error::AppResult, models::movie::split_genres, models::CorpusItem};

/// Row of the Goodreads CSV. Other columns (index, URL, rating counts) are ignored.
#[derive(Debug, Deserialize)]
struct GoodreadsRow {
    #[serde(rename = "Book")]
    book: Option<String>,
    #[serde(rename = "Author")]
    author: Option<String>,
    #[serde(rename = "Description")]
    description: Option<String>,
    #[serde(rename = "Genres")]
    genres: Option<String>,
    #[serde(rename = "Avg_Rating", default, deserialize_with = "csv::invalid_option")]
    avg_rating: Option<f64>,
}

/// Row of the IMDb CSV
#[derive(Debug, Deserialize)]
struct ImdbRow {
    #[serde(rename = "Title")]
    title: Option<String>,
    #[serde(rename = "Genre", default)]
    genre: Option<String>,
    #[serde(rename = "Description", default)]
    description: Option<String>,
    #[serde(rename = "Director", default)]
    director: Option<String>,
    #[serde(rename = "Poster", default)]
    poster: Option<String>,
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Parses a Goodreads genre cell such as `['Classics', 'Fiction']`
pub fn parse_goodreads_genres(raw: &str) -> Vec<String> {
    let joined = raw
        .split(", ")
        .map(|genre| genre.trim_matches(|c| c == '[' || c == ']'))
        .collect::<Vec<_>>()
        .join(", ")
        .replace('\'', "");

    split_genres(&joined)
}

impl GoodreadsRow {
    /// Rows missing any field are unusable for ranking
    fn into_item(self) -> Option<CorpusItem> {
        let title = present(self.book)?;
        let author = present(self.author)?;
        let description = present(self.description)?;
        let genres = present(self.genres)?;
        self.avg_rating?;

        Some(CorpusItem::new(
            title,
            description,
            parse_goodreads_genres(&genres),
            author,
        ))
    }
}

impl ImdbRow {
    fn into_item(self) -> Option<CorpusItem> {
        let title = present(self.title)?;
        let item = CorpusItem::new(
            title,
            self.description.unwrap_or_default(),
            split_genres(self.genre.as_deref().unwrap_or_default()),
            self.director.unwrap_or_default(),
        );

        Some(match present(self.poster) {
            Some(poster) => item.with_poster(poster),
            None => item,
        })
    }
}

pub fn load_books<P: AsRef<Path>>(path: P) -> AppResult<Vec<CorpusItem>> {
    let path = path.as_ref();
    let reader = csv::Reader::from_path(path)?;
    let items = read_books(reader)?;
    tracing::info!(path = %path.display(), rows = items.len(), "Loaded book corpus");
    Ok(items)
}

pub fn load_movies<P: AsRef<Path>>(path: P) -> AppResult<Vec<CorpusItem>> {
    let path = path.as_ref();
    let reader = csv::Reader::from_path(path)?;
    let items = read_movies(reader)?;
    tracing::info!(path = %path.display(), rows = items.len(), "Loaded movie corpus");
    Ok(items)
}

pub fn read_books<R: Read>(mut reader: csv::Reader<R>) -> AppResult<Vec<CorpusItem>> {
    let mut items = Vec::new();
    let mut dropped = 0usize;

    for row in reader.deserialize::<GoodreadsRow>() {
        match row?.into_item() {
            Some(item) => items.push(item),
            None => dropped += 1,
        }
    }

    if dropped > 0 {
        tracing::warn!(dropped, "Skipped book rows with missing fields");
    }

    Ok(items)
}

pub fn read_movies<R: Read>(mut reader: csv::Reader<R>) -> AppResult<Vec<CorpusItem>> {
    let mut items = Vec::new();
    let mut dropped = 0usize;

    for row in reader.deserialize::<ImdbRow>() {
        match row?.into_item() {
            Some(item) => items.push(item),
            None => dropped += 1,
        }
    }

    if dropped > 0 {
        tracing::warn!(dropped, "Skipped movie rows without a title");
    }

    Ok(items)
}
