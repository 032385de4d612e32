use serde::{Deserialize, Serialize};

/// A book or movie row in the reference corpus
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorpusItem {
    pub title: String,
    pub description: String,
    pub genres: Vec<String>,
    /// Author for books, director for movies
    pub creator: String,
    #[serde(default)]
    pub poster: Option<String>,
}

impl CorpusItem {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        genres: Vec<String>,
        creator: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            genres,
            creator: creator.into(),
            poster: None,
        }
    }

    pub fn with_poster(mut self, poster: impl Into<String>) -> Self {
        self.poster = Some(poster.into());
        self
    }
}

/// The reference corpus plus exactly one appended query row.
///
/// Borrows the reference rows; the query row is always the last index. Built
/// fresh for every query and dropped with the response.
#[derive(Debug, Clone)]
pub struct ExtendedCorpus<'a> {
    reference: &'a [CorpusItem],
    query: CorpusItem,
}

impl<'a> ExtendedCorpus<'a> {
    pub fn extend(reference: &'a [CorpusItem], query: CorpusItem) -> Self {
        Self { reference, query }
    }

    /// Number of rows including the query row
    pub fn len(&self) -> usize {
        self.reference.len() + 1
    }

    /// Always false: the query row is always present
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn get(&self, index: usize) -> Option<&CorpusItem> {
        match index.cmp(&self.reference.len()) {
            std::cmp::Ordering::Less => self.reference.get(index),
            std::cmp::Ordering::Equal => Some(&self.query),
            std::cmp::Ordering::Greater => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &CorpusItem> + '_ {
        self.reference.iter().chain(std::iter::once(&self.query))
    }

    pub fn query_index(&self) -> usize {
        self.reference.len()
    }

    /// Index of the first row with this exact title
    pub fn position_of(&self, title: &str) -> Option<usize> {
        self.iter().position(|item| item.title == title)
    }
}
