//! TF-IDF and multi-hot feature extraction
//!
//! Both vectorizers fit their vocabulary from exactly the documents they are
//! given. Nothing is kept between calls, so adding one row to the corpus can
//! change every column and weight.

use std::collections::{BTreeMap, BTreeSet, HashMap};

/// A sparse row as (column, value) pairs, sorted by column
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseRow {
    entries: Vec<(usize, f64)>,
}

impl SparseRow {
    pub fn from_sorted(entries: Vec<(usize, f64)>) -> Self {
        debug_assert!(entries.windows(2).all(|w| w[0].0 < w[1].0));
        Self { entries }
    }

    pub fn entries(&self) -> &[(usize, f64)] {
        &self.entries
    }

    pub fn is_zero(&self) -> bool {
        self.entries.iter().all(|(_, value)| *value == 0.0)
    }

    pub fn dot(&self, other: &SparseRow) -> f64 {
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0;
        while i < self.entries.len() && j < other.entries.len() {
            let (col_a, val_a) = self.entries[i];
            let (col_b, val_b) = other.entries[j];
            match col_a.cmp(&col_b) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += val_a * val_b;
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }

    pub fn norm(&self) -> f64 {
        self.entries
            .iter()
            .map(|(_, value)| value * value)
            .sum::<f64>()
            .sqrt()
    }

    fn l2_normalized(mut self) -> Self {
        let norm = self.norm();
        if norm > 0.0 {
            for (_, value) in &mut self.entries {
                *value /= norm;
            }
        }
        self
    }
}

/// Row-major sparse feature matrix
#[derive(Debug, Clone, PartialEq)]
pub struct SparseMatrix {
    n_cols: usize,
    rows: Vec<SparseRow>,
}

impl SparseMatrix {
    pub fn new(n_cols: usize, rows: Vec<SparseRow>) -> Self {
        Self { n_cols, rows }
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    pub fn row(&self, index: usize) -> &SparseRow {
        &self.rows[index]
    }

    pub fn rows(&self) -> &[SparseRow] {
        &self.rows
    }
}

/// Splits a document into terms of two or more word characters
fn analyze(document: &str) -> impl Iterator<Item = String> + '_ {
    document
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|term| term.chars().count() >= 2)
        .map(str::to_lowercase)
}

/// TF-IDF vectorizer with smoothed IDF and L2-normalized rows
#[derive(Debug, Clone, Default)]
pub struct TfidfVectorizer {
    max_features: Option<usize>,
}

impl TfidfVectorizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep only the `max_features` most frequent terms across the corpus
    pub fn with_max_features(max_features: usize) -> Self {
        Self {
            max_features: Some(max_features),
        }
    }

    /// Builds the vocabulary from `documents` and returns one row per document.
    ///
    /// Columns follow lexicographic term order. Weight of term t in document d is
    /// `count(t, d) * (ln((1 + n) / (1 + df(t))) + 1)`, then each row is scaled to
    /// unit length. Documents without any known term produce an all-zero row.
    pub fn fit_transform<S: AsRef<str>>(&self, documents: &[S]) -> SparseMatrix {
        let term_counts: Vec<HashMap<String, usize>> = documents
            .iter()
            .map(|doc| {
                let mut counts = HashMap::new();
                for term in analyze(doc.as_ref()) {
                    *counts.entry(term).or_insert(0) += 1;
                }
                counts
            })
            .collect();

        let mut document_frequency: BTreeMap<&str, usize> = BTreeMap::new();
        let mut corpus_frequency: BTreeMap<&str, usize> = BTreeMap::new();
        for counts in &term_counts {
            for (term, count) in counts {
                *document_frequency.entry(term.as_str()).or_insert(0) += 1;
                *corpus_frequency.entry(term.as_str()).or_insert(0) += count;
            }
        }

        let kept_terms: BTreeSet<&str> = match self.max_features {
            Some(limit) if limit < corpus_frequency.len() => {
                let mut by_frequency: Vec<(&str, usize)> =
                    corpus_frequency.iter().map(|(t, c)| (*t, *c)).collect();
                by_frequency.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
                by_frequency.into_iter().take(limit).map(|(t, _)| t).collect()
            }
            _ => corpus_frequency.keys().copied().collect(),
        };

        let vocabulary: HashMap<&str, usize> = kept_terms
            .iter()
            .enumerate()
            .map(|(column, term)| (*term, column))
            .collect();

        let n_documents = documents.len() as f64;
        let idf: Vec<f64> = kept_terms
            .iter()
            .map(|term| {
                let df = document_frequency[term] as f64;
                ((1.0 + n_documents) / (1.0 + df)).ln() + 1.0
            })
            .collect();

        let rows = term_counts
            .iter()
            .map(|counts| {
                let mut entries: Vec<(usize, f64)> = counts
                    .iter()
                    .filter_map(|(term, count)| {
                        vocabulary
                            .get(term.as_str())
                            .map(|&column| (column, *count as f64 * idf[column]))
                    })
                    .collect();
                entries.sort_by_key(|(column, _)| *column);
                SparseRow::from_sorted(entries).l2_normalized()
            })
            .collect();

        tracing::debug!(
            documents = documents.len(),
            vocabulary = kept_terms.len(),
            "Fitted TF-IDF vocabulary"
        );

        SparseMatrix::new(kept_terms.len(), rows)
    }
}

/// Multi-hot encoding of label lists.
///
/// One column per distinct label across all rows, in lexicographic order; a
/// cell is 1 when the row carries that label, however many times.
pub fn binarize_labels(labels: &[Vec<String>]) -> SparseMatrix {
    let classes: BTreeSet<&str> = labels
        .iter()
        .flat_map(|row| row.iter().map(String::as_str))
        .collect();
    let column_of: HashMap<&str, usize> = classes
        .iter()
        .enumerate()
        .map(|(column, label)| (*label, column))
        .collect();

    let rows = labels
        .iter()
        .map(|row| {
            let columns: BTreeSet<usize> = row.iter().map(|label| column_of[label.as_str()]).collect();
            SparseRow::from_sorted(columns.into_iter().map(|column| (column, 1.0)).collect())
        })
        .collect();

    SparseMatrix::new(classes.len(), rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dense(row: &SparseRow, n_cols: usize) -> Vec<f64> {
        let mut values = vec![0.0; n_cols];
        for (column, value) in row.entries() {
            values[*column] = *value;
        }
        values
    }

    #[test]
    fn test_tfidf_shape_and_unit_rows() {
        let docs = ["space crew mission", "space station", "crew drama drama"];
        let matrix = TfidfVectorizer::new().fit_transform(&docs);

        assert_eq!(matrix.n_rows(), 3);
        // crew, drama, mission, space, station
        assert_eq!(matrix.n_cols(), 5);
        for row in matrix.rows() {
            assert!((row.norm() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_tfidf_matches_smoothed_idf() {
        let docs = ["apple banana", "apple"];
        let matrix = TfidfVectorizer::new().fit_transform(&docs);

        // apple: df=2 -> idf=1; banana: df=1 -> idf=ln(3/2)+1
        let banana_idf = (3.0f64 / 2.0).ln() + 1.0;
        let norm = (1.0 + banana_idf * banana_idf).sqrt();
        let row = dense(matrix.row(0), matrix.n_cols());
        assert!((row[0] - 1.0 / norm).abs() < 1e-12);
        assert!((row[1] - banana_idf / norm).abs() < 1e-12);

        let row = dense(matrix.row(1), matrix.n_cols());
        assert_eq!(row, vec![1.0, 0.0]);
    }

    #[test]
    fn test_tfidf_ignores_single_character_terms() {
        let matrix = TfidfVectorizer::new().fit_transform(&["a b cd"]);
        assert_eq!(matrix.n_cols(), 1);
    }

    #[test]
    fn test_tfidf_empty_document_is_zero_row() {
        let matrix = TfidfVectorizer::new().fit_transform(&["", "heist crew"]);
        assert_eq!(matrix.n_rows(), 2);
        assert!(matrix.row(0).is_zero());
        assert_eq!(matrix.row(0).norm(), 0.0);
    }

    #[test]
    fn test_tfidf_all_empty_documents() {
        let matrix = TfidfVectorizer::new().fit_transform(&["", ""]);
        assert_eq!(matrix.n_cols(), 0);
        assert!(matrix.rows().iter().all(SparseRow::is_zero));
    }

    #[test]
    fn test_tfidf_vocabulary_refit_per_call() {
        let vectorizer = TfidfVectorizer::new();
        let first = vectorizer.fit_transform(&["alpha beta"]);
        let second = vectorizer.fit_transform(&["alpha beta", "gamma"]);
        assert_eq!(first.n_cols(), 2);
        assert_eq!(second.n_cols(), 3);
    }

    #[test]
    fn test_tfidf_max_features_keeps_most_frequent() {
        let docs = ["heist heist heist crew", "heist drama", "crew"];
        let matrix = TfidfVectorizer::with_max_features(2).fit_transform(&docs);

        // heist (4) and crew (2) survive; drama (1) is cut
        assert_eq!(matrix.n_cols(), 2);
        let drama_row = matrix.row(1);
        assert_eq!(drama_row.entries().len(), 1);
    }

    #[test]
    fn test_binarize_labels() {
        let labels = vec![
            vec!["Thriller".to_string(), "Action".to_string()],
            vec!["Drama".to_string(), "Drama".to_string()],
            vec![],
        ];
        let matrix = binarize_labels(&labels);

        // Action, Drama, Thriller
        assert_eq!(matrix.n_cols(), 3);
        assert_eq!(dense(matrix.row(0), 3), vec![1.0, 0.0, 1.0]);
        assert_eq!(dense(matrix.row(1), 3), vec![0.0, 1.0, 0.0]);
        assert!(matrix.row(2).is_zero());
    }

    #[test]
    fn test_sparse_dot() {
        let a = SparseRow::from_sorted(vec![(0, 1.0), (2, 2.0), (5, 3.0)]);
        let b = SparseRow::from_sorted(vec![(2, 4.0), (3, 1.0), (5, 1.0)]);
        assert_eq!(a.dot(&b), 11.0);
        assert_eq!(a.dot(&b), b.dot(&a));
    }
}
