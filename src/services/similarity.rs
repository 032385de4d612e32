use crate::services::vectorizer::{SparseMatrix, SparseRow};

/// Square pairwise score matrix (cosine similarity or Euclidean distance)
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrix {
    size: usize,
    values: Vec<f64>,
}

impl SimilarityMatrix {
    fn from_pairs(size: usize, score: impl Fn(usize, usize) -> f64) -> Self {
        let mut values = vec![0.0; size * size];
        for i in 0..size {
            for j in i..size {
                let value = score(i, j);
                values[i * size + j] = value;
                values[j * size + i] = value;
            }
        }
        Self { size, values }
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i * self.size + j]
    }

    pub fn row(&self, i: usize) -> &[f64] {
        &self.values[i * self.size..(i + 1) * self.size]
    }
}

/// Cosine of the angle between two sparse vectors; 0 when either is all-zero
pub fn cosine_similarity(a: &SparseRow, b: &SparseRow) -> f64 {
    let norm_a = a.norm();
    let norm_b = b.norm();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    (a.dot(b) / (norm_a * norm_b)).clamp(-1.0, 1.0)
}

/// All-pairs cosine similarity over the rows of `matrix`
pub fn cosine_similarity_matrix(matrix: &SparseMatrix) -> SimilarityMatrix {
    SimilarityMatrix::from_pairs(matrix.n_rows(), |i, j| {
        cosine_similarity(matrix.row(i), matrix.row(j))
    })
}

/// Cosine similarity of row `index` against every row, equal to
/// `cosine_similarity_matrix(matrix).row(index)`
pub fn cosine_similarity_row(matrix: &SparseMatrix, index: usize) -> Vec<f64> {
    let query = matrix.row(index);
    matrix
        .rows()
        .iter()
        .map(|row| cosine_similarity(query, row))
        .collect()
}

pub fn euclidean_distance(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}
