//! Seeded K-means over dense feature rows
//!
//! Lloyd's algorithm with k-means++ seeding. All randomness comes from a
//! `StdRng` seeded by the caller, so the same points and seed always give the
//! same centroids and labels.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const DEFAULT_MAX_ITER: usize = 300;
const DEFAULT_TOL: f64 = 1e-4;

#[derive(Debug, Clone)]
pub struct KMeans {
    n_clusters: usize,
    tol: f64,
    seed: u64,
}

/// Centroids and training labels of a fitted K-means run
#[derive(Debug, Clone, PartialEq)]
pub struct KMeansModel {
    centroids: Vec<Vec<f64>>,
    labels: Vec<usize>,
}

fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

/// Index of the closest centroid; ties go to the lower index
fn nearest(centroids: &[Vec<f64>], point: &[f64]) -> (usize, f64) {
    let mut best = (0, f64::INFINITY);
    for (index, centroid) in centroids.iter().enumerate() {
        let distance = squared_distance(centroid, point);
        if distance < best.1 {
            best = (index, distance);
        }
    }
    best
}

impl KMeans {
    pub fn new(n_clusters: usize, seed: u64) -> Self {
        Self {
            n_clusters: n_clusters.max(1),
            tol: DEFAULT_TOL,
            seed,
        }
    }

    /// Fits centroids to `points`.
    ///
    /// Returns None for an empty input. When there are fewer points than
    /// clusters, the cluster count drops to the number of points.
    pub fn fit<P: AsRef<[f64]>>(&self, points: &[P]) -> Option<KMeansModel> {
        if points.is_empty() {
            return None;
        }

        let points: Vec<&[f64]> = points.iter().map(AsRef::as_ref).collect();
        let k = self.n_clusters.min(points.len());
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut centroids = Self::init_plus_plus(&points, k, &mut rng);
        let mut labels = vec![0; points.len()];
        let mut n_iter = 0;

        for _ in 0..DEFAULT_MAX_ITER {
            n_iter += 1;
            for (label, point) in labels.iter_mut().zip(&points) {
                *label = nearest(&centroids, point).0;
            }

            let dims = centroids[0].len();
            let mut sums = vec![vec![0.0; dims]; k];
            let mut counts = vec![0usize; k];
            for (label, point) in labels.iter().zip(&points) {
                counts[*label] += 1;
                for (sum, value) in sums[*label].iter_mut().zip(point.iter()) {
                    *sum += value;
                }
            }

            let mut shift = 0.0;
            for (cluster, centroid) in centroids.iter_mut().enumerate() {
                // An empty cluster keeps its previous centroid
                if counts[cluster] == 0 {
                    continue;
                }
                let updated: Vec<f64> = sums[cluster]
                    .iter()
                    .map(|sum| sum / counts[cluster] as f64)
                    .collect();
                shift += squared_distance(centroid, &updated);
                *centroid = updated;
            }

            if shift <= self.tol {
                break;
            }
        }

        let mut inertia = 0.0;
        for (label, point) in labels.iter_mut().zip(&points) {
            let (cluster, distance) = nearest(&centroids, point);
            *label = cluster;
            inertia += distance;
        }

        tracing::debug!(
            points = points.len(),
            clusters = k,
            iterations = n_iter,
            inertia,
            "K-means converged"
        );

        Some(KMeansModel { centroids, labels })
    }

    /// k-means++: first centroid uniformly at random, each next one with
    /// probability proportional to squared distance from the chosen set
    fn init_plus_plus(points: &[&[f64]], k: usize, rng: &mut StdRng) -> Vec<Vec<f64>> {
        let mut centroids = vec![points[rng.gen_range(0..points.len())].to_vec()];
        let mut closest: Vec<f64> = points
            .iter()
            .map(|point| squared_distance(&centroids[0], point))
            .collect();

        while centroids.len() < k {
            let total: f64 = closest.iter().sum();
            let next = if total > 0.0 {
                let target = rng.gen::<f64>() * total;
                let mut cumulative = 0.0;
                let mut chosen = points.len() - 1;
                for (index, distance) in closest.iter().enumerate() {
                    cumulative += distance;
                    if cumulative > target && *distance > 0.0 {
                        chosen = index;
                        break;
                    }
                }
                chosen
            } else {
                rng.gen_range(0..points.len())
            };

            let centroid = points[next].to_vec();
            for (best, point) in closest.iter_mut().zip(points) {
                *best = best.min(squared_distance(&centroid, point));
            }
            centroids.push(centroid);
        }

        centroids
    }
}

impl KMeansModel {
    pub fn n_clusters(&self) -> usize {
        self.centroids.len()
    }

    /// Cluster of each training point, in input order
    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    /// Cluster whose centroid is closest to `point`
    pub fn predict(&self, point: &[f64]) -> usize {
        nearest(&self.centroids, point).0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blobs() -> Vec<[f64; 2]> {
        vec![
            [1.0, 1.0],
            [1.1, 0.9],
            [0.9, 1.1],
            [10.0, 10.0],
            [10.1, 9.9],
            [9.9, 10.1],
        ]
    }

    #[test]
    fn test_fit_separates_blobs() {
        let model = KMeans::new(2, 0).fit(&blobs()).unwrap();
        let labels = model.labels();

        assert_eq!(model.n_clusters(), 2);
        assert_eq!(labels[0], labels[1]);
        assert_eq!(labels[1], labels[2]);
        assert_eq!(labels[3], labels[4]);
        assert_eq!(labels[4], labels[5]);
        assert_ne!(labels[0], labels[3]);
    }

    #[test]
    fn test_fit_is_deterministic_for_seed() {
        let points = vec![
            [0.2, 95.0, 0.1],
            [0.8, 150.0, 0.9],
            [0.5, 120.0, 0.4],
            [0.7, 128.0, 0.6],
            [0.3, 100.0, 0.2],
            [0.9, 160.0, 0.7],
            [0.4, 110.0, 0.5],
        ];

        let first = KMeans::new(3, 42).fit(&points).unwrap();
        let second = KMeans::new(3, 42).fit(&points).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_predict_assigns_nearest_centroid() {
        let model = KMeans::new(2, 7).fit(&blobs()).unwrap();
        let near_origin = model.predict(&[0.0, 0.0]);
        let far = model.predict(&[12.0, 12.0]);

        assert_eq!(near_origin, model.labels()[0]);
        assert_eq!(far, model.labels()[3]);
        assert_eq!(model.predict(&[1.05, 0.95]), near_origin);
    }

    #[test]
    fn test_fewer_points_than_clusters() {
        let points = vec![[1.0, 2.0], [3.0, 4.0]];
        let model = KMeans::new(5, 0).fit(&points).unwrap();

        assert_eq!(model.n_clusters(), 2);
        assert_ne!(model.labels()[0], model.labels()[1]);
        assert_eq!(model.predict(&[1.0, 2.0]), model.labels()[0]);
        assert_eq!(model.predict(&[3.0, 4.0]), model.labels()[1]);
    }

    #[test]
    fn test_duplicate_points() {
        let points = vec![[1.0, 1.0]; 4];
        let model = KMeans::new(3, 0).fit(&points).unwrap();
        let first = model.labels()[0];
        assert!(model.labels().iter().all(|label| *label == first));
        assert!(model.labels().iter().all(|label| *label < model.n_clusters()));
    }

    #[test]
    fn test_empty_input() {
        let points: Vec<[f64; 3]> = vec![];
        assert!(KMeans::new(5, 0).fit(&points).is_none());
    }
}
