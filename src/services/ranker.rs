use std::collections::HashSet;

use crate::{
    models::{ExtendedCorpus, TrackItem},
    services::{clustering::KMeansModel, similarity::euclidean_distance},
};

/// A selected neighbor: row index into the candidate set plus its score
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedItem {
    pub index: usize,
    /// Combined similarity for text items, Euclidean distance for tracks
    pub score: f64,
}

/// Element-wise mean of the description and genre similarity rows
pub fn combine_scores(description: &[f64], genre: &[f64]) -> Vec<f64> {
    debug_assert_eq!(description.len(), genre.len());
    description
        .iter()
        .zip(genre)
        .map(|(d, g)| (d + g) / 2.0)
        .collect()
}

/// Row indices ordered by score, highest first; equal scores keep corpus order
fn descending_order(scores: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));
    order
}

/// Picks up to `limit` neighbors of the query row from `scores`.
///
/// Skipped candidates: the query row itself, rows sharing the query's title
/// or raw description, and rows whose raw description was already selected.
pub fn select_text_neighbors(
    corpus: &ExtendedCorpus<'_>,
    query_index: usize,
    scores: &[f64],
    limit: usize,
) -> Vec<RankedItem> {
    let Some(query) = corpus.get(query_index) else {
        return Vec::new();
    };

    let mut seen_descriptions: HashSet<&str> = HashSet::new();
    let mut selected = Vec::with_capacity(limit);

    for index in descending_order(scores) {
        if selected.len() >= limit {
            break;
        }
        let Some(candidate) = corpus.get(index) else {
            continue;
        };

        if index == query_index
            || candidate.title == query.title
            || candidate.description == query.description
        {
            continue;
        }
        if !seen_descriptions.insert(candidate.description.as_str()) {
            continue;
        }

        selected.push(RankedItem {
            index,
            score: scores[index],
        });
    }

    selected
}

/// Picks up to `limit` tracks from the query's cluster, nearest first.
///
/// `model` must have been fit on `pool` in order. The query is excluded by id
/// rather than by distance.
pub fn select_track_neighbors(
    pool: &[TrackItem],
    model: &KMeansModel,
    query: &TrackItem,
    limit: usize,
) -> Vec<RankedItem> {
    let query_features = query.features();
    let query_cluster = model.predict(&query_features);

    let mut candidates: Vec<RankedItem> = pool
        .iter()
        .zip(model.labels())
        .enumerate()
        .filter(|(_, (_, label))| **label == query_cluster)
        .map(|(index, (track, _))| RankedItem {
            index,
            score: euclidean_distance(&query_features, &track.features()),
        })
        .collect();

    candidates.sort_by(|a, b| a.score.total_cmp(&b.score));

    candidates
        .into_iter()
        .filter(|candidate| pool[candidate.index].id != query.id)
        .take(limit)
        .collect()
}
