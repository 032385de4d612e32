use crate::{
    error::{AppError, AppResult},
    models::{
        BookRecommendation, ExtendedCorpus, MovieRecommendation, TrackItem, TrackRecommendation,
    },
    services::{
        clustering::KMeans,
        ranker::{combine_scores, select_text_neighbors, select_track_neighbors, RankedItem},
        similarity::cosine_similarity_row,
        text::{normalize, normalize_labels},
        vectorizer::{binarize_labels, SparseMatrix, TfidfVectorizer},
    },
};

/// Vocabulary cap for movie descriptions
const MOVIE_MAX_FEATURES: usize = 5000;

#[derive(Debug, Clone)]
pub struct RecommenderSettings {
    /// Maximum number of recommendations per query
    pub limit: usize,
    pub cluster_count: usize,
    pub cluster_seed: u64,
}

impl Default for RecommenderSettings {
    fn default() -> Self {
        Self {
            limit: 3,
            cluster_count: 5,
            cluster_seed: 0,
        }
    }
}

/// Content-based ranking over an extended corpus or a track pool.
///
/// Stateless apart from its settings: every call vectorizes its input from
/// scratch.
#[derive(Debug, Clone, Default)]
pub struct Recommender {
    settings: RecommenderSettings,
}

impl Recommender {
    pub fn new(settings: RecommenderSettings) -> Self {
        Self { settings }
    }

    /// Books closest to `query_title`, scored by the mean of description and
    /// genre TF-IDF cosine similarity
    pub fn recommend_books(
        &self,
        corpus: &ExtendedCorpus<'_>,
        query_title: &str,
    ) -> AppResult<Vec<BookRecommendation>> {
        let query_index = Self::locate(corpus, query_title)?;

        let descriptions = Self::normalized_descriptions(corpus);
        let genres: Vec<String> = corpus.iter().map(|item| normalize_labels(&item.genres)).collect();

        let description_matrix = TfidfVectorizer::new().fit_transform(&descriptions);
        let genre_matrix = TfidfVectorizer::new().fit_transform(&genres);

        let ranked = self.rank_text(corpus, query_index, &description_matrix, &genre_matrix);

        tracing::info!(
            query = %query_title,
            corpus_size = corpus.len(),
            recommendations = ranked.len(),
            "Book recommendations ranked"
        );

        Ok(ranked
            .iter()
            .filter_map(|r| corpus.get(r.index).map(|item| BookRecommendation::from_corpus(item, r.score)))
            .collect())
    }

    /// Movies closest to `query_title`, scored by the mean of description
    /// TF-IDF cosine and multi-hot genre cosine similarity
    pub fn recommend_movies(
        &self,
        corpus: &ExtendedCorpus<'_>,
        query_title: &str,
    ) -> AppResult<Vec<MovieRecommendation>> {
        let query_index = Self::locate(corpus, query_title)?;

        let descriptions = Self::normalized_descriptions(corpus);
        let genres: Vec<Vec<String>> = corpus.iter().map(|item| item.genres.clone()).collect();

        let description_matrix =
            TfidfVectorizer::with_max_features(MOVIE_MAX_FEATURES).fit_transform(&descriptions);
        let genre_matrix = binarize_labels(&genres);

        let ranked = self.rank_text(corpus, query_index, &description_matrix, &genre_matrix);

        tracing::info!(
            query = %query_title,
            corpus_size = corpus.len(),
            recommendations = ranked.len(),
            "Movie recommendations ranked"
        );

        Ok(ranked
            .iter()
            .filter_map(|r| corpus.get(r.index).map(|item| MovieRecommendation::from_corpus(item, r.score)))
            .collect())
    }

    /// Tracks from `pool` in the same K-means cluster as `query`, nearest first
    pub fn recommend_tracks(&self, pool: &[TrackItem], query: &TrackItem) -> Vec<TrackRecommendation> {
        let points: Vec<[f64; 3]> = pool.iter().map(TrackItem::features).collect();
        let Some(model) = KMeans::new(self.settings.cluster_count, self.settings.cluster_seed).fit(&points)
        else {
            tracing::info!(track_id = %query.id, "Empty candidate pool, no track recommendations");
            return Vec::new();
        };

        let ranked = select_track_neighbors(pool, &model, query, self.settings.limit);

        tracing::info!(
            track_id = %query.id,
            pool_size = pool.len(),
            clusters = model.n_clusters(),
            query_cluster = model.predict(&query.features()),
            recommendations = ranked.len(),
            "Track recommendations ranked"
        );

        ranked
            .iter()
            .map(|r| TrackRecommendation::from_track(&pool[r.index], r.score))
            .collect()
    }

    fn locate(corpus: &ExtendedCorpus<'_>, title: &str) -> AppResult<usize> {
        corpus
            .position_of(title)
            .ok_or_else(|| AppError::NotFound(format!("Title '{}' is not in the corpus", title)))
    }

    fn normalized_descriptions(corpus: &ExtendedCorpus<'_>) -> Vec<String> {
        corpus
            .iter()
            .map(|item| normalize(Some(&item.description)))
            .collect()
    }

    fn rank_text(
        &self,
        corpus: &ExtendedCorpus<'_>,
        query_index: usize,
        description_matrix: &SparseMatrix,
        genre_matrix: &SparseMatrix,
    ) -> Vec<RankedItem> {
        let description_scores = cosine_similarity_row(description_matrix, query_index);
        let genre_scores = cosine_similarity_row(genre_matrix, query_index);
        let combined = combine_scores(&description_scores, &genre_scores);

        select_text_neighbors(corpus, query_index, &combined, self.settings.limit)
    }
}
