use std::sync::Arc;
use tracing::instrument;

use crate::{
    error::{AppError, AppResult},
    models::{
        book::BookLinks, BookRecommendation, CorpusItem, ExtendedCorpus, ExternalId, ItemRecord,
        MediaKind, Recommendations,
    },
    services::{
        providers::{BookLinkLookup, MetadataProvider, TrackCatalog},
        recommender::Recommender,
    },
};

/// Reference datasets the book and movie queries are ranked against
#[derive(Debug, Clone, Default)]
pub struct ReferenceCorpora {
    pub books: Vec<CorpusItem>,
    pub movies: Vec<CorpusItem>,
}

/// Spotify lookups used for track queries; absent without credentials
#[derive(Clone)]
struct TrackSources {
    metadata: Arc<dyn MetadataProvider>,
    catalog: Arc<dyn TrackCatalog>,
}

/// Turns a user link into recommendations
///
/// Resolves the link through the matching provider, appends the resolved item
/// to its reference corpus (or fetches a candidate pool for tracks), ranks the
/// neighbors and enriches book results with cover art.
#[derive(Clone)]
pub struct RecommendationService {
    corpora: Arc<ReferenceCorpora>,
    recommender: Recommender,
    books: Arc<dyn MetadataProvider>,
    book_links: Arc<dyn BookLinkLookup>,
    movies: Arc<dyn MetadataProvider>,
    tracks: Option<TrackSources>,
}

impl RecommendationService {
    pub fn new(
        corpora: ReferenceCorpora,
        recommender: Recommender,
        books: Arc<dyn MetadataProvider>,
        book_links: Arc<dyn BookLinkLookup>,
        movies: Arc<dyn MetadataProvider>,
    ) -> Self {
        Self {
            corpora: Arc::new(corpora),
            recommender,
            books,
            book_links,
            movies,
            tracks: None,
        }
    }

    /// Enables track recommendations
    pub fn with_tracks(
        mut self,
        metadata: Arc<dyn MetadataProvider>,
        catalog: Arc<dyn TrackCatalog>,
    ) -> Self {
        self.tracks = Some(TrackSources { metadata, catalog });
        self
    }

    pub async fn recommend_from_link(&self, link: &str) -> AppResult<Recommendations> {
        let id = ExternalId::from_link(link)?;
        self.recommend(&id).await
    }

    #[instrument(skip(self), fields(kind = %id.kind()))]
    pub async fn recommend(&self, id: &ExternalId) -> AppResult<Recommendations> {
        let result = match id.kind() {
            MediaKind::Books => self.recommend_books(id).await,
            MediaKind::Movies => self.recommend_movies(id).await,
            MediaKind::Tracks => self.recommend_tracks(id).await,
        };

        match &result {
            Ok(recommendations) => tracing::info!(
                id = %id,
                count = recommendations.len(),
                "Recommendations generated"
            ),
            Err(e) if e.is_provider_failure() => {
                tracing::error!(id = %id, error = %e, "Provider failure while recommending")
            }
            Err(e) => tracing::warn!(id = %id, error = %e, "Recommendation request failed"),
        }

        result
    }

    async fn recommend_books(&self, id: &ExternalId) -> AppResult<Recommendations> {
        let ItemRecord::Book(record) = self.books.fetch_by_external_id(id).await? else {
            return Err(Self::mismatch(self.books.name(), MediaKind::Books));
        };

        let corpus = ExtendedCorpus::extend(&self.corpora.books, CorpusItem::from(&record));
        let mut recommendations = self.recommender.recommend_books(&corpus, &record.title)?;
        self.attach_book_links(&mut recommendations).await;

        Ok(Recommendations::Books {
            query: record,
            recommendations,
        })
    }

    async fn recommend_movies(&self, id: &ExternalId) -> AppResult<Recommendations> {
        let ItemRecord::Movie(record) = self.movies.fetch_by_external_id(id).await? else {
            return Err(Self::mismatch(self.movies.name(), MediaKind::Movies));
        };

        let corpus = ExtendedCorpus::extend(&self.corpora.movies, CorpusItem::from(&record));
        let recommendations = self.recommender.recommend_movies(&corpus, &record.title)?;

        Ok(Recommendations::Movies {
            query: record,
            recommendations,
        })
    }

    async fn recommend_tracks(&self, id: &ExternalId) -> AppResult<Recommendations> {
        let sources = self.tracks.as_ref().ok_or_else(|| {
            AppError::ProviderUnavailable("Spotify credentials are not configured".to_string())
        })?;

        let ItemRecord::Track(seed) = sources.metadata.fetch_by_external_id(id).await? else {
            return Err(Self::mismatch(sources.metadata.name(), MediaKind::Tracks));
        };

        let pool = sources.catalog.candidate_pool(&seed).await?;
        let recommendations = self.recommender.recommend_tracks(&pool, &seed);

        Ok(Recommendations::Tracks {
            query: seed,
            recommendations,
        })
    }

    /// Cover and info link per book; lookup failures leave the "N/A" defaults
    async fn attach_book_links(&self, recommendations: &mut [BookRecommendation]) {
        for recommendation in recommendations.iter_mut() {
            let links = match self
                .book_links
                .find_links(&recommendation.title, &recommendation.author)
                .await
            {
                Ok(links) => links,
                Err(e) => {
                    tracing::warn!(
                        title = %recommendation.title,
                        error = %e,
                        "Book link lookup failed"
                    );
                    BookLinks::default()
                }
            };

            recommendation.cover_url = links.cover_url;
            recommendation.link = links.info_link;
        }
    }

    fn mismatch(provider: &str, expected: MediaKind) -> AppError {
        AppError::Internal(format!(
            "Provider {} returned a record that is not {}",
            provider, expected
        ))
    }
}
