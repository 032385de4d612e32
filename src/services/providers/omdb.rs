/// OMDb API provider
///
/// Resolves IMDb title ids through `GET /?i={imdb_id}&apikey={key}`. OMDb
/// answers unknown ids with HTTP 200 and `"Response": "False"`.
use reqwest::Client as HttpClient;

use crate::{
    error::{AppError, AppResult},
    models::{movie::OmdbMovie, ExternalId, ItemRecord, MovieRecord},
    services::providers::{ensure_success, MetadataProvider},
};

#[derive(Clone)]
pub struct OmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
}

impl OmdbProvider {
    pub fn new(http_client: HttpClient, api_key: String, api_url: String) -> Self {
        Self {
            http_client,
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
        }
    }

    pub async fn fetch_movie(&self, imdb_id: &str) -> AppResult<MovieRecord> {
        let url = format!("{}/", self.api_url);

        let response = self
            .http_client
            .get(&url)
            .query(&[("i", imdb_id), ("apikey", self.api_key.as_str())])
            .send()
            .await?;
        let response = ensure_success(response, self.name(), imdb_id).await?;

        let movie: OmdbMovie = response.json().await?;
        if !movie.found() {
            let reason = movie.error.unwrap_or_else(|| "Movie not found!".to_string());
            return Err(AppError::NotFound(format!("OMDb: {} ({})", reason, imdb_id)));
        }

        let record = MovieRecord::from(movie);
        tracing::info!(imdb_id, title = %record.title, "Fetched movie from OMDb");
        Ok(record)
    }
}

#[async_trait::async_trait]
impl MetadataProvider for OmdbProvider {
    async fn fetch_by_external_id(&self, id: &ExternalId) -> AppResult<ItemRecord> {
        match id {
            ExternalId::Imdb(imdb_id) => Ok(ItemRecord::Movie(self.fetch_movie(imdb_id).await?)),
            other => Err(AppError::InvalidInput(format!(
                "OMDb cannot resolve {} identifiers",
                other.kind()
            ))),
        }
    }

    fn name(&self) -> &'static str {
        "omdb"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::providers::test_support::serve;
    use axum::{extract::Query, routing::get, Json, Router};
    use serde_json::{json, Value};
    use std::collections::HashMap;

    async fn omdb_mock() -> String {
        let router = Router::new().route(
            "/",
            get(|Query(params): Query<HashMap<String, String>>| async move {
                let body: Value = match params.get("i").map(String::as_str) {
                    Some("tt1375666") => json!({
                        "Title": "Inception",
                        "Genre": "Action, Adventure, Sci-Fi",
                        "Director": "Christopher Nolan",
                        "Plot": "A thief who steals corporate secrets through dream-sharing technology.",
                        "Poster": "https://m.media-amazon.com/images/inception.jpg",
                        "Response": "True"
                    }),
                    _ => json!({"Response": "False", "Error": "Incorrect IMDb ID."}),
                };
                Json(body)
            }),
        );
        serve(router).await
    }

    fn provider(url: String) -> OmdbProvider {
        OmdbProvider::new(HttpClient::new(), "test-key".to_string(), url)
    }

    #[tokio::test]
    async fn test_fetch_movie() {
        let omdb = provider(omdb_mock().await);
        let record = omdb
            .fetch_by_external_id(&ExternalId::Imdb("tt1375666".to_string()))
            .await
            .unwrap();

        match record {
            ItemRecord::Movie(movie) => {
                assert_eq!(movie.title, "Inception");
                assert_eq!(movie.genres, vec!["Action", "Adventure", "Sci-Fi"]);
                assert_eq!(movie.director, "Christopher Nolan");
            }
            other => panic!("expected movie, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unknown_id_is_not_found() {
        let omdb = provider(omdb_mock().await);
        let err = omdb.fetch_movie("tt0000000").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_server_error_is_provider_failure() {
        let router = Router::new().route(
            "/",
            get(|| async { (axum::http::StatusCode::SERVICE_UNAVAILABLE, "down") }),
        );
        let omdb = provider(serve(router).await);

        let err = omdb.fetch_movie("tt1375666").await.unwrap_err();
        assert!(err.is_provider_failure());
    }

    #[tokio::test]
    async fn test_rejects_foreign_identifier() {
        let omdb = provider("http://127.0.0.1:9".to_string());
        let err = omdb
            .fetch_by_external_id(&ExternalId::SpotifyTrack("abc".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }
}
