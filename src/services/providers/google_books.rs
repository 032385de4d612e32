/// Google Books API provider
///
/// Volume lookup: GET /volumes/{id}
/// Cover/link search: GET /volumes?q={title} {author}, first hit wins
use reqwest::Client as HttpClient;

use crate::{
    error::{AppError, AppResult},
    models::{
        book::{BookLinks, GoogleVolume, GoogleVolumeSearch},
        BookRecord, ExternalId, ItemRecord,
    },
    services::providers::{ensure_success, BookLinkLookup, MetadataProvider},
};

#[derive(Clone)]
pub struct GoogleBooksProvider {
    http_client: HttpClient,
    api_url: String,
    api_key: Option<String>,
}

impl GoogleBooksProvider {
    pub fn new(http_client: HttpClient, api_url: String, api_key: Option<String>) -> Self {
        Self {
            http_client,
            api_url: api_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    fn key_param(&self) -> Vec<(&str, &str)> {
        self.api_key
            .as_deref()
            .map(|key| vec![("key", key)])
            .unwrap_or_default()
    }

    pub async fn fetch_book(&self, volume_id: &str) -> AppResult<BookRecord> {
        let url = format!("{}/volumes/{}", self.api_url, volume_id);

        let response = self
            .http_client
            .get(&url)
            .query(&self.key_param())
            .send()
            .await?;
        let response = ensure_success(response, self.name(), volume_id).await?;

        let volume: GoogleVolume = response.json().await?;
        let record = BookRecord::from(volume);

        tracing::info!(volume_id, title = %record.title, "Fetched book from Google Books");
        Ok(record)
    }
}

#[async_trait::async_trait]
impl MetadataProvider for GoogleBooksProvider {
    async fn fetch_by_external_id(&self, id: &ExternalId) -> AppResult<ItemRecord> {
        match id {
            ExternalId::GoogleBooks(volume_id) => {
                Ok(ItemRecord::Book(self.fetch_book(volume_id).await?))
            }
            other => Err(AppError::InvalidInput(format!(
                "Google Books cannot resolve {} identifiers",
                other.kind()
            ))),
        }
    }

    fn name(&self) -> &'static str {
        "google_books"
    }
}

#[async_trait::async_trait]
impl BookLinkLookup for GoogleBooksProvider {
    async fn find_links(&self, title: &str, author: &str) -> AppResult<BookLinks> {
        let url = format!("{}/volumes", self.api_url);
        let query = format!("{} {}", title, author);

        let mut params = vec![("q", query.as_str())];
        params.extend(self.key_param());

        let response = self.http_client.get(&url).query(&params).send().await?;
        let response = ensure_success(response, self.name(), &query).await?;

        let search: GoogleVolumeSearch = response.json().await?;
        let links = search
            .items
            .first()
            .map(|volume| BookLinks::from(&volume.volume_info))
            .unwrap_or_default();

        tracing::debug!(title, author, cover_url = %links.cover_url, "Resolved book links");
        Ok(links)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NOT_AVAILABLE;
    use crate::services::providers::test_support::serve;
    use axum::{
        extract::{Path, Query},
        http::StatusCode,
        response::IntoResponse,
        routing::get,
        Json, Router,
    };
    use serde_json::json;
    use std::collections::HashMap;

    async fn books_mock() -> String {
        let router = Router::new()
            .route(
                "/volumes/:id",
                get(|Path(id): Path<String>| async move {
                    if id != "zyTCAlFPjgYC" {
                        return StatusCode::NOT_FOUND.into_response();
                    }
                    Json(json!({
                        "id": "zyTCAlFPjgYC",
                        "volumeInfo": {
                            "title": "The Google Story",
                            "authors": ["David A. Vise", "Mark Malseed"],
                            "description": "Here is the story behind one of the most remarkable Internet successes.",
                            "categories": ["Business & Economics"],
                            "averageRating": 3.5
                        }
                    }))
                    .into_response()
                }),
            )
            .route(
                "/volumes",
                get(|Query(params): Query<HashMap<String, String>>| async move {
                    let q = params.get("q").cloned().unwrap_or_default();
                    if q.starts_with("Dune") {
                        Json(json!({
                            "items": [{
                                "volumeInfo": {
                                    "title": "Dune",
                                    "infoLink": "https://books.google.com/books?id=dune",
                                    "imageLinks": {"thumbnail": "https://books.google.com/dune.jpg"}
                                }
                            }]
                        }))
                    } else {
                        Json(json!({"totalItems": 0}))
                    }
                }),
            );
        serve(router).await
    }

    fn provider(url: String) -> GoogleBooksProvider {
        GoogleBooksProvider::new(HttpClient::new(), url, None)
    }

    #[tokio::test]
    async fn test_fetch_book() {
        let books = provider(books_mock().await);
        let record = books.fetch_book("zyTCAlFPjgYC").await.unwrap();

        assert_eq!(record.title, "The Google Story");
        assert_eq!(record.author, "David A. Vise, Mark Malseed");
        assert_eq!(record.genres, vec!["Business & Economics"]);
        assert_eq!(record.average_rating, Some(3.5));
    }

    #[tokio::test]
    async fn test_unknown_volume_is_not_found() {
        let books = provider(books_mock().await);
        let err = books
            .fetch_by_external_id(&ExternalId::GoogleBooks("missing".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_find_links() {
        let books = provider(books_mock().await);
        let links = books.find_links("Dune", "Frank Herbert").await.unwrap();

        assert_eq!(links.cover_url, "https://books.google.com/dune.jpg");
        assert_eq!(links.info_link, "https://books.google.com/books?id=dune");
    }

    #[tokio::test]
    async fn test_find_links_without_hits_defaults() {
        let books = provider(books_mock().await);
        let links = books.find_links("Nothing", "Nobody").await.unwrap();

        assert_eq!(links.cover_url, NOT_AVAILABLE);
        assert_eq!(links.info_link, NOT_AVAILABLE);
    }
}
