/// External catalog providers
///
/// Each provider resolves identifiers extracted from user links into explicit
/// records. Missing fields are filled with `"N/A"` while converting the
/// payload, so callers never see partial records.
use reqwest::{Client as HttpClient, Response, StatusCode};
use std::time::Duration;

use crate::{
    error::{AppError, AppResult},
    models::{book::BookLinks, ExternalId, ItemRecord, TrackItem},
};

pub mod google_books;
pub mod omdb;
pub mod spotify;

pub use google_books::GoogleBooksProvider;
pub use omdb::OmdbProvider;
pub use spotify::SpotifyProvider;

/// Resolves a single catalog item by its external identifier
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Fetches the record for `id`.
    ///
    /// Unknown identifiers yield `NotFound`; transport failures and non-success
    /// responses yield `ProviderUnavailable` or `HttpClient`.
    async fn fetch_by_external_id(&self, id: &ExternalId) -> AppResult<ItemRecord>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}

/// Supplies the candidate pool a seed track is clustered against
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait TrackCatalog: Send + Sync {
    /// Top tracks of every artist related to the seed's first artist, one
    /// entry per track id, in discovery order
    async fn candidate_pool(&self, seed: &TrackItem) -> AppResult<Vec<TrackItem>>;
}

/// Finds the cover and catalog page of a book by title and author
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait BookLinkLookup: Send + Sync {
    async fn find_links(&self, title: &str, author: &str) -> AppResult<BookLinks>;
}

/// Shared HTTP client with the configured request timeout
pub fn http_client(timeout_secs: u64) -> AppResult<HttpClient> {
    Ok(HttpClient::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()?)
}

/// Maps a provider response to an error unless it succeeded
///
/// 404 means the identifier does not resolve; any other non-success status is
/// treated as the provider being unavailable.
pub(crate) async fn ensure_success(
    response: Response,
    provider: &str,
    id: &str,
) -> AppResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    if status == StatusCode::NOT_FOUND {
        return Err(AppError::NotFound(format!(
            "{} has no item with id {}",
            provider, id
        )));
    }

    let body = response.text().await.unwrap_or_default();
    tracing::warn!(provider, %status, id, "Provider returned non-success status");
    Err(AppError::ProviderUnavailable(format!(
        "{} API returned status {}: {}",
        provider, status, body
    )))
}

#[cfg(test)]
pub(crate) mod test_support {
    use axum::Router;
    use tokio::net::TcpListener;

    /// Serves `router` on a random local port and returns its base URL
    pub async fn serve(router: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let addr = listener.local_addr().expect("local addr");

        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("mock server");
        });

        format!("http://{}", addr)
    }
}
