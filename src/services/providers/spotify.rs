/// Spotify Web API provider
///
/// Authenticates with the client-credentials flow and caches the access token
/// until shortly before it expires.
///
/// Track lookup: GET /tracks/{id} + GET /audio-features/{id}
/// Candidate pool: GET /artists/{id}/related-artists, then
/// GET /artists/{related}/top-tracks for each, then GET /audio-features?ids=
use reqwest::{Client as HttpClient, RequestBuilder};
use serde::{de::DeserializeOwned, Deserialize};
use std::collections::HashSet;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

use crate::{
    error::{AppError, AppResult},
    models::{
        track::{SpotifyAudioFeatures, SpotifyRelatedArtists, SpotifyTopTracks, SpotifyTrack},
        ExternalId, ItemRecord, TrackItem,
    },
    services::providers::{ensure_success, MetadataProvider, TrackCatalog},
};

/// Maximum ids accepted by the batch audio-features endpoint
const AUDIO_FEATURES_BATCH: usize = 100;
const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(30);
const TOP_TRACKS_MARKET: &str = "US";

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

#[derive(Debug, Deserialize)]
struct AudioFeaturesBatch {
    #[serde(default)]
    audio_features: Vec<Option<SpotifyAudioFeatures>>,
}

#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    expires_at: Instant,
}

pub struct SpotifyProvider {
    http_client: HttpClient,
    client_id: String,
    client_secret: String,
    api_url: String,
    accounts_url: String,
    token: Mutex<Option<CachedToken>>,
}

impl SpotifyProvider {
    pub fn new(
        http_client: HttpClient,
        client_id: String,
        client_secret: String,
        api_url: String,
        accounts_url: String,
    ) -> Self {
        Self {
            http_client,
            client_id,
            client_secret,
            api_url: api_url.trim_end_matches('/').to_string(),
            accounts_url: accounts_url.trim_end_matches('/').to_string(),
            token: Mutex::new(None),
        }
    }

    async fn access_token(&self) -> AppResult<String> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref() {
            if token.expires_at > Instant::now() {
                return Ok(token.value.clone());
            }
        }

        let url = format!("{}/api/token", self.accounts_url);
        let response = self
            .http_client
            .post(&url)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ProviderUnavailable(format!(
                "Spotify authentication failed with status {}: {}",
                status, body
            )));
        }

        let token: TokenResponse = response.json().await?;
        let lifetime = Duration::from_secs(token.expires_in).saturating_sub(TOKEN_EXPIRY_MARGIN);
        *cached = Some(CachedToken {
            value: token.access_token.clone(),
            expires_at: Instant::now() + lifetime,
        });

        tracing::debug!(expires_in = token.expires_in, "Obtained Spotify access token");
        Ok(token.access_token)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        request: impl FnOnce(&HttpClient) -> RequestBuilder,
        id: &str,
    ) -> AppResult<T> {
        let token = self.access_token().await?;
        let response = request(&self.http_client).bearer_auth(token).send().await?;
        let response = ensure_success(response, self.name(), id).await?;
        Ok(response.json().await?)
    }

    async fn audio_features(&self, track_id: &str) -> AppResult<SpotifyAudioFeatures> {
        let url = format!("{}/audio-features/{}", self.api_url, track_id);
        self.get_json(|client| client.get(&url), track_id).await
    }

    pub async fn fetch_track(&self, track_id: &str) -> AppResult<TrackItem> {
        let url = format!("{}/tracks/{}", self.api_url, track_id);
        let track: SpotifyTrack = self.get_json(|client| client.get(&url), track_id).await?;
        let features = self.audio_features(track_id).await?;

        let item = TrackItem::from_spotify(track, features);
        tracing::info!(track_id, name = %item.name, artist = %item.artist, "Fetched track from Spotify");
        Ok(item)
    }

    async fn related_artist_ids(&self, artist_id: &str) -> AppResult<Vec<String>> {
        let url = format!("{}/artists/{}/related-artists", self.api_url, artist_id);
        let related: SpotifyRelatedArtists =
            self.get_json(|client| client.get(&url), artist_id).await?;
        Ok(related.artists.into_iter().map(|artist| artist.id).collect())
    }

    async fn top_tracks(&self, artist_id: &str) -> AppResult<Vec<SpotifyTrack>> {
        let url = format!("{}/artists/{}/top-tracks", self.api_url, artist_id);
        let top: SpotifyTopTracks = self
            .get_json(
                |client| client.get(&url).query(&[("market", TOP_TRACKS_MARKET)]),
                artist_id,
            )
            .await?;
        Ok(top.tracks)
    }

    /// Audio features for `ids`, aligned by position; unanalysed tracks are None
    async fn audio_features_batch(
        &self,
        ids: &[String],
    ) -> AppResult<Vec<Option<SpotifyAudioFeatures>>> {
        let url = format!("{}/audio-features", self.api_url);
        let mut features = Vec::with_capacity(ids.len());

        for chunk in ids.chunks(AUDIO_FEATURES_BATCH) {
            let joined = chunk.join(",");
            let batch: AudioFeaturesBatch = self
                .get_json(
                    |client| client.get(&url).query(&[("ids", joined.as_str())]),
                    &joined,
                )
                .await?;

            let mut batch = batch.audio_features;
            batch.resize(chunk.len(), None);
            features.extend(batch);
        }

        Ok(features)
    }
}

#[async_trait::async_trait]
impl MetadataProvider for SpotifyProvider {
    async fn fetch_by_external_id(&self, id: &ExternalId) -> AppResult<ItemRecord> {
        match id {
            ExternalId::SpotifyTrack(track_id) => {
                Ok(ItemRecord::Track(self.fetch_track(track_id).await?))
            }
            other => Err(AppError::InvalidInput(format!(
                "Spotify cannot resolve {} identifiers",
                other.kind()
            ))),
        }
    }

    fn name(&self) -> &'static str {
        "spotify"
    }
}

#[async_trait::async_trait]
impl TrackCatalog for SpotifyProvider {
    async fn candidate_pool(&self, seed: &TrackItem) -> AppResult<Vec<TrackItem>> {
        let related = self.related_artist_ids(&seed.artist_id).await?;

        let mut seen = HashSet::new();
        let mut tracks = Vec::new();
        let mut failures = 0usize;

        for artist_id in &related {
            match self.top_tracks(artist_id).await {
                Ok(top) => tracks.extend(top.into_iter().filter(|t| seen.insert(t.id.clone()))),
                Err(e) => {
                    tracing::warn!(artist_id = %artist_id, error = %e, "Top tracks fetch failed");
                    failures += 1;
                }
            }
        }

        if tracks.is_empty() && failures > 0 {
            return Err(AppError::ProviderUnavailable(
                "Failed to fetch top tracks for any related artist".to_string(),
            ));
        }

        let ids: Vec<String> = tracks.iter().map(|t| t.id.clone()).collect();
        let features = self.audio_features_batch(&ids).await?;

        let pool: Vec<TrackItem> = tracks
            .into_iter()
            .zip(features)
            .filter_map(|(track, features)| features.map(|f| TrackItem::from_spotify(track, f)))
            .collect();

        tracing::info!(
            seed = %seed.id,
            related_artists = related.len(),
            failed_artists = failures,
            pool_size = pool.len(),
            "Assembled candidate track pool"
        );

        Ok(pool)
    }
}
