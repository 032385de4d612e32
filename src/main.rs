use anyhow::Context;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use recc_api::{
    config::Config,
    routes::create_router,
    services::{
        dataset,
        providers::{http_client, GoogleBooksProvider, OmdbProvider, SpotifyProvider},
        RecommendationService, Recommender, RecommenderSettings, ReferenceCorpora,
    },
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().context("Failed to load configuration")?;

    let corpora = ReferenceCorpora {
        books: dataset::load_books(&config.books_dataset)
            .with_context(|| format!("Failed to load books from {}", config.books_dataset))?,
        movies: dataset::load_movies(&config.movies_dataset)
            .with_context(|| format!("Failed to load movies from {}", config.movies_dataset))?,
    };

    let client = http_client(config.http_timeout_secs)?;
    let google_books = Arc::new(GoogleBooksProvider::new(
        client.clone(),
        config.google_books_api_url.clone(),
        config.google_books_api_key.clone(),
    ));
    let omdb = Arc::new(OmdbProvider::new(
        client.clone(),
        config.omdb_api_key.clone(),
        config.omdb_api_url.clone(),
    ));

    let recommender = Recommender::new(RecommenderSettings {
        limit: config.recommendation_count,
        cluster_count: config.cluster_count,
        cluster_seed: config.cluster_seed,
    });

    let mut service =
        RecommendationService::new(corpora, recommender, google_books.clone(), google_books, omdb);

    match config.spotify_credentials() {
        Some((client_id, client_secret)) => {
            let spotify = Arc::new(SpotifyProvider::new(
                client,
                client_id,
                client_secret,
                config.spotify_api_url.clone(),
                config.spotify_accounts_url.clone(),
            ));
            service = service.with_tracks(spotify.clone(), spotify);
        }
        None => tracing::warn!("Spotify credentials not set, track links will be rejected"),
    }

    let app = create_router(Arc::new(service));

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!(%addr, "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
