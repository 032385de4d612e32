use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Goodreads-style CSV with Book, Author, Description, Genres columns
    #[serde(default = "default_books_dataset")]
    pub books_dataset: String,

    /// IMDb-style CSV with Title, Genre, Description, Director, Poster columns
    #[serde(default = "default_movies_dataset")]
    pub movies_dataset: String,

    /// Google Books API base URL
    #[serde(default = "default_google_books_api_url")]
    pub google_books_api_url: String,

    /// Google Books API key (the public endpoints work without one)
    #[serde(default)]
    pub google_books_api_key: Option<String>,

    /// OMDb API key
    pub omdb_api_key: String,

    /// OMDb API base URL
    #[serde(default = "default_omdb_api_url")]
    pub omdb_api_url: String,

    /// Spotify client credentials; track links are rejected when absent
    #[serde(default)]
    pub spotify_client_id: Option<String>,
    #[serde(default)]
    pub spotify_client_secret: Option<String>,

    /// Spotify Web API base URL
    #[serde(default = "default_spotify_api_url")]
    pub spotify_api_url: String,

    /// Spotify accounts service base URL (token endpoint)
    #[serde(default = "default_spotify_accounts_url")]
    pub spotify_accounts_url: String,

    /// Timeout applied to every outbound provider request
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,

    /// Number of recommendations returned per query
    #[serde(default = "default_recommendation_count")]
    pub recommendation_count: usize,

    /// K-means cluster count for track recommendations
    #[serde(default = "default_cluster_count")]
    pub cluster_count: usize,

    /// K-means initialization seed
    #[serde(default)]
    pub cluster_seed: u64,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_books_dataset() -> String {
    "data/goodreads_data.csv".to_string()
}

fn default_movies_dataset() -> String {
    "data/imdb-movies-dataset.csv".to_string()
}

fn default_google_books_api_url() -> String {
    "https://www.googleapis.com/books/v1".to_string()
}

fn default_omdb_api_url() -> String {
    "http://www.omdbapi.com".to_string()
}

fn default_spotify_api_url() -> String {
    "https://api.spotify.com/v1".to_string()
}

fn default_spotify_accounts_url() -> String {
    "https://accounts.spotify.com".to_string()
}

fn default_http_timeout_secs() -> u64 {
    10
}

fn default_recommendation_count() -> usize {
    3
}

fn default_cluster_count() -> usize {
    5
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Spotify credentials, if both halves are configured
    pub fn spotify_credentials(&self) -> Option<(String, String)> {
        match (&self.spotify_client_id, &self.spotify_client_secret) {
            (Some(id), Some(secret)) if !id.is_empty() && !secret.is_empty() => {
                Some((id.clone(), secret.clone()))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_pairs(pairs: &[(&str, &str)]) -> Config {
        envy::from_iter::<_, Config>(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string())),
        )
        .unwrap()
    }

    #[test]
    fn test_defaults_applied() {
        let config = from_pairs(&[("OMDB_API_KEY", "secret")]);
        assert_eq!(config.omdb_api_key, "secret");
        assert_eq!(config.recommendation_count, 3);
        assert_eq!(config.cluster_count, 5);
        assert_eq!(config.cluster_seed, 0);
        assert_eq!(config.port, 3000);
        assert_eq!(config.omdb_api_url, "http://www.omdbapi.com");
        assert!(config.spotify_credentials().is_none());
    }

    #[test]
    fn test_missing_omdb_key_fails() {
        let result = envy::from_iter::<_, Config>(Vec::<(String, String)>::new());
        assert!(result.is_err());
    }

    #[test]
    fn test_spotify_credentials_require_both() {
        let config = from_pairs(&[("OMDB_API_KEY", "k"), ("SPOTIFY_CLIENT_ID", "id")]);
        assert!(config.spotify_credentials().is_none());

        let config = from_pairs(&[
            ("OMDB_API_KEY", "k"),
            ("SPOTIFY_CLIENT_ID", "id"),
            ("SPOTIFY_CLIENT_SECRET", "shh"),
        ]);
        assert_eq!(
            config.spotify_credentials(),
            Some(("id".to_string(), "shh".to_string()))
        );
    }
}
