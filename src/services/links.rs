use regex::Regex;
use std::sync::OnceLock;

use crate::{
    error::{AppError, AppResult},
    models::ExternalId,
};

static SPOTIFY_TRACK: OnceLock<Regex> = OnceLock::new();
static IMDB_TITLE: OnceLock<Regex> = OnceLock::new();
static GOOGLE_BOOKS_EDITION: OnceLock<Regex> = OnceLock::new();

fn spotify_track() -> &'static Regex {
    SPOTIFY_TRACK.get_or_init(|| {
        Regex::new(r"^(?:https?://open\.spotify\.com/track/|spotify:track:)([a-zA-Z0-9]+)")
            .expect("valid regex")
    })
}

fn imdb_title() -> &'static Regex {
    IMDB_TITLE.get_or_init(|| Regex::new(r"imdb\.com/title/(tt\d+)").expect("valid regex"))
}

fn google_books_edition() -> &'static Regex {
    GOOGLE_BOOKS_EDITION
        .get_or_init(|| Regex::new(r"/books/edition/.+/([^/?#]+)").expect("valid regex"))
}

impl ExternalId {
    /// Extracts a catalog identifier from a Spotify track, IMDb title, or
    /// Google Books edition link
    pub fn from_link(link: &str) -> AppResult<Self> {
        let link = link.trim();

        if let Some(caps) = spotify_track().captures(link) {
            return Ok(ExternalId::SpotifyTrack(caps[1].to_string()));
        }
        if let Some(caps) = imdb_title().captures(link) {
            return Ok(ExternalId::Imdb(caps[1].to_string()));
        }
        if let Some(caps) = google_books_edition().captures(link) {
            return Ok(ExternalId::GoogleBooks(caps[1].to_string()));
        }

        Err(AppError::InvalidInput(format!(
            "Unsupported link format: expected a Spotify track, IMDb title, or Google Books URL, got '{}'",
            link
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spotify_url() {
        let id = ExternalId::from_link("https://open.spotify.com/track/3n3Ppam7vgaVa1iaRUc9Lp?si=abc").unwrap();
        assert_eq!(id, ExternalId::SpotifyTrack("3n3Ppam7vgaVa1iaRUc9Lp".to_string()));
    }

    #[test]
    fn test_spotify_uri() {
        let id = ExternalId::from_link("spotify:track:3n3Ppam7vgaVa1iaRUc9Lp").unwrap();
        assert_eq!(id, ExternalId::SpotifyTrack("3n3Ppam7vgaVa1iaRUc9Lp".to_string()));
    }

    #[test]
    fn test_imdb_url() {
        let id = ExternalId::from_link("https://www.imdb.com/title/tt1375666/?ref_=fn_al_tt_1").unwrap();
        assert_eq!(id, ExternalId::Imdb("tt1375666".to_string()));
    }

    #[test]
    fn test_google_books_url() {
        let id = ExternalId::from_link(
            "https://www.google.com/books/edition/The_Hobbit/pD6arNyKyi8C?hl=en&gbpv=0",
        )
        .unwrap();
        assert_eq!(id, ExternalId::GoogleBooks("pD6arNyKyi8C".to_string()));
    }

    #[test]
    fn test_unsupported_link() {
        let err = ExternalId::from_link("https://example.com/whatever").unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[test]
    fn test_spotify_album_is_rejected() {
        let err = ExternalId::from_link("https://open.spotify.com/album/1ATL5GLyefJaxhQzSPVrLX").unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[test]
    fn test_imdb_without_title_id_is_rejected() {
        assert!(ExternalId::from_link("https://www.imdb.com/name/nm0634240/").is_err());
    }
}
