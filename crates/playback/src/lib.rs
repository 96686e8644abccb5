//! Playback-state polling for the monitored streaming player.
//!
//! [`SpotifyClient::poll`] turns one currently-playing query, including
//! the reactive token-refresh dance, into either a normalized
//! [`PlaybackSnapshot`] or nothing. The monitor crate consumes it through
//! the [`PlaybackSource`] seam so its state machine can also be driven by
//! scripted sources in tests.

mod auth;
mod client;
mod snapshot;

pub use auth::{authorize_url, exchange_code, SCOPES};
pub use client::SpotifyClient;
pub use snapshot::PlaybackSnapshot;

/// Timeout applied to every call against the provider.
pub(crate) const REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(5);

#[derive(Debug, thiserror::Error)]
pub enum PlaybackError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("token endpoint rejected the exchange: {0}")]
    TokenExchange(reqwest::StatusCode),
    #[error("token response carried no refresh token")]
    MissingRefreshToken,
}

pub type Result<T> = std::result::Result<T, PlaybackError>;

/// Application registration and endpoint set for the provider.
///
/// The endpoint fields default to the production service; tests point
/// them at a local fixture.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub now_playing_url: String,
    pub token_url: String,
    pub authorize_endpoint: String,
}

impl ProviderConfig {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_uri: "http://127.0.0.1:8888/callback".to_string(),
            now_playing_url: "https://api.spotify.com/v1/me/player/currently-playing".to_string(),
            token_url: "https://accounts.spotify.com/api/token".to_string(),
            authorize_endpoint: "https://accounts.spotify.com/authorize".to_string(),
        }
    }
}

/// Anything that can answer "what is playing right now".
#[async_trait::async_trait]
pub trait PlaybackSource: Send + Sync {
    /// A normalized snapshot, or `None` when no usable data is available
    /// this round (paused player, network trouble, missing authorization).
    async fn poll(&self) -> Option<PlaybackSnapshot>;
}
