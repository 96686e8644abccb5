//! Token exchanges against the provider's accounts service.
//!
//! Two grant types are spoken here: `authorization_code` for the one-time
//! seeding flow driven by the CLI, and `refresh_token` for the reactive
//! refresh inside [`crate::SpotifyClient::poll`].

use hushify_store::Credentials;
use serde::Deserialize;

use crate::{PlaybackError, ProviderConfig, Result};

/// Scopes required to read the playback state.
pub const SCOPES: &[&str] = &["user-read-currently-playing", "user-read-playback-state"];

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
}

/// User-facing consent URL for the one-time authorization step.
pub fn authorize_url(config: &ProviderConfig) -> String {
    format!(
        "{}?client_id={}&response_type=code&redirect_uri={}&scope={}",
        config.authorize_endpoint,
        urlencoding::encode(&config.client_id),
        urlencoding::encode(&config.redirect_uri),
        urlencoding::encode(&SCOPES.join(" ")),
    )
}

/// Exchange an authorization code for the initial credential pair.
pub async fn exchange_code(
    http: &reqwest::Client,
    config: &ProviderConfig,
    code: &str,
) -> Result<Credentials> {
    let response = http
        .post(&config.token_url)
        .form(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", config.redirect_uri.as_str()),
            ("client_id", config.client_id.as_str()),
            ("client_secret", config.client_secret.as_str()),
        ])
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(PlaybackError::TokenExchange(response.status()));
    }

    let token: TokenResponse = response.json().await?;
    // The code exchange always issues a refresh token; treat its absence
    // as a hard error rather than seeding a store that can never refresh.
    let refresh_token = token
        .refresh_token
        .ok_or(PlaybackError::MissingRefreshToken)?;

    Ok(Credentials {
        access_token: token.access_token,
        refresh_token,
    })
}

/// Exchange the stored refresh token for a fresh pair.
///
/// The service may omit a new refresh token, in which case the old one
/// stays valid and is carried forward.
pub(crate) async fn refresh_credentials(
    http: &reqwest::Client,
    config: &ProviderConfig,
    refresh_token: &str,
) -> Result<Credentials> {
    let response = http
        .post(&config.token_url)
        .timeout(crate::REQUEST_TIMEOUT)
        .form(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("client_id", config.client_id.as_str()),
            ("client_secret", config.client_secret.as_str()),
        ])
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(PlaybackError::TokenExchange(response.status()));
    }

    let token: TokenResponse = response.json().await?;
    Ok(Credentials {
        access_token: token.access_token,
        refresh_token: token
            .refresh_token
            .unwrap_or_else(|| refresh_token.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authorize_url_carries_encoded_parameters() {
        let config = ProviderConfig::new("client id", "secret");
        let url = authorize_url(&config);

        assert!(url.starts_with("https://accounts.spotify.com/authorize?"));
        assert!(url.contains("client_id=client%20id"));
        assert!(url.contains("redirect_uri=http%3A%2F%2F127.0.0.1%3A8888%2Fcallback"));
        assert!(url.contains("scope=user-read-currently-playing%20user-read-playback-state"));
    }
}
