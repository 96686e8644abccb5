//! Bearer-authenticated client for the currently-playing endpoint.

use hushify_store::TokenStore;
use reqwest::StatusCode;

use crate::snapshot::CurrentlyPlayingBody;
use crate::{auth, PlaybackSnapshot, PlaybackSource, ProviderConfig, REQUEST_TIMEOUT};

/// Polls the provider's now-playing endpoint with the stored credentials.
pub struct SpotifyClient {
    http: reqwest::Client,
    config: ProviderConfig,
    store: TokenStore,
}

impl SpotifyClient {
    pub fn new(config: ProviderConfig, store: TokenStore) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
            store,
        }
    }

    /// One currently-playing query.
    ///
    /// Every failure path collapses to `None`; the monitor treats a poll
    /// that yields nothing exactly like a paused player. A 401 triggers
    /// one refresh exchange and one retried request; whatever the retry
    /// returns is final for this poll.
    pub async fn poll(&self) -> Option<PlaybackSnapshot> {
        let credentials = match self.store.load() {
            Ok(Some(credentials)) => credentials,
            Ok(None) => {
                tracing::debug!("no access token stored; run the login flow first");
                return None;
            }
            Err(err) => {
                tracing::warn!("failed to read credential store: {err}");
                return None;
            }
        };

        let mut response = match self.now_playing(&credentials.access_token).await {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!("now-playing request failed: {err}");
                return None;
            }
        };

        if response.status() == StatusCode::UNAUTHORIZED {
            let refreshed = match auth::refresh_credentials(
                &self.http,
                &self.config,
                &credentials.refresh_token,
            )
            .await
            {
                Ok(refreshed) => refreshed,
                Err(err) => {
                    tracing::warn!("token refresh failed, re-run the login flow: {err}");
                    return None;
                }
            };

            if let Err(err) = self.store.save(&refreshed) {
                tracing::warn!("failed to persist refreshed credentials: {err}");
            }

            response = match self.now_playing(&refreshed.access_token).await {
                Ok(response) => response,
                Err(err) => {
                    tracing::warn!("retried now-playing request failed: {err}");
                    return None;
                }
            };
        }

        match response.status() {
            StatusCode::NO_CONTENT => {
                tracing::debug!("nothing playing");
                None
            }
            status if status.is_success() => match response.json::<CurrentlyPlayingBody>().await {
                Ok(body) => Some(body.into()),
                Err(err) => {
                    tracing::warn!("malformed now-playing body: {err}");
                    None
                }
            },
            status => {
                tracing::warn!(%status, "now-playing request rejected");
                None
            }
        }
    }

    async fn now_playing(&self, access_token: &str) -> reqwest::Result<reqwest::Response> {
        self.http
            .get(&self.config.now_playing_url)
            .bearer_auth(access_token)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
    }
}

#[async_trait::async_trait]
impl PlaybackSource for SpotifyClient {
    async fn poll(&self) -> Option<PlaybackSnapshot> {
        SpotifyClient::poll(self).await
    }
}
