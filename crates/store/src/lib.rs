//! Credential persistence for the playback API.
//!
//! Tokens live in a small `KEY=VALUE` text file so the one-time `login`
//! flow and the long-running monitor can share them across runs. The file
//! is rewritten wholesale on every save; a reader never observes a
//! half-refreshed pair.

use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;

const ACCESS_TOKEN_KEY: &str = "ACCESS_TOKEN";
const REFRESH_TOKEN_KEY: &str = "REFRESH_TOKEN";

/// Access/refresh token pair issued by the provider.
///
/// No expiry is tracked; a stale access token is discovered reactively
/// when the API answers 401.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub access_token: String,
    pub refresh_token: String,
}

/// File-backed store for the credential pair.
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store location under the platform config directory.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("hushify")
            .join("tokens.txt")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored pair.
    ///
    /// `Ok(None)` when the file is missing or holds no access token, which
    /// means the user has not completed the `login` flow yet. Unknown
    /// lines are ignored so the format can grow without breaking readers.
    pub fn load(&self) -> Result<Option<Credentials>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };

        let mut access_token = None;
        let mut refresh_token = None;
        for line in content.lines() {
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            match key.trim() {
                ACCESS_TOKEN_KEY => access_token = Some(value.trim().to_string()),
                REFRESH_TOKEN_KEY => refresh_token = Some(value.trim().to_string()),
                _ => {}
            }
        }

        match access_token {
            Some(access_token) if !access_token.is_empty() => Ok(Some(Credentials {
                access_token,
                refresh_token: refresh_token.unwrap_or_default(),
            })),
            _ => Ok(None),
        }
    }

    /// Overwrite the stored pair. Creates parent directories on first use.
    pub fn save(&self, credentials: &Credentials) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = format!(
            "{ACCESS_TOKEN_KEY}={}\n{REFRESH_TOKEN_KEY}={}\n",
            credentials.access_token, credentials.refresh_token
        );
        fs::write(&self.path, content)?;
        tracing::debug!(path = %self.path.display(), "credentials saved");
        Ok(())
    }
}
