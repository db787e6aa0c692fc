use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;
use tracing::debug;

/// Why a child playlist could not be retrieved.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The server answered with a non-success status.
    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    /// The request failed before a response arrived.
    #[error("{0}")]
    Request(#[from] reqwest::Error),

    /// Failures reported by other fetcher implementations.
    #[error("{0}")]
    Other(String),
}

/// Retrieves playlist text by absolute URL.
///
/// This is the only suspension point of HLS validation. Implementations own retries and
/// timeouts; the validator calls each URL at most once per top-level validation.
#[async_trait]
pub trait PlaylistFetcher: Send + Sync {
    async fn fetch_playlist(&self, url: &str) -> Result<String, FetchError>;
}

/// [`PlaylistFetcher`] over HTTP(S) with reqwest.
#[derive(Debug, Clone, Default)]
pub struct HttpPlaylistFetcher {
    client: Client,
}

impl HttpPlaylistFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: Client) -> Self {
        HttpPlaylistFetcher { client }
    }
}

#[async_trait]
impl PlaylistFetcher for HttpPlaylistFetcher {
    async fn fetch_playlist(&self, url: &str) -> Result<String, FetchError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            debug!(url, status = status.as_u16(), "playlist request failed");
            return Err(FetchError::Status { url: url.to_string(), status: status.as_u16() });
        }
        Ok(response.text().await?)
    }
}
