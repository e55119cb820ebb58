//! Download documents over HTTP with a size cap.

use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("server answered {0}")]
    Status(StatusCode),

    #[error("document too large: {size} bytes (max {max})")]
    TooLarge { size: usize, max: usize },

    #[error("reading body failed: {0}")]
    Body(#[source] reqwest::Error),
}

/// Fetches raw document bytes.
pub struct DocumentFetcher {
    client: reqwest::Client,
    max_bytes: usize,
}

impl DocumentFetcher {
    pub fn new(timeout: Duration, max_bytes: usize) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("readpal/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|e| {
                warn!(error = %e, "HTTP client setup failed, using defaults without timeout");
                reqwest::Client::new()
            });
        Self { client, max_bytes }
    }

    /// GET `url` and return its body, refusing bodies over the configured limit.
    pub async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let mut response = self.client.get(url).send().await.map_err(FetchError::Request)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        if let Some(len) = response.content_length() {
            self.check_size(usize::try_from(len).unwrap_or(usize::MAX))?;
        }

        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await.map_err(FetchError::Body)? {
            self.check_size(body.len().saturating_add(chunk.len()))?;
            body.extend_from_slice(&chunk);
        }

        debug!(url, bytes = body.len(), "Document fetched");
        Ok(body)
    }

    fn check_size(&self, size: usize) -> Result<(), FetchError> {
        if size > self.max_bytes {
            return Err(FetchError::TooLarge {
                size,
                max: self.max_bytes,
            });
        }
        Ok(())
    }
}
