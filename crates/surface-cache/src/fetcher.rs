use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// A remote image reference could not be fetched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("fetch {url}: {reason}")]
pub struct FetchError {
    pub url: String,
    pub reason: String,
}

/// Seam for retrieving remote image bytes. The HTTP implementation is used
/// in production; tests substitute [`StaticFetcher`].
#[async_trait]
pub trait ImageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// reqwest-backed fetcher with a hard per-request timeout. Fetches must
/// finish well inside the host refresh cycle; a hung CDN should cost one
/// slot, not the surface.
#[derive(Clone)]
pub struct HttpImageFetcher {
    client: reqwest::Client,
}

impl HttpImageFetcher {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ImageFetcher for HttpImageFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let err = |reason: String| FetchError {
            url: url.to_string(),
            reason,
        };

        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| err(e.to_string()))?
            .error_for_status()
            .map_err(|e| err(e.to_string()))?;

        let bytes = resp.bytes().await.map_err(|e| err(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}

/// Map-backed fetcher for tests. Unknown urls fail; an optional delay makes
/// in-flight resolution observable for supersede tests.
#[derive(Default)]
pub struct StaticFetcher {
    responses: HashMap<String, Vec<u8>>,
    delay: Option<Duration>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the bytes served for `url`.
    pub fn with(mut self, url: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.responses.insert(url.into(), bytes);
        self
    }

    /// Delays every fetch by `delay`.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[async_trait]
impl ImageFetcher for StaticFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        if let Some(d) = self.delay {
            tokio::time::sleep(d).await;
        }
        self.responses.get(url).cloned().ok_or_else(|| FetchError {
            url: url.to_string(),
            reason: "no response registered".to_string(),
        })
    }
}
