//! Live availability feed sources
//!
//! The pipeline obtains its raw feed through the [`FeedSource`] trait so the
//! fetch step can be swapped for a snapshot in tests or offline runs.
//!
//! - [`HttpFeedSource`] performs the single GET against the live endpoint
//! - [`StaticFeedSource`] serves a fixed in-memory document
//! - [`SnapshotFeedSource`] re-reads a saved JSON document on every fetch

use crate::app::models::FeedDocument;
use crate::config::PipelineConfig;
use crate::error::FetchError;
use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Anything that can produce one raw feed document per call
#[async_trait]
pub trait FeedSource: Send + Sync + std::fmt::Debug {
    /// Fetch the current feed document
    async fn fetch(&self) -> std::result::Result<FeedDocument, FetchError>;

    /// Human-readable origin used in log messages
    fn origin(&self) -> String;
}

/// Feed source backed by the live HTTP endpoint
///
/// No retries are attempted; the caller decides whether to run again.
#[derive(Debug, Clone)]
pub struct HttpFeedSource {
    client: Client,
    url: String,
    timeout_ms: Option<u64>,
}

impl HttpFeedSource {
    /// Create a source from pipeline configuration
    ///
    /// `fetch_timeout_ms`, when set, bounds the whole request including the
    /// body download.
    pub fn new(config: &PipelineConfig) -> Result<Self> {
        let mut builder = Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout_ms) = config.fetch_timeout_ms {
            builder = builder.timeout(Duration::from_millis(timeout_ms));
        }

        let client = builder
            .build()
            .map_err(|e| Error::configuration(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            url: config.feed_url.clone(),
            timeout_ms: config.fetch_timeout_ms,
        })
    }

    fn convert_reqwest_error(&self, error: &reqwest::Error) -> FetchError {
        if error.is_timeout() {
            return FetchError::Timeout {
                url: self.url.clone(),
                timeout_ms: self.timeout_ms.unwrap_or_default(),
            };
        }

        if let Some(status) = error.status() {
            return FetchError::Http {
                url: self.url.clone(),
                status: status.as_u16(),
            };
        }

        FetchError::Network {
            url: self.url.clone(),
            message: error.to_string(),
        }
    }
}

#[async_trait]
impl FeedSource for HttpFeedSource {
    async fn fetch(&self) -> std::result::Result<FeedDocument, FetchError> {
        debug!("Fetching carpark availability from {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| self.convert_reqwest_error(&e))?
            .error_for_status()
            .map_err(|e| self.convert_reqwest_error(&e))?;

        let body = response
            .bytes()
            .await
            .map_err(|e| self.convert_reqwest_error(&e))?;

        let document: FeedDocument = serde_json::from_slice(&body)
            .map_err(|e| FetchError::malformed(&self.url, e.to_string()))?;

        info!(
            "Fetched {} reading groups ({} bytes) from {}",
            document.items.len(),
            body.len(),
            self.url
        );

        Ok(document)
    }

    fn origin(&self) -> String {
        self.url.clone()
    }
}

/// Feed source serving a fixed document
#[derive(Debug, Clone)]
pub struct StaticFeedSource {
    document: FeedDocument,
}

impl StaticFeedSource {
    pub fn new(document: FeedDocument) -> Self {
        Self { document }
    }

    /// Parse a feed document from JSON text
    pub fn from_json(json: &str) -> std::result::Result<Self, FetchError> {
        let document = serde_json::from_str(json)
            .map_err(|e| FetchError::malformed("inline document", e.to_string()))?;
        Ok(Self::new(document))
    }
}

#[async_trait]
impl FeedSource for StaticFeedSource {
    async fn fetch(&self) -> std::result::Result<FeedDocument, FetchError> {
        Ok(self.document.clone())
    }

    fn origin(&self) -> String {
        "static document".to_string()
    }
}

/// Feed source reading a saved feed response from disk on every fetch
#[derive(Debug, Clone)]
pub struct SnapshotFeedSource {
    path: PathBuf,
}

impl SnapshotFeedSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl FeedSource for SnapshotFeedSource {
    async fn fetch(&self) -> std::result::Result<FeedDocument, FetchError> {
        let content = tokio::fs::read(&self.path)
            .await
            .map_err(|source| FetchError::Snapshot {
                path: self.path.clone(),
                source,
            })?;

        serde_json::from_slice(&content)
            .map_err(|e| FetchError::malformed(self.path.display().to_string(), e.to_string()))
    }

    fn origin(&self) -> String {
        self.path.display().to_string()
    }
}
