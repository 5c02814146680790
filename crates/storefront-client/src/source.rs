//! # Catalog Sources
//!
//! Where the raw product records come from.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       CatalogSource seam                                │
//! │                                                                         │
//! │   CatalogLoader ──► dyn CatalogSource::fetch() ──► Vec<serde_json::Value>│
//! │                          │                                              │
//! │            ┌─────────────┴─────────────┐                                │
//! │            ▼                           ▼                                │
//! │   HttpCatalogSource            StaticCatalogSource                      │
//! │   GET catalog.url              fixed records or a fixed error           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Sources return raw JSON values so that ingestion can reject malformed
//! records one at a time instead of failing the whole body.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, instrument};
use url::Url;

use crate::config::StorefrontConfig;
use crate::error::{ClientError, ClientResult};
use crate::wire::decode_body;

/// Something that can produce the catalog's raw records.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Retrieves every record. Called once per load.
    async fn fetch(&self) -> ClientResult<Vec<Value>>;

    /// Short human-readable name for logs.
    fn describe(&self) -> String;
}

// =============================================================================
// HTTP Source
// =============================================================================

/// Fetches the catalog with a single HTTP GET.
#[derive(Debug, Clone)]
pub struct HttpCatalogSource {
    client: reqwest::Client,
    url: Url,
    timeout: Option<Duration>,
}

impl HttpCatalogSource {
    /// Creates a source with no request timeout.
    pub fn new(url: Url) -> ClientResult<Self> {
        Self::with_timeout(url, None)
    }

    /// Creates a source whose requests give up after `timeout`.
    pub fn with_timeout(url: Url, timeout: Option<Duration>) -> ClientResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| ClientError::InvalidConfig(format!("HTTP client: {}", e)))?;

        Ok(HttpCatalogSource {
            client,
            url,
            timeout,
        })
    }

    pub fn from_config(config: &StorefrontConfig) -> ClientResult<Self> {
        Self::with_timeout(config.catalog_url()?, config.timeout())
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    fn classify(&self, err: reqwest::Error) -> ClientError {
        if err.is_timeout() {
            ClientError::Timeout(self.timeout.map(|t| t.as_secs()).unwrap_or_default())
        } else {
            ClientError::from(err)
        }
    }
}

#[async_trait]
impl CatalogSource for HttpCatalogSource {
    #[instrument(skip(self), fields(url = %self.url))]
    async fn fetch(&self) -> ClientResult<Vec<Value>> {
        let response = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::HttpStatus {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|e| self.classify(e))?;
        debug!(bytes = body.len(), "Catalog response received");

        decode_body(&body)
    }

    fn describe(&self) -> String {
        self.url.to_string()
    }
}

// =============================================================================
// Static Source
// =============================================================================

/// A source that always answers the same way.
///
/// Useful for offline demos and for driving the session without a network.
#[derive(Debug, Clone)]
pub struct StaticCatalogSource {
    outcome: Result<Vec<Value>, String>,
}

impl StaticCatalogSource {
    pub fn new(records: Vec<Value>) -> Self {
        StaticCatalogSource {
            outcome: Ok(records),
        }
    }

    /// A source whose every fetch fails with a transport error.
    pub fn failing(message: impl Into<String>) -> Self {
        StaticCatalogSource {
            outcome: Err(message.into()),
        }
    }
}

#[async_trait]
impl CatalogSource for StaticCatalogSource {
    async fn fetch(&self) -> ClientResult<Vec<Value>> {
        self.outcome
            .clone()
            .map_err(ClientError::RequestFailed)
    }

    fn describe(&self) -> String {
        "static catalog".to_string()
    }
}
