//! # Client Error Types
//!
//! Error types for configuration, catalog loading and session operations.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Client Error Categories                            │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │   Transport     │  │     Catalog Payload     │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidConfig  │  │  RequestFailed  │  │  MalformedCatalog       │ │
//! │  │  InvalidUrl     │  │  HttpStatus     │  │                         │ │
//! │  │  ConfigLoad     │  │  Timeout        │  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐                              │
//! │  │     Domain      │  │    Lifecycle    │                              │
//! │  │                 │  │                 │                              │
//! │  │  Core(..)       │  │  Abandoned      │                              │
//! │  │                 │  │  ChannelError   │                              │
//! │  └─────────────────┘  └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use storefront_core::{CoreError, ValidationError};
use thiserror::Error;

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Client error type covering every failure outside the pure core.
#[derive(Debug, Error)]
pub enum ClientError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Configuration values that make no sense together.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Catalog URL could not be parsed.
    #[error("Invalid catalog URL: {0}")]
    InvalidUrl(String),

    /// Config file could not be read or parsed.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    // =========================================================================
    // Transport Errors
    // =========================================================================
    /// Request never produced a response (DNS, refused, TLS, ...).
    #[error("Catalog request failed: {0}")]
    RequestFailed(String),

    /// Server answered with a non-success status.
    #[error("Catalog server returned HTTP {status}")]
    HttpStatus { status: u16 },

    /// No response within the configured timeout.
    #[error("Catalog request timed out after {0} seconds")]
    Timeout(u64),

    // =========================================================================
    // Payload Errors
    // =========================================================================
    /// Body was not a JSON array of product records.
    #[error("Malformed catalog: {0}")]
    MalformedCatalog(String),

    // =========================================================================
    // Domain Errors
    // =========================================================================
    /// Error raised by storefront-core.
    #[error(transparent)]
    Core(#[from] CoreError),

    // =========================================================================
    // Lifecycle Errors
    // =========================================================================
    /// The load was abandoned before it finished.
    #[error("Catalog load was abandoned")]
    Abandoned,

    /// Channel send/receive failed.
    #[error("Channel error: {0}")]
    ChannelError(String),
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<ValidationError> for ClientError {
    fn from(err: ValidationError) -> Self {
        ClientError::Core(CoreError::Validation(err))
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::MalformedCatalog(err.to_string())
        } else if let Some(status) = err.status() {
            ClientError::HttpStatus {
                status: status.as_u16(),
            }
        } else {
            ClientError::RequestFailed(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::MalformedCatalog(err.to_string())
    }
}

impl From<url::ParseError> for ClientError {
    fn from(err: url::ParseError) -> Self {
        ClientError::InvalidUrl(err.to_string())
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        ClientError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for ClientError {
    fn from(err: toml::de::Error) -> Self {
        ClientError::ConfigLoadFailed(err.to_string())
    }
}

// =============================================================================
// Error Categorization
// =============================================================================

impl ClientError {
    /// Returns true if this error ends a catalog load in the `Failed` state.
    ///
    /// Abandonment is not a failure: the catalog goes back to `NotLoaded`.
    pub fn is_load_failure(&self) -> bool {
        matches!(
            self,
            ClientError::RequestFailed(_)
                | ClientError::HttpStatus { .. }
                | ClientError::Timeout(_)
                | ClientError::MalformedCatalog(_)
        )
    }

    /// Returns true if the error came from configuration.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            ClientError::InvalidConfig(_)
                | ClientError::InvalidUrl(_)
                | ClientError::ConfigLoadFailed(_)
                | ClientError::Core(CoreError::InvalidDiscountPolicy { .. })
                | ClientError::Core(CoreError::InvalidExchangeRate { .. })
        )
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_core::ProductId;

    #[test]
    fn test_error_display() {
        assert_eq!(
            ClientError::HttpStatus { status: 503 }.to_string(),
            "Catalog server returned HTTP 503"
        );
        assert_eq!(
            ClientError::Timeout(10).to_string(),
            "Catalog request timed out after 10 seconds"
        );
    }

    #[test]
    fn test_core_error_is_transparent() {
        let err: ClientError = CoreError::ProductNotFound(ProductId::new(3)).into();
        assert_eq!(err.to_string(), "Product not found: 3");
        assert!(!err.is_load_failure());
    }

    #[test]
    fn test_load_failure_categorization() {
        assert!(ClientError::RequestFailed("refused".into()).is_load_failure());
        assert!(ClientError::HttpStatus { status: 500 }.is_load_failure());
        assert!(ClientError::MalformedCatalog("not an array".into()).is_load_failure());
        assert!(!ClientError::Abandoned.is_load_failure());
        assert!(!ClientError::InvalidConfig("x".into()).is_load_failure());
    }

    #[test]
    fn test_serde_json_error_is_malformed_catalog() {
        let err = serde_json::from_str::<Vec<u8>>("{").unwrap_err();
        assert!(matches!(
            ClientError::from(err),
            ClientError::MalformedCatalog(_)
        ));
    }

    #[test]
    fn test_config_categorization() {
        let err: ClientError = url::Url::parse("not a url").unwrap_err().into();
        assert!(err.is_config_error());

        let err: ClientError = CoreError::InvalidDiscountPolicy {
            reason: "cap".into(),
        }
        .into();
        assert!(err.is_config_error());
        assert!(!ClientError::Core(CoreError::EmptyCart).is_config_error());
    }
}
