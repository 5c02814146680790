//! # Storefront Configuration
//!
//! Configuration for the catalog source, the pricing policy and display.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     STOREFRONT_CATALOG_URL=http://localhost:3000/products              │
//! │     STOREFRONT_EXCHANGE_RATE=16250                                     │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/storefront/storefront.toml (Linux)                       │
//! │     ~/Library/Application Support/com.storefront.storefront/... (mac) │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     fakestoreapi.com, 15 000 IDR/USD, DISKON20, 50% cap                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # storefront.toml
//! [catalog]
//! url = "https://fakestoreapi.com/products"
//! timeout_secs = 10     # omit for no timeout
//!
//! [pricing]
//! exchange_rate = 15000.0
//! large_order_threshold = 1000000
//! large_order_percent = 10
//! member_percent = 5
//! promo_code = "DISKON20"
//! promo_percent = 20
//! max_discount_percent = 50
//!
//! [display]
//! currency = "idr"      # idr | usd
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use storefront_core::validation::validate_exchange_rate;
use storefront_core::{
    DiscountPolicy, DiscountRate, ExchangeRate, Money, DEFAULT_EXCHANGE_RATE,
    DEFAULT_LARGE_ORDER_THRESHOLD, DEFAULT_PROMO_CODE, MAX_DISCOUNT_PERCENT,
};

use crate::error::{ClientError, ClientResult};

/// Catalog endpoint used when nothing is configured.
pub const DEFAULT_CATALOG_URL: &str = "https://fakestoreapi.com/products";

// =============================================================================
// Display Currency
// =============================================================================

/// Currency amounts are shown in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayCurrency {
    /// Indonesian rupiah, converted with the exchange rate.
    #[default]
    Idr,

    /// US dollars, the catalog's own currency.
    Usd,
}

impl std::fmt::Display for DisplayCurrency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DisplayCurrency::Idr => write!(f, "idr"),
            DisplayCurrency::Usd => write!(f, "usd"),
        }
    }
}

impl std::str::FromStr for DisplayCurrency {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "idr" | "rupiah" | "rp" => Ok(DisplayCurrency::Idr),
            "usd" | "dollar" | "$" => Ok(DisplayCurrency::Usd),
            other => Err(ClientError::InvalidConfig(format!(
                "Unknown display currency: '{}'. Valid options: idr, usd",
                other
            ))),
        }
    }
}

// =============================================================================
// Catalog Settings
// =============================================================================

/// Where the catalog comes from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogSettings {
    /// Endpoint returning a JSON array of products.
    #[serde(default = "default_catalog_url")]
    pub url: String,

    /// Request timeout (seconds). `None` waits indefinitely.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_catalog_url() -> String {
    DEFAULT_CATALOG_URL.to_string()
}

impl Default for CatalogSettings {
    fn default() -> Self {
        CatalogSettings {
            url: default_catalog_url(),
            timeout_secs: None,
        }
    }
}

// =============================================================================
// Pricing Settings
// =============================================================================

/// Exchange rate and discount bands.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingSettings {
    /// Display-currency units per catalog-currency unit.
    #[serde(default = "default_exchange_rate")]
    pub exchange_rate: f64,

    /// Subtotal (whole display-currency units) that must be exceeded.
    #[serde(default = "default_threshold")]
    pub large_order_threshold: i64,

    #[serde(default = "default_large_order_percent")]
    pub large_order_percent: u32,

    #[serde(default = "default_member_percent")]
    pub member_percent: u32,

    #[serde(default = "default_promo_code")]
    pub promo_code: String,

    #[serde(default = "default_promo_percent")]
    pub promo_percent: u32,

    #[serde(default = "default_max_discount_percent")]
    pub max_discount_percent: u32,
}

fn default_exchange_rate() -> f64 {
    DEFAULT_EXCHANGE_RATE as f64
}
fn default_threshold() -> i64 {
    DEFAULT_LARGE_ORDER_THRESHOLD
}
fn default_large_order_percent() -> u32 {
    10
}
fn default_member_percent() -> u32 {
    5
}
fn default_promo_code() -> String {
    DEFAULT_PROMO_CODE.to_string()
}
fn default_promo_percent() -> u32 {
    20
}
fn default_max_discount_percent() -> u32 {
    MAX_DISCOUNT_PERCENT
}

impl Default for PricingSettings {
    fn default() -> Self {
        PricingSettings {
            exchange_rate: default_exchange_rate(),
            large_order_threshold: default_threshold(),
            large_order_percent: default_large_order_percent(),
            member_percent: default_member_percent(),
            promo_code: default_promo_code(),
            promo_percent: default_promo_percent(),
            max_discount_percent: default_max_discount_percent(),
        }
    }
}

// =============================================================================
// Display Settings
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DisplaySettings {
    #[serde(default)]
    pub currency: DisplayCurrency,
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete storefront configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorefrontConfig {
    #[serde(default)]
    pub catalog: CatalogSettings,

    #[serde(default)]
    pub pricing: PricingSettings,

    #[serde(default)]
    pub display: DisplaySettings,
}

impl StorefrontConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (storefront.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ClientResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading storefront config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load storefront config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Parses configuration from TOML text (no file, no environment).
    pub fn from_toml_str(contents: &str) -> ClientResult<Self> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ClientResult<()> {
        let url = self.catalog_url()?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ClientError::InvalidUrl(format!(
                "Catalog URL must start with http:// or https://, got: {}",
                self.catalog.url
            )));
        }

        if self.catalog.timeout_secs == Some(0) {
            return Err(ClientError::InvalidConfig(
                "catalog.timeout_secs must be greater than 0".into(),
            ));
        }

        self.exchange_rate()?;
        self.discount_policy()?.validate()?;

        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Applies `STOREFRONT_*` overrides read through `lookup`.
    ///
    /// Values that fail to parse are logged and ignored.
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("STOREFRONT_CATALOG_URL") {
            debug!(url = %url, "Overriding catalog URL from environment");
            self.catalog.url = url;
        }

        if let Some(secs) = lookup("STOREFRONT_CATALOG_TIMEOUT_SECS") {
            match secs.parse::<u64>() {
                Ok(s) => self.catalog.timeout_secs = Some(s),
                Err(_) => warn!(value = %secs, "Ignoring invalid catalog timeout"),
            }
        }

        if let Some(rate) = lookup("STOREFRONT_EXCHANGE_RATE") {
            match rate.parse::<f64>() {
                Ok(r) => {
                    debug!(rate = r, "Overriding exchange rate from environment");
                    self.pricing.exchange_rate = r;
                }
                Err(_) => warn!(value = %rate, "Ignoring invalid exchange rate"),
            }
        }

        if let Some(code) = lookup("STOREFRONT_PROMO_CODE") {
            self.pricing.promo_code = code;
        }

        if let Some(currency) = lookup("STOREFRONT_CURRENCY") {
            match currency.parse() {
                Ok(parsed) => self.display.currency = parsed,
                Err(e) => warn!(error = %e, "Ignoring display currency from environment"),
            }
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "storefront", "storefront")
            .map(|dirs| dirs.config_dir().join("storefront.toml"))
    }

    // =========================================================================
    // Derived Values
    // =========================================================================

    pub fn catalog_url(&self) -> ClientResult<Url> {
        Ok(Url::parse(&self.catalog.url)?)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.catalog.timeout_secs.map(Duration::from_secs)
    }

    pub fn exchange_rate(&self) -> ClientResult<ExchangeRate> {
        Ok(validate_exchange_rate(self.pricing.exchange_rate)?)
    }

    /// Builds the discount policy described by `[pricing]`.
    pub fn discount_policy(&self) -> ClientResult<DiscountPolicy> {
        let p = &self.pricing;
        let percents = [
            p.large_order_percent,
            p.member_percent,
            p.promo_percent,
            p.max_discount_percent,
        ];
        if percents.iter().any(|&pct| pct > 100) {
            return Err(ClientError::InvalidConfig(
                "discount percentages must be between 0 and 100".into(),
            ));
        }

        let threshold = p.large_order_threshold.checked_mul(100).ok_or_else(|| {
            ClientError::InvalidConfig("large_order_threshold is too large".into())
        })?;

        Ok(DiscountPolicy {
            large_order_threshold: Money::from_minor(threshold),
            large_order_discount: DiscountRate::from_percent(p.large_order_percent),
            member_discount: DiscountRate::from_percent(p.member_percent),
            promo_code: p.promo_code.trim().to_string(),
            promo_discount: DiscountRate::from_percent(p.promo_percent),
            max_discount: DiscountRate::from_percent(p.max_discount_percent),
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = StorefrontConfig::default();
        assert!(config.validate().is_ok());

        assert_eq!(config.catalog.url, DEFAULT_CATALOG_URL);
        assert!(config.timeout().is_none());
        assert_eq!(
            config.exchange_rate().unwrap(),
            ExchangeRate::from_units(15_000)
        );
        assert_eq!(config.discount_policy().unwrap(), DiscountPolicy::default());
        assert_eq!(config.display.currency, DisplayCurrency::Idr);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config = StorefrontConfig::from_toml_str(
            r#"
            [catalog]
            url = "http://localhost:8080/products"
            timeout_secs = 5

            [pricing]
            promo_code = "HEMAT10"
            "#,
        )
        .unwrap();

        assert_eq!(config.timeout(), Some(Duration::from_secs(5)));
        assert_eq!(config.pricing.promo_code, "HEMAT10");
        assert_eq!(config.pricing.member_percent, 5);
        assert_eq!(config.discount_policy().unwrap().promo_code, "HEMAT10");
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = StorefrontConfig::default();
        config.catalog.url = "ftp://example.com/products".into();
        assert!(matches!(config.validate(), Err(ClientError::InvalidUrl(_))));

        let mut config = StorefrontConfig::default();
        config.pricing.exchange_rate = 0.0;
        assert!(config.validate().is_err());

        let mut config = StorefrontConfig::default();
        config.pricing.max_discount_percent = 150;
        assert!(config.validate().is_err());

        let mut config = StorefrontConfig::default();
        config.catalog.timeout_secs = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_discount_cap_above_fifty_is_rejected() {
        let toml = r#"
            [pricing]
            promo_percent = 40
            max_discount_percent = 80
        "#;

        let err = StorefrontConfig::from_toml_str(toml).unwrap_err();
        assert!(err.is_config_error(), "{:?}", err);

        let at_cap = "[pricing]\nmax_discount_percent = 50\n";
        assert!(StorefrontConfig::from_toml_str(at_cap).is_ok());
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            ("STOREFRONT_CATALOG_URL", "http://127.0.0.1:9000/products"),
            ("STOREFRONT_EXCHANGE_RATE", "16250.5"),
            ("STOREFRONT_CURRENCY", "usd"),
            ("STOREFRONT_CATALOG_TIMEOUT_SECS", "not-a-number"),
        ]
        .into_iter()
        .collect();

        let mut config = StorefrontConfig::default();
        config.apply_overrides_from(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.catalog.url, "http://127.0.0.1:9000/products");
        assert_eq!(
            config.exchange_rate().unwrap(),
            ExchangeRate::from_scaled(162_505_000)
        );
        assert_eq!(config.display.currency, DisplayCurrency::Usd);
        assert!(config.timeout().is_none());
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("storefront-{}.toml", uuid::Uuid::new_v4()));
        std::fs::write(&path, "[display]\ncurrency = \"usd\"\n").unwrap();

        let config = StorefrontConfig::load(Some(path.clone()));
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.unwrap().display.currency, DisplayCurrency::Usd);
    }

    #[test]
    fn test_load_or_default_survives_garbage() {
        let path = std::env::temp_dir().join(format!("storefront-{}.toml", uuid::Uuid::new_v4()));
        std::fs::write(&path, "this is = = not toml").unwrap();

        let config = StorefrontConfig::load_or_default(Some(path.clone()));
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.catalog.url, DEFAULT_CATALOG_URL);
    }

    #[test]
    fn test_display_currency_parse() {
        assert_eq!("IDR".parse::<DisplayCurrency>().unwrap(), DisplayCurrency::Idr);
        assert_eq!("usd".parse::<DisplayCurrency>().unwrap(), DisplayCurrency::Usd);
        assert!("eur".parse::<DisplayCurrency>().is_err());
    }
}
