//! # Domain Types
//!
//! Core domain types used throughout the storefront.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │  ExchangeRate   │   │  DiscountRate   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (ProductId) │   │  scaled (u64)   │   │  bps (u32)      │       │
//! │  │  title          │   │  15000.0000 =   │   │  3500 = 35%     │       │
//! │  │  price (Money)  │   │  150_000_000    │   │                 │       │
//! │  │  category       │   └─────────────────┘   └─────────────────┘       │
//! │  │  rating         │                                                    │
//! │  │  image          │                                                    │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Products are immutable once loaded. The only way to build one from
//! untrusted input is through the ingestion step in `storefront-client`,
//! which runs every field through [`crate::validation`].

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Product Identifier
// =============================================================================

/// Stable product identifier assigned by the remote catalog.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[serde(transparent)]
#[ts(export)]
pub struct ProductId(u64);

impl ProductId {
    #[inline]
    pub const fn new(id: u64) -> Self {
        ProductId(id)
    }

    #[inline]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

impl From<u64> for ProductId {
    fn from(id: u64) -> Self {
        ProductId(id)
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// Rating
// =============================================================================

/// Customer rating summary.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Rating {
    /// Average score, 0 to 5.
    pub rate: f64,
    /// Number of reviews behind the score.
    pub count: u32,
}

// =============================================================================
// Product
// =============================================================================

/// A product available in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    /// Unique identifier from the catalog source.
    pub id: ProductId,

    /// Display title; the search box matches against this.
    pub title: String,

    /// Unit price in the catalog's native currency (minor units).
    pub price: Money,

    /// Free-form category label ("electronics", "jewelery", ...).
    pub category: String,

    /// Optional long description.
    pub description: Option<String>,

    /// Opaque image reference (usually a URL).
    pub image: String,

    /// Rating summary.
    pub rating: Rating,
}

impl Product {
    /// Returns the unit price converted into the display currency.
    #[inline]
    pub fn display_price(&self, rate: ExchangeRate) -> Money {
        self.price.convert(rate)
    }
}

// =============================================================================
// Exchange Rate
// =============================================================================

/// Multiplicative conversion from the catalog currency to the display currency.
///
/// ## Why Fixed Point?
/// The rate is stored with four decimals (×10 000) so conversions stay in
/// integer arithmetic. 15 000 IDR/USD is stored as 150 000 000.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ExchangeRate(u64);

impl ExchangeRate {
    /// Fixed-point scale (four decimal places).
    pub const SCALE: u64 = 10_000;

    /// Creates a rate from its fixed-point representation.
    #[inline]
    pub const fn from_scaled(scaled: u64) -> Self {
        ExchangeRate(scaled)
    }

    /// Creates a whole-number rate, e.g. `from_units(15_000)`.
    #[inline]
    pub const fn from_units(units: u32) -> Self {
        ExchangeRate(units as u64 * Self::SCALE)
    }

    /// Creates a rate from a decimal (for configuration files).
    ///
    /// Returns `None` for zero, negative, non-finite or absurdly large values.
    pub fn from_f64(rate: f64) -> Option<Self> {
        if !rate.is_finite() || rate <= 0.0 {
            return None;
        }
        let scaled = (rate * Self::SCALE as f64).round();
        if scaled < 1.0 || scaled > u32::MAX as f64 * Self::SCALE as f64 {
            return None;
        }
        Some(ExchangeRate(scaled as u64))
    }

    /// The identity rate (display currency equals catalog currency).
    #[inline]
    pub const fn identity() -> Self {
        ExchangeRate(Self::SCALE)
    }

    /// Returns the fixed-point representation.
    #[inline]
    pub const fn scaled(&self) -> u64 {
        self.0
    }

    /// Returns the rate as a decimal (for display only).
    #[inline]
    pub fn as_f64(&self) -> f64 {
        self.0 as f64 / Self::SCALE as f64
    }
}

impl Default for ExchangeRate {
    fn default() -> Self {
        ExchangeRate::from_units(crate::DEFAULT_EXCHANGE_RATE)
    }
}

// =============================================================================
// Discount Rate
// =============================================================================

/// Discount represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01%. Every band in the pricing engine is a whole
/// percentage, but keeping bps leaves room for 2.5% style promotions
/// without touching the arithmetic.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct DiscountRate(u32);

impl DiscountRate {
    /// Basis points in 100%.
    pub const BPS_PER_WHOLE: u32 = 10_000;

    /// Creates a discount from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        DiscountRate(bps)
    }

    /// Creates a discount from whole percentage points.
    #[inline]
    pub const fn from_percent(points: u32) -> Self {
        DiscountRate(points * 100)
    }

    /// Zero discount.
    #[inline]
    pub const fn zero() -> Self {
        DiscountRate(0)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percent(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Checks if the discount is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Adds another band without overflowing.
    #[inline]
    pub const fn saturating_add(self, other: DiscountRate) -> Self {
        DiscountRate(self.0.saturating_add(other.0))
    }

    /// Clamps to `cap`. Values above the cap are truncated, never rejected.
    #[inline]
    pub fn capped_at(self, cap: DiscountRate) -> Self {
        self.min(cap)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_id_serializes_as_number() {
        let id = ProductId::new(42);
        assert_eq!(serde_json::to_string(&id).unwrap(), "42");
        assert_eq!(id.to_string(), "42");
    }

    #[test]
    fn test_exchange_rate_from_units() {
        let rate = ExchangeRate::from_units(15_000);
        assert_eq!(rate.scaled(), 150_000_000);
        assert!((rate.as_f64() - 15_000.0).abs() < f64::EPSILON);
        assert_eq!(ExchangeRate::default(), rate);
    }

    #[test]
    fn test_exchange_rate_from_f64() {
        assert_eq!(
            ExchangeRate::from_f64(15_000.0),
            Some(ExchangeRate::from_units(15_000))
        );
        assert_eq!(
            ExchangeRate::from_f64(0.9234),
            Some(ExchangeRate::from_scaled(9_234))
        );
        assert_eq!(ExchangeRate::from_f64(0.0), None);
        assert_eq!(ExchangeRate::from_f64(-1.0), None);
        assert_eq!(ExchangeRate::from_f64(f64::NAN), None);
    }

    #[test]
    fn test_discount_rate_percent() {
        let rate = DiscountRate::from_percent(35);
        assert_eq!(rate.bps(), 3_500);
        assert!((rate.percent() - 35.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_discount_rate_cap() {
        let total = DiscountRate::from_percent(40).saturating_add(DiscountRate::from_percent(20));
        assert_eq!(total.capped_at(DiscountRate::from_percent(50)).bps(), 5_000);
        assert_eq!(
            DiscountRate::from_percent(15).capped_at(DiscountRate::from_percent(50)),
            DiscountRate::from_percent(15)
        );
    }
}
