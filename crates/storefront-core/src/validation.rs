//! # Validation Module
//!
//! Input validation for the storefront.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Remote catalog (untrusted JSON)                              │
//! │  ├── Deserialization into wire records                                 │
//! │  └── THIS MODULE: title, price, rating rules per record                │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Shopper input (search box, promo field)                      │
//! │  └── THIS MODULE: trimming and length checks                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Domain types                                                 │
//! │  ├── CartLedger cannot hold duplicates                                 │
//! │  └── DiscountPolicy clamps the discount                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use storefront_core::validation::{validate_price, validate_search_query};
//!
//! let price = validate_price(109.95).unwrap();
//! assert_eq!(price.minor_units(), 10995);
//!
//! let query = validate_search_query("  Ring ").unwrap();
//! assert_eq!(query, "Ring");
//! ```

use crate::error::ValidationError;
use crate::money::{Money, MINOR_PER_MAJOR};
use crate::types::{ExchangeRate, Rating};
use crate::MAX_SEARCH_QUERY_LEN;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Highest catalog price accepted, in major units.
pub const MAX_PRICE: f64 = 1_000_000_000.0;

/// Longest product title accepted from the catalog.
pub const MAX_TITLE_LEN: usize = 500;

/// Highest rating score.
pub const MAX_RATING: f64 = 5.0;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product title from the catalog.
///
/// ## Rules
/// - Must not be blank
/// - At most 500 characters
///
/// ## Returns
/// The trimmed title.
pub fn validate_product_title(title: &str) -> ValidationResult<String> {
    let title = title.trim();

    if title.is_empty() {
        return Err(ValidationError::Required {
            field: "title".to_string(),
        });
    }

    if title.chars().count() > MAX_TITLE_LEN {
        return Err(ValidationError::TooLong {
            field: "title".to_string(),
            max: MAX_TITLE_LEN,
        });
    }

    Ok(title.to_string())
}

/// Validates a search query.
///
/// ## Rules
/// - Can be empty (matches the whole catalog)
/// - Maximum 100 characters after trimming
///
/// ## Returns
/// The trimmed query string.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.chars().count() > MAX_SEARCH_QUERY_LEN {
        return Err(ValidationError::TooLong {
            field: "query".to_string(),
            max: MAX_SEARCH_QUERY_LEN,
        });
    }

    Ok(query.to_string())
}

/// Normalizes the promo code typed by the shopper.
///
/// Never fails: any text is a candidate code, and whether it is recognised
/// is decided by the pricing engine. Blank input means "no code".
///
/// ## Example
/// ```rust
/// use storefront_core::validation::normalize_promo_code;
///
/// assert_eq!(normalize_promo_code(" DISKON20 ").as_deref(), Some("DISKON20"));
/// assert_eq!(normalize_promo_code("DISKON 20").as_deref(), Some("DISKON 20"));
/// assert_eq!(normalize_promo_code("   "), None);
/// ```
pub fn normalize_promo_code(code: &str) -> Option<String> {
    let code = code.trim();
    (!code.is_empty()).then(|| code.to_string())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a decimal price from the catalog and converts it to [`Money`].
///
/// ## Rules
/// - Must be finite
/// - Must be non-negative (zero is a free item)
/// - At most [`MAX_PRICE`], so converted cart totals stay within range
/// - Rounded half away from zero to two decimals
///
/// ## Example
/// ```rust
/// use storefront_core::validation::validate_price;
///
/// assert_eq!(validate_price(22.3).unwrap().minor_units(), 2230);
/// assert!(validate_price(-1.0).is_err());
/// assert!(validate_price(f64::NAN).is_err());
/// ```
pub fn validate_price(price: f64) -> ValidationResult<Money> {
    if !price.is_finite() {
        return Err(ValidationError::NotFinite {
            field: "price".to_string(),
        });
    }

    if !(0.0..=MAX_PRICE).contains(&price) {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0.0,
            max: MAX_PRICE,
        });
    }

    Ok(Money::from_minor((price * MINOR_PER_MAJOR as f64).round() as i64))
}

/// Validates a rating summary.
///
/// ## Rules
/// - `rate` must be finite and within 0..=5
pub fn validate_rating(rate: f64, count: u32) -> ValidationResult<Rating> {
    if !rate.is_finite() {
        return Err(ValidationError::NotFinite {
            field: "rating".to_string(),
        });
    }

    if !(0.0..=MAX_RATING).contains(&rate) {
        return Err(ValidationError::OutOfRange {
            field: "rating".to_string(),
            min: 0.0,
            max: MAX_RATING,
        });
    }

    Ok(Rating { rate, count })
}

/// Validates a configured exchange rate.
///
/// ## Rules
/// - Must be finite and strictly positive
/// - Must fit the fixed-point representation
pub fn validate_exchange_rate(rate: f64) -> ValidationResult<ExchangeRate> {
    if !rate.is_finite() {
        return Err(ValidationError::NotFinite {
            field: "exchange_rate".to_string(),
        });
    }

    ExchangeRate::from_f64(rate).ok_or_else(|| ValidationError::OutOfRange {
        field: "exchange_rate".to_string(),
        min: 1.0 / ExchangeRate::SCALE as f64,
        max: u32::MAX as f64,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_product_title() {
        assert_eq!(
            validate_product_title("  Mens Cotton Jacket ").unwrap(),
            "Mens Cotton Jacket"
        );
        assert!(validate_product_title("").is_err());
        assert!(validate_product_title("   ").is_err());
        assert!(validate_product_title(&"A".repeat(600)).is_err());
    }

    #[test]
    fn test_validate_search_query() {
        assert_eq!(validate_search_query("").unwrap(), "");
        assert_eq!(validate_search_query("   ").unwrap(), "");
        assert_eq!(validate_search_query(" ring ").unwrap(), "ring");
        assert!(validate_search_query(&"a".repeat(100)).is_ok());
        assert!(matches!(
            validate_search_query(&"a".repeat(101)),
            Err(ValidationError::TooLong { max: 100, .. })
        ));
    }

    #[test]
    fn test_normalize_promo_code() {
        assert_eq!(
            normalize_promo_code("DISKON20"),
            Some("DISKON20".to_string())
        );
        assert_eq!(normalize_promo_code("   "), None);
        assert_eq!(normalize_promo_code(""), None);
        assert_eq!(normalize_promo_code("50%OFF"), Some("50%OFF".to_string()));

        let long = "X".repeat(40);
        assert_eq!(normalize_promo_code(&long), Some(long));
    }

    #[test]
    fn test_validate_price() {
        assert_eq!(validate_price(0.0).unwrap(), Money::zero());
        assert_eq!(validate_price(109.95).unwrap(), Money::from_minor(10995));
        assert_eq!(validate_price(7.95).unwrap(), Money::from_minor(795));

        assert!(matches!(
            validate_price(-0.01),
            Err(ValidationError::OutOfRange { .. })
        ));
        assert!(matches!(
            validate_price(f64::INFINITY),
            Err(ValidationError::NotFinite { .. })
        ));
    }

    #[test]
    fn test_validate_price_upper_bound() {
        assert_eq!(
            validate_price(MAX_PRICE).unwrap(),
            Money::from_major(1_000_000_000)
        );
        assert!(validate_price(1_000_000_000.01).is_err());
        assert!(validate_price(1e13).is_err());
        assert!(validate_price(6e16).is_err());

        // The largest accepted price still converts at the default rate
        let idr = validate_price(MAX_PRICE)
            .unwrap()
            .convert(ExchangeRate::from_units(crate::DEFAULT_EXCHANGE_RATE));
        assert_eq!(idr, Money::from_major(15_000_000_000_000));
    }

    #[test]
    fn test_validate_rating() {
        assert_eq!(
            validate_rating(3.9, 120).unwrap(),
            Rating {
                rate: 3.9,
                count: 120
            }
        );
        assert!(validate_rating(0.0, 0).is_ok());
        assert!(validate_rating(5.0, 1).is_ok());
        assert!(validate_rating(5.1, 1).is_err());
        assert!(validate_rating(-0.5, 1).is_err());
        assert!(validate_rating(f64::NAN, 1).is_err());
    }

    #[test]
    fn test_validate_exchange_rate() {
        assert_eq!(
            validate_exchange_rate(15_000.0).unwrap(),
            ExchangeRate::from_units(15_000)
        );
        assert!(validate_exchange_rate(0.0).is_err());
        assert!(validate_exchange_rate(-3.0).is_err());
        assert!(validate_exchange_rate(f64::NAN).is_err());
    }
}
