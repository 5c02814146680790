//! # Error Types
//!
//! Domain-specific error types for storefront-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  storefront-core errors (this file)                                    │
//! │  ├── CoreError        - General domain errors                          │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  storefront-client errors (separate crate)                             │
//! │  └── ClientError      - Config, transport and session failures         │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ClientError → View layer          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Note what is *not* here: adding a product twice, removing a product that
//! is not in the cart and typing an unknown promo code all resolve silently.

use thiserror::Error;

use crate::types::ProductId;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product is not part of the loaded catalog.
    ///
    /// ## When This Occurs
    /// - The view asks to add an id it rendered from a stale catalog
    /// - The catalog has not finished loading yet
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    /// Checkout was requested with nothing in the cart.
    #[error("Cannot check out an empty cart")]
    EmptyCart,

    /// Exchange rate is zero, negative or not a number.
    #[error("Invalid exchange rate: {reason}")]
    InvalidExchangeRate { reason: String },

    /// Discount policy does not make sense (e.g. cap above 50%).
    #[error("Invalid discount policy: {reason}")]
    InvalidDiscountPolicy { reason: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when input doesn't meet requirements, either from the
/// user (search box, promo code field) or from the remote catalog.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: f64, max: f64 },

    /// Value is not a finite number.
    #[error("{field} must be a finite number")]
    NotFinite { field: String },

    /// Duplicate value (e.g. the same product id twice in one catalog).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::ProductNotFound(ProductId::new(7));
        assert_eq!(err.to_string(), "Product not found: 7");

        assert_eq!(
            CoreError::EmptyCart.to_string(),
            "Cannot check out an empty cart"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "title".to_string(),
        };
        assert_eq!(err.to_string(), "title is required");

        let err = ValidationError::OutOfRange {
            field: "rating".to_string(),
            min: 0.0,
            max: 5.0,
        };
        assert_eq!(err.to_string(), "rating must be between 0 and 5");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "title".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
