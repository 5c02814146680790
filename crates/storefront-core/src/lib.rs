//! # storefront-core: Pure Business Logic for the Storefront
//!
//! This crate is the **heart** of the storefront. It contains the cart
//! ledger, the pricing engine and the catalog filter as pure functions with
//! zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Storefront Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    View Layer (external)                        │   │
//! │  │    Search box ──► Product grid ──► Cart badge ──► Summary      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │            storefront-client (Storefront session)               │   │
//! │  │    load_catalog, search, add_to_cart, summary, checkout        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ storefront-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   cart    │  │  pricing  │  │   │
//! │  │   │  Product  │  │   Money   │  │CartLedger │  │ Discount  │  │   │
//! │  │   │  Rates    │  │ convert   │  │ CartItem  │  │  Policy   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │   ┌───────────┐  ┌───────────┐                                 │   │
//! │  │   │  catalog  │  │validation │                                 │   │
//! │  │   │CatalogStore│ │  rules    │                                 │   │
//! │  │   └───────────┘  └───────────┘                                 │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • PURE FUNCTIONS                          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, ProductId, ExchangeRate, DiscountRate)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`cart`] - The cart ledger (unique by product id, insertion ordered)
//! - [`pricing`] - Tiered, additive, capped discount policy
//! - [`catalog`] - Catalog load state machine and text filter
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Example Usage
//!
//! ```rust
//! use storefront_core::money::Money;
//! use storefront_core::pricing::compute_discount;
//!
//! // Rp 1.200.000 for a member using the promo code
//! let subtotal = Money::from_major(1_200_000);
//! let result = compute_discount(subtotal, true, Some("DISKON20"));
//!
//! assert_eq!(result.discount.percent(), 35.0);
//! assert_eq!(result.final_amount, Money::from_major(780_000));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod catalog;
pub mod error;
pub mod money;
pub mod pricing;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use storefront_core::Money` instead of
// `use storefront_core::money::Money`

pub use cart::{CartItem, CartLedger};
pub use catalog::{
    Catalog, CatalogQuery, CatalogState, CatalogStatus, CatalogStore, CatalogView, LoadTicket,
};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use pricing::{compute_discount, CheckoutSummary};
pub use pricing::{DiscountBand, DiscountPolicy, DiscountResult};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Rupiah per US dollar used when no exchange rate is configured.
pub const DEFAULT_EXCHANGE_RATE: u32 = 15_000;

/// The one promo code the storefront recognises out of the box.
pub const DEFAULT_PROMO_CODE: &str = "DISKON20";

/// Subtotal (in major units of the display currency) that must be
/// *exceeded* for the large-order band to apply.
pub const DEFAULT_LARGE_ORDER_THRESHOLD: i64 = 1_000_000;

/// Hard ceiling on the combined discount, in percentage points.
///
/// ## Business Reason
/// Bands stack additively; the ceiling protects margin when they all fire.
pub const MAX_DISCOUNT_PERCENT: u32 = 50;

/// Maximum accepted length of a search query.
pub const MAX_SEARCH_QUERY_LEN: usize = 100;
