//! # Pricing Engine
//!
//! Derives the payable amount from a subtotal with a tiered discount policy.
//!
//! ## Discount Bands
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Tiered, Additive, Capped                            │
//! │                                                                         │
//! │  Band           Condition                         Points                │
//! │  ────           ─────────                         ──────                │
//! │  LargeOrder     subtotal  >  Rp 1.000.000         +10                   │
//! │  Membership     is_member                         + 5                   │
//! │  PromoCode      code == "DISKON20"                +20                   │
//! │                                                   ─────                 │
//! │                                       sum, then   min(sum, 50)          │
//! │                                                                         │
//! │  final = subtotal × (1 − discount / 100)                                │
//! │                                                                         │
//! │  • Exactly Rp 1.000.000 does NOT trigger LargeOrder (strict >)          │
//! │  • An unknown promo code is a miss, not an error                        │
//! │  • Above the cap the discount is truncated, never rejected              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing here is cached. [`DiscountPolicy::compute`] is a pure function of
//! its inputs and the view recomputes it on every read.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::cart::CartLedger;
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{DiscountRate, ExchangeRate};
use crate::{DEFAULT_LARGE_ORDER_THRESHOLD, DEFAULT_PROMO_CODE, MAX_DISCOUNT_PERCENT};

// =============================================================================
// Discount Band
// =============================================================================

/// One independent rule contributing a fixed percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum DiscountBand {
    /// Subtotal above the large-order threshold.
    LargeOrder,
    /// Shopper is a member.
    Membership,
    /// Shopper entered the recognised promo code.
    PromoCode,
}

// =============================================================================
// Discount Result
// =============================================================================

/// Output of the pricing engine. Derived, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DiscountResult {
    /// Subtotal the discount was computed from.
    pub subtotal: Money,
    /// Total discount after the cap, in [0, 50]%.
    pub discount: DiscountRate,
    /// `subtotal - final_amount`.
    pub discount_amount: Money,
    /// Amount payable, in [0, subtotal].
    pub final_amount: Money,
    /// Bands that fired, in evaluation order.
    pub bands: Vec<DiscountBand>,
}

impl DiscountResult {
    /// Discount as a percentage (for display).
    pub fn discount_percent(&self) -> f64 {
        self.discount.percent()
    }

    /// True when the bands added up to more than the cap.
    pub fn was_capped(&self, policy: &DiscountPolicy) -> bool {
        policy.uncapped(&self.bands) > self.discount
    }
}

// =============================================================================
// Discount Policy
// =============================================================================

/// The discount rules. `Default` is the storefront's standing policy.
///
/// ## Example
/// ```rust
/// use storefront_core::money::Money;
/// use storefront_core::pricing::DiscountPolicy;
///
/// let policy = DiscountPolicy::default();
/// let result = policy.compute(Money::from_major(500_000), false, Some("WRONG"));
///
/// assert!(result.discount.is_zero());
/// assert_eq!(result.final_amount, Money::from_major(500_000));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountPolicy {
    /// Subtotal that must be strictly exceeded for [`DiscountBand::LargeOrder`].
    pub large_order_threshold: Money,
    pub large_order_discount: DiscountRate,
    pub member_discount: DiscountRate,
    /// Exact, case-sensitive code for [`DiscountBand::PromoCode`].
    pub promo_code: String,
    pub promo_discount: DiscountRate,
    /// Ceiling on the summed bands.
    pub max_discount: DiscountRate,
}

impl Default for DiscountPolicy {
    fn default() -> Self {
        DiscountPolicy {
            large_order_threshold: Money::from_major(DEFAULT_LARGE_ORDER_THRESHOLD),
            large_order_discount: DiscountRate::from_percent(10),
            member_discount: DiscountRate::from_percent(5),
            promo_code: DEFAULT_PROMO_CODE.to_string(),
            promo_discount: DiscountRate::from_percent(20),
            max_discount: DiscountRate::from_percent(MAX_DISCOUNT_PERCENT),
        }
    }
}

impl DiscountPolicy {
    /// Checks the policy is internally consistent.
    ///
    /// ## Rules
    /// - Cap must not exceed the 50% business ceiling
    /// - Threshold must not be negative
    /// - Promo code must not be blank (it would match an empty input)
    pub fn validate(&self) -> CoreResult<()> {
        if self.max_discount > DiscountRate::from_percent(MAX_DISCOUNT_PERCENT) {
            return Err(CoreError::InvalidDiscountPolicy {
                reason: format!(
                    "maximum discount {}% exceeds {}%",
                    self.max_discount.percent(),
                    MAX_DISCOUNT_PERCENT
                ),
            });
        }

        if self.large_order_threshold.is_negative() {
            return Err(CoreError::InvalidDiscountPolicy {
                reason: "large order threshold must not be negative".to_string(),
            });
        }

        if self.promo_code.trim().is_empty() {
            return Err(CoreError::InvalidDiscountPolicy {
                reason: "promo code must not be blank".to_string(),
            });
        }

        Ok(())
    }

    /// Evaluates every band against the inputs.
    ///
    /// ## Arguments
    /// * `subtotal` - Cart subtotal in the display currency. Negative
    ///   subtotals are treated as zero.
    /// * `is_member` - Membership flag selected by the shopper
    /// * `promo_code` - Code typed by the shopper, if any
    pub fn compute(
        &self,
        subtotal: Money,
        is_member: bool,
        promo_code: Option<&str>,
    ) -> DiscountResult {
        let subtotal = subtotal.max(Money::zero());
        let mut bands = Vec::with_capacity(3);

        if subtotal > self.large_order_threshold {
            bands.push(DiscountBand::LargeOrder);
        }
        if is_member {
            bands.push(DiscountBand::Membership);
        }
        if promo_code == Some(self.promo_code.as_str()) {
            bands.push(DiscountBand::PromoCode);
        }

        let discount = self.uncapped(&bands).capped_at(self.max_discount);
        let final_amount = subtotal.apply_discount(discount).max(Money::zero());

        DiscountResult {
            subtotal,
            discount,
            discount_amount: subtotal - final_amount,
            final_amount,
            bands,
        }
    }

    /// Points contributed by a single band.
    pub fn band_rate(&self, band: DiscountBand) -> DiscountRate {
        match band {
            DiscountBand::LargeOrder => self.large_order_discount,
            DiscountBand::Membership => self.member_discount,
            DiscountBand::PromoCode => self.promo_discount,
        }
    }

    fn uncapped(&self, bands: &[DiscountBand]) -> DiscountRate {
        bands
            .iter()
            .fold(DiscountRate::zero(), |acc, band| {
                acc.saturating_add(self.band_rate(*band))
            })
    }
}

/// Computes the discount with the default policy.
///
/// ## Example
/// ```rust
/// use storefront_core::money::Money;
/// use storefront_core::pricing::compute_discount;
///
/// // Exactly at the threshold: no large-order band
/// let at = compute_discount(Money::from_major(1_000_000), false, None);
/// assert!(at.discount.is_zero());
///
/// // One sen above it: the band applies
/// let above = compute_discount(Money::from_major_minor(1_000_000, 1), false, None);
/// assert_eq!(above.discount.percent(), 10.0);
/// ```
pub fn compute_discount(
    subtotal: Money,
    is_member: bool,
    promo_code: Option<&str>,
) -> DiscountResult {
    DiscountPolicy::default().compute(subtotal, is_member, promo_code)
}

// =============================================================================
// Checkout Summary
// =============================================================================

/// Everything the "shopping summary" panel shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CheckoutSummary {
    /// Distinct products in the cart.
    pub item_count: usize,
    /// Subtotal in the catalog currency.
    pub source_subtotal: Money,
    /// Rate used for the conversion.
    pub exchange_rate: ExchangeRate,
    /// Pricing outcome in the display currency.
    pub pricing: DiscountResult,
}

impl CheckoutSummary {
    /// Prices the ledger with explicit shopper selections.
    pub fn compute(
        ledger: &CartLedger,
        rate: ExchangeRate,
        policy: &DiscountPolicy,
        is_member: bool,
        promo_code: Option<&str>,
    ) -> Self {
        CheckoutSummary {
            item_count: ledger.len(),
            source_subtotal: ledger.source_subtotal(),
            exchange_rate: rate,
            pricing: policy.compute(ledger.subtotal(rate), is_member, promo_code),
        }
    }

    #[inline]
    pub fn subtotal(&self) -> Money {
        self.pricing.subtotal
    }

    #[inline]
    pub fn final_amount(&self) -> Money {
        self.pricing.final_amount
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
