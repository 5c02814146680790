//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    109.95 * 15000 = 1649249.9999999998  ❌ WRONG!                       │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Minor Units                                      │
//! │    10995 cents × 15000 = 164925000 sen = Rp 1.649.250,00                │
//! │                                                                         │
//! │  Every amount carries two decimal places of minor units, whatever the  │
//! │  currency. Rupiah has no coins in practice, but the pricing threshold  │
//! │  is tested at Rp 1.000.000,01, so the sen have to exist.               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use storefront_core::money::Money;
//! use storefront_core::types::ExchangeRate;
//!
//! let price = Money::from_minor(10995); // $109.95
//! let rupiah = price.convert(ExchangeRate::from_units(15_000));
//! assert_eq!(rupiah, Money::from_major(1_649_250));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub, SubAssign};
use ts_rs::TS;

use crate::types::{DiscountRate, ExchangeRate};

/// Minor units per major unit (cents per dollar, sen per rupiah).
pub const MINOR_PER_MAJOR: i64 = 100;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit.
///
/// ## Design Decisions
/// - **i64 (signed)**: Subtraction stays total; the pricing engine never
///   produces negative amounts
/// - **Saturating**: Arithmetic clamps at the i64 bounds instead of
///   wrapping or panicking
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **No currency tag**: A cart holds one source currency and one display
///   currency; the [`ExchangeRate`] is the only bridge between them
///
/// ## User Workflow Context
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                    Where Money is Used                                  │
/// │                                                                         │
/// │  Product.price (USD) ──► CartLedger::source_subtotal                   │
/// │                               │                                         │
/// │                               ▼  × ExchangeRate                         │
/// │                         CartLedger::subtotal (IDR)                      │
/// │                               │                                         │
/// │                               ▼  DiscountPolicy::compute                │
/// │                         DiscountResult.final_amount ──► formatter      │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from minor units (cents, sen).
    ///
    /// ## Example
    /// ```rust
    /// use storefront_core::money::Money;
    ///
    /// let price = Money::from_minor(1099); // 10.99
    /// assert_eq!(price.minor_units(), 1099);
    /// ```
    #[inline]
    pub const fn from_minor(minor: i64) -> Self {
        Money(minor)
    }

    /// Creates a Money value from whole major units.
    ///
    /// ## Example
    /// ```rust
    /// use storefront_core::money::Money;
    ///
    /// let threshold = Money::from_major(1_000_000);
    /// assert_eq!(threshold.minor_units(), 100_000_000);
    /// ```
    #[inline]
    pub const fn from_major(major: i64) -> Self {
        Money(major * MINOR_PER_MAJOR)
    }

    /// Creates a Money value from major and minor parts.
    ///
    /// For negative amounts, only the major unit should be negative:
    /// `from_major_minor(-5, 50)` is -5.50, not -4.50.
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * MINOR_PER_MAJOR - minor)
        } else {
            Money(major * MINOR_PER_MAJOR + minor)
        }
    }

    /// Returns the value in minor units.
    #[inline]
    pub const fn minor_units(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion (truncated toward zero).
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / MINOR_PER_MAJOR
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor_part(&self) -> i64 {
        (self.0 % MINOR_PER_MAJOR).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Converts into another currency by multiplying with `rate`.
    ///
    /// ## Implementation
    /// The rate is fixed point with four decimals, so the product is divided
    /// by 10 000 with half-up rounding. The intermediate is i128; a result
    /// beyond the i64 range saturates.
    ///
    /// ## Example
    /// ```rust
    /// use storefront_core::money::Money;
    /// use storefront_core::types::ExchangeRate;
    ///
    /// let usd = Money::from_major_minor(22, 30); // $22.30
    /// let idr = usd.convert(ExchangeRate::from_units(15_000));
    /// assert_eq!(idr, Money::from_major(334_500));
    /// ```
    pub fn convert(&self, rate: ExchangeRate) -> Money {
        let scaled = self.0 as i128 * rate.scaled() as i128;
        Money::from_minor(saturate(round_div(scaled, ExchangeRate::SCALE as i128)))
    }

    /// Returns the share of this amount taken by `rate`, rounded half-up.
    ///
    /// ## Example
    /// ```rust
    /// use storefront_core::money::Money;
    /// use storefront_core::types::DiscountRate;
    ///
    /// let subtotal = Money::from_major(1_200_000);
    /// let off = subtotal.percentage_of(DiscountRate::from_percent(35));
    /// assert_eq!(off, Money::from_major(420_000));
    /// ```
    pub fn percentage_of(&self, rate: DiscountRate) -> Money {
        let scaled = self.0 as i128 * rate.bps() as i128;
        Money::from_minor(saturate(round_div(
            scaled,
            DiscountRate::BPS_PER_WHOLE as i128,
        )))
    }

    /// Applies a percentage discount and returns the discounted amount.
    ///
    /// ## Example
    /// ```rust
    /// use storefront_core::money::Money;
    /// use storefront_core::types::DiscountRate;
    ///
    /// let subtotal = Money::from_major(100);
    /// let discounted = subtotal.apply_discount(DiscountRate::from_percent(10));
    /// assert_eq!(discounted, Money::from_major(90));
    /// ```
    pub fn apply_discount(&self, rate: DiscountRate) -> Money {
        *self - self.percentage_of(rate)
    }
}

/// Integer division rounding half away from zero.
fn round_div(numerator: i128, denominator: i128) -> i128 {
    let half = denominator / 2;
    if numerator >= 0 {
        (numerator + half) / denominator
    } else {
        (numerator - half) / denominator
    }
}

fn saturate(value: i128) -> i64 {
    value.clamp(i64::MIN as i128, i64::MAX as i128) as i64
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display shows the plain amount with two decimals, no currency symbol.
///
/// ## Note
/// This is for logs and debugging. Use a currency formatter for UI display.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().abs(), self.minor_part())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_sub(other.0);
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_minor() {
        let money = Money::from_minor(1099);
        assert_eq!(money.minor_units(), 1099);
        assert_eq!(money.major(), 10);
        assert_eq!(money.minor_part(), 99);
    }

    #[test]
    fn test_from_major_minor() {
        assert_eq!(Money::from_major_minor(10, 99).minor_units(), 1099);
        assert_eq!(Money::from_major_minor(-5, 50).minor_units(), -550);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_minor(1099).to_string(), "10.99");
        assert_eq!(Money::from_major(1_000_000).to_string(), "1000000.00");
        assert_eq!(Money::from_minor(-550).to_string(), "-5.50");
        assert_eq!(Money::zero().to_string(), "0.00");
    }

    #[test]
    fn test_arithmetic_and_sum() {
        let a = Money::from_minor(1000);
        let b = Money::from_minor(500);

        assert_eq!((a + b).minor_units(), 1500);
        assert_eq!((a - b).minor_units(), 500);

        let total: Money = [a, b, b].iter().sum();
        assert_eq!(total.minor_units(), 2000);
    }

    #[test]
    fn test_convert_usd_to_idr() {
        let rate = ExchangeRate::from_units(15_000);

        // 109.95 * 15000 is not representable in f64, it is exact here
        let idr = Money::from_minor(10995).convert(rate);
        assert_eq!(idr, Money::from_major(1_649_250));
    }

    #[test]
    fn test_convert_fractional_rate_rounds_half_up() {
        // 0.5 * 1.0001 = 0.50005 -> rounds to 0.50
        let rate = ExchangeRate::from_scaled(10_001);
        assert_eq!(Money::from_minor(50).convert(rate), Money::from_minor(50));

        // 1.00 * 0.005 = 0.005 -> rounds to 0.01
        let rate = ExchangeRate::from_scaled(50);
        assert_eq!(Money::from_minor(100).convert(rate), Money::from_minor(1));
    }

    #[test]
    fn test_arithmetic_saturates_at_bounds() {
        let max = Money::from_minor(i64::MAX);
        assert_eq!(max + Money::from_minor(1), max);

        let huge = Money::from_minor(6_000_000_000_000_000_000); // $6e16
        let total: Money = [huge, huge].iter().sum();
        assert_eq!(total, max);

        let mut running = max;
        running += huge;
        assert_eq!(running, max);

        let min = Money::from_minor(i64::MIN);
        assert_eq!(min - Money::from_minor(1), min);
    }

    #[test]
    fn test_convert_saturates_instead_of_wrapping() {
        let rate = ExchangeRate::from_units(15_000);

        // $1e13 at 15 000 is beyond i64 minor units
        let idr = Money::from_major(10_000_000_000_000).convert(rate);
        assert_eq!(idr, Money::from_minor(i64::MAX));
        assert!(idr.is_positive());
    }

    #[test]
    fn test_percentage_discount() {
        let subtotal = Money::from_major(100);
        let discounted = subtotal.apply_discount(DiscountRate::from_percent(10));
        assert_eq!(discounted, Money::from_major(90));
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());

        let negative = Money::from_minor(-100);
        assert!(negative.is_negative());
    }
}
