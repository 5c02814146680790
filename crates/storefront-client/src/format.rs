//! # Currency Formatting
//!
//! Renders amounts for display. Formatters receive the pricing engine's
//! amount as-is; all rounding to the currency's display precision happens
//! here and nowhere else.
//!
//! ```text
//! Money::from_major(1_200_000)   RupiahFormatter  →  "Rp 1.200.000"
//! Money::from_minor(123_456)     UsdFormatter     →  "$1,234.56"
//! ```

use storefront_core::money::MINOR_PER_MAJOR;
use storefront_core::Money;

use crate::config::DisplayCurrency;

/// Turns an amount into display text.
pub trait CurrencyFormatter: Send + Sync {
    fn format(&self, amount: Money) -> String;

    /// ISO 4217 code of the currency this formatter renders.
    fn currency_code(&self) -> &'static str;
}

/// Indonesian rupiah: `Rp` prefix, `.` thousands separator, no fraction.
///
/// Sen are rounded half away from zero to whole rupiah.
#[derive(Debug, Clone, Copy, Default)]
pub struct RupiahFormatter;

impl CurrencyFormatter for RupiahFormatter {
    fn format(&self, amount: Money) -> String {
        let minor = amount.minor_units().unsigned_abs();
        let half = MINOR_PER_MAJOR as u64 / 2;
        let rupiah = (minor + half) / MINOR_PER_MAJOR as u64;

        let sign = if amount.is_negative() && rupiah > 0 { "-" } else { "" };
        format!("{}Rp {}", sign, group_thousands(rupiah, '.'))
    }

    fn currency_code(&self) -> &'static str {
        "IDR"
    }
}

/// US dollars: `$` prefix, `,` thousands separator, two decimals.
#[derive(Debug, Clone, Copy, Default)]
pub struct UsdFormatter;

impl CurrencyFormatter for UsdFormatter {
    fn format(&self, amount: Money) -> String {
        let minor = amount.minor_units().unsigned_abs();
        let dollars = minor / MINOR_PER_MAJOR as u64;
        let cents = minor % MINOR_PER_MAJOR as u64;

        let sign = if amount.is_negative() { "-" } else { "" };
        format!("{}${}.{:02}", sign, group_thousands(dollars, ','), cents)
    }

    fn currency_code(&self) -> &'static str {
        "USD"
    }
}

/// Returns the formatter for a configured display currency.
pub fn formatter_for(currency: DisplayCurrency) -> Box<dyn CurrencyFormatter> {
    match currency {
        DisplayCurrency::Idr => Box::new(RupiahFormatter),
        DisplayCurrency::Usd => Box::new(UsdFormatter),
    }
}

fn group_thousands(value: u64, separator: char) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(ch);
    }

    out
}
