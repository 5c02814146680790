//! # Cart State
//!
//! The shopper's cart and checkout selections, shared across callers.
//!
//! ## Thread Safety
//! The ledger is wrapped in `Arc<Mutex<T>>` because:
//! 1. The view layer may call in from several async command handlers
//! 2. Only one caller should modify the cart at a time
//! 3. Every operation is short and most of them write
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart State Operations                                │
//! │                                                                         │
//! │  View Action              Session Call            Cart State Change     │
//! │  ───────────              ────────────            ─────────────────     │
//! │                                                                         │
//! │  "Add to Cart" ──────────► add_to_cart() ───────► ledger.add(product)  │
//! │                                                                         │
//! │  Click Remove ───────────► remove_from_cart() ──► ledger.remove(id)    │
//! │                                                                         │
//! │  Member toggle ──────────► set_member() ────────► options.is_member    │
//! │                                                                         │
//! │  Promo field ────────────► set_promo_code() ────► options.promo_code   │
//! │                                                                         │
//! │  Checkout ───────────────► checkout() ──────────► ledger.clear()       │
//! │                                                                         │
//! │  NOTE: All write operations acquire the Mutex lock exclusively.         │
//! │        Read operations also acquire the lock but release it quickly.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use storefront_core::CartLedger;

/// Selections that feed the pricing engine.
///
/// These are user choices, never constants: the engine takes them as
/// explicit arguments on every computation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CheckoutOptions {
    pub is_member: bool,
    /// Validated, trimmed code; `None` when the field is empty.
    pub promo_code: Option<String>,
}

/// Shared cart ledger plus checkout selections.
#[derive(Debug, Clone, Default)]
pub struct CartState {
    cart: Arc<Mutex<CartLedger>>,
    options: Arc<Mutex<CheckoutOptions>>,
}

impl CartState {
    /// Creates a new empty cart state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Executes a function with read access to the cart.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let count = cart_state.with_cart(|cart| cart.len());
    /// ```
    pub fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&CartLedger) -> R,
    {
        let cart = self.cart.lock().unwrap_or_else(PoisonError::into_inner);
        f(&cart)
    }

    /// Executes a function with write access to the cart.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let added = cart_state.with_cart_mut(|cart| cart.add(product));
    /// ```
    pub fn with_cart_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut CartLedger) -> R,
    {
        let mut cart = self.cart.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut cart)
    }

    /// Snapshot of the current selections.
    pub fn options(&self) -> CheckoutOptions {
        self.options
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set_member(&self, is_member: bool) {
        self.options
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_member = is_member;
    }

    pub fn set_promo_code(&self, code: Option<String>) {
        self.options
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .promo_code = code;
    }
}
