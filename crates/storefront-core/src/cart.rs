//! # Cart Ledger
//!
//! The set of products the shopper has selected.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Ledger Operations                               │
//! │                                                                         │
//! │  User Action              Ledger Call             Ledger Change         │
//! │  ───────────              ───────────             ─────────────         │
//! │                                                                         │
//! │  "Add to Cart" ──────────► add(product) ────────► +1 item, or nothing   │
//! │                                                   if already present    │
//! │                                                                         │
//! │  Click Remove ───────────► remove(id) ──────────► -1 item, or nothing   │
//! │                                                   if absent             │
//! │                                                                         │
//! │  Click Clear / Checkout ─► clear() ─────────────► empty                 │
//! │                                                                         │
//! │  View Cart ──────────────► items() / len() ─────► (read only)          │
//! │                                                                         │
//! │  NOTE: None of these can fail. Duplicates and misses are no-ops.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Storage
//! Items live in a `BTreeMap` keyed by an insertion sequence number, which
//! gives ordered iteration. A `HashMap` from [`ProductId`] to that sequence
//! number is the uniqueness index, so a duplicate id is impossible to store
//! rather than something each caller has to scan for.

use std::collections::{btree_map, BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::{ExchangeRate, Product, ProductId};

// =============================================================================
// Cart Item
// =============================================================================

/// A product in the cart.
///
/// ## Design Notes
/// The product is a snapshot taken at the moment it was added, so the cart
/// keeps rendering consistently even if the catalog is reloaded underneath.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartItem {
    /// Product snapshot (frozen)
    pub product: Product,

    /// When this item was added to the cart
    #[ts(as = "String")]
    pub added_at: DateTime<Utc>,
}

impl CartItem {
    /// Creates a cart item from a product, stamping the current time.
    pub fn from_product(product: Product) -> Self {
        CartItem {
            product,
            added_at: Utc::now(),
        }
    }

    #[inline]
    pub fn product_id(&self) -> ProductId {
        self.product.id
    }

    #[inline]
    pub fn unit_price(&self) -> Money {
        self.product.price
    }
}

// =============================================================================
// Cart Ledger
// =============================================================================

/// The shopping cart.
///
/// ## Invariants
/// - Items are unique by `product.id`
/// - Iteration order is insertion order
/// - `index` and `entries` always describe the same set of items
#[derive(Debug, Clone)]
pub struct CartLedger {
    entries: BTreeMap<u64, CartItem>,
    index: HashMap<ProductId, u64>,
    next_seq: u64,
    created_at: DateTime<Utc>,
}

impl CartLedger {
    /// Creates a new empty ledger.
    pub fn new() -> Self {
        CartLedger {
            entries: BTreeMap::new(),
            index: HashMap::new(),
            next_seq: 0,
            created_at: Utc::now(),
        }
    }

    /// Adds a product unless its id is already present.
    ///
    /// ## Returns
    /// `true` if the ledger grew by one, `false` if the product was already
    /// there. Either way the call succeeded.
    pub fn add(&mut self, product: Product) -> bool {
        if self.index.contains_key(&product.id) {
            return false;
        }

        let seq = self.next_seq;
        self.next_seq += 1;
        self.index.insert(product.id, seq);
        self.entries.insert(seq, CartItem::from_product(product));
        true
    }

    /// Removes the item with `product_id`, returning it if it was present.
    pub fn remove(&mut self, product_id: ProductId) -> Option<CartItem> {
        let seq = self.index.remove(&product_id)?;
        self.entries.remove(&seq)
    }

    /// Empties the ledger unconditionally.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
        self.created_at = Utc::now();
    }

    /// Items in insertion order.
    pub fn items(&self) -> btree_map::Values<'_, u64, CartItem> {
        self.entries.values()
    }

    /// Returns the item for `product_id`, if present.
    pub fn get(&self, product_id: ProductId) -> Option<&CartItem> {
        self.index
            .get(&product_id)
            .and_then(|seq| self.entries.get(seq))
    }

    /// Checks whether `product_id` is in the cart.
    pub fn contains(&self, product_id: ProductId) -> bool {
        self.index.contains_key(&product_id)
    }

    /// Number of distinct products in the cart.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// When the ledger was created or last cleared.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Sum of unit prices in the catalog currency.
    pub fn source_subtotal(&self) -> Money {
        self.items().map(CartItem::unit_price).sum()
    }

    /// Sum of unit prices converted with `rate`.
    ///
    /// The sum is taken first and converted once, so there is a single
    /// rounding step no matter how many items are in the cart.
    pub fn subtotal(&self, rate: ExchangeRate) -> Money {
        self.source_subtotal().convert(rate)
    }
}

impl Default for CartLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> IntoIterator for &'a CartLedger {
    type Item = &'a CartItem;
    type IntoIter = btree_map::Values<'a, u64, CartItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
