//! # Storefront Session
//!
//! The single surface the view layer talks to: catalog loading and search,
//! the cart, checkout selections, and the priced summary.
//!
//! ## User Workflow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     MyShop page → Storefront calls                      │
//! │                                                                         │
//! │  page mounts ──────────► load_catalog()      (background fetch)        │
//! │  search box ───────────► search("ring")      CatalogView               │
//! │  category sidebar ─────► categories() / search_in_category()           │
//! │  "Add to Cart" ────────► add_to_cart(id)     cart badge: cart_count()  │
//! │  member toggle ────────► set_member(true)                              │
//! │  promo field ──────────► set_promo_code("DISKON20")                    │
//! │  "Ringkasan Belanja" ──► summary()           recomputed on every read  │
//! │  "Checkout" ───────────► checkout()          Receipt, cart cleared     │
//! │  page unmounts ────────► drop(storefront)    in-flight load abandoned  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};
use ts_rs::TS;
use uuid::Uuid;

use storefront_core::validation::{normalize_promo_code, validate_search_query};
use storefront_core::{
    CartItem, CartLedger, CatalogStatus, CatalogStore, CatalogView, CheckoutSummary, CoreError,
    DiscountPolicy, ExchangeRate, Money, ProductId,
};

use crate::config::{DisplayCurrency, StorefrontConfig};
use crate::error::{ClientError, ClientResult};
use crate::format::{formatter_for, CurrencyFormatter};
use crate::loader::{self, CatalogLoader, LoadHandle, LoadOutcome, SharedCatalog};
use crate::source::{CatalogSource, HttpCatalogSource};
use crate::state::{CartState, CheckoutOptions};

// =============================================================================
// View DTOs
// =============================================================================

/// Cart contents plus the priced summary.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartSnapshot {
    pub items: Vec<CartItem>,
    pub summary: CheckoutSummary,
}

/// Record of a completed checkout.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Receipt {
    #[ts(as = "String")]
    pub id: Uuid,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    pub items: Vec<CartItem>,
    pub options: CheckoutOptions,
    pub summary: CheckoutSummary,
    /// Final amount rendered in the display currency.
    pub formatted_total: String,
}

// =============================================================================
// Storefront
// =============================================================================

/// One shopper's storefront session.
///
/// Dropping the session abandons any catalog load still in flight.
pub struct Storefront {
    source: Arc<dyn CatalogSource>,
    catalog: SharedCatalog,
    cart: CartState,
    policy: DiscountPolicy,
    rate: ExchangeRate,
    timeout: Option<std::time::Duration>,
    currency: DisplayCurrency,
    formatter: Box<dyn CurrencyFormatter>,
    load: Mutex<Option<LoadHandle>>,
}

impl Storefront {
    /// Creates a session fetching from the configured HTTP endpoint.
    pub fn new(config: &StorefrontConfig) -> ClientResult<Self> {
        let source = HttpCatalogSource::from_config(config)?;
        Self::with_source(config, Arc::new(source))
    }

    /// Creates a session with an explicit catalog source.
    ///
    /// ## Exchange Rate
    /// With `display.currency = "usd"` amounts stay in the catalog currency
    /// and the configured exchange rate is not applied.
    pub fn with_source(
        config: &StorefrontConfig,
        source: Arc<dyn CatalogSource>,
    ) -> ClientResult<Self> {
        config.validate()?;

        let currency = config.display.currency;
        let rate = match currency {
            DisplayCurrency::Idr => config.exchange_rate()?,
            DisplayCurrency::Usd => ExchangeRate::identity(),
        };

        Ok(Storefront {
            source,
            catalog: Arc::new(RwLock::new(CatalogStore::new())),
            cart: CartState::new(),
            policy: config.discount_policy()?,
            rate,
            timeout: config.timeout(),
            currency,
            formatter: formatter_for(currency),
            load: Mutex::new(None),
        })
    }

    // =========================================================================
    // Catalog Loading
    // =========================================================================

    /// Starts the initial catalog load.
    ///
    /// Only starts from `NotLoaded`; use [`reload`](Self::reload) after a
    /// failure. Must be called from within a Tokio runtime.
    ///
    /// ## Returns
    /// `true` if a load was started.
    pub fn load_catalog(&self) -> bool {
        if self.catalog_status() != CatalogStatus::NotLoaded {
            debug!(status = ?self.catalog_status(), "Catalog load not started");
            return false;
        }
        self.start_load()
    }

    /// Explicitly re-triggers a load from any state except `Loading`.
    pub fn reload(&self) -> bool {
        self.start_load()
    }

    fn start_load(&self) -> bool {
        let handle = CatalogLoader::spawn(
            Arc::clone(&self.catalog),
            Arc::clone(&self.source),
            self.timeout,
        );

        match handle {
            Some(handle) => {
                *self.load_slot() = Some(handle);
                true
            }
            None => false,
        }
    }

    /// Waits for the in-flight load, if any, and returns the resulting status.
    ///
    /// The load stays owned by the session while waiting, so
    /// [`abandon_load`](Self::abandon_load) still works meanwhile.
    ///
    /// ## Errors
    /// `Abandoned` if the load was abandoned before it finished.
    pub async fn wait_for_catalog(&self) -> ClientResult<CatalogStatus> {
        let completion = self.load_slot().as_ref().map(LoadHandle::completion);
        if let Some(completion) = completion {
            if completion.wait().await? == LoadOutcome::Abandoned {
                return Err(ClientError::Abandoned);
            }
        }
        Ok(self.catalog_status())
    }

    /// Abandons the in-flight load. The catalog returns to `NotLoaded`.
    ///
    /// ## Returns
    /// `true` if there was a load to abandon.
    pub fn abandon_load(&self) -> bool {
        let Some(handle) = self.load_slot().take() else {
            return false;
        };

        let abandoned = loader::write(&self.catalog).abandon(handle.ticket());
        handle.abandon();

        if abandoned {
            info!("Catalog load abandoned by caller");
        }
        abandoned
    }

    fn load_slot(&self) -> std::sync::MutexGuard<'_, Option<LoadHandle>> {
        self.load.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn catalog_status(&self) -> CatalogStatus {
        loader::read(&self.catalog).status()
    }

    /// Failure message when the status is `Failed`.
    pub fn catalog_error(&self) -> Option<String> {
        loader::read(&self.catalog).error().map(str::to_string)
    }

    // =========================================================================
    // Catalog Queries
    // =========================================================================

    /// Filters the catalog by the search box text.
    ///
    /// The text is trimmed; an empty box shows every product.
    pub fn search(&self, query: &str) -> ClientResult<CatalogView> {
        let query = validate_search_query(query)?;
        Ok(loader::read(&self.catalog).filter(&query))
    }

    pub fn search_in_category(&self, query: &str, category: &str) -> ClientResult<CatalogView> {
        let query = validate_search_query(query)?;
        Ok(loader::read(&self.catalog).filter_in_category(&query, category.trim()))
    }

    pub fn categories(&self) -> Vec<String> {
        loader::read(&self.catalog).categories()
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// Adds a catalog product to the cart.
    ///
    /// ## Returns
    /// `Ok(false)` if it was already there.
    ///
    /// ## Errors
    /// `ProductNotFound` if `id` is not in the loaded catalog.
    #[instrument(skip(self))]
    pub fn add_to_cart(&self, id: ProductId) -> ClientResult<bool> {
        let product = loader::read(&self.catalog)
            .get(id)
            .cloned()
            .ok_or(CoreError::ProductNotFound(id))?;

        let added = self.cart.with_cart_mut(|cart| cart.add(product));
        debug!(added, "add_to_cart");
        Ok(added)
    }

    /// Removes a product from the cart. Absent ids are ignored.
    pub fn remove_from_cart(&self, id: ProductId) -> bool {
        self.cart.with_cart_mut(|cart| cart.remove(id)).is_some()
    }

    pub fn clear_cart(&self) {
        self.cart.with_cart_mut(|cart| cart.clear());
    }

    /// Number shown on the cart badge.
    pub fn cart_count(&self) -> usize {
        self.cart.with_cart(|cart| cart.len())
    }

    pub fn cart(&self) -> CartSnapshot {
        let options = self.cart.options();
        self.cart.with_cart(|cart| CartSnapshot {
            items: cart.items().cloned().collect(),
            summary: self.price(cart, &options),
        })
    }

    // =========================================================================
    // Checkout Selections
    // =========================================================================

    pub fn set_member(&self, is_member: bool) {
        self.cart.set_member(is_member);
    }

    /// Sets the promo code from the input field. Blank clears it.
    ///
    /// Whatever was typed replaces the previous code; an unrecognised code
    /// simply earns nothing.
    pub fn set_promo_code(&self, code: &str) {
        self.cart.set_promo_code(normalize_promo_code(code));
    }

    pub fn options(&self) -> CheckoutOptions {
        self.cart.options()
    }

    // =========================================================================
    // Pricing & Checkout
    // =========================================================================

    /// Prices the current cart. Recomputed on every call.
    pub fn summary(&self) -> CheckoutSummary {
        let options = self.cart.options();
        self.cart.with_cart(|cart| self.price(cart, &options))
    }

    fn price(&self, cart: &CartLedger, options: &CheckoutOptions) -> CheckoutSummary {
        CheckoutSummary::compute(
            cart,
            self.rate,
            &self.policy,
            options.is_member,
            options.promo_code.as_deref(),
        )
    }

    /// Prices the cart, empties it, and returns the receipt.
    ///
    /// ## Errors
    /// `EmptyCart` if there is nothing to check out.
    #[instrument(skip(self))]
    pub fn checkout(&self) -> ClientResult<Receipt> {
        let options = self.cart.options();

        let (items, summary) = self.cart.with_cart_mut(|cart| {
            if cart.is_empty() {
                return Err(CoreError::EmptyCart);
            }
            let summary = self.price(cart, &options);
            let items: Vec<CartItem> = cart.items().cloned().collect();
            cart.clear();
            Ok((items, summary))
        })?;

        let receipt = Receipt {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            formatted_total: self.format_amount(summary.final_amount()),
            items,
            options,
            summary,
        };

        info!(
            receipt_id = %receipt.id,
            items = receipt.items.len(),
            total = %receipt.summary.final_amount(),
            "Checkout completed"
        );

        Ok(receipt)
    }

    // =========================================================================
    // Display
    // =========================================================================

    pub fn format_amount(&self, amount: Money) -> String {
        self.formatter.format(amount)
    }

    pub fn display_currency(&self) -> DisplayCurrency {
        self.currency
    }

    pub fn exchange_rate(&self) -> ExchangeRate {
        self.rate
    }

    pub fn policy(&self) -> &DiscountPolicy {
        &self.policy
    }
}

impl std::fmt::Debug for Storefront {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storefront")
            .field("source", &self.source.describe())
            .field("status", &self.catalog_status())
            .field("cart_count", &self.cart_count())
            .field("currency", &self.currency)
            .finish()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
