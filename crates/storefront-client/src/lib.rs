//! # storefront-client: Catalog Loading and Session State
//!
//! Wraps `storefront-core` with everything that touches the outside world:
//! configuration, logging, the HTTP catalog fetch, and the shared session
//! state the view layer calls into.
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Storefront Startup                              │
//! │                                                                         │
//! │  1. telemetry::init_tracing() ───────────────────────────────────────► │
//! │     • tracing-subscriber with env filter (RUST_LOG)                    │
//! │                                                                         │
//! │  2. StorefrontConfig::load_or_default(None) ─────────────────────────► │
//! │     • storefront.toml, then STOREFRONT_* overrides                     │
//! │                                                                         │
//! │  3. Storefront::new(&config) ────────────────────────────────────────► │
//! │     • HttpCatalogSource, DiscountPolicy, ExchangeRate, formatter       │
//! │                                                                         │
//! │  4. storefront.load_catalog() ───────────────────────────────────────► │
//! │     • background fetch; status NotLoaded → Loading → Loaded | Failed   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//! ```rust,no_run
//! use storefront_client::{Storefront, StorefrontConfig};
//! use storefront_core::ProductId;
//!
//! # async fn run() -> storefront_client::ClientResult<()> {
//! storefront_client::telemetry::init_tracing();
//!
//! let config = StorefrontConfig::load_or_default(None);
//! let storefront = Storefront::new(&config)?;
//!
//! storefront.load_catalog();
//! storefront.wait_for_catalog().await?;
//!
//! storefront.add_to_cart(ProductId::new(1))?;
//! storefront.set_member(true);
//! storefront.set_promo_code("DISKON20");
//!
//! let summary = storefront.summary();
//! println!("Total: {}", storefront.format_amount(summary.final_amount()));
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod format;
pub mod loader;
pub mod session;
pub mod source;
pub mod state;
pub mod telemetry;
pub mod wire;

pub use config::{DisplayCurrency, StorefrontConfig};
pub use error::{ClientError, ClientResult};
pub use format::{CurrencyFormatter, RupiahFormatter, UsdFormatter};
pub use loader::{CatalogLoader, LoadCompletion, LoadHandle, LoadOutcome};
pub use session::{CartSnapshot, Receipt, Storefront};
pub use source::{CatalogSource, HttpCatalogSource, StaticCatalogSource};
pub use state::{CartState, CheckoutOptions};
