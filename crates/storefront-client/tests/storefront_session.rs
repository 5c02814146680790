//! End-to-end session behavior without a network.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::Notify;

use storefront_client::{
    CatalogSource, ClientError, ClientResult, StaticCatalogSource, Storefront, StorefrontConfig,
};
use storefront_core::{CatalogStatus, CoreError, DiscountBand, DiscountRate, Money, ProductId};

/// Holds the fetch open until released, counting calls.
#[derive(Default)]
struct GatedSource {
    release: Notify,
    calls: AtomicUsize,
}

#[async_trait]
impl CatalogSource for GatedSource {
    async fn fetch(&self) -> ClientResult<Vec<Value>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.release.notified().await;
        Ok(vec![json!({ "id": 1, "title": "Late Arrival", "price": 1.0 })])
    }

    fn describe(&self) -> String {
        "gated".to_string()
    }
}

fn product(id: u64, title: &str, price: f64, category: &str) -> Value {
    json!({ "id": id, "title": title, "price": price, "category": category })
}

fn catalog() -> Vec<Value> {
    vec![
        product(1, "Mens Casual Premium Slim Fit T-Shirts", 22.3, "men's clothing"),
        product(2, "Solid Gold Petite Micropave", 168.0, "jewelery"),
        product(3, "White Gold Plated Princess", 9.99, "jewelery"),
        product(4, "SanDisk SSD PLUS 1TB Internal SSD", 109.0, "electronics"),
    ]
}

async fn loaded_storefront() -> Storefront {
    let source = Arc::new(StaticCatalogSource::new(catalog()));
    let storefront = Storefront::with_source(&StorefrontConfig::default(), source).unwrap();
    storefront.load_catalog();
    assert_eq!(
        storefront.wait_for_catalog().await.unwrap(),
        CatalogStatus::Loaded
    );
    storefront
}

#[tokio::test]
async fn test_duplicate_add_counts_once() {
    let storefront = loaded_storefront().await;

    assert!(storefront.add_to_cart(ProductId::new(2)).unwrap());
    assert!(!storefront.add_to_cart(ProductId::new(2)).unwrap());

    assert_eq!(storefront.cart_count(), 1);
}

#[tokio::test]
async fn test_remove_never_added_is_noop() {
    let storefront = loaded_storefront().await;
    storefront.add_to_cart(ProductId::new(1)).unwrap();

    assert!(!storefront.remove_from_cart(ProductId::new(4)));
    assert_eq!(storefront.cart_count(), 1);
}

#[tokio::test]
async fn test_member_promo_over_threshold() {
    let storefront = loaded_storefront().await;
    // $168 + $22.30 + $9.99 = $200.29 → Rp 3.004.350
    for id in [2, 1, 3] {
        storefront.add_to_cart(ProductId::new(id)).unwrap();
    }
    storefront.set_member(true);
    storefront.set_promo_code("DISKON20");

    let cart = storefront.cart();
    let ids: Vec<u64> = cart.items.iter().map(|i| i.product_id().get()).collect();
    assert_eq!(ids, vec![2, 1, 3]);

    let pricing = &cart.summary.pricing;
    assert_eq!(cart.summary.source_subtotal, Money::from_minor(20029));
    assert_eq!(pricing.subtotal, Money::from_major(3_004_350));
    assert_eq!(pricing.discount, DiscountRate::from_percent(35));
    assert_eq!(
        pricing.bands,
        vec![
            DiscountBand::LargeOrder,
            DiscountBand::Membership,
            DiscountBand::PromoCode
        ]
    );
    assert_eq!(pricing.final_amount, Money::from_major_minor(1_952_827, 50));
}

#[tokio::test]
async fn test_wrong_promo_under_threshold() {
    let storefront = loaded_storefront().await;
    storefront.add_to_cart(ProductId::new(1)).unwrap(); // Rp 334.500
    storefront.set_promo_code("WRONG");

    let summary = storefront.summary();
    assert!(summary.pricing.discount.is_zero());
    assert_eq!(summary.final_amount(), Money::from_major(334_500));
}

#[tokio::test]
async fn test_transport_failure_is_failed_state() {
    let source = Arc::new(StaticCatalogSource::failing("dns error: no such host"));
    let storefront = Storefront::with_source(&StorefrontConfig::default(), source).unwrap();

    storefront.load_catalog();
    let status = storefront.wait_for_catalog().await.unwrap();

    assert_eq!(status, CatalogStatus::Failed);
    let message = storefront.catalog_error().unwrap();
    assert!(!message.is_empty());
    assert!(storefront.search("").unwrap().is_empty());
    assert!(matches!(
        storefront.add_to_cart(ProductId::new(1)),
        Err(ClientError::Core(CoreError::ProductNotFound(_)))
    ));
}

#[tokio::test]
async fn test_category_browsing() {
    let storefront = loaded_storefront().await;

    assert_eq!(
        storefront.categories(),
        vec!["men's clothing", "jewelery", "electronics"]
    );
    let gold: Vec<u64> = storefront
        .search_in_category("gold", "Jewelery")
        .unwrap()
        .iter()
        .map(|p| p.id.get())
        .collect();
    assert_eq!(gold, vec![2, 3]);
}

#[tokio::test]
async fn test_abandon_load_returns_to_not_loaded() {
    let source = Arc::new(GatedSource::default());
    let storefront =
        Storefront::with_source(&StorefrontConfig::default(), source.clone()).unwrap();

    assert!(storefront.load_catalog());
    assert_eq!(storefront.catalog_status(), CatalogStatus::Loading);
    assert!(!storefront.load_catalog());

    assert!(storefront.abandon_load());
    assert_eq!(storefront.catalog_status(), CatalogStatus::NotLoaded);
    assert!(!storefront.abandon_load());

    // Releasing the gate afterwards must not resurrect the abandoned load.
    source.release.notify_waiters();
    tokio::task::yield_now().await;
    assert_eq!(storefront.catalog_status(), CatalogStatus::NotLoaded);
    assert!(storefront.search("").unwrap().is_empty());
}

#[tokio::test]
async fn test_abandon_while_waiting() {
    let source = Arc::new(GatedSource::default());
    let storefront =
        Storefront::with_source(&StorefrontConfig::default(), source.clone()).unwrap();
    storefront.load_catalog();

    let (waited, abandoned) = tokio::join!(storefront.wait_for_catalog(), async {
        tokio::task::yield_now().await;
        storefront.abandon_load()
    });

    assert!(abandoned);
    assert!(matches!(waited, Err(ClientError::Abandoned)));
    assert_eq!(storefront.catalog_status(), CatalogStatus::NotLoaded);
}

#[tokio::test(start_paused = true)]
async fn test_cancelled_wait_leaves_load_abandonable() {
    let source = Arc::new(GatedSource::default());
    let storefront =
        Storefront::with_source(&StorefrontConfig::default(), source.clone()).unwrap();
    storefront.load_catalog();

    let waited =
        tokio::time::timeout(Duration::from_millis(50), storefront.wait_for_catalog()).await;
    assert!(waited.is_err());

    assert_eq!(storefront.catalog_status(), CatalogStatus::Loading);
    assert!(storefront.abandon_load());
    assert_eq!(storefront.catalog_status(), CatalogStatus::NotLoaded);
}

#[tokio::test]
async fn test_dropping_storefront_mid_load_does_not_panic() {
    let source = Arc::new(GatedSource::default());
    let storefront =
        Storefront::with_source(&StorefrontConfig::default(), source.clone()).unwrap();

    storefront.load_catalog();
    for _ in 0..10 {
        if source.calls.load(Ordering::SeqCst) == 1 {
            break;
        }
        tokio::task::yield_now().await;
    }
    drop(storefront);

    source.release.notify_waiters();
    tokio::task::yield_now().await;
    assert_eq!(source.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_checkout_then_new_cart() {
    let storefront = loaded_storefront().await;
    storefront.add_to_cart(ProductId::new(4)).unwrap();
    storefront.set_member(true);

    let receipt = storefront.checkout().unwrap();
    // $109 → Rp 1.635.000, large order + member = 15%
    assert_eq!(receipt.summary.pricing.discount, DiscountRate::from_percent(15));
    assert_eq!(receipt.formatted_total, "Rp 1.389.750");
    assert!(receipt.options.is_member);

    assert_eq!(storefront.cart_count(), 0);
    assert!(matches!(
        storefront.checkout(),
        Err(ClientError::Core(CoreError::EmptyCart))
    ));

    let json = serde_json::to_value(&receipt).unwrap();
    assert!(json.get("formattedTotal").is_some());
    assert!(json.get("createdAt").is_some());
}
