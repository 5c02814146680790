//! # Catalog Store
//!
//! Holds the products retrieved from the remote catalog and answers search
//! queries over them.
//!
//! ## Load State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Catalog Load Lifecycle                             │
//! │                                                                         │
//! │   ┌───────────┐ begin_load ┌───────────┐  complete   ┌───────────┐    │
//! │   │ NotLoaded │───────────►│  Loading  │────────────►│  Loaded   │    │
//! │   └───────────┘            └─────┬─────┘             └─────┬─────┘    │
//! │         ▲                        │  │ fail                 │          │
//! │         │        abandon         │  ▼                      │          │
//! │         └────────────────────────┘ ┌───────────┐           │          │
//! │                                    │  Failed   │           │          │
//! │                                    └─────┬─────┘           │          │
//! │                                          │ begin_load      │          │
//! │                                          └──► Loading ◄────┘          │
//! │                                                                         │
//! │  • No automatic retry: Failed stays Failed until begin_load            │
//! │  • begin_load while Loading is refused (no overlapping loads)          │
//! │  • Every transition out of Loading needs the LoadTicket that           │
//! │    started it; a stale ticket is ignored                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Filtering
//! [`CatalogStore::filter`] returns a [`CatalogView`]: a cheap, cloneable
//! handle over a shared snapshot of the products. Iterating it evaluates the
//! query lazily, and it can be iterated any number of times. Filtering a
//! catalog that is not `Loaded` yields an empty view.

use std::collections::HashMap;
use std::slice;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreResult, ValidationError};
use crate::types::{Product, ProductId};

/// Message recorded when a failure is reported without one.
const DEFAULT_FAILURE_MESSAGE: &str = "catalog could not be loaded";

// =============================================================================
// Catalog
// =============================================================================

/// An immutable, loaded set of products with an id index.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Arc<Vec<Product>>,
    index: HashMap<ProductId, usize>,
    loaded_at: DateTime<Utc>,
}

impl Catalog {
    /// Builds a catalog, keeping the source order.
    ///
    /// ## Errors
    /// [`ValidationError::Duplicate`] if two products share an id.
    pub fn from_products(products: Vec<Product>) -> CoreResult<Self> {
        let mut index = HashMap::with_capacity(products.len());

        for (position, product) in products.iter().enumerate() {
            if index.insert(product.id, position).is_some() {
                return Err(ValidationError::Duplicate {
                    field: "product id".to_string(),
                    value: product.id.to_string(),
                }
                .into());
            }
        }

        Ok(Catalog {
            products: Arc::new(products),
            index,
            loaded_at: Utc::now(),
        })
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.index.get(&id).map(|&position| &self.products[position])
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }
}

// =============================================================================
// Catalog State
// =============================================================================

/// Where the catalog is in its load lifecycle.
#[derive(Debug, Clone, Default)]
pub enum CatalogState {
    #[default]
    NotLoaded,
    Loading,
    Loaded(Catalog),
    /// Load failed; the message is never empty.
    Failed(String),
}

impl CatalogState {
    pub fn status(&self) -> CatalogStatus {
        match self {
            CatalogState::NotLoaded => CatalogStatus::NotLoaded,
            CatalogState::Loading => CatalogStatus::Loading,
            CatalogState::Loaded(_) => CatalogStatus::Loaded,
            CatalogState::Failed(_) => CatalogStatus::Failed,
        }
    }
}

/// Payload-free copy of [`CatalogState`] for the view layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum CatalogStatus {
    NotLoaded,
    Loading,
    Loaded,
    Failed,
}

/// Proof that the holder started the current load.
///
/// Returned by [`CatalogStore::begin_load`]. A ticket from an abandoned load
/// no longer matches, so a late result from it cannot overwrite a newer one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

// =============================================================================
// Catalog Store
// =============================================================================

/// The catalog and its load state.
#[derive(Debug, Default)]
pub struct CatalogStore {
    state: CatalogState,
    generation: u64,
}

impl CatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &CatalogState {
        &self.state
    }

    pub fn status(&self) -> CatalogStatus {
        self.state.status()
    }

    /// Moves to `Loading`.
    ///
    /// ## Returns
    /// `None` if a load is already in flight; the caller must not start
    /// another fetch.
    pub fn begin_load(&mut self) -> Option<LoadTicket> {
        if matches!(self.state, CatalogState::Loading) {
            return None;
        }

        self.generation += 1;
        self.state = CatalogState::Loading;
        Some(LoadTicket(self.generation))
    }

    /// Moves `Loading → Loaded`. Returns `false` for a stale ticket.
    pub fn complete(&mut self, ticket: LoadTicket, catalog: Catalog) -> bool {
        if !self.is_current(ticket) {
            return false;
        }

        self.state = CatalogState::Loaded(catalog);
        true
    }

    /// Moves `Loading → Failed`. Returns `false` for a stale ticket.
    ///
    /// A blank message is replaced so the view always has something to show.
    pub fn fail(&mut self, ticket: LoadTicket, message: impl Into<String>) -> bool {
        if !self.is_current(ticket) {
            return false;
        }

        let message = message.into();
        let message = if message.trim().is_empty() {
            DEFAULT_FAILURE_MESSAGE.to_string()
        } else {
            message
        };

        self.state = CatalogState::Failed(message);
        true
    }

    /// Moves `Loading → NotLoaded` for a load nobody is waiting on anymore.
    pub fn abandon(&mut self, ticket: LoadTicket) -> bool {
        if !self.is_current(ticket) {
            return false;
        }

        self.state = CatalogState::NotLoaded;
        true
    }

    fn is_current(&self, ticket: LoadTicket) -> bool {
        matches!(self.state, CatalogState::Loading) && ticket.0 == self.generation
    }

    /// The loaded catalog, if any.
    pub fn catalog(&self) -> Option<&Catalog> {
        match &self.state {
            CatalogState::Loaded(catalog) => Some(catalog),
            _ => None,
        }
    }

    /// The failure message, if the last load failed.
    pub fn error(&self) -> Option<&str> {
        match &self.state {
            CatalogState::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// All products; empty unless `Loaded`.
    pub fn products(&self) -> &[Product] {
        self.catalog().map(Catalog::products).unwrap_or(&[])
    }

    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.catalog().and_then(|catalog| catalog.get(id))
    }

    /// Products whose title contains `query`, ignoring case.
    pub fn filter(&self, query: &str) -> CatalogView {
        self.view(CatalogQuery::new(query))
    }

    /// Like [`filter`](Self::filter), restricted to one category.
    pub fn filter_in_category(&self, query: &str, category: &str) -> CatalogView {
        self.view(CatalogQuery::new(query).in_category(category))
    }

    /// Runs an arbitrary query.
    pub fn view(&self, query: CatalogQuery) -> CatalogView {
        let products = match &self.state {
            CatalogState::Loaded(catalog) => Arc::clone(&catalog.products),
            _ => Arc::new(Vec::new()),
        };

        CatalogView { products, query }
    }

    /// Distinct categories in the order they first appear.
    ///
    /// Categories differing only by case are reported once, with the
    /// spelling seen first.
    pub fn categories(&self) -> Vec<String> {
        let mut seen = Vec::<String>::new();
        let mut categories = Vec::new();

        for product in self.products() {
            let folded = product.category.to_lowercase();
            if !seen.contains(&folded) {
                seen.push(folded);
                categories.push(product.category.clone());
            }
        }

        categories
    }
}

// =============================================================================
// Catalog Query
// =============================================================================

/// A search over product titles, optionally within one category.
///
/// ## Matching Rules
/// - Title: case-insensitive substring; the empty query matches everything
/// - Category: case-insensitive, exact
///
/// The query text is used as given. Callers taking input from a search box
/// trim it first (see `validation::validate_search_query`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogQuery {
    needle: String,
    category: Option<String>,
}

impl CatalogQuery {
    pub fn new(query: &str) -> Self {
        CatalogQuery {
            needle: query.to_lowercase(),
            category: None,
        }
    }

    pub fn in_category(mut self, category: &str) -> Self {
        self.category = Some(category.to_lowercase());
        self
    }

    pub fn matches(&self, product: &Product) -> bool {
        if let Some(category) = &self.category {
            if product.category.to_lowercase() != *category {
                return false;
            }
        }

        self.needle.is_empty() || product.title.to_lowercase().contains(&self.needle)
    }
}

// =============================================================================
// Catalog View
// =============================================================================

/// Lazy, restartable projection of the catalog.
///
/// ## Example
/// ```rust
/// use storefront_core::catalog::CatalogStore;
///
/// let store = CatalogStore::new();
/// let view = store.filter("ring");
///
/// // Nothing loaded yet: the view is empty, not an error.
/// assert_eq!(view.iter().count(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct CatalogView {
    products: Arc<Vec<Product>>,
    query: CatalogQuery,
}

impl CatalogView {
    pub fn iter(&self) -> Matches<'_> {
        Matches {
            inner: self.products.iter(),
            query: &self.query,
        }
    }

    pub fn query(&self) -> &CatalogQuery {
        &self.query
    }

    pub fn count(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    /// Clones the matching products out of the snapshot.
    pub fn to_vec(&self) -> Vec<Product> {
        self.iter().cloned().collect()
    }
}

impl<'a> IntoIterator for &'a CatalogView {
    type Item = &'a Product;
    type IntoIter = Matches<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the products matching a [`CatalogView`]'s query.
#[derive(Debug, Clone)]
pub struct Matches<'a> {
    inner: slice::Iter<'a, Product>,
    query: &'a CatalogQuery,
}

impl<'a> Iterator for Matches<'a> {
    type Item = &'a Product;

    fn next(&mut self) -> Option<Self::Item> {
        let query = self.query;
        self.inner.by_ref().find(|product| query.matches(product))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.inner.size_hint().1)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::money::Money;
    use crate::types::Rating;

    fn product(id: u64, title: &str, category: &str) -> Product {
        Product {
            id: ProductId::new(id),
            title: title.to_string(),
            price: Money::from_minor(1000),
            category: category.to_string(),
            description: None,
            image: String::new(),
            rating: Rating::default(),
        }
    }

    fn sample() -> Vec<Product> {
        vec![
            product(1, "Fjallraven Backpack", "men's clothing"),
            product(2, "Gold Ring", "jewelery"),
            product(3, "Silver Dragon Ring", "Jewelery"),
            product(4, "WD 2TB External Hard Drive", "electronics"),
        ]
    }

    fn loaded_store() -> CatalogStore {
        let mut store = CatalogStore::new();
        let ticket = store.begin_load().unwrap();
        assert!(store.complete(ticket, Catalog::from_products(sample()).unwrap()));
        store
    }

    fn ids(view: &CatalogView) -> Vec<u64> {
        view.iter().map(|p| p.id.get()).collect()
    }

    #[test]
    fn test_load_success_transitions() {
        let mut store = CatalogStore::new();
        assert_eq!(store.status(), CatalogStatus::NotLoaded);

        let ticket = store.begin_load().unwrap();
        assert_eq!(store.status(), CatalogStatus::Loading);
        assert!(store.begin_load().is_none());

        store.complete(ticket, Catalog::from_products(sample()).unwrap());
        assert_eq!(store.status(), CatalogStatus::Loaded);
        assert_eq!(store.products().len(), 4);
        assert!(store.error().is_none());
    }

    #[test]
    fn test_transport_failure_yields_failed_and_empty_filter() {
        let mut store = CatalogStore::new();
        let ticket = store.begin_load().unwrap();

        assert!(store.fail(ticket, "connection refused"));

        assert_eq!(store.status(), CatalogStatus::Failed);
        assert_eq!(store.error(), Some("connection refused"));
        assert!(store.filter("").is_empty());
        assert!(store.products().is_empty());
    }

    #[test]
    fn test_blank_failure_message_is_replaced() {
        let mut store = CatalogStore::new();
        let ticket = store.begin_load().unwrap();
        store.fail(ticket, "  ");

        assert!(!store.error().unwrap().trim().is_empty());
    }

    #[test]
    fn test_failed_is_terminal_until_retriggered() {
        let mut store = CatalogStore::new();
        let ticket = store.begin_load().unwrap();
        store.fail(ticket, "timeout");

        // The failed ticket cannot be reused to sneak in a result.
        let late = Catalog::from_products(sample()).unwrap();
        assert!(!store.complete(ticket, late));
        assert_eq!(store.status(), CatalogStatus::Failed);

        let retry = store.begin_load().unwrap();
        assert!(store.complete(retry, Catalog::from_products(sample()).unwrap()));
        assert_eq!(store.status(), CatalogStatus::Loaded);
    }

    #[test]
    fn test_abandon_returns_to_not_loaded_and_stales_ticket() {
        let mut store = CatalogStore::new();
        let first = store.begin_load().unwrap();
        assert!(store.abandon(first));
        assert_eq!(store.status(), CatalogStatus::NotLoaded);

        let second = store.begin_load().unwrap();
        assert!(!store.fail(first, "late failure from abandoned load"));
        assert_eq!(store.status(), CatalogStatus::Loading);

        assert!(store.complete(second, Catalog::from_products(sample()).unwrap()));
    }

    #[test]
    fn test_filter_is_case_insensitive_substring() {
        let store = loaded_store();

        assert_eq!(ids(&store.filter("ring")), vec![2, 3]);
        assert_eq!(ids(&store.filter("RING")), vec![2, 3]);
        assert_eq!(ids(&store.filter("drive")), vec![4]);
        assert!(store.filter("sofa").is_empty());
    }

    #[test]
    fn test_empty_query_matches_everything() {
        let store = loaded_store();
        assert_eq!(ids(&store.filter("")), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_view_is_restartable_and_does_not_mutate() {
        let store = loaded_store();
        let view = store.filter("ring");

        let first: Vec<_> = view.iter().collect();
        let second: Vec<_> = view.clone().iter().map(|p| p.id).collect();
        assert_eq!(first.len(), 2);
        assert_eq!(second, vec![ProductId::new(2), ProductId::new(3)]);
        assert_eq!(store.products().len(), 4);
    }

    #[test]
    fn test_view_outlives_reload() {
        let mut store = loaded_store();
        let view = store.filter("");

        let ticket = store.begin_load().unwrap();
        store.fail(ticket, "gone");

        // The snapshot taken before the reload still iterates.
        assert_eq!(view.count(), 4);
        assert!(store.filter("").is_empty());
    }

    #[test]
    fn test_filter_in_category() {
        let store = loaded_store();

        assert_eq!(ids(&store.filter_in_category("", "jewelery")), vec![2, 3]);
        assert_eq!(ids(&store.filter_in_category("dragon", "JEWELERY")), vec![3]);
        assert!(store.filter_in_category("ring", "electronics").is_empty());
        assert!(store.filter_in_category("", "jewel").is_empty());
    }

    #[test]
    fn test_categories_first_seen_order() {
        let store = loaded_store();
        assert_eq!(
            store.categories(),
            vec!["men's clothing", "jewelery", "electronics"]
        );
        assert!(CatalogStore::new().categories().is_empty());
    }

    #[test]
    fn test_get_by_id() {
        let store = loaded_store();
        assert_eq!(store.get(ProductId::new(2)).unwrap().title, "Gold Ring");
        assert!(store.get(ProductId::new(99)).is_none());
        assert!(CatalogStore::new().get(ProductId::new(2)).is_none());
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let mut products = sample();
        products.push(product(2, "Another Ring", "jewelery"));

        let err = Catalog::from_products(products).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::Duplicate { .. })
        ));
    }

    #[test]
    fn test_empty_catalog_is_loaded_not_failed() {
        let mut store = CatalogStore::new();
        let ticket = store.begin_load().unwrap();
        store.complete(ticket, Catalog::from_products(Vec::new()).unwrap());

        assert_eq!(store.status(), CatalogStatus::Loaded);
        assert!(store.filter("").is_empty());
        assert!(store.error().is_none());
    }
}
