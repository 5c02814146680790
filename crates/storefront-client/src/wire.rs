//! # Catalog Wire Format
//!
//! JSON records as served by the remote catalog, and the ingestion step that
//! turns them into validated [`Product`]s.
//!
//! ## Ingestion Policy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Record-by-Record Ingestion                           │
//! │                                                                         │
//! │  body ──► JSON array? ──no──► MalformedCatalog (whole load Failed)     │
//! │               │yes                                                      │
//! │               ▼                                                         │
//! │  for each element:                                                     │
//! │    deserialize ──fail──┐                                               │
//! │    title blank ────────┤                                               │
//! │    price < 0 / NaN ────┼──► RejectedRecord + warn!, keep going         │
//! │    rating ∉ 0..=5 ─────┤                                               │
//! │    id seen before ─────┘                                               │
//! │               │ ok                                                      │
//! │               ▼                                                         │
//! │          Product (rating missing → {0, 0})                              │
//! │                                                                         │
//! │  Every element rejected → Loaded with an empty catalog, not Failed     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example Record
//! ```json
//! {
//!   "id": 1,
//!   "title": "Fjallraven - Foldsack No. 1 Backpack, Fits 15 Laptops",
//!   "price": 109.95,
//!   "description": "Your perfect pack for everyday use",
//!   "category": "men's clothing",
//!   "image": "https://fakestoreapi.com/img/81fPKd-2AYL._AC_SL1500_.jpg",
//!   "rating": { "rate": 3.9, "count": 120 }
//! }
//! ```

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use storefront_core::validation::{validate_price, validate_product_title, validate_rating};
use storefront_core::{Product, ProductId, Rating, ValidationError};

use crate::error::{ClientError, ClientResult};

// =============================================================================
// Wire Records
// =============================================================================

/// One product as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogRecord {
    pub id: u64,
    pub title: String,
    pub price: f64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub rating: Option<RatingRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingRecord {
    pub rate: f64,
    #[serde(default)]
    pub count: u32,
}

impl CatalogRecord {
    /// Validates every field and builds the domain product.
    pub fn into_product(self) -> Result<Product, ValidationError> {
        let title = validate_product_title(&self.title)?;
        let price = validate_price(self.price)?;
        let rating = match self.rating {
            Some(r) => validate_rating(r.rate, r.count)?,
            None => Rating::default(),
        };

        Ok(Product {
            id: ProductId::new(self.id),
            title,
            price,
            category: self.category.trim().to_string(),
            description: self.description.filter(|d| !d.trim().is_empty()),
            image: self.image,
            rating,
        })
    }
}

// =============================================================================
// Ingestion
// =============================================================================

/// A record that was dropped during ingestion.
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedRecord {
    /// Index of the element in the array.
    pub position: usize,
    /// The record's id, if it had a readable one.
    pub id: Option<u64>,
    pub reason: String,
}

/// Outcome of [`ingest`].
#[derive(Debug, Clone, Default)]
pub struct IngestReport {
    /// Accepted products, in source order, unique by id.
    pub products: Vec<Product>,
    pub rejected: Vec<RejectedRecord>,
}

impl IngestReport {
    pub fn accepted(&self) -> usize {
        self.products.len()
    }
}

/// Decodes a response body into raw records.
///
/// ## Errors
/// [`ClientError::MalformedCatalog`] unless the body is a JSON array.
pub fn decode_body(body: &[u8]) -> ClientResult<Vec<Value>> {
    match serde_json::from_slice::<Value>(body)? {
        Value::Array(records) => Ok(records),
        other => Err(ClientError::MalformedCatalog(format!(
            "expected a JSON array of products, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Turns raw records into products, rejecting bad records one at a time.
pub fn ingest(records: Vec<Value>) -> IngestReport {
    let mut report = IngestReport::default();
    let mut seen = HashSet::with_capacity(records.len());

    for (position, value) in records.into_iter().enumerate() {
        let id = value.get("id").and_then(Value::as_u64);

        let result = serde_json::from_value::<CatalogRecord>(value)
            .map_err(|e| e.to_string())
            .and_then(|record| record.into_product().map_err(|e| e.to_string()))
            .and_then(|product| {
                if seen.insert(product.id) {
                    Ok(product)
                } else {
                    Err(ValidationError::Duplicate {
                        field: "product id".to_string(),
                        value: product.id.to_string(),
                    }
                    .to_string())
                }
            });

        match result {
            Ok(product) => report.products.push(product),
            Err(reason) => {
                warn!(position, id = ?id, reason = %reason, "Rejecting catalog record");
                report.rejected.push(RejectedRecord {
                    position,
                    id,
                    reason,
                });
            }
        }
    }

    debug!(
        accepted = report.products.len(),
        rejected = report.rejected.len(),
        "Catalog ingestion finished"
    );

    report
}

// =============================================================================
// Unit Tests
// =============================================================================
