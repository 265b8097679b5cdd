//! Domain and wire types for the Shopify product listing.

use serde::Deserialize;

/// A sellable catalog item as reported by Shopify.
///
/// Read-only; fetched fresh per page load and never mutated locally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    /// Opaque platform identifier (unique within one loaded list).
    pub id: String,
    /// Display title.
    pub title: String,
    /// SKU of the primary variant.
    pub sku: String,
    /// Product tags, in platform order.
    pub tags: Vec<String>,
    /// Titles of the collections the product belongs to, in platform order.
    pub collections: Vec<String>,
}

// =============================================================================
// Wire Types (REST Admin API)
// =============================================================================

/// Response body of the product-listing endpoint (`products.json`).
#[derive(Debug, Deserialize)]
pub struct ProductsResponse {
    #[serde(default)]
    pub products: Vec<RawProduct>,
}

/// Raw product record from the REST Admin API.
///
/// Only the fields this app reads are declared; everything else is ignored.
#[derive(Debug, Deserialize)]
pub struct RawProduct {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    /// Comma-separated tag list, as Shopify serializes it over REST.
    #[serde(default)]
    pub tags: String,
    #[serde(default)]
    pub variants: Vec<RawVariant>,
    /// Collection titles. Not part of the stock REST product payload; present
    /// when the listing response has been enriched upstream.
    #[serde(default)]
    pub collections: Vec<String>,
}

/// Raw product variant; supplies the SKU.
#[derive(Debug, Deserialize)]
pub struct RawVariant {
    #[serde(default)]
    pub sku: Option<String>,
}

impl From<RawProduct> for Product {
    fn from(raw: RawProduct) -> Self {
        let sku = raw
            .variants
            .first()
            .and_then(|v| v.sku.clone())
            .unwrap_or_default();

        let tags = raw
            .tags
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(String::from)
            .collect();

        Self {
            id: raw.id.to_string(),
            title: raw.title,
            sku,
            tags,
            collections: raw.collections,
        }
    }
}
