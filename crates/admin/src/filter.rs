//! Product filtering and selection.
//!
//! Pure, stateless logic recomputed on every request: three independent
//! case-sensitive substring predicates combined with logical AND, plus the
//! ephemeral selected-product set.

use std::collections::BTreeSet;

use serde::Deserialize;

use crate::shopify::types::Product;

/// Free-text filter values for the product listing.
///
/// Each predicate is a case-sensitive substring test, vacuously true when the
/// filter value is empty.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductFilter {
    /// Substring matched against the product SKU.
    #[serde(default)]
    pub sku: String,
    /// Substring matched against each product tag.
    #[serde(default)]
    pub tag: String,
    /// Substring matched against each collection title.
    #[serde(default)]
    pub collection: String,
}

impl ProductFilter {
    /// Whether a single product satisfies all three predicates.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        let matches_sku = self.sku.is_empty() || product.sku.contains(&self.sku);
        let matches_tag =
            self.tag.is_empty() || product.tags.iter().any(|t| t.contains(&self.tag));
        let matches_collection = self.collection.is_empty()
            || product.collections.iter().any(|c| c.contains(&self.collection));

        matches_sku && matches_tag && matches_collection
    }

    /// Filter a product list, preserving order.
    #[must_use]
    pub fn apply<'a>(&self, products: &'a [Product]) -> Vec<&'a Product> {
        products.iter().filter(|p| self.matches(p)).collect()
    }

    /// Whether all three filter values are empty (listing is unfiltered).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sku.is_empty() && self.tag.is_empty() && self.collection.is_empty()
    }
}

/// Ephemeral set of selected product ids.
///
/// Lives only for one page view; there is no bound on its size and no
/// validation against the filtered list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: BTreeSet<String>,
}

impl Selection {
    /// Create an empty selection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a selection from a list of ids (duplicates collapse).
    #[must_use]
    pub fn from_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ids: ids.into_iter().map(Into::into).collect(),
        }
    }

    /// Flip membership of a product id.
    pub fn toggle(&mut self, id: &str) {
        if !self.ids.remove(id) {
            self.ids.insert(id.to_string());
        }
    }

    /// Whether the id is currently selected.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Number of selected ids.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Iterate over selected ids.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }
}
