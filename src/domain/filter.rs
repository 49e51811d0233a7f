//! Filter stage
//!
//! Facets are ANDed: a product is kept only when it satisfies every active
//! facet. The fetch order is preserved.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::domain::listing::FilterResult;
use crate::domain::product::Product;

/// User-selected facet values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(default)]
pub struct FacetSelection {
    /// Keep products whose category is one of these (empty = facet off)
    pub categories: Vec<String>,
    /// Inclusive lower bound on the effective price
    pub min_price: Option<f64>,
    /// Inclusive upper bound on the effective price
    pub max_price: Option<f64>,
    pub min_rating: Option<f64>,
    pub discounted_only: bool,
}

impl FacetSelection {
    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = categories.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_price_range(mut self, min_price: Option<f64>, max_price: Option<f64>) -> Self {
        self.min_price = min_price;
        self.max_price = max_price;
        self
    }

    pub fn with_min_rating(mut self, min_rating: f64) -> Self {
        self.min_rating = Some(min_rating);
        self
    }

    pub fn discounted_only(mut self) -> Self {
        self.discounted_only = true;
        self
    }

    /// True iff at least one facet constraint is active.
    pub fn is_active(&self) -> bool {
        !self.categories.is_empty()
            || self.min_price.is_some()
            || self.max_price.is_some()
            || self.min_rating.is_some()
            || self.discounted_only
    }

    pub fn matches(&self, product: &Product) -> bool {
        if !self.categories.is_empty() && !self.categories.iter().any(|c| product.in_category(c)) {
            return false;
        }

        let price = product.effective_price();
        if self.min_price.is_some_and(|min| price < min) {
            return false;
        }
        if self.max_price.is_some_and(|max| price > max) {
            return false;
        }

        if self.min_rating.is_some_and(|min| product.rating < min) {
            return false;
        }

        !self.discounted_only || product.is_discounted()
    }
}

/// Computes the filter slice for the fetched products.
pub fn filter_products(products: &[Product], facets: &FacetSelection) -> FilterResult {
    if !facets.is_active() {
        return FilterResult::inactive();
    }

    FilterResult {
        products: products
            .iter()
            .filter(|product| facets.matches(product))
            .cloned()
            .collect(),
        is_filtering: true,
    }
}
