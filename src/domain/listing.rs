//! Listing pipeline slices
//!
//! Each stage of the product grid publishes one of these: the fetched
//! collection, the filtered subset and the sorted reordering. The merge stage
//! combines them into the display list.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::domain::product::Product;

/// Fetched product collection. Replaced wholesale on every fetch completion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FetchResult {
    pub products: Vec<Product>,
    pub is_loaded: bool,
}

impl FetchResult {
    pub fn loaded(products: Vec<Product>) -> Self {
        Self {
            products,
            is_loaded: true,
        }
    }
}

/// Output of the filter stage. `products` is empty while no facet is active.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterResult {
    pub products: Vec<Product>,
    pub is_filtering: bool,
}

impl FilterResult {
    pub fn inactive() -> Self {
        Self::default()
    }
}

/// Output of the sort stage. `products` is empty while the default key is selected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SortResult {
    pub products: Vec<Product>,
    pub is_sorting: bool,
}

impl SortResult {
    pub fn inactive() -> Self {
        Self::default()
    }
}

/// Rendering view of the paginated display list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ListingWindow {
    /// Products inside the current window
    pub products: Vec<Product>,
    /// Number of products currently shown
    pub shown: u32,
    /// Size of the fetched collection
    pub total: u32,
    /// Whether the "Load More" control should be visible
    pub has_more: bool,
    pub is_loaded: bool,
}

impl ListingWindow {
    /// "No products found" state
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
