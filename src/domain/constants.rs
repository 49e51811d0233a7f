//! Storefront domain constants
//!
//! Values observed in the storefront's listing grid and product API.

/// Listing grid constants
pub mod listing {
    /// Number of products revealed per "Load More" step.
    pub const PAGE_SIZE: usize = 12;

    /// The grid always starts with one page visible.
    pub const INITIAL_PAGE_COUNT: usize = 1;
}

/// Product API constants
pub mod catalog {
    /// Maximum number of related products returned for a category.
    pub const RELATED_PRODUCTS_LIMIT: u32 = 4;

    /// Base path of the product endpoints.
    pub const PRODUCTS_PATH: &str = "api/products";
}

/// Local storage constants
pub mod storage {
    /// Well-known local storage key holding the persisted cart.
    pub const CART_KEY: &str = "cart";
}
