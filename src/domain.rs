//! Domain module - Core storefront logic and entities
//!
//! This module contains the product and cart entities and the pure stages of
//! the product listing pipeline (filter, sort, merge, paginate).
//!
//! Modern Rust module organization (Rust 2018+ style):
//! - Each module is its own file in the domain/ directory
//! - Public exports are defined here for convenience

pub mod cart;
pub mod constants;
pub mod filter;
pub mod listing;
pub mod merge;
pub mod pagination;
pub mod product;
pub mod repositories;
pub mod sort;

// Re-export commonly used items for convenience
pub use cart::{CartEntry, parse_cart, total_quantity};
pub use filter::{FacetSelection, filter_products};
pub use listing::{FetchResult, FilterResult, ListingWindow, SortResult};
pub use merge::display_list;
pub use pagination::Pagination;
pub use product::Product;
pub use repositories::ProductRepository;
pub use sort::{SortKey, sort_products};
