//! Repository interfaces for the storefront catalog
//!
//! Contains trait definitions for product data access.

use anyhow::Result;
use async_trait::async_trait;

use crate::domain::product::Product;

#[async_trait]
pub trait ProductRepository: Send + Sync {
    // Read paths served by the product API
    /// All products ordered by id, or only those whose category matches exactly.
    async fn list_products(&self, category: Option<&str>) -> Result<Vec<Product>>;
    async fn find_by_uri(&self, uri: &str) -> Result<Option<Product>>;
    /// Up to `limit` products sharing `category`.
    async fn list_related(&self, category: &str, limit: u32) -> Result<Vec<Product>>;

    // Write paths used for seeding the catalog
    async fn save_product(&self, product: &Product) -> Result<()>;
    async fn save_products_batch(&self, products: &[Product]) -> Result<()>;

    // Statistics
    async fn count_products(&self) -> Result<u64>;
}
