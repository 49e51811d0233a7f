//! Where the listing gets its products from

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{product::Product, repositories::ProductRepository};

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Product API returned {status} for {url}")]
    Status { status: u16, url: String },

    #[error("Invalid product payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Catalog query failed: {0}")]
    Store(String),

    #[error("Fetch was superseded by a newer request")]
    Cancelled,
}

#[async_trait]
pub trait ProductSource: Send + Sync {
    /// All products, or only those in `category` when one is given.
    async fn list_products(&self, category: Option<&str>) -> Result<Vec<Product>, FetchError>;
}

/// Serves the listing straight from a catalog repository
pub struct RepositorySource {
    repository: Arc<dyn ProductRepository>,
}

impl RepositorySource {
    pub fn new(repository: Arc<dyn ProductRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl ProductSource for RepositorySource {
    async fn list_products(&self, category: Option<&str>) -> Result<Vec<Product>, FetchError> {
        self.repository
            .list_products(category)
            .await
            .map_err(|e| FetchError::Store(format!("{e:#}")))
    }
}
