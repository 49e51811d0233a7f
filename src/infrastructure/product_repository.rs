//! SQLite implementation of the product catalog repository

use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{Row, Sqlite, SqlitePool, sqlite::SqliteRow};
use tracing::{info, warn};

use crate::domain::{
    product::{Product, normalize_category},
    repositories::ProductRepository,
};

const PRODUCT_COLUMNS: &str =
    "id, uri, category, title, description, image, price, discounted_price, rating";

#[derive(Clone)]
pub struct SqliteProductRepository {
    pool: SqlitePool,
}

impl SqliteProductRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Helper method to convert database row to Product entity
    fn row_to_product(row: &SqliteRow) -> Result<Product> {
        Ok(Product {
            id: row.try_get("id")?,
            uri: row.try_get("uri")?,
            category: row.try_get("category")?,
            title: row.try_get("title")?,
            description: row.try_get("description")?,
            image: row.try_get("image")?,
            price: row.try_get("price")?,
            discounted_price: row.try_get("discounted_price")?,
            rating: row.try_get("rating")?,
        })
    }

    async fn upsert<'e, E>(executor: E, product: &Product) -> Result<()>
    where
        E: sqlx::Executor<'e, Database = Sqlite>,
    {
        sqlx::query(
            r"
            INSERT OR REPLACE INTO products
            (id, uri, category, title, description, image, price, discounted_price, rating)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            ",
        )
        .bind(product.id)
        .bind(&product.uri)
        .bind(&product.category)
        .bind(&product.title)
        .bind(&product.description)
        .bind(&product.image)
        .bind(product.price)
        .bind(product.discounted_price)
        .bind(product.rating)
        .execute(executor)
        .await
        .with_context(|| format!("Failed to save product {}", product.uri))?;
        Ok(())
    }
}

#[async_trait]
impl ProductRepository for SqliteProductRepository {
    /// Blank categories list the whole catalog.
    async fn list_products(&self, category: Option<&str>) -> Result<Vec<Product>> {
        let category = normalize_category(category);
        let rows = match category.as_deref() {
            Some(category) => {
                let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE category = ? ORDER BY id");
                sqlx::query(&sql).bind(category).fetch_all(&self.pool).await?
            }
            None => {
                let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products ORDER BY id");
                sqlx::query(&sql).fetch_all(&self.pool).await?
            }
        };

        rows.iter().map(Self::row_to_product).collect()
    }

    async fn find_by_uri(&self, uri: &str) -> Result<Option<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE uri = ? LIMIT 1");
        let row = sqlx::query(&sql)
            .bind(uri)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(Self::row_to_product(&row)?)),
            None => Ok(None),
        }
    }

    async fn list_related(&self, category: &str, limit: u32) -> Result<Vec<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE category = ? ORDER BY id LIMIT ?");
        let rows = sqlx::query(&sql)
            .bind(category)
            .bind(i64::from(limit))
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(Self::row_to_product).collect()
    }

    async fn save_product(&self, product: &Product) -> Result<()> {
        Self::upsert(&self.pool, product).await
    }

    async fn save_products_batch(&self, products: &[Product]) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        for product in products {
            Self::upsert(&mut *tx, product).await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn count_products(&self) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;
        Ok(u64::try_from(count).unwrap_or(0))
    }
}

/// Loads a JSON array of products into an empty catalog. Returns how many
/// products were inserted; a catalog that already has rows is left alone.
pub async fn seed_from_file(repository: &dyn ProductRepository, path: &Path) -> Result<usize> {
    let existing = repository.count_products().await?;
    if existing > 0 {
        info!("Catalog already holds {} products, skipping seed", existing);
        return Ok(0);
    }

    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read seed file {:?}", path))?;
    let products: Vec<Product> =
        serde_json::from_str(&raw).with_context(|| format!("Invalid seed file {:?}", path))?;

    if products.is_empty() {
        warn!("Seed file {:?} contains no products", path);
        return Ok(0);
    }

    repository.save_products_batch(&products).await?;
    info!("Seeded {} products from {:?}", products.len(), path);
    Ok(products.len())
}
