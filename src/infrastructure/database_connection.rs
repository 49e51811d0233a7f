// Database connection and pool management
// This module handles the SQLite catalog database using sqlx

use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};
use tracing::{debug, info};

pub const IN_MEMORY_URL: &str = "sqlite::memory:";

pub struct DatabaseConnection {
    pool: SqlitePool,
}

impl DatabaseConnection {
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self> {
        let in_memory = is_in_memory(database_url);

        if !in_memory {
            // Create database file directory if it doesn't exist
            let db_path = database_url
                .trim_start_matches("sqlite://")
                .trim_start_matches("sqlite:");
            let db_path = db_path.split('?').next().unwrap_or(db_path);

            if let Some(parent) = Path::new(db_path).parent() {
                if !parent.as_os_str().is_empty() {
                    tokio::fs::create_dir_all(parent)
                        .await
                        .with_context(|| format!("Failed to create database directory {:?}", parent))?;
                }
            }
        }

        let options = SqliteConnectOptions::from_str(database_url)
            .with_context(|| format!("Invalid database URL: {}", database_url))?
            .create_if_missing(true);

        // Every in-memory connection is a separate database, so pin the pool to one
        // connection that never expires.
        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(max_connections)
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .with_context(|| format!("Failed to connect to {}", database_url))?;

        info!("Connected to database: {}", database_url);
        Ok(Self { pool })
    }

    /// Private in-memory catalog, used by tests and throwaway servers.
    pub async fn in_memory() -> Result<Self> {
        Self::new(IN_MEMORY_URL, 1).await
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn migrate(&self) -> Result<()> {
        let create_products_sql = r"
            CREATE TABLE IF NOT EXISTS products (
                id INTEGER PRIMARY KEY,
                uri TEXT NOT NULL UNIQUE,
                category TEXT NOT NULL,
                title TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                image TEXT NOT NULL DEFAULT '',
                price REAL NOT NULL,
                discounted_price REAL,
                rating REAL NOT NULL DEFAULT 0
            )
        ";

        let create_category_index_sql =
            "CREATE INDEX IF NOT EXISTS idx_products_category ON products (category)";

        sqlx::query(create_products_sql).execute(&self.pool).await?;
        sqlx::query(create_category_index_sql).execute(&self.pool).await?;

        debug!("Catalog schema is up to date");
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

fn is_in_memory(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_database_connection() -> Result<()> {
        let temp_dir = tempdir()?;
        let db_path = temp_dir.path().join("nested").join("test.db");
        let database_url = format!("sqlite:{}", db_path.display());

        let db = DatabaseConnection::new(&database_url, 2).await?;

        assert!(!db.pool().is_closed());
        assert!(db_path.exists());
        Ok(())
    }

    #[tokio::test]
    async fn test_database_migration() -> Result<()> {
        let db = DatabaseConnection::in_memory().await?;

        db.migrate().await?;
        // running twice is harmless
        db.migrate().await?;

        let result = sqlx::query("SELECT name FROM sqlite_master WHERE type='table' AND name='products'")
            .fetch_optional(db.pool())
            .await?;

        assert!(result.is_some());
        Ok(())
    }

    #[test]
    fn test_in_memory_detection() {
        assert!(is_in_memory("sqlite::memory:"));
        assert!(is_in_memory("sqlite://file:catalog?mode=memory&cache=shared"));
        assert!(!is_in_memory("sqlite://shopcart.db"));
    }
}
