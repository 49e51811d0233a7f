//! Infrastructure layer for the catalog database, HTTP access and local storage
//!
//! This module provides the SQLite catalog, the HTTP product source, cart
//! storage backends, configuration loading and logging.

pub mod config; // Layered configuration
pub mod database_connection;
pub mod http_client; // Product API client
pub mod local_storage; // Cart persistence
pub mod logging; // Logging infrastructure
pub mod product_repository;

// Re-export commonly used items
pub use config::{AppConfig, ConfigError, ConfigManager};
pub use database_connection::DatabaseConnection;
pub use http_client::{HttpClientConfig, HttpProductSource};
pub use local_storage::{CartStorage, JsonFileStorage, MemoryStorage};
pub use logging::{get_log_directory, init_logging_with_config};
pub use product_repository::{SqliteProductRepository, seed_from_file};
