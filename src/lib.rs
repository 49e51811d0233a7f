//! ShopCart - Storefront product catalog and listing pipeline
//!
//! Serves the product catalog over a small REST API and implements the
//! storefront's listing pipeline (fetch, filter, sort, merge, paginate)
//! together with the session-wide cart counter.

// Module declarations
pub mod api;
pub mod application;
pub mod domain;
pub mod infrastructure;

use anyhow::Result;
use tracing::info;

use crate::infrastructure::{
    config::ConfigManager,
    logging::{init_logging_with_config, log_system_info},
};

/// Loads configuration, initializes logging and runs the product API until shutdown.
pub async fn run() -> Result<()> {
    let config = ConfigManager::new()?.load_config()?;

    init_logging_with_config(&config.logging)?;
    log_system_info();
    info!("Starting ShopCart API on {}", config.bind_address());

    api::start_server(config).await
}
