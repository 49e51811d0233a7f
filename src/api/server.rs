use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::{
    Router,
    http::{HeaderValue, Method, header::CONTENT_TYPE},
    routing::get,
};
use tokio::{net::TcpListener, signal};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info, warn};

use crate::api::{
    routes::{health_handler, list_products_handler, product_handler, related_products_handler},
    state::AppState,
};
use crate::domain::repositories::ProductRepository;
use crate::infrastructure::{
    config::{AppConfig, ServerConfig},
    database_connection::DatabaseConnection,
    product_repository::{SqliteProductRepository, seed_from_file},
};

pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.server);

    Router::new()
        .route("/api/products", get(list_products_handler))
        .route("/api/products/related/:category", get(related_products_handler))
        .route("/api/products/:uri", get(product_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| {
            if origin == "*" {
                warn!("Wildcard CORS origin is not allowed with credentials, ignoring it");
                return None;
            }
            HeaderValue::from_str(origin)
                .inspect_err(|e| warn!("Ignoring invalid CORS origin {}: {}", origin, e))
                .ok()
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60))
}

/// Opens the catalog, seeds it if configured and serves the product API
/// until Ctrl+C or SIGTERM.
pub async fn start_server(config: AppConfig) -> Result<()> {
    info!("Initializing catalog...");
    let database = DatabaseConnection::new(&config.database.url, config.database.max_connections).await?;
    database.migrate().await?;

    let repository: Arc<dyn ProductRepository> =
        Arc::new(SqliteProductRepository::new(database.pool().clone()));

    if let Some(seed_file) = &config.database.seed_file {
        seed_from_file(repository.as_ref(), seed_file).await?;
    }

    let address = config.bind_address();
    info!("Binding to {address}");
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;

    serve(listener, AppState::new(repository, config)).await?;

    database.close().await;
    info!("Server shut down");
    Ok(())
}

/// Serves the API on an already bound listener.
pub async fn serve(listener: TcpListener, state: AppState) -> Result<()> {
    let app = build_router(state);
    info!("Server running on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
                info!("Received SIGTERM, shutting down");
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
