//! Product REST API
//!
//! Serves the catalog to the storefront: the listing (optionally by
//! category), single products by URI and related products.

pub mod error;
pub mod routes;
pub mod server;
pub mod state;

pub use error::ApiError;
pub use server::{build_router, serve, start_server};
pub use state::AppState;
