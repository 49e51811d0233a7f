//! Product API handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::debug;

use crate::api::{error::ApiError, state::AppState};
use crate::domain::{
    constants::catalog::RELATED_PRODUCTS_LIMIT,
    product::{Product, normalize_category},
};

#[derive(Debug, Default, Deserialize)]
pub struct ProductQuery {
    pub category: Option<String>,
}

/// `GET /api/products?category=`
pub async fn list_products_handler(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let category = normalize_category(query.category.as_deref());
    let products = state.repository.list_products(category.as_deref()).await?;
    debug!(
        "Listing {} products (category: {})",
        products.len(),
        category.as_deref().unwrap_or("all")
    );
    Ok(Json(products))
}

/// `GET /api/products/:uri`
pub async fn product_handler(
    State(state): State<AppState>,
    Path(uri): Path<String>,
) -> Result<Json<Product>, ApiError> {
    state
        .repository
        .find_by_uri(&uri)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound)
}

/// `GET /api/products/related/:category`
pub async fn related_products_handler(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let products = state
        .repository
        .list_related(&category, RELATED_PRODUCTS_LIMIT)
        .await?;
    Ok(Json(products))
}

pub async fn health_handler() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
