//! Route handlers.

use axum::extract::{Path, RawQuery, State};
use axum::Json;
use serde::Serialize;
use shop_catalog::catalog::{CategoryRecord, ProductDetail, ProductRecord};
use shop_catalog::search::{codec, PaginatedResult};
use tracing::{debug, instrument};

use crate::error::ApiError;
use crate::AppState;

/// JSON response body for `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub products: usize,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        products: state.catalog.products.len(),
    })
}

/// `GET /categories`: always a bare array.
pub async fn list_categories(State(state): State<AppState>) -> Json<Vec<CategoryRecord>> {
    Json(state.catalog.categories.clone())
}

/// `GET /products?search=&category=&sort=&page=`
///
/// The raw query string goes through the codec, so invalid values fall
/// back to defaults instead of rejecting the request.
#[instrument(skip(state))]
pub async fn list_products(
    State(state): State<AppState>,
    RawQuery(raw): RawQuery,
) -> Json<PaginatedResult<ProductRecord>> {
    let query = codec::parse_query_string(raw.as_deref().unwrap_or_default());
    let result = state.catalog.query(&query);
    debug!(
        page = result.meta.page,
        total = result.meta.total_items,
        "products queried"
    );
    Json(result)
}

/// `GET /products/{slug}`: `{product, variants}` or 404.
#[instrument(skip(state))]
pub async fn product_detail(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<ProductDetail>, ApiError> {
    let detail = state.catalog.product_detail(&slug)?;
    Ok(Json(detail))
}

pub async fn not_found() -> ApiError {
    ApiError::NotFound("Not found".to_string())
}
