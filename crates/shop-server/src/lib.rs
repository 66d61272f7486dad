//! HTTP surface over the catalog engine.
//!
//! | Route | Response |
//! |---|---|
//! | `GET /categories` | JSON array of categories |
//! | `GET /products?search=&category=&sort=&page=` | paginated products |
//! | `GET /products/{slug}` | `{product, variants}`, or 404 `{message}` |
//! | `GET /health` | status and version |

pub mod error;
pub mod routes;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use shop_catalog::catalog::Catalog;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;

pub use error::{ApiError, ErrorBody, PRODUCT_NOT_FOUND};

/// Shared application state passed to handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
}

impl AppState {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }
}

/// Build the router over a catalog.
pub fn router(catalog: Arc<Catalog>) -> Router {
    Router::new()
        .route("/health", get(routes::health))
        .route("/categories", get(routes::list_categories))
        .route("/products", get(routes::list_products))
        .route("/products/{slug}", get(routes::product_detail))
        .fallback(routes::not_found)
        .with_state(AppState::new(catalog))
}

/// Bind `addr` and serve until `shutdown` is cancelled.
pub async fn serve(
    catalog: Arc<Catalog>,
    addr: &str,
    shutdown: CancellationToken,
) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    serve_listener(catalog, listener, shutdown).await
}

/// Serve on an already bound listener until `shutdown` is cancelled.
pub async fn serve_listener(
    catalog: Arc<Catalog>,
    listener: TcpListener,
    shutdown: CancellationToken,
) -> std::io::Result<()> {
    let local: SocketAddr = listener.local_addr()?;
    info!(addr = %local, products = catalog.products.len(), "catalog server listening");

    axum::serve(listener, router(catalog))
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;

    info!("catalog server stopped");
    Ok(())
}
