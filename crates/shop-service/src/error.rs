//! Service error types.

use shop_catalog::CatalogError;
use shop_fetch::FetchError;
use thiserror::Error;

/// Errors surfaced to catalog callers.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// A product or category lookup missed.
    #[error("{resource} not found: {key}")]
    NotFound { resource: &'static str, key: String },

    /// The caller's signal fired before a local lookup ran.
    #[error("Catalog request cancelled")]
    Cancelled,

    /// Request client failure.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Dataset failure other than a lookup miss.
    #[error(transparent)]
    Catalog(CatalogError),
}

impl ServiceError {
    pub fn product_not_found(slug: impl Into<String>) -> Self {
        ServiceError::NotFound {
            resource: "product",
            key: slug.into(),
        }
    }

    pub fn category_not_found(slug: impl Into<String>) -> Self {
        ServiceError::NotFound {
            resource: "category",
            key: slug.into(),
        }
    }

    /// Check if this is a lookup miss.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ServiceError::NotFound { .. })
    }

    /// Whether the failure came from cancellation rather than the source.
    pub fn is_cancelled(&self) -> bool {
        match self {
            ServiceError::Cancelled => true,
            ServiceError::Fetch(err) => err.is_aborted(),
            _ => false,
        }
    }

    /// Whether another attempt could succeed. Misses and cancellations are
    /// final.
    pub fn is_retryable(&self) -> bool {
        match self {
            ServiceError::NotFound { .. } | ServiceError::Cancelled => false,
            ServiceError::Fetch(err) => !(err.is_aborted() || err.is_not_found()),
            ServiceError::Catalog(_) => true,
        }
    }
}

impl From<CatalogError> for ServiceError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::ProductNotFound(slug) | CatalogError::NoSellableVariant(slug) => {
                ServiceError::product_not_found(slug)
            }
            CatalogError::CategoryNotFound(slug) => ServiceError::category_not_found(slug),
            other => ServiceError::Catalog(other),
        }
    }
}

/// Result type for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;
