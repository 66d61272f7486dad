//! Catalog error types.

use thiserror::Error;

/// Errors that can occur while loading or reading the catalog dataset.
///
/// The query engine itself never fails; these cover dataset assembly and
/// record lookups only.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Product not found.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Category not found.
    #[error("Category not found: {0}")]
    CategoryNotFound(String),

    /// Product exists but has no variants to sell.
    #[error("Product has no sellable configuration: {0}")]
    NoSellableVariant(String),

    /// Dataset failed validation.
    #[error("Invalid catalog dataset: {0}")]
    InvalidDataset(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Dataset file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CatalogError {
    /// Whether this error is a lookup miss.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            CatalogError::ProductNotFound(_)
                | CatalogError::CategoryNotFound(_)
                | CatalogError::NoSellableVariant(_)
        )
    }
}

/// Result type for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;
