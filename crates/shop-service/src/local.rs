//! In-process catalog source over the dataset engine.

use std::sync::Arc;

use async_trait::async_trait;
use shop_catalog::catalog::{Catalog, CategoryRecord, ProductDetail, ProductRecord};
use shop_catalog::search::{CatalogQuery, PaginatedResult};
use tokio_util::sync::CancellationToken;

use crate::error::{ServiceError, ServiceResult};
use crate::source::CatalogSource;

/// Serves queries straight from an in-memory [`Catalog`].
#[derive(Debug, Clone)]
pub struct LocalCatalog {
    catalog: Arc<Catalog>,
}

impl LocalCatalog {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    fn check(signal: &CancellationToken) -> ServiceResult<()> {
        if signal.is_cancelled() {
            Err(ServiceError::Cancelled)
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl CatalogSource for LocalCatalog {
    async fn list_products(
        &self,
        query: &CatalogQuery,
        signal: &CancellationToken,
    ) -> ServiceResult<PaginatedResult<ProductRecord>> {
        Self::check(signal)?;
        Ok(self.catalog.query(query))
    }

    async fn product_detail(
        &self,
        slug: &str,
        signal: &CancellationToken,
    ) -> ServiceResult<ProductDetail> {
        Self::check(signal)?;
        Ok(self.catalog.product_detail(slug)?)
    }

    async fn list_categories(
        &self,
        signal: &CancellationToken,
    ) -> ServiceResult<Vec<CategoryRecord>> {
        Self::check(signal)?;
        Ok(self.catalog.categories.clone())
    }
}
