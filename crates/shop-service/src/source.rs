//! The catalog source seam shared by remote and local implementations.

use async_trait::async_trait;
use shop_catalog::catalog::{CategoryRecord, ProductDetail, ProductRecord};
use shop_catalog::search::{CatalogQuery, PaginatedResult};
use tokio_util::sync::CancellationToken;

use crate::error::{ServiceError, ServiceResult};

/// Somewhere products and categories can be read from.
///
/// Every call takes a cancellation signal; implementations stop work and
/// return a cancellation error once it fires.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// One page of products for a query.
    async fn list_products(
        &self,
        query: &CatalogQuery,
        signal: &CancellationToken,
    ) -> ServiceResult<PaginatedResult<ProductRecord>>;

    /// A product with at least one variant, or `NotFound`.
    async fn product_detail(
        &self,
        slug: &str,
        signal: &CancellationToken,
    ) -> ServiceResult<ProductDetail>;

    /// Every category as a flat list.
    async fn list_categories(
        &self,
        signal: &CancellationToken,
    ) -> ServiceResult<Vec<CategoryRecord>>;

    /// Resolve a category slug through the category list.
    async fn category_by_slug(
        &self,
        slug: &str,
        signal: &CancellationToken,
    ) -> ServiceResult<CategoryRecord> {
        self.list_categories(signal)
            .await?
            .into_iter()
            .find(|category| category.slug == slug)
            .ok_or_else(|| ServiceError::category_not_found(slug))
    }
}
