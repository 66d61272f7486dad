//! Catalog source backed by the HTTP surface.
//!
//! Routes: `GET /products?{query}`, `GET /products/{slug}` and
//! `GET /categories`, all relative to the client's base URL.

use async_trait::async_trait;
use serde::Deserialize;
use shop_catalog::catalog::{CategoryRecord, ProductDetail, ProductRecord};
use shop_catalog::search::{codec, CatalogQuery, PaginatedResult};
use shop_fetch::{FetchClient, FetchError, RequestOptions};
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument};
use url::form_urlencoded;

use crate::error::{ServiceError, ServiceResult};
use crate::source::CatalogSource;

/// Category listings as they may arrive: a bare array, or any envelope
/// with a `data` array (the paginated shape included). Only this client
/// boundary accepts both; the bundled server always sends the array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CategoryResponse {
    List(Vec<CategoryRecord>),
    Envelope { data: Vec<CategoryRecord> },
}

impl From<CategoryResponse> for Vec<CategoryRecord> {
    fn from(response: CategoryResponse) -> Self {
        match response {
            CategoryResponse::List(categories) => categories,
            CategoryResponse::Envelope { data } => data,
        }
    }
}

/// Catalog facade over a [`FetchClient`].
#[derive(Debug, Clone)]
pub struct RemoteCatalog {
    client: FetchClient,
}

impl RemoteCatalog {
    pub fn new(client: FetchClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &FetchClient {
        &self.client
    }

    fn options(signal: &CancellationToken) -> RequestOptions {
        RequestOptions::get().signal(signal.clone())
    }
}

/// Path for a product listing query.
pub fn products_path(query: &CatalogQuery) -> String {
    let qs = codec::to_query_string(query);
    if qs.is_empty() {
        "/products".to_string()
    } else {
        format!("/products?{qs}")
    }
}

/// Path for a product detail lookup, with the slug percent-encoded.
pub fn product_path(slug: &str) -> String {
    let encoded: String = form_urlencoded::byte_serialize(slug.as_bytes()).collect();
    format!("/products/{}", encoded.replace('+', "%20"))
}

#[async_trait]
impl CatalogSource for RemoteCatalog {
    #[instrument(skip_all, fields(page = query.page, sort = %query.sort))]
    async fn list_products(
        &self,
        query: &CatalogQuery,
        signal: &CancellationToken,
    ) -> ServiceResult<PaginatedResult<ProductRecord>> {
        let path = products_path(query);
        let page: PaginatedResult<ProductRecord> =
            self.client.send(&path, Self::options(signal)).await?;
        debug!(items = page.len(), total = page.meta.total_items, "products listed");
        Ok(page)
    }

    #[instrument(skip(self, signal))]
    async fn product_detail(
        &self,
        slug: &str,
        signal: &CancellationToken,
    ) -> ServiceResult<ProductDetail> {
        let detail: ProductDetail = self
            .client
            .send(&product_path(slug), Self::options(signal))
            .await
            .map_err(|err| match err {
                FetchError::Failed { status: 404, .. } => ServiceError::product_not_found(slug),
                other => ServiceError::Fetch(other),
            })?;

        if detail.variants.is_empty() {
            debug!("product has no variants");
            return Err(ServiceError::product_not_found(slug));
        }

        Ok(detail)
    }

    #[instrument(skip_all)]
    async fn list_categories(
        &self,
        signal: &CancellationToken,
    ) -> ServiceResult<Vec<CategoryRecord>> {
        let response: CategoryResponse =
            self.client.send("/categories", Self::options(signal)).await?;
        Ok(response.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shop_catalog::search::SortKey;

    #[test]
    fn test_products_path() {
        assert_eq!(products_path(&CatalogQuery::default()), "/products");
        let q = CatalogQuery::new()
            .with_search("edge kit")
            .with_sort(SortKey::PriceAsc)
            .with_page(2);
        assert_eq!(products_path(&q), "/products?search=edge+kit&sort=price_asc&page=2");
    }

    #[test]
    fn test_product_path_encodes_slug() {
        assert_eq!(product_path("edge-vision-kit"), "/products/edge-vision-kit");
        assert_eq!(product_path("a b/c"), "/products/a%20b%2Fc");
    }

    #[test]
    fn test_category_response_shapes() {
        let bare = r#"[{"id":"cat-a","slug":"a","name":"A"}]"#;
        let list: Vec<CategoryRecord> =
            serde_json::from_str::<CategoryResponse>(bare).unwrap().into();
        assert_eq!(list.len(), 1);

        let enveloped = r#"{
            "data": [{"id":"cat-a","slug":"a","name":"A"},{"id":"cat-b","slug":"b","name":"B"}],
            "meta": {"page":1,"perPage":6,"totalItems":2,"totalPages":1,"hasNextPage":false,"hasPreviousPage":false}
        }"#;
        let list: Vec<CategoryRecord> =
            serde_json::from_str::<CategoryResponse>(enveloped).unwrap().into();
        assert_eq!(list.len(), 2);
    }
}
