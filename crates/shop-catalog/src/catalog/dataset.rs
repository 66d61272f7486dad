//! In-memory catalog dataset.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::catalog::{category, CategoryRecord, ProductDetail, ProductRecord};
use crate::error::{CatalogError, CatalogResult};
use crate::ids::CategoryId;
use crate::search::{self, CatalogQuery, PaginatedResult};

const DEMO_CATALOG: &str = include_str!("../../fixtures/catalog.json");

/// Products and categories, assembled once and read-only afterwards.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub categories: Vec<CategoryRecord>,
    #[serde(default)]
    pub products: Vec<ProductRecord>,
}

impl Catalog {
    /// Build a catalog from records, validating and linking them.
    pub fn new(categories: Vec<CategoryRecord>, products: Vec<ProductRecord>) -> CatalogResult<Self> {
        let mut catalog = Self { categories, products };
        catalog.validate()?;
        catalog.link_categories();
        Ok(catalog)
    }

    /// Parse a catalog from its JSON document form.
    pub fn from_json(json: &str) -> CatalogResult<Self> {
        let raw: Catalog = serde_json::from_str(json)?;
        Self::new(raw.categories, raw.products)
    }

    /// Load a catalog JSON file from disk.
    pub fn load(path: impl AsRef<Path>) -> CatalogResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// The bundled demo catalog: 8 products across 8 categories.
    pub fn demo() -> CatalogResult<Self> {
        Self::from_json(DEMO_CATALOG)
    }

    fn validate(&self) -> CatalogResult<()> {
        let mut slugs = HashSet::new();
        for product in &self.products {
            if !slugs.insert(product.slug.as_str()) {
                return Err(CatalogError::InvalidDataset(format!(
                    "duplicate product slug '{}'",
                    product.slug
                )));
            }

            let mut skus = HashSet::new();
            for variant in &product.variants {
                if !skus.insert(variant.sku.as_str()) {
                    return Err(CatalogError::InvalidDataset(format!(
                        "duplicate sku '{}' in product '{}'",
                        variant.sku, product.slug
                    )));
                }
            }
        }

        let mut category_slugs = HashSet::new();
        for category in &self.categories {
            if !category_slugs.insert(category.slug.as_str()) {
                return Err(CatalogError::InvalidDataset(format!(
                    "duplicate category slug '{}'",
                    category.slug
                )));
            }
        }

        Ok(())
    }

    // Fill the displayable categories from the direct association when a
    // record ships without them.
    fn link_categories(&mut self) {
        let categories = &self.categories;
        for product in &mut self.products {
            if !product.categories.is_empty() {
                continue;
            }
            if let Some(category) = product
                .category_id
                .as_ref()
                .and_then(|id| categories.iter().find(|c| c.id == *id))
            {
                product.categories.push(category.clone());
            }
        }
    }

    /// Run a catalog query over every product.
    pub fn query(&self, query: &CatalogQuery) -> PaginatedResult<ProductRecord> {
        search::query(&self.products, query)
    }

    /// Find a product by slug.
    pub fn find_product(&self, slug: &str) -> Option<&ProductRecord> {
        self.products.iter().find(|product| product.slug == slug)
    }

    /// Resolve a product with its variants.
    ///
    /// Fails with `NoSellableVariant` for a product without variants.
    pub fn product_detail(&self, slug: &str) -> CatalogResult<ProductDetail> {
        let product = self
            .find_product(slug)
            .ok_or_else(|| CatalogError::ProductNotFound(slug.to_string()))?;

        if !product.is_sellable() {
            return Err(CatalogError::NoSellableVariant(slug.to_string()));
        }

        Ok(ProductDetail::from_product(product.clone()))
    }

    /// Find a category by id.
    pub fn category(&self, id: &CategoryId) -> Option<&CategoryRecord> {
        self.categories.iter().find(|category| category.id == *id)
    }

    /// Find a category by slug.
    pub fn category_by_slug(&self, slug: &str) -> CatalogResult<&CategoryRecord> {
        self.categories
            .iter()
            .find(|category| category.slug == slug)
            .ok_or_else(|| CatalogError::CategoryNotFound(slug.to_string()))
    }

    /// Direct children of a category, one level only.
    pub fn children_of(&self, parent: &CategoryId) -> Vec<&CategoryRecord> {
        category::children_of(&self.categories, parent)
    }
}
