//! Product catalog module.
//!
//! Contains product, variant and category records, display pricing, and
//! the in-memory dataset the engine runs over.

pub mod category;
mod dataset;
mod pricing;
mod product;

pub use category::CategoryRecord;
pub use dataset::Catalog;
pub use pricing::PriceDisplay;
pub use product::{
    default_variant, AttributeValue, ProductDetail, ProductMetadata, ProductRecord,
    ProductStatus, VariantRecord, FALLBACK_IMAGE,
};
