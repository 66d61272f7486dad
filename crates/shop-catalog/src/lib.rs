//! Storefront catalog domain for the shop workspace.
//!
//! - **Catalog**: products, variants, categories and display pricing
//! - **Search**: catalog queries, the query-string codec, the query engine
//!   and paginated results
//! - **Dataset**: the in-memory catalog the engine runs over
//!
//! # Example
//!
//! ```rust
//! use shop_catalog::prelude::*;
//!
//! let catalog = Catalog::demo()?;
//! let query = codec::parse_query_string("?search=kit&sort=price_asc");
//! let page = catalog.query(&query);
//!
//! assert_eq!(page.meta.total_items, 2);
//! assert_eq!(page.data[0].slug, "learning-kit-ai");
//! # Ok::<(), shop_catalog::CatalogError>(())
//! ```

pub mod error;
pub mod ids;
pub mod money;

pub mod catalog;
pub mod search;

pub use error::{CatalogError, CatalogResult};
pub use ids::*;
pub use money::{Currency, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::{CatalogError, CatalogResult};
    pub use crate::ids::*;
    pub use crate::money::{Currency, Money};

    // Catalog
    pub use crate::catalog::{
        AttributeValue, Catalog, CategoryRecord, PriceDisplay, ProductDetail, ProductMetadata,
        ProductRecord, ProductStatus, VariantRecord,
    };

    // Search
    pub use crate::search::{
        codec, CatalogQuery, PageMeta, PaginatedResult, QueryChange, SortKey, PER_PAGE,
    };
}
