//! Catalog search module.
//!
//! Contains the structured query, its query-string codec, the engine and
//! paginated result types.

pub mod codec;
mod engine;
mod query;
mod results;

pub use engine::{query, query_with_page_size, sort_products};
pub use query::{CatalogQuery, QueryChange, SortKey};
pub use results::{PageMeta, PaginatedResult, PER_PAGE};
