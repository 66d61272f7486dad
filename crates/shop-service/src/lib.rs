//! Catalog service facade for storefront callers.
//!
//! [`CatalogSource`] is the seam: [`RemoteCatalog`] talks to the HTTP
//! surface through the request client, [`LocalCatalog`] runs the engine
//! in-process. [`BrowseSession`] drives listing loads with last-write-wins
//! supersession. [`QueryCache`] and [`ToastStore`] are injected services
//! with explicit lifecycles.

pub mod browse;
pub mod cache;
pub mod error;
pub mod local;
pub mod remote;
pub mod source;
pub mod toast;

pub use browse::{BrowseSession, BrowseState, LoadOutcome, DEFAULT_RETRIES};
pub use cache::{
    CategoryListCache, ProductPageCache, QueryCache, CATEGORY_STALE_TIME, DEFAULT_STALE_TIME,
};
pub use error::{ServiceError, ServiceResult};
pub use local::LocalCatalog;
pub use remote::RemoteCatalog;
pub use source::CatalogSource;
pub use toast::{Toast, ToastStore, ToastUpdate, ToastVariant};
