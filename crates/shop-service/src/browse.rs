//! Client-side catalog browsing: `Idle -> Loading -> Ready | Failed`.
//!
//! Each load takes a new generation and cancels the previous in-flight
//! load. A result is applied only while its generation is still the
//! newest, so the published state always matches the most recently
//! requested query regardless of completion order.
//!
//! Retries live here rather than in the request client: a failed load is
//! attempted again up to [`DEFAULT_RETRIES`] times unless the failure is a
//! miss, a cancellation, or the load was superseded.

use std::future::Future;
use std::sync::Arc;

use parking_lot::Mutex;
use shop_catalog::catalog::{CategoryRecord, ProductRecord};
use shop_catalog::search::{CatalogQuery, PaginatedResult, QueryChange};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::cache::{CategoryListCache, ProductPageCache};
use crate::error::ServiceResult;
use crate::source::CatalogSource;
use crate::toast::ToastStore;

/// Extra attempts after a retryable failure.
pub const DEFAULT_RETRIES: u32 = 1;

/// Published browsing state.
#[derive(Debug, Clone, PartialEq)]
pub enum BrowseState {
    Idle,
    Loading {
        query: CatalogQuery,
        /// The last page shown, kept on screen until the new one lands.
        previous: Option<PaginatedResult<ProductRecord>>,
    },
    Ready {
        query: CatalogQuery,
        result: PaginatedResult<ProductRecord>,
    },
    Failed {
        query: CatalogQuery,
        message: String,
    },
}

impl BrowseState {
    /// The query this state belongs to.
    pub fn query(&self) -> Option<&CatalogQuery> {
        match self {
            BrowseState::Idle => None,
            BrowseState::Loading { query, .. }
            | BrowseState::Ready { query, .. }
            | BrowseState::Failed { query, .. } => Some(query),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, BrowseState::Loading { .. })
    }

    pub fn result(&self) -> Option<&PaginatedResult<ProductRecord>> {
        match self {
            BrowseState::Ready { result, .. } => Some(result),
            _ => None,
        }
    }

    /// The page to render: the ready result, or the previous page while
    /// a new one loads.
    pub fn visible(&self) -> Option<&PaginatedResult<ProductRecord>> {
        match self {
            BrowseState::Ready { result, .. } => Some(result),
            BrowseState::Loading { previous, .. } => previous.as_ref(),
            _ => None,
        }
    }
}

/// What happened to one load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The result (or failure) was published.
    Applied,
    /// A newer load started first; this one was discarded.
    Superseded,
}

#[derive(Debug)]
struct Inflight {
    generation: u64,
    query: CatalogQuery,
    token: Option<CancellationToken>,
}

/// Drives product listing loads against a [`CatalogSource`].
pub struct BrowseSession {
    source: Arc<dyn CatalogSource>,
    cache: Option<Arc<ProductPageCache>>,
    category_cache: Option<Arc<CategoryListCache>>,
    toasts: Option<ToastStore>,
    retries: u32,
    state: watch::Sender<BrowseState>,
    inflight: Mutex<Inflight>,
}

impl BrowseSession {
    pub fn new(source: Arc<dyn CatalogSource>) -> Self {
        let (state, _) = watch::channel(BrowseState::Idle);
        Self {
            source,
            cache: None,
            category_cache: None,
            toasts: None,
            retries: DEFAULT_RETRIES,
            state,
            inflight: Mutex::new(Inflight {
                generation: 0,
                query: CatalogQuery::default(),
                token: None,
            }),
        }
    }

    /// Serve fresh pages from `cache` and fill it with new results.
    pub fn with_cache(mut self, cache: Arc<ProductPageCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Serve the category list from `cache` while it is fresh.
    pub fn with_category_cache(mut self, cache: Arc<CategoryListCache>) -> Self {
        self.category_cache = Some(cache);
        self
    }

    /// Post a destructive toast when a load fails.
    pub fn with_toasts(mut self, toasts: ToastStore) -> Self {
        self.toasts = Some(toasts);
        self
    }

    /// Extra attempts after a retryable failure. Zero disables retries.
    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> BrowseState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<BrowseState> {
        self.state.subscribe()
    }

    /// The most recently requested query.
    pub fn current_query(&self) -> CatalogQuery {
        self.inflight.lock().query.clone()
    }

    /// Apply one change to the current query and load it.
    pub async fn update(&self, change: QueryChange) -> LoadOutcome {
        let next = self.current_query().apply(change);
        self.load(next).await
    }

    /// Cancel the in-flight load, if any, without starting another.
    /// A session left loading goes back to idle.
    pub fn cancel(&self) {
        let mut inflight = self.inflight.lock();
        inflight.generation += 1;
        if let Some(token) = inflight.token.take() {
            token.cancel();
        }
        self.state.send_if_modified(|state| {
            if state.is_loading() {
                *state = BrowseState::Idle;
                true
            } else {
                false
            }
        });
    }

    /// Load a query, superseding whatever is in flight.
    #[instrument(skip_all, fields(generation = tracing::field::Empty))]
    pub async fn load(&self, query: CatalogQuery) -> LoadOutcome {
        let query = query.normalized();
        let (generation, token) = self.begin(&query);
        tracing::Span::current().record("generation", generation);

        if let Some(result) = self.cache.as_ref().and_then(|cache| cache.get(&query)) {
            debug!("serving cached page");
            return self.finish(generation, query, Ok(result), false);
        }

        let outcome = self
            .retrying(&token, || self.source.list_products(&query, &token))
            .await;
        self.finish(generation, query, outcome, true)
    }

    /// The category list, from the category cache while it is fresh.
    #[instrument(skip_all)]
    pub async fn categories(
        &self,
        signal: &CancellationToken,
    ) -> ServiceResult<Vec<CategoryRecord>> {
        if let Some(categories) = self.category_cache.as_ref().and_then(|cache| cache.get(&())) {
            debug!("serving cached categories");
            return Ok(categories);
        }

        let categories = self
            .retrying(signal, || self.source.list_categories(signal))
            .await?;
        if let Some(cache) = &self.category_cache {
            cache.insert((), categories.clone());
        }
        Ok(categories)
    }

    async fn retrying<T, F, Fut>(&self, signal: &CancellationToken, mut call: F) -> ServiceResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = ServiceResult<T>>,
    {
        let mut attempt = 0;
        loop {
            match call().await {
                Err(err) if attempt < self.retries && err.is_retryable() && !signal.is_cancelled() => {
                    attempt += 1;
                    warn!(attempt, error = %err, "retrying catalog request");
                }
                outcome => return outcome,
            }
        }
    }

    fn begin(&self, query: &CatalogQuery) -> (u64, CancellationToken) {
        let mut inflight = self.inflight.lock();
        inflight.generation += 1;
        if let Some(previous) = inflight.token.take() {
            previous.cancel();
        }

        let token = CancellationToken::new();
        inflight.token = Some(token.clone());
        inflight.query = query.clone();
        self.state.send_modify(|state| {
            let previous = state.visible().cloned();
            *state = BrowseState::Loading {
                query: query.clone(),
                previous,
            };
        });

        (inflight.generation, token)
    }

    fn finish(
        &self,
        generation: u64,
        query: CatalogQuery,
        outcome: ServiceResult<PaginatedResult<ProductRecord>>,
        fetched: bool,
    ) -> LoadOutcome {
        // Holding the lock while publishing keeps a newer `begin` from
        // interleaving between the check and the send.
        let mut inflight = self.inflight.lock();
        if inflight.generation != generation {
            debug!(generation, current = inflight.generation, "discarding superseded result");
            return LoadOutcome::Superseded;
        }
        inflight.token = None;

        match outcome {
            Ok(result) => {
                info!(items = result.len(), total = result.meta.total_items, "catalog page ready");
                // Cache hits keep their original fetch time.
                if fetched {
                    if let Some(cache) = &self.cache {
                        cache.insert(query.clone(), result.clone());
                    }
                }
                self.state.send_replace(BrowseState::Ready { query, result });
            }
            Err(err) => {
                warn!(error = %err, "catalog page failed");
                if let Some(toasts) = &self.toasts {
                    toasts.error("Katalog tidak tersedia", err.to_string());
                }
                self.state.send_replace(BrowseState::Failed {
                    query,
                    message: err.to_string(),
                });
            }
        }

        LoadOutcome::Applied
    }
}
