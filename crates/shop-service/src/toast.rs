//! Notification store with an explicit lifecycle.
//!
//! Toasts are kept newest first and capped at a limit. Dismissing closes a
//! toast and schedules its removal after a delay; `shutdown` cancels every
//! pending removal.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde::Serialize;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Maximum number of toasts kept at once.
pub const TOAST_LIMIT: usize = 5;

/// Delay between dismissing a toast and removing it.
pub const TOAST_REMOVE_DELAY: Duration = Duration::from_millis(1_000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastVariant {
    #[default]
    Default,
    Destructive,
}

/// A single notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toast {
    pub id: u64,
    pub title: String,
    pub description: Option<String>,
    pub variant: ToastVariant,
    /// False once dismissed and waiting for removal.
    pub open: bool,
}

/// Fields of a toast that can be changed after it is shown.
#[derive(Debug, Clone, Default)]
pub struct ToastUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub variant: Option<ToastVariant>,
}

#[derive(Debug)]
struct Inner {
    state: watch::Sender<Vec<Toast>>,
    next_id: AtomicU64,
    limit: usize,
    remove_delay: Duration,
    pending: Mutex<HashSet<u64>>,
    shutdown: CancellationToken,
}

/// Shared handle to the toast store. Clones refer to the same store.
#[derive(Debug, Clone)]
pub struct ToastStore {
    inner: Arc<Inner>,
}

impl Default for ToastStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ToastStore {
    pub fn new() -> Self {
        Self::with_limits(TOAST_LIMIT, TOAST_REMOVE_DELAY)
    }

    pub fn with_limits(limit: usize, remove_delay: Duration) -> Self {
        let (state, _) = watch::channel(Vec::new());
        Self {
            inner: Arc::new(Inner {
                state,
                next_id: AtomicU64::new(1),
                limit: limit.max(1),
                remove_delay,
                pending: Mutex::new(HashSet::new()),
                shutdown: CancellationToken::new(),
            }),
        }
    }

    /// Show a toast. Returns its id.
    pub fn push(
        &self,
        title: impl Into<String>,
        description: Option<String>,
        variant: ToastVariant,
    ) -> u64 {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let toast = Toast {
            id,
            title: title.into(),
            description,
            variant,
            open: true,
        };
        let limit = self.inner.limit;
        self.inner.state.send_modify(|toasts| {
            toasts.insert(0, toast);
            toasts.truncate(limit);
        });
        id
    }

    /// Show a destructive toast.
    pub fn error(&self, title: impl Into<String>, description: impl Into<String>) -> u64 {
        self.push(title, Some(description.into()), ToastVariant::Destructive)
    }

    /// Change a visible toast. Returns false for unknown ids.
    pub fn update(&self, id: u64, update: ToastUpdate) -> bool {
        self.inner.state.send_if_modified(|toasts| {
            let Some(toast) = toasts.iter_mut().find(|t| t.id == id) else {
                return false;
            };
            if let Some(title) = update.title {
                toast.title = title;
            }
            if update.description.is_some() {
                toast.description = update.description;
            }
            if let Some(variant) = update.variant {
                toast.variant = variant;
            }
            true
        })
    }

    /// Close one toast, or every toast when `id` is `None`, and schedule
    /// removal.
    pub fn dismiss(&self, id: Option<u64>) {
        let mut closed = Vec::new();
        self.inner.state.send_modify(|toasts| {
            for toast in toasts.iter_mut().filter(|t| id.map_or(true, |id| t.id == id)) {
                toast.open = false;
                closed.push(toast.id);
            }
        });
        for id in closed {
            self.schedule_removal(id);
        }
    }

    /// Remove one toast, or all of them when `id` is `None`.
    pub fn remove(&self, id: Option<u64>) {
        self.inner.state.send_modify(|toasts| match id {
            Some(id) => toasts.retain(|t| t.id != id),
            None => toasts.clear(),
        });
    }

    /// Snapshot of the current toasts, newest first.
    pub fn toasts(&self) -> Vec<Toast> {
        self.inner.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<Toast>> {
        self.inner.state.subscribe()
    }

    /// Cancel every pending removal timer.
    pub fn shutdown(&self) {
        self.inner.shutdown.cancel();
        self.inner.pending.lock().clear();
    }

    fn schedule_removal(&self, id: u64) {
        if self.inner.shutdown.is_cancelled() || !self.inner.pending.lock().insert(id) {
            return;
        }

        // Without a runtime there is nothing to wait on; remove right away.
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            self.inner.pending.lock().remove(&id);
            self.remove(Some(id));
            return;
        };

        let store = self.clone();
        let shutdown = self.inner.shutdown.clone();
        let delay = self.inner.remove_delay;
        handle.spawn(async move {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    debug!(id, "toast removal cancelled");
                }
                _ = tokio::time::sleep(delay) => {
                    store.inner.pending.lock().remove(&id);
                    store.remove(Some(id));
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newest_first_and_limited() {
        let store = ToastStore::new();
        for n in 0..7 {
            store.push(format!("toast {n}"), None, ToastVariant::Default);
        }
        let toasts = store.toasts();
        assert_eq!(toasts.len(), TOAST_LIMIT);
        assert_eq!(toasts[0].title, "toast 6");
        assert_eq!(toasts[4].title, "toast 2");
    }

    #[test]
    fn test_update() {
        let store = ToastStore::new();
        let id = store.push("Memuat", None, ToastVariant::Default);
        assert!(store.update(
            id,
            ToastUpdate {
                title: Some("Gagal".into()),
                variant: Some(ToastVariant::Destructive),
                ..ToastUpdate::default()
            }
        ));
        let toast = &store.toasts()[0];
        assert_eq!(toast.title, "Gagal");
        assert_eq!(toast.variant, ToastVariant::Destructive);
        assert!(!store.update(999, ToastUpdate::default()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_dismiss_then_remove_after_delay() {
        let store = ToastStore::new();
        let id = store.error("Katalog tidak tersedia", "timeout");
        store.dismiss(Some(id));

        assert!(!store.toasts()[0].open);

        tokio::time::sleep(TOAST_REMOVE_DELAY + Duration::from_millis(10)).await;
        assert!(store.toasts().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dismiss_all() {
        let store = ToastStore::new();
        store.push("a", None, ToastVariant::Default);
        store.push("b", None, ToastVariant::Default);
        store.dismiss(None);
        assert!(store.toasts().iter().all(|t| !t.open));

        tokio::time::sleep(TOAST_REMOVE_DELAY * 2).await;
        assert!(store.toasts().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_cancels_pending_removal() {
        let store = ToastStore::new();
        let id = store.push("a", None, ToastVariant::Default);
        store.dismiss(Some(id));
        store.shutdown();

        tokio::time::sleep(TOAST_REMOVE_DELAY * 2).await;
        assert_eq!(store.toasts().len(), 1);
    }

    #[tokio::test]
    async fn test_subscribe_sees_changes() {
        let store = ToastStore::new();
        let mut rx = store.subscribe();
        store.push("halo", None, ToastVariant::Default);
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().len(), 1);
    }

    #[test]
    fn test_dismiss_without_runtime_removes_immediately() {
        let store = ToastStore::new();
        let id = store.push("a", None, ToastVariant::Default);
        store.dismiss(Some(id));
        assert!(store.toasts().is_empty());
    }
}
