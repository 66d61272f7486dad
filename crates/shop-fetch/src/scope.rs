//! Cancellation scope shared by deadlines and caller signals.
//!
//! Every call owns one scope. The deadline and an external signal both
//! end the same child token, so the in-flight future is dropped the same
//! way for either reason and the timer goes with it.

use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

/// Why a scope ended before its future did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeExit {
    /// The external signal (or the scope token) was cancelled.
    Cancelled,
    /// The deadline elapsed.
    TimedOut(Duration),
}

/// A deadline plus a cancellation token derived from an optional parent.
#[derive(Debug)]
pub struct CancelScope {
    token: CancellationToken,
    timeout: Duration,
}

impl CancelScope {
    /// Create a scope. Cancelling `parent` cancels the scope; ending the
    /// scope never cancels `parent`.
    pub fn new(parent: Option<&CancellationToken>, timeout: Duration) -> Self {
        let token = parent
            .map(CancellationToken::child_token)
            .unwrap_or_default();
        Self { token, timeout }
    }

    /// The scope's token, for work that should stop with the call.
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Check if the scope is already cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Drive `fut` until it completes, the deadline passes, or the scope is
    /// cancelled. The losing branch is dropped.
    pub async fn run<F, T>(self, fut: F) -> Result<T, ScopeExit>
    where
        F: Future<Output = T>,
    {
        let _guard = self.token.clone().drop_guard();

        tokio::select! {
            biased;
            _ = self.token.cancelled() => Err(ScopeExit::Cancelled),
            _ = tokio::time::sleep(self.timeout) => Err(ScopeExit::TimedOut(self.timeout)),
            out = fut => Ok(out),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_completes_before_deadline() {
        let scope = CancelScope::new(None, Duration::from_secs(5));
        let out = scope.run(async { 42 }).await;
        assert_eq!(out, Ok(42));
    }

    #[tokio::test]
    async fn test_deadline_drops_future() {
        let scope = CancelScope::new(None, Duration::from_millis(10));
        let out = scope.run(std::future::pending::<()>()).await;
        assert_eq!(out, Err(ScopeExit::TimedOut(Duration::from_millis(10))));
    }

    #[tokio::test]
    async fn test_parent_cancel_wins() {
        let parent = CancellationToken::new();
        let scope = CancelScope::new(Some(&parent), Duration::from_secs(5));
        let child = scope.token().clone();

        let handle = tokio::spawn(scope.run(std::future::pending::<()>()));
        parent.cancel();

        assert_eq!(handle.await.unwrap(), Err(ScopeExit::Cancelled));
        assert!(child.is_cancelled());
    }

    #[tokio::test]
    async fn test_already_cancelled_parent() {
        let parent = CancellationToken::new();
        parent.cancel();
        let scope = CancelScope::new(Some(&parent), Duration::from_secs(5));
        assert!(scope.is_cancelled());
        assert_eq!(scope.run(async { 1 }).await, Err(ScopeExit::Cancelled));
    }

    #[tokio::test]
    async fn test_scope_end_does_not_cancel_parent() {
        let parent = CancellationToken::new();
        let scope = CancelScope::new(Some(&parent), Duration::from_millis(1));
        let child = scope.token().clone();

        let _ = scope.run(std::future::pending::<()>()).await;

        assert!(child.is_cancelled());
        assert!(!parent.is_cancelled());
    }
}
