use std::{future::Future, sync::Arc};
use tokio::sync::watch;

/// Mount/teardown flag shared between a view container and whoever may tear
/// it down (e.g. a Ctrl-C handler). Cloning yields a handle to the same flag.
#[derive(Debug, Clone)]
pub struct Lifecycle {
    torn_down: Arc<watch::Sender<bool>>,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl Lifecycle {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { torn_down: Arc::new(tx) }
    }

    /// Idempotent.
    pub fn teardown(&self) {
        self.torn_down.send_replace(true);
    }

    pub fn is_torn_down(&self) -> bool {
        *self.torn_down.borrow()
    }

    /// Resolves once `teardown` has been called.
    pub async fn torn_down(&self) {
        let mut rx = self.torn_down.subscribe();
        // The sender lives in `self`, so the channel cannot close while we wait.
        let _ = rx.wait_for(|down| *down).await;
    }

    /// Runs `fut` unless the lifecycle ends first, in which case `fut` is
    /// dropped and `None` is returned.
    pub async fn run<F: Future>(&self, fut: F) -> Option<F::Output> {
        if self.is_torn_down() {
            return None;
        }
        tokio::select! {
            biased;
            _ = self.torn_down() => None,
            out = fut => Some(out),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn run_completes_while_mounted() {
        let lifecycle = Lifecycle::new();
        assert_eq!(lifecycle.run(async { 7 }).await, Some(7));
    }

    #[tokio::test]
    async fn teardown_drops_pending_future() {
        let lifecycle = Lifecycle::new();
        let handle = lifecycle.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            handle.teardown();
        });

        let out = lifecycle.run(std::future::pending::<()>()).await;
        assert_eq!(out, None);
        assert!(lifecycle.is_torn_down());
    }

    #[tokio::test]
    async fn run_after_teardown_never_polls() {
        let lifecycle = Lifecycle::new();
        lifecycle.teardown();
        lifecycle.teardown();

        let out = lifecycle.run(async { 1 }).await;
        assert_eq!(out, None);
    }
}
