use std::future::Future;

use tokio_util::sync::CancellationToken;
use tracing::trace;

/// One cancellable background task keyed by a watched value.
///
/// [`watch`](Self::watch) starts the task only when the key differs from the
/// last key seen. Starting a new task cancels the previous one, so at most one
/// task per effect is ever in flight. Dropping the effect cancels it.
///
/// The task receives its [`CancellationToken`] and must check it before
/// posting any result.
#[derive(Debug)]
pub struct WatchedEffect<K = u64> {
    key: K,
    token: Option<CancellationToken>,
}

impl<K: PartialEq + std::fmt::Debug> WatchedEffect<K> {
    /// Create an effect that treats `initial` as already seen.
    #[must_use]
    pub const fn new(initial: K) -> Self {
        Self {
            key: initial,
            token: None,
        }
    }

    /// Start `task` if `key` changed since the last call.
    ///
    /// Returns whether a task was started.
    pub fn watch<F, Fut>(&mut self, key: K, task: F) -> bool
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        if key == self.key {
            return false;
        }
        trace!(key = ?key, "Watched value changed");
        self.key = key;
        self.run(task);
        true
    }

    /// Start `task` unconditionally, cancelling any task still in flight.
    pub fn run<F, Fut>(&mut self, task: F)
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        let token = CancellationToken::new();
        tokio::spawn(task(token.clone()));
        self.token = Some(token);
    }

    /// Cancel the in-flight task, if any.
    pub fn cancel(&mut self) {
        if let Some(token) = self.token.take() {
            token.cancel();
        }
    }

    #[must_use]
    pub const fn key(&self) -> &K {
        &self.key
    }
}

impl<K> Drop for WatchedEffect<K> {
    fn drop(&mut self) {
        if let Some(token) = self.token.take() {
            token.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn test_watch_fires_once_per_key_change() {
        let runs = Arc::new(AtomicUsize::new(0));
        let mut effect = WatchedEffect::new(0_u64);

        for key in [0, 1, 1, 2, 2, 2] {
            let runs = runs.clone();
            effect.watch(key, move |_| async move {
                runs.fetch_add(1, Ordering::SeqCst);
            });
        }
        tokio::time::sleep(Duration::from_millis(20)).await;

        assert_eq!(runs.load(Ordering::SeqCst), 2);
        assert_eq!(*effect.key(), 2);
    }

    #[tokio::test]
    async fn test_restart_cancels_previous_task() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let mut effect = WatchedEffect::new(0_u64);

        let first_tx = tx.clone();
        effect.watch(1, move |token| async move {
            tokio::select! {
                () = token.cancelled() => { let _ = first_tx.send("first cancelled"); }
                () = tokio::time::sleep(Duration::from_secs(30)) => { let _ = first_tx.send("first finished"); }
            }
        });
        tokio::task::yield_now().await;

        effect.watch(2, move |token| async move {
            if !token.is_cancelled() {
                let _ = tx.send("second finished");
            }
        });

        let mut seen = vec![rx.recv().await.unwrap(), rx.recv().await.unwrap()];
        seen.sort_unstable();
        assert_eq!(seen, vec!["first cancelled", "second finished"]);
    }

    #[tokio::test]
    async fn test_drop_cancels_task() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let mut effect = WatchedEffect::new(String::new());
        effect.watch("alice".to_string(), move |token| async move {
            token.cancelled().await;
            let _ = tx.send(());
        });

        drop(effect);
        assert!(rx.recv().await.is_some());
    }
}
