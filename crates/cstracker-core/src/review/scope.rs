use std::future::Future;

use tokio::task::AbortHandle;
use tracing::debug;

/// A value produced by a task spawned in a `ScreenScope`, stamped with the
/// scope epoch it was started in.
#[derive(Debug)]
pub struct Scoped<T> {
    pub epoch: u64,
    pub value: T,
}

/// Lifetime of one screen's background work.
///
/// Tasks are spawned through the scope. `cancel` aborts whatever is still
/// running and advances the epoch, so results that were already in flight are
/// recognisably stale and dropped by `accept`.
#[derive(Debug, Default)]
pub struct ScreenScope {
    epoch: u64,
    tasks: Vec<AbortHandle>,
}

impl ScreenScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Spawn `future` on the runtime, owned by this scope.
    pub fn spawn<F>(&mut self, future: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.tasks.retain(|t| !t.is_finished());
        let handle = tokio::spawn(future);
        self.tasks.push(handle.abort_handle());
    }

    pub fn is_current(&self, epoch: u64) -> bool {
        epoch == self.epoch
    }

    /// Wrap `value` for sending back from a task started now.
    pub fn stamp<T>(&self, value: T) -> Scoped<T> {
        Scoped {
            epoch: self.epoch,
            value,
        }
    }

    /// Unwrap a result, or `None` if it belongs to a cancelled epoch.
    pub fn accept<T>(&self, scoped: Scoped<T>) -> Option<T> {
        if self.is_current(scoped.epoch) {
            Some(scoped.value)
        } else {
            debug!(epoch = scoped.epoch, current = self.epoch, "Dropped stale result");
            None
        }
    }

    /// Abort every running task and invalidate their pending results.
    pub fn cancel(&mut self) {
        let aborted = self.tasks.len();
        for task in self.tasks.drain(..) {
            task.abort();
        }
        self.epoch = self.epoch.wrapping_add(1);
        if aborted > 0 {
            debug!(aborted, epoch = self.epoch, "Screen scope cancelled");
        }
    }
}

impl Drop for ScreenScope {
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::sync::mpsc;

    fn running(scope: &ScreenScope) -> usize {
        scope.tasks.iter().filter(|t| !t.is_finished()).count()
    }

    #[tokio::test]
    async fn test_result_from_current_epoch_is_accepted() {
        let mut scope = ScreenScope::new();
        let (tx, mut rx) = mpsc::channel(1);
        let stamped = scope.stamp(42);
        scope.spawn(async move {
            let _ = tx.send(stamped).await;
        });

        let msg = rx.recv().await.unwrap();
        assert_eq!(scope.accept(msg), Some(42));
    }

    #[tokio::test]
    async fn test_cancel_aborts_running_tasks() {
        let mut scope = ScreenScope::new();
        let (tx, mut rx) = mpsc::channel::<Scoped<u32>>(1);
        let stamped = scope.stamp(1);
        scope.spawn(async move {
            tokio::time::sleep(Duration::from_secs(60)).await;
            let _ = tx.send(stamped).await;
        });
        assert_eq!(running(&scope), 1);

        scope.cancel();
        // The aborted task drops its sender without sending.
        assert!(rx.recv().await.is_none());
        assert_eq!(running(&scope), 0);
        assert_eq!(scope.epoch(), 1);
    }

    #[tokio::test]
    async fn test_stale_result_is_dropped() {
        let mut scope = ScreenScope::new();
        let (tx, mut rx) = mpsc::channel(1);
        let stamped = scope.stamp("old");
        scope.spawn(async move {
            let _ = tx.send(stamped).await;
        });
        let msg = rx.recv().await.unwrap();

        scope.cancel();
        assert_eq!(scope.accept(msg), None);
        assert_eq!(scope.accept(scope.stamp("new")), Some("new"));
    }

    #[tokio::test]
    async fn test_finished_tasks_are_pruned() {
        let mut scope = ScreenScope::new();
        for _ in 0..3 {
            scope.spawn(async {});
        }
        while running(&scope) > 0 {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        scope.spawn(async {
            tokio::time::sleep(Duration::from_secs(60)).await;
        });
        assert_eq!(scope.tasks.len(), 1);
    }
}
