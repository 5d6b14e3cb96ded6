//! Cancel-and-reschedule timer for background writes.

use log::warn;
use std::future::Future;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// Runs the most recently scheduled task once `delay` passes without a
/// newer schedule call.
///
/// Cancellation only covers the waiting period: once the delay elapses the
/// task is detached and runs to completion even if a newer task is
/// scheduled.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Replaces any waiting task with `task`.
    ///
    /// Returns `false` (and drops `task`) when called outside a Tokio runtime.
    pub fn schedule<F>(&mut self, task: F) -> bool
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        let Ok(handle) = Handle::try_current() else {
            warn!("event=debounce_schedule module=notes status=skipped reason=no_runtime");
            return false;
        };

        let delay = self.delay;
        let runtime = handle.clone();
        self.pending = Some(handle.spawn(async move {
            tokio::time::sleep(delay).await;
            runtime.spawn(task);
        }));
        true
    }

    /// Aborts the waiting task, if any; returns whether one was waiting.
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(handle) if !handle.is_finished() => {
                handle.abort();
                true
            }
            _ => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

#[cfg(test)]
mod tests {
    use super::Debouncer;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn bursts_coalesce_into_the_last_task() {
        let fired = Arc::new(AtomicUsize::new(0));
        let last = Arc::new(AtomicUsize::new(0));
        let mut debouncer = Debouncer::new(Duration::from_millis(500));

        for value in 1..=3 {
            let fired = Arc::clone(&fired);
            let last = Arc::clone(&last);
            assert!(debouncer.schedule(async move {
                fired.fetch_add(1, Ordering::SeqCst);
                last.store(value, Ordering::SeqCst);
            }));
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        assert_eq!(fired.load(Ordering::SeqCst), 0);
        assert!(debouncer.is_pending());

        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert_eq!(last.load(Ordering::SeqCst), 3);
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_drops_the_waiting_task() {
        let fired = Arc::new(AtomicUsize::new(0));
        let mut debouncer = Debouncer::new(Duration::from_millis(500));
        let counter = Arc::clone(&fired);
        debouncer.schedule(async move {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        assert!(debouncer.cancel());
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn schedule_outside_runtime_is_skipped() {
        let mut debouncer = Debouncer::new(Duration::from_millis(10));
        assert!(!debouncer.schedule(async {}));
        assert!(!debouncer.is_pending());
    }
}
