//! Single-slot debounce: last change wins after a quiet period.

use std::future::Future;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;

/// Runs the most recently scheduled job once `delay` has passed without a
/// newer one. Scheduling aborts whatever is pending. Dropping the debouncer
/// discards the pending job.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    slot: Mutex<Option<JoinHandle<()>>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            slot: Mutex::new(None),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Replace the pending job with `job`. Must be called inside a tokio runtime.
    pub fn schedule<F>(&self, job: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let delay = self.delay;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            job.await;
        });
        let previous = self
            .slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(handle);
        if let Some(previous) = previous {
            previous.abort();
        }
    }

    /// Drop the pending job, if any. Returns whether one was pending.
    pub fn cancel(&self) -> bool {
        let pending = self.slot.lock().unwrap_or_else(PoisonError::into_inner).take();
        match pending {
            Some(handle) if !handle.is_finished() => {
                handle.abort();
                true
            }
            _ => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counter_job(counter: Arc<AtomicUsize>, value: usize) -> impl Future<Output = ()> + Send + 'static {
        async move {
            counter.store(value, Ordering::SeqCst);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn only_last_job_in_quiet_window_runs() {
        let debouncer = Debouncer::new(Duration::from_millis(300));
        let seen = Arc::new(AtomicUsize::new(0));

        debouncer.schedule(counter_job(seen.clone(), 1));
        tokio::time::sleep(Duration::from_millis(100)).await;
        debouncer.schedule(counter_job(seen.clone(), 2));
        tokio::time::sleep(Duration::from_millis(100)).await;
        debouncer.schedule(counter_job(seen.clone(), 3));
        assert_eq!(seen.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(400)).await;
        assert_eq!(seen.load(Ordering::SeqCst), 3);
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn job_waits_for_full_delay() {
        let debouncer = Debouncer::new(Duration::from_millis(300));
        let seen = Arc::new(AtomicUsize::new(0));

        debouncer.schedule(counter_job(seen.clone(), 7));
        tokio::time::sleep(Duration::from_millis(299)).await;
        assert_eq!(seen.load(Ordering::SeqCst), 0);
        assert!(debouncer.is_pending());

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(seen.load(Ordering::SeqCst), 7);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_and_drop_discard_pending_job() {
        let seen = Arc::new(AtomicUsize::new(0));

        let debouncer = Debouncer::new(Duration::from_millis(300));
        debouncer.schedule(counter_job(seen.clone(), 1));
        assert!(debouncer.cancel());
        assert!(!debouncer.cancel());

        let dropped = Debouncer::new(Duration::from_millis(300));
        dropped.schedule(counter_job(seen.clone(), 2));
        drop(dropped);

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(seen.load(Ordering::SeqCst), 0);
    }
}
