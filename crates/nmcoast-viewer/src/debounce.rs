//! Timer-reset debouncing for search input.
//!
//! Each `schedule` call bumps a generation counter and spawns a task that
//! sleeps for the configured delay; on wake it runs only if no newer schedule
//! (or `cancel`) has bumped the generation since. Stale evaluations therefore
//! do nothing, and evaluations never overlap a pending one.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    generation: Arc<AtomicU64>,
}

impl Debouncer {
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Schedule `action` to run after the delay, invalidating any pending
    /// schedule.
    ///
    /// The returned handle is for tests and shutdown; dropping it does not
    /// cancel the task.
    pub fn schedule<F, Fut>(&self, action: F) -> JoinHandle<()>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: std::future::Future<Output = ()> + Send,
    {
        let scheduled = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let generation = Arc::clone(&self.generation);
        let delay = self.delay;

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if generation.load(Ordering::SeqCst) == scheduled {
                action().await;
            }
        })
    }

    /// Invalidate any pending schedule without scheduling a new one.
    pub fn cancel(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[tokio::test(start_paused = true)]
    async fn action_runs_after_the_delay() {
        let debouncer = Debouncer::new(Duration::from_millis(300));
        let runs = Arc::new(Mutex::new(Vec::new()));

        let sink = Arc::clone(&runs);
        let handle = debouncer.schedule(move || async move {
            sink.lock().unwrap().push("ran");
        });
        handle.await.unwrap();

        assert_eq!(*runs.lock().unwrap(), vec!["ran"]);
    }

    #[tokio::test(start_paused = true)]
    async fn only_the_latest_schedule_runs() {
        let debouncer = Debouncer::new(Duration::from_millis(300));
        let runs = Arc::new(Mutex::new(Vec::new()));

        let first = Arc::clone(&runs);
        let h1 = debouncer.schedule(move || async move {
            first.lock().unwrap().push(1);
        });
        let second = Arc::clone(&runs);
        let h2 = debouncer.schedule(move || async move {
            second.lock().unwrap().push(2);
        });

        let _ = tokio::join!(h1, h2);
        assert_eq!(*runs.lock().unwrap(), vec![2], "the superseded action must not run");
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_invalidates_a_pending_schedule() {
        let debouncer = Debouncer::new(Duration::from_millis(300));
        let runs = Arc::new(Mutex::new(Vec::new()));

        let sink = Arc::clone(&runs);
        let handle = debouncer.schedule(move || async move {
            sink.lock().unwrap().push("ran");
        });
        debouncer.cancel();
        handle.await.unwrap();

        assert!(runs.lock().unwrap().is_empty());
    }
}
