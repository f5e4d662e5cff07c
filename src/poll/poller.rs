//! Generic interval poller.
//!
//! A poller owns a background task that fetches a resource, publishes the
//! result, and reschedules itself after a fixed interval. The next fetch is
//! scheduled whether the previous one succeeded or failed; a failure keeps
//! the last good value and surfaces an error message instead of silently
//! stopping the loop.
//!
//! Each poller carries a cancellation token so a view can tear its pollers
//! down when it is replaced.

use std::future::Future;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// State published by the poll task.
#[derive(Debug, Clone)]
struct PollCell<T> {
    value: Option<T>,
    error: Option<String>,
    /// Bumped on each successful fetch so consumers can tell a fresh value
    /// from an error-only update.
    updates: u64,
}

impl<T> PollCell<T> {
    fn empty() -> Self {
        Self {
            value: None,
            error: None,
            updates: 0,
        }
    }
}

/// Consumer handle for a running poller.
///
/// `poll()` is non-blocking and returns a value only when a new result has
/// arrived since the last call, in the manner of a push-channel data source.
#[derive(Debug)]
pub struct PollHandle<T> {
    receiver: watch::Receiver<PollCell<T>>,
    token: CancellationToken,
    task: JoinHandle<()>,
    description: String,
    seen: u64,
    last_error: Option<String>,
}

impl<T: Clone> PollHandle<T> {
    /// Poll for a new result without blocking.
    ///
    /// Returns `Some(value)` if a fetch has completed since the last call,
    /// `None` otherwise.
    pub fn poll(&mut self) -> Option<T> {
        if self.receiver.has_changed().unwrap_or(false) {
            let cell = self.receiver.borrow_and_update().clone();
            self.last_error = cell.error;
            if cell.updates > self.seen {
                self.seen = cell.updates;
                return cell.value;
            }
        }
        None
    }

    /// The error message from the most recent failed fetch, if the last
    /// observed update carried one.
    pub fn error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Returns a human-readable description of the poll target.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Stop the polling loop. Takes effect promptly, including mid-sleep.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// Spawn a poller that runs `fetch` now and then every `interval`.
///
/// Must be called from within a tokio runtime. The task exits when the
/// handle is cancelled or dropped.
pub fn spawn<T, E, F, Fut>(description: &str, interval: Duration, mut fetch: F) -> PollHandle<T>
where
    T: Clone + Send + Sync + 'static,
    E: std::fmt::Display + Send + 'static,
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = Result<T, E>> + Send + 'static,
{
    let token = CancellationToken::new();
    let (tx, receiver) = watch::channel(PollCell::empty());

    let task_token = token.clone();
    let desc = description.to_string();

    let task = tokio::spawn(async move {
        let mut cell = PollCell::empty();

        loop {
            tokio::select! {
                _ = task_token.cancelled() => break,
                result = fetch() => {
                    match result {
                        Ok(value) => {
                            cell.value = Some(value);
                            cell.error = None;
                            cell.updates += 1;
                        }
                        Err(e) => {
                            tracing::warn!(target: "daqwatch::poll", "{desc}: {e}");
                            cell.error = Some(e.to_string());
                        }
                    }
                    if tx.send(cell.clone()).is_err() {
                        // Handle dropped
                        break;
                    }
                }
            }

            tokio::select! {
                _ = task_token.cancelled() => break,
                _ = tokio::time::sleep(interval) => {}
            }
        }
    });

    PollHandle {
        receiver,
        token,
        task,
        description: description.to_string(),
        seen: 0,
        last_error: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    fn counting_fetch(
        counter: Arc<AtomicU64>,
    ) -> impl FnMut() -> std::future::Ready<Result<u64, String>> + Send + 'static {
        move || {
            let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
            std::future::ready(Ok(n))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_fetch_is_immediate() {
        let counter = Arc::new(AtomicU64::new(0));
        let mut handle = spawn("test", Duration::from_secs(5), counting_fetch(counter.clone()));

        tokio::time::sleep(Duration::from_millis(1)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert_eq!(handle.poll(), Some(1));
        // No new result until the interval elapses
        assert_eq!(handle.poll(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_refetch_waits_a_full_interval() {
        let counter = Arc::new(AtomicU64::new(0));
        let mut handle = spawn("test", Duration::from_secs(5), counting_fetch(counter.clone()));

        // Just short of the interval: still only the initial fetch
        tokio::time::sleep(Duration::from_millis(4_999)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 1);

        // Past the interval: the second fetch has run
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 2);
        assert_eq!(handle.poll(), Some(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_is_retried_after_the_same_interval() {
        let counter = Arc::new(AtomicU64::new(0));
        let c = counter.clone();
        let mut handle = spawn("test", Duration::from_secs(5), move || {
            let n = c.fetch_add(1, Ordering::SeqCst) + 1;
            std::future::ready(if n == 1 {
                Err("connection refused".to_string())
            } else {
                Ok(n)
            })
        });

        tokio::time::sleep(Duration::from_millis(1)).await;
        assert_eq!(handle.poll(), None);
        assert_eq!(handle.error(), Some("connection refused"));

        // The loop reschedules after a failure rather than halting
        tokio::time::sleep(Duration::from_secs(6)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 2);
        assert_eq!(handle.poll(), Some(2));
        assert_eq!(handle.error(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_the_loop() {
        let counter = Arc::new(AtomicU64::new(0));
        let handle = spawn("test", Duration::from_secs(5), counting_fetch(counter.clone()));

        tokio::time::sleep(Duration::from_millis(1)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 1);

        handle.cancel();
        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert!(handle.is_cancelled());
        assert!(handle.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_keeps_last_good_value() {
        let counter = Arc::new(AtomicU64::new(0));
        let c = counter.clone();
        let mut handle = spawn("test", Duration::from_secs(5), move || {
            let n = c.fetch_add(1, Ordering::SeqCst) + 1;
            std::future::ready(if n == 2 { Err("flap".to_string()) } else { Ok(n) })
        });

        tokio::time::sleep(Duration::from_millis(1)).await;
        assert_eq!(handle.poll(), Some(1));

        tokio::time::sleep(Duration::from_secs(5)).await;
        // The failed fetch publishes an error but no new value
        assert_eq!(handle.poll(), None);
        assert_eq!(handle.error(), Some("flap"));

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(handle.poll(), Some(3));
    }
}
