//! Task-counting completion barrier.
//!
//! Every task spawned through a [`CompletionBarrier`] increments a shared
//! pending counter; an RAII guard moved into the task decrements it when the
//! task finishes (normally or by panic). Waiters sleep on a `watch` channel
//! that is signalled whenever the counter drops to zero.
//!
//! Admission and shutdown are ordered so that no task can slip past a
//! shutdown: a task registers itself *before* checking the shutdown flag,
//! and shutdown sets the flag *before* reading the counter. Either the task
//! sees the flag and backs out, or shutdown sees the task and waits for it.

use crate::error::RuntimeError;
use crate::metrics::ShutdownMetrics;
use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

struct BarrierState {
    pending: AtomicUsize,
    completed: AtomicUsize,
    shutdown: AtomicBool,
    drained: watch::Sender<()>,
}

impl BarrierState {
    /// Decrement the pending counter, waking waiters when it reaches zero.
    fn release(&self) {
        if self.pending.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.drained.send_replace(());
        }
    }
}

/// Internal: RAII guard that marks a task finished on drop
///
/// Ensures the pending counter is always decremented, even if the task panics.
struct CompletionGuard(Arc<BarrierState>);

impl Drop for CompletionGuard {
    fn drop(&mut self) {
        self.0.completed.fetch_add(1, Ordering::SeqCst);
        self.0.release();
    }
}

/// Tracks fire-and-forget tasks so shutdown can wait for all of them.
///
/// Cloning is cheap; all clones share the same counters.
#[derive(Clone)]
pub struct CompletionBarrier {
    state: Arc<BarrierState>,
}

impl CompletionBarrier {
    /// Create an empty barrier that accepts tasks.
    #[must_use]
    pub fn new() -> Self {
        let (drained, _) = watch::channel(());
        Self {
            state: Arc::new(BarrierState {
                pending: AtomicUsize::new(0),
                completed: AtomicUsize::new(0),
                shutdown: AtomicBool::new(false),
                drained,
            }),
        }
    }

    /// Spawn a task onto the tokio runtime and track it until it finishes.
    ///
    /// The caller does not have to await the returned handle.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError::ShutdownInProgress`] if [`shutdown`](Self::shutdown)
    /// has already been called. The task is not spawned in that case.
    pub fn spawn<F>(&self, task: F) -> Result<JoinHandle<F::Output>, RuntimeError>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        self.state.pending.fetch_add(1, Ordering::SeqCst);

        if self.state.shutdown.load(Ordering::SeqCst) {
            self.state.release();
            tracing::warn!("Rejected task: barrier is shutting down");
            return Err(RuntimeError::ShutdownInProgress);
        }

        let guard = CompletionGuard(Arc::clone(&self.state));
        Ok(tokio::spawn(async move {
            let _guard = guard; // Decrement on drop
            task.await
        }))
    }

    /// Number of tasks spawned but not yet finished.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.state.pending.load(Ordering::SeqCst)
    }

    /// Number of tasks that have finished since the barrier was created.
    #[must_use]
    pub fn completed(&self) -> usize {
        self.state.completed.load(Ordering::SeqCst)
    }

    /// Whether [`shutdown`](Self::shutdown) has been called.
    #[must_use]
    pub fn is_shutting_down(&self) -> bool {
        self.state.shutdown.load(Ordering::SeqCst)
    }

    /// Wait until no tasks are pending.
    ///
    /// Does not stop new tasks from being spawned; use
    /// [`shutdown`](Self::shutdown) for that.
    pub async fn wait(&self) {
        let mut drained = self.state.drained.subscribe();
        while self.pending() > 0 {
            // The sender lives in `self.state`, so the channel cannot close here.
            if drained.changed().await.is_err() {
                break;
            }
        }
    }

    /// Stop accepting tasks and wait for every pending task to finish.
    ///
    /// # Returns
    ///
    /// The total number of tasks that finished over the barrier's lifetime.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError::ShutdownTimeout`] if tasks are still running
    /// when `timeout` elapses. Those tasks keep running; calling `shutdown`
    /// again waits for them again.
    pub async fn shutdown(&self, timeout: Duration) -> Result<usize, RuntimeError> {
        self.state.shutdown.store(true, Ordering::SeqCst);
        tracing::info!(pending = self.pending(), "Initiating graceful shutdown");

        if tokio::time::timeout(timeout, self.wait()).await.is_ok() {
            let completed = self.completed();
            tracing::info!(completed, "All tasks completed, shutdown successful");
            ShutdownMetrics::record_completed();
            Ok(completed)
        } else {
            let pending = self.pending();
            tracing::error!(
                pending_tasks = pending,
                "Shutdown timeout: {} tasks still running", pending
            );
            ShutdownMetrics::record_timeout();
            Err(RuntimeError::ShutdownTimeout(pending))
        }
    }
}

impl Default for CompletionBarrier {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CompletionBarrier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionBarrier")
            .field("pending", &self.pending())
            .field("completed", &self.completed())
            .field("shutdown", &self.is_shutting_down())
            .finish()
    }
}
