//! # Box Office Runtime
//!
//! Runtime support for the Box Office ticket inventory.
//!
//! This crate provides the pieces that deal with background work rather than
//! with booking rules:
//!
//! - **`CompletionBarrier`**: spawns fire-and-forget tasks and tracks every one
//!   of them to completion, so the process can refuse to exit while work is
//!   still in flight
//! - **Metrics**: Prometheus recorders for the ledger, notifications and shutdown
//!
//! ## Example
//!
//! ```ignore
//! use box_office_runtime::CompletionBarrier;
//! use std::time::Duration;
//!
//! let barrier = CompletionBarrier::new();
//! barrier.spawn(async { send_confirmation().await })?;
//!
//! // Later, before exiting:
//! barrier.shutdown(Duration::from_secs(30)).await?;
//! ```

/// Completion barrier for background tasks
pub mod barrier;

/// Prometheus metrics for observability
pub mod metrics;

/// Error types for the runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur while scheduling or draining background tasks
    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum RuntimeError {
        /// The barrier is shutting down and not accepting new tasks
        ///
        /// Returned by `spawn()` once `shutdown()` has been called.
        #[error("Runtime is shutting down")]
        ShutdownInProgress,

        /// Shutdown timed out waiting for tasks to complete
        ///
        /// Some tasks were still running when the timeout elapsed.
        #[error("Shutdown timed out with {0} tasks still running")]
        ShutdownTimeout(usize),
    }
}

pub use barrier::CompletionBarrier;
pub use error::RuntimeError;
