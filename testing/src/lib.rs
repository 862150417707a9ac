//! # Box Office Testing
//!
//! Testing utilities and helpers for the Box Office workspace.
//!
//! This crate provides:
//! - Mock implementations of environment traits (clock, confirmation sender)
//! - Request builders for common test scenarios
//!
//! ## Example
//!
//! ```ignore
//! use box_office_testing::{mocks::RecordingSender, test_clock};
//!
//! #[tokio::test]
//! async fn test_booking_sends_confirmation() {
//!     let sender = RecordingSender::new();
//!     let notifier = Notifier::new(sender.clone(), barrier, Duration::ZERO);
//!     // ...
//!     assert_eq!(sender.count(), 1);
//! }
//! ```

use box_office_core::environment::Clock;
use box_office_core::notification::{Confirmation, ConfirmationSender, NotifyError};
use chrono::{DateTime, Utc};

/// Mock implementations of environment traits.
pub mod mocks {
    use super::{Clock, Confirmation, ConfirmationSender, DateTime, NotifyError, Utc};
    use std::future::Future;
    use std::sync::{Arc, Mutex};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use box_office_testing::mocks::FixedClock;
    /// use box_office_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// assert_eq!(clock.now(), clock.now());
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }

    /// Confirmation sender that records every delivery in memory.
    ///
    /// Clones share the same record, so keep one clone in the test and hand
    /// the other to the code under test.
    #[derive(Debug, Clone, Default)]
    pub struct RecordingSender {
        delivered: Arc<Mutex<Vec<Confirmation>>>,
    }

    impl RecordingSender {
        /// Create an empty recording sender.
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Snapshot of everything delivered so far, in delivery order.
        ///
        /// # Panics
        ///
        /// Panics if the mutex is poisoned.
        #[must_use]
        #[allow(clippy::unwrap_used)] // Mutex poison is unrecoverable
        pub fn delivered(&self) -> Vec<Confirmation> {
            self.delivered.lock().unwrap().clone()
        }

        /// Number of confirmations delivered so far.
        ///
        /// # Panics
        ///
        /// Panics if the mutex is poisoned.
        #[must_use]
        #[allow(clippy::unwrap_used)] // Mutex poison is unrecoverable
        pub fn count(&self) -> usize {
            self.delivered.lock().unwrap().len()
        }
    }

    impl ConfirmationSender for RecordingSender {
        #[allow(clippy::unwrap_used)] // Mutex poison is unrecoverable
        fn send_confirmation(
            &self,
            confirmation: &Confirmation,
        ) -> impl Future<Output = Result<(), NotifyError>> + Send {
            self.delivered.lock().unwrap().push(confirmation.clone());
            async move { Ok(()) }
        }
    }

    /// Confirmation sender whose transport always fails.
    #[derive(Debug, Clone, Default)]
    pub struct FailingSender;

    impl FailingSender {
        /// Create a new failing sender.
        #[must_use]
        pub const fn new() -> Self {
            Self
        }
    }

    impl ConfirmationSender for FailingSender {
        fn send_confirmation(
            &self,
            confirmation: &Confirmation,
        ) -> impl Future<Output = Result<(), NotifyError>> + Send {
            let recipient = confirmation.recipient.clone();
            async move {
                Err(NotifyError::Delivery {
                    recipient,
                    reason: "transport unavailable".to_string(),
                })
            }
        }
    }
}

/// Test helpers and builders.
pub mod helpers {
    use box_office_core::BookingRequest;

    /// A request that passes validation for any pool with at least `ticket_count` tickets.
    ///
    /// The email is derived from `n` so requests are distinguishable.
    #[must_use]
    pub fn valid_request(n: usize, ticket_count: u32) -> BookingRequest {
        BookingRequest::new(
            format!("Guest{n}"),
            "Tester",
            format!("guest{n}@example.com"),
            ticket_count,
        )
    }
}

// Re-export commonly used items
pub use helpers::valid_request;
pub use mocks::{test_clock, FailingSender, FixedClock, RecordingSender};
