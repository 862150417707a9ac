//! # Box Office Core
//!
//! Core types for a single-event ticket inventory.
//!
//! This crate holds everything that is pure: the booking records, the
//! validation rules a request must pass before it reaches the ledger, and
//! the error taxonomy shared by every layer above it.
//!
//! ## Core Concepts
//!
//! - **Booking**: an immutable reservation of N tickets under a name and email
//! - **`BookingRequest`**: an unvalidated candidate booking as typed by a user
//! - **Validator**: pure, per-field checks over a request and an inventory snapshot
//! - **`BookingError`**: every non-fatal failure the core can report
//! - **Confirmation**: what the notifier delivers after a booking
//! - **Environment**: injected dependencies (clock; the confirmation sender
//!   lives in [`notification`])
//!
//! ## Example
//!
//! ```
//! use box_office_core::{validation, BookingRequest};
//!
//! let request = BookingRequest::new("Ada", "Lovelace", "ada@example.com", 2);
//! let report = validation::validate(&request, 50);
//! assert!(report.is_valid());
//! ```

// Re-export commonly used types
pub use chrono::{DateTime, Utc};

/// Booking records and identifiers
pub mod booking;

/// Error taxonomy
pub mod error;

/// Confirmations and their transport
pub mod notification;

/// Request validation
pub mod validation;

/// Environment module - Dependency injection traits
///
/// All external dependencies of the core are abstracted behind traits and
/// injected by the caller.
pub mod environment {
    use chrono::{DateTime, Utc};

    /// Clock trait - abstracts time operations for testability
    ///
    /// # Examples
    ///
    /// ```ignore
    /// // Test - fixed time for deterministic tests
    /// struct FixedClock { time: DateTime<Utc> }
    /// impl Clock for FixedClock {
    ///     fn now(&self) -> DateTime<Utc> {
    ///         self.time
    ///     }
    /// }
    /// ```
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Production clock backed by the system time
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }
}

pub use booking::{Booking, BookingId, BookingRequest};
pub use error::BookingError;
pub use notification::{Confirmation, ConfirmationSender, NotifyError};
pub use validation::{validate, ValidationReport};
