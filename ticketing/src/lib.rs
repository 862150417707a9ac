//! Single-event ticket booking.
//!
//! Sells a fixed pool of tickets for one conference. Bookings are validated,
//! recorded in an [`InventoryLedger`] under a single lock, and confirmed by a
//! [`Notifier`] on background tasks that the process drains before exiting.
//!
//! # Architecture
//!
//! ```text
//!   Session (stdin/stdout)
//!          │ book / cancel / list
//!          ▼
//!   ┌──────────────┐   validate    ┌──────────────────┐
//!   │  BookingApp  │──────────────▶│ box_office_core  │
//!   └──────────────┘               └──────────────────┘
//!          │ book / cancel (locked)
//!          ▼
//!   ┌──────────────┐   schedule    ┌──────────────────┐
//!   │    Ledger    │──────────────▶│     Notifier     │── ConfirmationSender
//!   └──────────────┘               └──────────────────┘
//!                                           │ tracked by
//!                                           ▼
//!                                  ┌──────────────────┐
//!                                  │CompletionBarrier │◀── shutdown waits here
//!                                  └──────────────────┘
//! ```
//!
//! # Concurrency
//!
//! The remaining count and the booking list change together or not at all:
//! the ledger's check-and-decrement happens under one lock, so when `N`
//! callers race for `N - 1` tickets exactly one of them receives
//! [`BookingError::InsufficientInventory`](box_office_core::BookingError::InsufficientInventory).
//!
//! # Example
//!
//! ```no_run
//! use ticketing::{BookingApp, Config, ConsoleConfirmationSender};
//! use box_office_core::BookingRequest;
//!
//! # async fn run() -> Result<(), ticketing::AppError> {
//! let app = BookingApp::new(Config::from_env(), ConsoleConfirmationSender::new());
//! let booking = app
//!     .submit(BookingRequest::new("Ada", "Lovelace", "ada@example.com", 2))
//!     .await?;
//! println!("booked {} tickets", booking.ticket_count);
//! app.shutdown().await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Application lifecycle and request flow
pub mod app;

/// Environment-driven configuration
pub mod config;

/// Development confirmation transport
pub mod console_sender;

/// Shared ticket inventory
pub mod ledger;

/// Background confirmation delivery
pub mod notifier;

/// Interactive command loop
pub mod session;

pub use app::{AppError, BookingApp};
pub use config::Config;
pub use console_sender::ConsoleConfirmationSender;
pub use ledger::{InventoryLedger, LedgerSnapshot};
pub use notifier::Notifier;
pub use session::{Session, SessionError, SessionSummary};
