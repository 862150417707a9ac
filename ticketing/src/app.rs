//! Application lifecycle.
//!
//! `BookingApp` owns the three long-lived pieces of the process and the order
//! in which they are used for a request:
//!
//! ```text
//! submit:  validate (snapshot) → ledger.book (locked) → notifier.schedule (detached)
//! cancel:  ledger.cancel (locked)
//! exit:    barrier.shutdown (waits for every scheduled confirmation)
//! ```
//!
//! The completion barrier belongs here, not to the ledger, so inventory
//! mutation and confirmation delivery stay independently testable.

use crate::config::Config;
use crate::ledger::InventoryLedger;
use crate::notifier::Notifier;
use box_office_core::environment::{Clock, SystemClock};
use box_office_core::{validate, Booking, BookingError, BookingRequest, ConfirmationSender};
use box_office_runtime::{CompletionBarrier, RuntimeError};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors from application-level operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    /// One or more request fields failed validation
    #[error("Invalid booking request: {}", join_messages(.0))]
    Validation(Vec<BookingError>),

    /// The ledger rejected the operation
    #[error(transparent)]
    Booking(#[from] BookingError),

    /// Background work could not be scheduled or drained
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

fn join_messages(errors: &[BookingError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// The running booking application.
pub struct BookingApp<S> {
    config: Arc<Config>,
    ledger: InventoryLedger,
    barrier: CompletionBarrier,
    notifier: Notifier<S>,
}

impl<S> BookingApp<S>
where
    S: ConfirmationSender + 'static,
{
    /// Create the application from configuration and a confirmation transport.
    #[must_use]
    pub fn new(config: Config, sender: S) -> Self {
        Self::with_clock(config, sender, Arc::new(SystemClock))
    }

    /// Create the application with an injected clock.
    #[must_use]
    pub fn with_clock(config: Config, sender: S, clock: Arc<dyn Clock>) -> Self {
        let ledger = InventoryLedger::with_clock(config.event.total_tickets, clock);
        let barrier = CompletionBarrier::new();
        let notifier = Notifier::new(sender, barrier.clone(), config.notifications.delay());

        info!(
            conference = %config.event.name,
            total_tickets = config.event.total_tickets,
            notification_delay_ms = config.notifications.delay_ms,
            "Booking application initialized"
        );

        Self {
            config: Arc::new(config),
            ledger,
            barrier,
            notifier,
        }
    }

    /// Application configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Shared ledger handle.
    #[must_use]
    pub const fn ledger(&self) -> &InventoryLedger {
        &self.ledger
    }

    /// Confirmation notifier.
    #[must_use]
    pub const fn notifier(&self) -> &Notifier<S> {
        &self.notifier
    }

    /// Completion barrier tracking scheduled confirmations.
    #[must_use]
    pub const fn barrier(&self) -> &CompletionBarrier {
        &self.barrier
    }

    /// Validate, book and schedule a confirmation.
    ///
    /// Returns as soon as the booking is recorded; the confirmation is
    /// delivered in the background.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] with one entry per failed field
    /// - [`AppError::Booking`] with [`BookingError::InsufficientInventory`] if
    ///   the inventory changed between validation and booking
    /// - [`AppError::Runtime`] if shutdown has already started
    pub async fn submit(&self, request: BookingRequest) -> Result<Booking, AppError> {
        if self.barrier.is_shutting_down() {
            return Err(RuntimeError::ShutdownInProgress.into());
        }

        let remaining = self.ledger.remaining_tickets().await;
        let report = validate(&request, remaining);
        if !report.is_valid() {
            debug!(?report, "Booking request failed validation");
            return Err(AppError::Validation(report.errors()));
        }

        let booking = self.ledger.book(request).await?;

        if let Err(error) = self.notifier.schedule_notification(&booking) {
            // Shutdown started between the check above and now; the booking stands.
            warn!(booking_id = %booking.id, %error, "Booking recorded without confirmation");
            return Err(error.into());
        }

        Ok(booking)
    }

    /// Cancel a booking by email and exact ticket count.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Booking`] with [`BookingError::BookingNotFound`] if
    /// nothing matches.
    pub async fn cancel(&self, email: &str, ticket_count: u32) -> Result<Booking, AppError> {
        Ok(self.ledger.cancel(email, ticket_count).await?)
    }

    /// Stop accepting bookings' confirmations and wait for pending ones.
    ///
    /// # Returns
    ///
    /// The number of confirmations that finished over the app's lifetime.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Runtime`] if the configured shutdown timeout
    /// elapses with confirmations still pending.
    pub async fn shutdown(&self) -> Result<usize, AppError> {
        let timeout = self.config.runtime.shutdown_timeout();
        info!(
            pending = self.barrier.pending(),
            timeout_secs = timeout.as_secs(),
            "Waiting for confirmations before exit"
        );
        Ok(self.barrier.shutdown(timeout).await?)
    }
}

impl<S> std::fmt::Debug for BookingApp<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BookingApp")
            .field("config", &self.config)
            .field("ledger", &self.ledger)
            .field("barrier", &self.barrier)
            .finish_non_exhaustive()
    }
}
