//! Booking confirmations and the sender trait that delivers them.

use crate::booking::{Booking, BookingId};
use serde::{Deserialize, Serialize};
use std::future::Future;
use thiserror::Error;

/// A ticket confirmation, captured from a booking before delivery is scheduled.
///
/// Holds copies of everything it needs so delivery never has to look at
/// the ledger again.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Confirmation {
    /// Booking the confirmation belongs to
    pub booking_id: BookingId,
    /// Recipient address
    pub recipient: String,
    /// Attendee full name
    pub attendee: String,
    /// Number of tickets confirmed
    pub ticket_count: u32,
    /// Rendered ticket line, e.g. `"3 tickets for Ada Lovelace"`
    pub ticket: String,
}

impl Confirmation {
    /// Build the confirmation for a booking.
    #[must_use]
    pub fn for_booking(booking: &Booking) -> Self {
        let attendee = booking.full_name();
        Self {
            booking_id: booking.id,
            recipient: booking.email.clone(),
            ticket: format!("{} tickets for {attendee}", booking.ticket_count),
            attendee,
            ticket_count: booking.ticket_count,
        }
    }
}

/// Errors from confirmation delivery.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NotifyError {
    /// The transport refused or failed to deliver the message
    #[error("Failed to deliver confirmation to {recipient}: {reason}")]
    Delivery {
        /// Recipient address
        recipient: String,
        /// Transport-specific reason
        reason: String,
    },
}

/// Confirmation transport.
///
/// This trait abstracts over how a confirmation leaves the process
/// (console output in development, a recording mock in tests).
pub trait ConfirmationSender: Send + Sync {
    /// Deliver one confirmation.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::Delivery`] if the transport fails.
    fn send_confirmation(
        &self,
        confirmation: &Confirmation,
    ) -> impl Future<Output = Result<(), NotifyError>> + Send;
}
