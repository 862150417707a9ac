//! Error types for booking operations.

use thiserror::Error;

/// Errors that can occur while validating, booking or cancelling.
///
/// None of these are fatal. Each variant renders a distinct message so the
/// caller can tell the user exactly which field or condition failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BookingError {
    /// First or last name is shorter than two characters
    #[error("First name or last name you entered is too short (at least 2 characters each)")]
    InvalidName,

    /// Email does not look like an address
    #[error("Email address you entered doesn't contain an @ sign or is too short")]
    InvalidEmail,

    /// Ticket count is zero or exceeds the inventory snapshot
    #[error("Number of tickets you entered is invalid: requested {requested}, {remaining} remaining")]
    InvalidTicketCount {
        /// Requested quantity
        requested: u32,
        /// Remaining tickets at the time of the check
        remaining: u32,
    },

    /// The authoritative inventory check failed (someone else got the tickets first)
    #[error("Insufficient inventory: requested {requested}, only {available} available")]
    InsufficientInventory {
        /// Requested quantity
        requested: u32,
        /// Actually available under the ledger lock
        available: u32,
    },

    /// No booking matches the cancellation identity
    #[error("No booking found for {email} with {ticket_count} tickets")]
    BookingNotFound {
        /// Email that was looked up
        email: String,
        /// Ticket count that was looked up
        ticket_count: u32,
    },
}

/// Result type for booking operations
pub type Result<T> = std::result::Result<T, BookingError>;
