//! Booking records.
//!
//! A [`Booking`] is created only by the inventory ledger, after the
//! authoritative inventory check passed. Once created it is never mutated;
//! cancellation removes it from the ledger as a whole.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ============================================================================
// Identifiers
// ============================================================================

/// Unique identifier for a booking
///
/// Used for log correlation only. Lookup and cancellation go through the
/// `(email, ticket_count)` pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BookingId(Uuid);

impl BookingId {
    /// Creates a new random `BookingId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a `BookingId` from a `Uuid`
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for BookingId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BookingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Requests
// ============================================================================

/// A candidate booking as submitted by a user.
///
/// Nothing about a request is trusted: run it through
/// [`validate`](crate::validation::validate) before handing it to the ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRequest {
    /// Attendee first name
    pub first_name: String,
    /// Attendee last name
    pub last_name: String,
    /// Address the confirmation is sent to
    pub email: String,
    /// Number of tickets requested
    pub ticket_count: u32,
}

impl BookingRequest {
    /// Creates a new `BookingRequest`
    #[must_use]
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
        ticket_count: u32,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            ticket_count,
        }
    }
}

// ============================================================================
// Bookings
// ============================================================================

/// A confirmed reservation of tickets.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    /// Booking identifier
    pub id: BookingId,
    /// Attendee first name
    pub first_name: String,
    /// Attendee last name
    pub last_name: String,
    /// Confirmation address
    pub email: String,
    /// Number of tickets held
    pub ticket_count: u32,
    /// When the ledger accepted the booking
    pub booked_at: DateTime<Utc>,
}

impl Booking {
    /// Creates a booking from an accepted request.
    #[must_use]
    pub fn from_request(request: BookingRequest, booked_at: DateTime<Utc>) -> Self {
        Self {
            id: BookingId::new(),
            first_name: request.first_name,
            last_name: request.last_name,
            email: request.email,
            ticket_count: request.ticket_count,
            booked_at,
        }
    }

    /// First and last name joined by a space.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Whether this booking is identified by `email` and `ticket_count`.
    ///
    /// Both must match exactly; emails are compared case-sensitively.
    #[must_use]
    pub fn matches(&self, email: &str, ticket_count: u32) -> bool {
        self.email == email && self.ticket_count == ticket_count
    }
}
