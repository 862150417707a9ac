//! Request validation.
//!
//! The validator is advisory. It runs against a *snapshot* of the remaining
//! inventory taken before the ledger lock, so a request that passes here can
//! still be rejected by the ledger if another booking landed in between.

use crate::booking::BookingRequest;
use crate::error::BookingError;

/// Minimum number of characters in a first or last name
pub const MIN_NAME_CHARS: usize = 2;

/// Minimum number of characters in an email address
pub const MIN_EMAIL_CHARS: usize = 5;

/// Per-field outcome of validating a [`BookingRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)] // One flag per reportable field
pub struct ValidationReport {
    /// Both names have at least [`MIN_NAME_CHARS`] characters
    pub name_ok: bool,
    /// Email contains `@` and has at least [`MIN_EMAIL_CHARS`] characters
    pub email_ok: bool,
    /// `0 < ticket_count <= remaining`
    pub count_ok: bool,
    requested: u32,
    remaining: u32,
}

impl ValidationReport {
    /// Whether every check passed
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.name_ok && self.email_ok && self.count_ok
    }

    /// One error per failed check, in field order.
    #[must_use]
    pub fn errors(&self) -> Vec<BookingError> {
        let mut errors = Vec::new();
        if !self.name_ok {
            errors.push(BookingError::InvalidName);
        }
        if !self.email_ok {
            errors.push(BookingError::InvalidEmail);
        }
        if !self.count_ok {
            errors.push(BookingError::InvalidTicketCount {
                requested: self.requested,
                remaining: self.remaining,
            });
        }
        errors
    }

    /// Converts the report into a `Result`.
    ///
    /// # Errors
    ///
    /// Returns every failed check if at least one failed.
    pub fn into_result(self) -> Result<(), Vec<BookingError>> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(self.errors())
        }
    }
}

/// Checks a name has enough characters (not bytes).
#[must_use]
pub fn is_valid_name(name: &str) -> bool {
    name.chars().count() >= MIN_NAME_CHARS
}

/// Checks an email has an `@` and enough characters.
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    email.contains('@') && email.chars().count() >= MIN_EMAIL_CHARS
}

/// Checks a ticket count against an inventory snapshot.
#[must_use]
pub const fn is_valid_ticket_count(ticket_count: u32, remaining: u32) -> bool {
    ticket_count > 0 && ticket_count <= remaining
}

/// Validates a booking request against a snapshot of the remaining inventory.
#[must_use]
pub fn validate(request: &BookingRequest, remaining: u32) -> ValidationReport {
    ValidationReport {
        name_ok: is_valid_name(&request.first_name) && is_valid_name(&request.last_name),
        email_ok: is_valid_email(&request.email),
        count_ok: is_valid_ticket_count(request.ticket_count, remaining),
        requested: request.ticket_count,
        remaining,
    }
}
