//! Inventory ledger for a single event.
//!
//! Owns the remaining-ticket count and the ordered list of bookings. Both
//! live behind ONE mutex because they are linked by an invariant:
//!
//! ```text
//! remaining_tickets == total_tickets - sum(booking.ticket_count)
//! ```
//!
//! **Concurrency Strategy**: callers validate against a snapshot taken before
//! the lock (advisory); `book` re-checks availability under the lock
//! (authoritative) and rejects with `InsufficientInventory` when a concurrent
//! booking got there first. This is what prevents overselling the last seats.

use box_office_core::environment::{Clock, SystemClock};
use box_office_core::{Booking, BookingError, BookingRequest};
use box_office_runtime::metrics::LedgerMetrics;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// State guarded by the ledger lock.
#[derive(Debug)]
struct LedgerState {
    remaining: u32,
    bookings: Vec<Booking>,
}

/// Point-in-time copy of the whole ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedgerSnapshot {
    /// Pool size the ledger was created with
    pub total_tickets: u32,
    /// Tickets still available
    pub remaining_tickets: u32,
    /// Bookings in insertion order
    pub bookings: Vec<Booking>,
}

impl LedgerSnapshot {
    /// Tickets held by current bookings.
    #[must_use]
    pub fn booked_tickets(&self) -> u64 {
        self.bookings
            .iter()
            .map(|b| u64::from(b.ticket_count))
            .sum()
    }

    /// Whether the snapshot satisfies the inventory invariant.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.remaining_tickets <= self.total_tickets
            && u64::from(self.remaining_tickets) + self.booked_tickets()
                == u64::from(self.total_tickets)
    }
}

/// Shared handle to the single event's inventory.
///
/// Cloning is cheap; all clones see the same state. Every operation takes
/// the lock for its whole duration, so operations are totally ordered.
#[derive(Clone)]
pub struct InventoryLedger {
    total: u32,
    state: Arc<Mutex<LedgerState>>,
    clock: Arc<dyn Clock>,
}

impl InventoryLedger {
    /// Creates a ledger with `total_tickets` available, stamped by the system clock.
    #[must_use]
    pub fn new(total_tickets: u32) -> Self {
        Self::with_clock(total_tickets, Arc::new(SystemClock))
    }

    /// Creates a ledger with an injected clock.
    #[must_use]
    pub fn with_clock(total_tickets: u32, clock: Arc<dyn Clock>) -> Self {
        Self {
            total: total_tickets,
            state: Arc::new(Mutex::new(LedgerState {
                remaining: total_tickets,
                bookings: Vec::new(),
            })),
            clock,
        }
    }

    /// Pool size the ledger was created with.
    #[must_use]
    pub const fn total_tickets(&self) -> u32 {
        self.total
    }

    /// Book tickets.
    ///
    /// The caller is expected to have validated the request already; this
    /// only re-checks what can change between validation and now.
    ///
    /// # Errors
    ///
    /// - [`BookingError::InvalidTicketCount`] if the request asks for zero tickets
    /// - [`BookingError::InsufficientInventory`] if fewer than `ticket_count`
    ///   tickets remain at the moment the lock is held
    #[tracing::instrument(
        skip(self, request),
        fields(email = %request.email, ticket_count = request.ticket_count)
    )]
    pub async fn book(&self, request: BookingRequest) -> Result<Booking, BookingError> {
        let mut state = self.state.lock().await;
        let requested = request.ticket_count;

        if requested == 0 {
            LedgerMetrics::record_rejection("invalid_ticket_count");
            return Err(BookingError::InvalidTicketCount {
                requested,
                remaining: state.remaining,
            });
        }

        // CRITICAL: authoritative check, the validator only saw a snapshot
        if requested > state.remaining {
            warn!(
                requested,
                available = state.remaining,
                "Insufficient inventory"
            );
            LedgerMetrics::record_rejection("insufficient_inventory");
            return Err(BookingError::InsufficientInventory {
                requested,
                available: state.remaining,
            });
        }

        state.remaining -= requested;
        let booking = Booking::from_request(request, self.clock.now());
        state.bookings.push(booking.clone());

        info!(
            booking_id = %booking.id,
            remaining = state.remaining,
            "Tickets booked"
        );
        LedgerMetrics::record_booking(requested, state.remaining);

        Ok(booking)
    }

    /// Cancel the first booking held under `email` for exactly `ticket_count` tickets.
    ///
    /// Returns the removed booking; its tickets go back to the pool.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::BookingNotFound`] if no booking matches both
    /// fields. Nothing is mutated in that case.
    ///
    /// # Panics
    ///
    /// Panics if restoring the tickets would push the remaining count past the
    /// pool size. That can only happen if the ledger invariant is already broken.
    #[tracing::instrument(skip(self))]
    pub async fn cancel(&self, email: &str, ticket_count: u32) -> Result<Booking, BookingError> {
        let mut state = self.state.lock().await;

        let Some(position) = state
            .bookings
            .iter()
            .position(|booking| booking.matches(email, ticket_count))
        else {
            debug!("No matching booking");
            LedgerMetrics::record_not_found();
            return Err(BookingError::BookingNotFound {
                email: email.to_string(),
                ticket_count,
            });
        };

        let restored = state
            .remaining
            .checked_add(ticket_count)
            .filter(|restored| *restored <= self.total)
            .unwrap_or_else(|| {
                invariant_broken(&format!(
                    "cancelling {ticket_count} tickets would exceed the pool of {} (remaining {})",
                    self.total, state.remaining
                ))
            });

        let booking = state.bookings.remove(position);
        state.remaining = restored;

        info!(
            booking_id = %booking.id,
            remaining = state.remaining,
            "Booking cancelled"
        );
        LedgerMetrics::record_cancellation(state.remaining);

        Ok(booking)
    }

    /// First names of all bookings, in insertion order.
    pub async fn list_first_names(&self) -> Vec<String> {
        let state = self.state.lock().await;
        state
            .bookings
            .iter()
            .map(|booking| booking.first_name.clone())
            .collect()
    }

    /// Tickets still available.
    ///
    /// The value can be stale as soon as it is returned; use it for display
    /// and advisory validation only.
    pub async fn remaining_tickets(&self) -> u32 {
        self.state.lock().await.remaining
    }

    /// Whether every ticket has been booked.
    pub async fn is_sold_out(&self) -> bool {
        self.remaining_tickets().await == 0
    }

    /// Copy of all bookings, in insertion order.
    pub async fn bookings(&self) -> Vec<Booking> {
        self.state.lock().await.bookings.clone()
    }

    /// Consistent copy of count and bookings, taken under one lock.
    pub async fn snapshot(&self) -> LedgerSnapshot {
        let state = self.state.lock().await;
        LedgerSnapshot {
            total_tickets: self.total,
            remaining_tickets: state.remaining,
            bookings: state.bookings.clone(),
        }
    }
}

impl std::fmt::Debug for InventoryLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InventoryLedger")
            .field("total", &self.total)
            .finish_non_exhaustive()
    }
}

/// The ledger invariant no longer holds; continuing would corrupt inventory.
#[allow(clippy::panic)] // Invariant violation is unrecoverable
fn invariant_broken(detail: &str) -> ! {
    tracing::error!(detail, "Inventory invariant violated");
    panic!("inventory invariant violated: {detail}");
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn request(first: &str, email: &str, count: u32) -> BookingRequest {
        BookingRequest::new(first, "Tester", email, count)
    }

    #[tokio::test]
    async fn test_book_decrements_and_appends() {
        let ledger = InventoryLedger::new(10);

        let booking = ledger.book(request("Ada", "ada@x.org", 3)).await.unwrap();

        assert_eq!(booking.ticket_count, 3);
        assert_eq!(ledger.remaining_tickets().await, 7);
        assert_eq!(ledger.list_first_names().await, vec!["Ada"]);
    }

    #[tokio::test]
    async fn test_book_rejects_over_commit_without_mutation() {
        let ledger = InventoryLedger::new(2);

        let result = ledger.book(request("Ada", "ada@x.org", 3)).await;

        assert_eq!(
            result,
            Err(BookingError::InsufficientInventory {
                requested: 3,
                available: 2
            })
        );
        assert_eq!(ledger.remaining_tickets().await, 2);
        assert!(ledger.bookings().await.is_empty());
    }

    #[tokio::test]
    async fn test_book_rejects_zero_tickets() {
        let ledger = InventoryLedger::new(5);
        let result = ledger.book(request("Ada", "ada@x.org", 0)).await;
        assert!(matches!(
            result,
            Err(BookingError::InvalidTicketCount { requested: 0, .. })
        ));
        assert!(ledger.snapshot().await.bookings.is_empty());
    }

    #[tokio::test]
    async fn test_book_exact_remaining_sells_out() {
        let ledger = InventoryLedger::new(4);
        ledger.book(request("Ada", "ada@x.org", 4)).await.unwrap();
        assert!(ledger.is_sold_out().await);
    }

    #[tokio::test]
    async fn test_cancel_requires_exact_count() {
        let ledger = InventoryLedger::new(10);
        ledger.book(request("Ada", "ada@x.org", 3)).await.unwrap();

        let miss = ledger.cancel("ada@x.org", 2).await;
        assert_eq!(
            miss,
            Err(BookingError::BookingNotFound {
                email: "ada@x.org".to_string(),
                ticket_count: 2
            })
        );
        assert_eq!(ledger.remaining_tickets().await, 7);

        let removed = ledger.cancel("ada@x.org", 3).await.unwrap();
        assert_eq!(removed.first_name, "Ada");
        assert_eq!(ledger.remaining_tickets().await, 10);
    }

    #[tokio::test]
    async fn test_cancel_removes_first_match_only() {
        let ledger = InventoryLedger::new(10);
        ledger.book(request("First", "dup@x.org", 2)).await.unwrap();
        ledger.book(request("Other", "other@x.org", 2)).await.unwrap();
        ledger.book(request("Second", "dup@x.org", 2)).await.unwrap();

        let removed = ledger.cancel("dup@x.org", 2).await.unwrap();

        assert_eq!(removed.first_name, "First");
        assert_eq!(ledger.list_first_names().await, vec!["Other", "Second"]);
        assert_eq!(ledger.remaining_tickets().await, 6);
    }

    #[tokio::test]
    async fn test_list_first_names_is_a_copy() {
        let ledger = InventoryLedger::new(10);
        ledger.book(request("Ada", "ada@x.org", 1)).await.unwrap();

        let mut names = ledger.list_first_names().await;
        names.push("Mallory".to_string());

        assert_eq!(ledger.list_first_names().await, vec!["Ada"]);
    }

    #[tokio::test]
    async fn test_snapshot_is_consistent() {
        let ledger = InventoryLedger::new(10);
        ledger.book(request("Ada", "ada@x.org", 4)).await.unwrap();
        ledger.book(request("Bob", "bob@x.org", 1)).await.unwrap();

        let snapshot = ledger.snapshot().await;
        assert_eq!(snapshot.booked_tickets(), 5);
        assert!(snapshot.is_consistent());
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let ledger = InventoryLedger::new(3);
        let clone = ledger.clone();
        clone.book(request("Ada", "ada@x.org", 2)).await.unwrap();
        assert_eq!(ledger.remaining_tickets().await, 1);
    }
}
