//! Concurrency integration tests.
//!
//! Races many bookings against a small pool and checks that the ledger
//! never oversells and never loses a booking.
//!
//! Run with: `cargo test --test concurrency_test`

#![allow(clippy::expect_used)]
#![allow(clippy::unwrap_used)]

use box_office_core::BookingError;
use box_office_testing::{valid_request, RecordingSender};
use futures::future::join_all;
use std::sync::Arc;
use ticketing::{BookingApp, Config, InventoryLedger};

fn app(total: u32) -> BookingApp<RecordingSender> {
    let mut config = Config::default();
    config.event.total_tickets = total;
    config.notifications.delay_ms = 0;
    BookingApp::new(config, RecordingSender::new())
}

/// N callers race for N - 1 single tickets: exactly one loses.
#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_last_ticket_race() {
    const CALLERS: usize = 64;
    let pool = u32::try_from(CALLERS - 1).unwrap();
    let ledger = InventoryLedger::new(pool);

    let handles: Vec<_> = (0..CALLERS)
        .map(|n| {
            let ledger = ledger.clone();
            tokio::spawn(async move { ledger.book(valid_request(n, 1)).await })
        })
        .collect();

    let results: Vec<_> = join_all(handles)
        .await
        .into_iter()
        .map(|joined| joined.expect("booking task panicked"))
        .collect();

    let successes = results.iter().filter(|r| r.is_ok()).count();
    let failures: Vec<_> = results.iter().filter_map(|r| r.as_ref().err()).collect();

    assert_eq!(successes, CALLERS - 1);
    assert_eq!(
        failures,
        vec![&BookingError::InsufficientInventory {
            requested: 1,
            available: 0
        }]
    );

    let snapshot = ledger.snapshot().await;
    assert_eq!(snapshot.remaining_tickets, 0);
    assert_eq!(snapshot.bookings.len(), CALLERS - 1);
    assert!(snapshot.is_consistent());
}

/// Validation passes for everyone against the same snapshot; the ledger's
/// locked re-check is what rejects the late callers.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_stale_validation_is_caught_under_lock() {
    let app = Arc::new(app(10));

    let handles: Vec<_> = (0..10)
        .map(|n| {
            let app = Arc::clone(&app);
            tokio::spawn(async move { app.submit(valid_request(n, 3)).await })
        })
        .collect();

    let results: Vec<_> = join_all(handles)
        .await
        .into_iter()
        .map(|joined| joined.expect("booking task panicked"))
        .collect();

    let successes = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 3);

    let snapshot = app.ledger().snapshot().await;
    assert_eq!(snapshot.remaining_tickets, 1);
    assert!(snapshot.is_consistent());

    assert_eq!(app.shutdown().await.unwrap(), 3);
}

/// Bookings and cancellations interleaved across threads keep the invariant.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_interleaved_book_and_cancel() {
    let ledger = InventoryLedger::new(20);

    let handles: Vec<_> = (0..50)
        .map(|n| {
            let ledger = ledger.clone();
            tokio::spawn(async move {
                let request = valid_request(n, 2);
                let email = request.email.clone();
                if ledger.book(request).await.is_ok() && n % 2 == 0 {
                    ledger.cancel(&email, 2).await.unwrap();
                }
            })
        })
        .collect();

    for joined in join_all(handles).await {
        joined.expect("task panicked");
    }

    let snapshot = ledger.snapshot().await;
    assert!(snapshot.is_consistent());
    assert!(snapshot.bookings.iter().all(|b| b.ticket_count == 2));
}
