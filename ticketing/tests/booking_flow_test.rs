//! End-to-end booking flow tests.
//!
//! Exercises the application the way the session does: validate, book,
//! schedule a confirmation, cancel, list and drain on shutdown.
//!
//! Run with: `cargo test --test booking_flow_test`

#![allow(clippy::expect_used)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::panic)]

use box_office_core::{BookingError, BookingRequest};
use box_office_runtime::RuntimeError;
use box_office_testing::{test_clock, valid_request, RecordingSender};
use std::sync::Arc;
use std::time::Duration;
use ticketing::{AppError, BookingApp, Config, Session};

fn config(total: u32, delay_ms: u64) -> Config {
    let mut config = Config::default();
    config.event.name = "Go Conference".to_string();
    config.event.total_tickets = total;
    config.notifications.delay_ms = delay_ms;
    config
}

fn app(total: u32) -> (BookingApp<RecordingSender>, RecordingSender) {
    let sender = RecordingSender::new();
    let app = BookingApp::with_clock(config(total, 0), sender.clone(), Arc::new(test_clock()));
    (app, sender)
}

#[tokio::test]
async fn test_fifty_ticket_scenario() {
    let (app, sender) = app(50);

    app.submit(BookingRequest::new("Alice", "Smith", "alice@x.com", 2))
        .await
        .unwrap();
    assert_eq!(app.ledger().remaining_tickets().await, 48);
    assert_eq!(app.ledger().list_first_names().await, vec!["Alice"]);

    app.submit(BookingRequest::new("Bob", "Jones", "bob@x.com", 48))
        .await
        .unwrap();
    assert!(app.ledger().is_sold_out().await);

    let late = app
        .submit(BookingRequest::new("Carol", "White", "carol@x.com", 1))
        .await;
    assert_eq!(
        late,
        Err(AppError::Validation(vec![BookingError::InvalidTicketCount {
            requested: 1,
            remaining: 0
        }]))
    );

    assert_eq!(app.shutdown().await, Ok(2));
    let tickets: Vec<_> = sender.delivered().into_iter().map(|c| c.ticket).collect();
    assert!(tickets.contains(&"2 tickets for Alice Smith".to_string()));
    assert!(tickets.contains(&"48 tickets for Bob Jones".to_string()));
}

#[tokio::test]
async fn test_cancellation_round_trip() {
    let (app, _sender) = app(10);

    app.submit(BookingRequest::new("Ann", "Lee", "a@b.com", 3))
        .await
        .unwrap();
    assert_eq!(app.ledger().remaining_tickets().await, 7);

    let removed = app.cancel("a@b.com", 3).await.unwrap();
    assert_eq!(removed.first_name, "Ann");
    assert_eq!(app.ledger().remaining_tickets().await, 10);
    assert!(app.ledger().list_first_names().await.is_empty());

    let again = app.cancel("a@b.com", 3).await;
    assert_eq!(
        again,
        Err(AppError::Booking(BookingError::BookingNotFound {
            email: "a@b.com".to_string(),
            ticket_count: 3
        }))
    );
    assert_eq!(app.ledger().remaining_tickets().await, 10);
}

#[tokio::test]
async fn test_listing_is_idempotent() {
    let (app, _sender) = app(10);
    for n in 0..3 {
        app.submit(valid_request(n, 1)).await.unwrap();
    }

    let first = app.ledger().list_first_names().await;
    let second = app.ledger().list_first_names().await;

    assert_eq!(first, vec!["Guest0", "Guest1", "Guest2"]);
    assert_eq!(first, second);
    assert_eq!(app.ledger().remaining_tickets().await, 7);
}

#[tokio::test]
async fn test_rejected_request_leaves_state_untouched() {
    let (app, sender) = app(5);

    let result = app.submit(BookingRequest::new("A", "Lee", "nope", 9)).await;

    let Err(AppError::Validation(errors)) = &result else {
        panic!("expected validation failure, got {result:?}");
    };
    assert_eq!(
        errors,
        &vec![
            BookingError::InvalidName,
            BookingError::InvalidEmail,
            BookingError::InvalidTicketCount {
                requested: 9,
                remaining: 5
            },
        ]
    );
    assert_eq!(app.ledger().remaining_tickets().await, 5);
    assert_eq!(app.shutdown().await, Ok(0));
    assert_eq!(sender.count(), 0);
}

/// Every scheduled confirmation is delivered before shutdown returns, even
/// though each one sleeps longer than it takes to book them all.
#[tokio::test(start_paused = true)]
async fn test_shutdown_waits_for_every_confirmation() {
    const BOOKINGS: usize = 25;
    let sender = RecordingSender::new();
    let app = BookingApp::new(config(100, 10_000), sender.clone());

    for n in 0..BOOKINGS {
        app.submit(valid_request(n, 1)).await.unwrap();
    }
    assert_eq!(sender.count(), 0);
    assert_eq!(app.barrier().pending(), BOOKINGS);

    assert_eq!(app.shutdown().await, Ok(BOOKINGS));
    assert_eq!(sender.count(), BOOKINGS);
    assert_eq!(app.barrier().pending(), 0);

    let late = app.submit(valid_request(99, 1)).await;
    assert_eq!(late, Err(AppError::Runtime(RuntimeError::ShutdownInProgress)));
}

#[tokio::test(start_paused = true)]
async fn test_session_then_shutdown_delivers_confirmations() {
    let sender = RecordingSender::new();
    let app = BookingApp::new(config(3, 5_000), sender.clone());
    let input = "book\nAda\nLovelace\nada@x.org\n1\nbook\nAlan\nTuring\nalan@x.org\n2\n";
    let mut output = Vec::new();

    let summary = Session::new(&app, input.as_bytes(), &mut output)
        .run()
        .await
        .unwrap();

    assert!(summary.sold_out);
    assert_eq!(summary.bookings, 2);
    assert_eq!(app.shutdown().await, Ok(2));
    assert_eq!(sender.count(), 2);

    let output = String::from_utf8(output).unwrap();
    assert!(output.contains("The first names of bookings are: [Ada, Alan]"));
    assert!(output.contains("Our conference is booked out. Come back next year."));
    assert!(app.notifier().delay() >= Duration::from_secs(5));
}
