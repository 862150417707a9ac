//! Shutdown completeness tests for the completion barrier.
//!
//! These tests verify that every task accepted by the barrier runs to
//! completion before `shutdown()` returns, including tasks scheduled in rapid
//! succession from many concurrent callers.

#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)] // Test code can use unwrap/expect

use box_office_runtime::{CompletionBarrier, RuntimeError};
use futures::future::join_all;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio_test::{assert_err, assert_ok};

/// K tasks scheduled back to back produce exactly K completion signals.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_k_scheduled_tasks_all_complete_before_shutdown() {
    const K: usize = 200;

    let barrier = CompletionBarrier::new();
    let signals = Arc::new(AtomicUsize::new(0));

    for i in 0..K {
        let signals = Arc::clone(&signals);
        assert_ok!(barrier.spawn(async move {
            // Stagger delays so tasks finish out of order
            let jitter = u64::try_from(i % 7).unwrap_or(0);
            tokio::time::sleep(Duration::from_millis(5 + jitter)).await;
            signals.fetch_add(1, Ordering::SeqCst);
        }));
    }

    let completed = barrier.shutdown(Duration::from_secs(10)).await.unwrap();

    assert_eq!(completed, K);
    assert_eq!(signals.load(Ordering::SeqCst), K);
    assert_eq!(barrier.pending(), 0);
}

/// Tasks racing a shutdown are either rejected or run to completion; none are lost.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_spawn_racing_shutdown_never_drops_accepted_tasks() {
    let barrier = CompletionBarrier::new();
    let accepted = Arc::new(AtomicUsize::new(0));
    let executed = Arc::new(AtomicUsize::new(0));

    let schedulers: Vec<_> = (0..8)
        .map(|_| {
            let barrier = barrier.clone();
            let accepted = Arc::clone(&accepted);
            let executed = Arc::clone(&executed);
            tokio::spawn(async move {
                for _ in 0..50 {
                    let executed = Arc::clone(&executed);
                    let result = barrier.spawn(async move {
                        tokio::time::sleep(Duration::from_millis(1)).await;
                        executed.fetch_add(1, Ordering::SeqCst);
                    });
                    match result {
                        Ok(_) => {
                            accepted.fetch_add(1, Ordering::SeqCst);
                        }
                        Err(RuntimeError::ShutdownInProgress) => break,
                        Err(other) => panic!("unexpected error: {other}"),
                    }
                    tokio::task::yield_now().await;
                }
            })
        })
        .collect();

    tokio::time::sleep(Duration::from_millis(2)).await;
    let completed = barrier.shutdown(Duration::from_secs(10)).await.unwrap();

    for result in join_all(schedulers).await {
        result.unwrap();
    }

    // Anything accepted after the flag flipped was rejected, so the counts agree.
    assert_eq!(completed, accepted.load(Ordering::SeqCst));
    assert_eq!(executed.load(Ordering::SeqCst), accepted.load(Ordering::SeqCst));
    assert_err!(barrier.spawn(async {}));
}

/// Clones share one set of counters.
#[tokio::test]
async fn test_clones_share_counters() {
    let barrier = CompletionBarrier::new();
    let clone = barrier.clone();

    let handle = clone.spawn(async { 42 }).unwrap();
    assert_eq!(handle.await.unwrap(), 42);

    barrier.wait().await;
    assert_eq!(barrier.completed(), 1);
    assert_eq!(clone.completed(), 1);
}
