//! Prometheus metrics for observability.
//!
//! This module provides metric collection for the booking components:
//! - Ledger operations (bookings, rejections, cancellations, remaining inventory)
//! - Notification delivery (scheduled, delivered, failed, pending)
//! - Shutdown of the completion barrier
//!
//! Recording is always on through the `metrics` facade; it is a no-op until a
//! recorder is installed with [`MetricsExporter::install`].
//!
//! # Example
//!
//! ```rust,no_run
//! use box_office_runtime::metrics::MetricsExporter;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let exporter = MetricsExporter::install()?;
//! // ... run the application ...
//! if let Some(text) = exporter.render() {
//!     println!("{text}");
//! }
//! # Ok(())
//! # }
//! ```

use metrics::{describe_counter, describe_gauge, describe_histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::time::Duration;
use thiserror::Error;

// Re-export metrics macros for use in other modules
pub use metrics::{counter, gauge, histogram};

/// Errors from metrics operations.
#[derive(Error, Debug)]
pub enum MetricsError {
    /// Failed to build metrics exporter
    #[error("Failed to build metrics exporter: {0}")]
    Build(String),
    /// Failed to install metrics exporter
    #[error("Failed to install metrics exporter: {0}")]
    Install(String),
}

/// Prometheus exposition of the process metrics.
///
/// Installs the global recorder and keeps a handle for rendering the
/// text exposition format.
pub struct MetricsExporter {
    handle: Option<PrometheusHandle>,
}

impl MetricsExporter {
    /// Register metric descriptions and install the Prometheus recorder.
    ///
    /// # Errors
    ///
    /// Returns error if the exporter cannot be built or installed.
    ///
    /// # Note
    ///
    /// If a recorder is already installed (e.g., by another test), the
    /// exporter is returned without a handle and [`render`](Self::render)
    /// yields `None`.
    pub fn install() -> Result<Self, MetricsError> {
        register_metrics();

        let builder = PrometheusBuilder::new()
            .set_buckets_for_metric(
                Matcher::Suffix("duration_seconds".to_string()),
                &[0.01, 0.05, 0.1, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0],
            )
            .map_err(|e| MetricsError::Build(e.to_string()))?;

        match builder.install_recorder() {
            Ok(handle) => {
                tracing::info!("Prometheus metrics recorder installed");
                Ok(Self {
                    handle: Some(handle),
                })
            }
            Err(e) => {
                let err_msg = e.to_string();
                if err_msg.contains("already initialized") {
                    tracing::warn!("Metrics recorder already initialized, skipping re-initialization");
                    Ok(Self { handle: None })
                } else {
                    Err(MetricsError::Install(err_msg))
                }
            }
        }
    }

    /// Get the metrics handle for rendering.
    #[must_use]
    pub const fn handle(&self) -> Option<&PrometheusHandle> {
        self.handle.as_ref()
    }

    /// Render current metrics in Prometheus format.
    ///
    /// Returns `None` if this exporter did not install the recorder.
    #[must_use]
    pub fn render(&self) -> Option<String> {
        self.handle.as_ref().map(PrometheusHandle::render)
    }
}

/// Register all metric descriptions.
fn register_metrics() {
    // Ledger Metrics
    describe_counter!(
        "bookings_accepted_total",
        "Total number of bookings accepted by the ledger"
    );
    describe_counter!(
        "bookings_rejected_total",
        "Total number of bookings rejected, labelled by reason"
    );
    describe_counter!(
        "tickets_booked_total",
        "Total number of tickets booked"
    );
    describe_counter!(
        "cancellations_total",
        "Total number of bookings cancelled"
    );
    describe_counter!(
        "cancellations_not_found_total",
        "Total number of cancellations that matched no booking"
    );
    describe_gauge!(
        "tickets_remaining",
        "Tickets still available for sale"
    );

    // Notification Metrics
    describe_counter!(
        "notifications_scheduled_total",
        "Total number of confirmations scheduled"
    );
    describe_counter!(
        "notifications_delivered_total",
        "Total number of confirmations delivered"
    );
    describe_counter!(
        "notifications_failed_total",
        "Total number of confirmations that failed to deliver"
    );
    describe_counter!(
        "notifications_rejected_total",
        "Total number of confirmations rejected because shutdown had started"
    );
    describe_gauge!(
        "notifications_pending",
        "Confirmations scheduled but not yet finished"
    );
    describe_histogram!(
        "notification_delivery_duration_seconds",
        "Time from scheduling to completion of a confirmation"
    );

    // Shutdown Metrics
    describe_counter!(
        "shutdown_completed_total",
        "Shutdowns that drained every pending task"
    );
    describe_counter!(
        "shutdown_timeout_total",
        "Shutdowns that timed out with tasks still pending"
    );
}

/// Ledger metrics recorder.
pub struct LedgerMetrics;

impl LedgerMetrics {
    /// Record an accepted booking.
    pub fn record_booking(ticket_count: u32, remaining: u32) {
        counter!("bookings_accepted_total").increment(1);
        counter!("tickets_booked_total").increment(u64::from(ticket_count));
        gauge!("tickets_remaining").set(f64::from(remaining));
    }

    /// Record a rejected booking.
    pub fn record_rejection(reason: &'static str) {
        counter!("bookings_rejected_total", "reason" => reason).increment(1);
    }

    /// Record a cancellation.
    pub fn record_cancellation(remaining: u32) {
        counter!("cancellations_total").increment(1);
        gauge!("tickets_remaining").set(f64::from(remaining));
    }

    /// Record a cancellation that matched nothing.
    pub fn record_not_found() {
        counter!("cancellations_not_found_total").increment(1);
    }
}

/// Notification metrics recorder.
pub struct NotificationMetrics;

impl NotificationMetrics {
    /// Record a scheduled notification.
    #[allow(clippy::cast_precision_loss)] // Pending counts are small
    pub fn record_scheduled(pending: usize) {
        counter!("notifications_scheduled_total").increment(1);
        gauge!("notifications_pending").set(pending as f64);
    }

    /// Record a finished notification task.
    #[allow(clippy::cast_precision_loss)] // Pending counts are small
    pub fn record_finished(pending: usize) {
        gauge!("notifications_pending").set(pending as f64);
    }

    /// Record a delivered confirmation.
    pub fn record_delivered(duration: Duration) {
        counter!("notifications_delivered_total").increment(1);
        histogram!("notification_delivery_duration_seconds").record(duration.as_secs_f64());
    }

    /// Record a failed delivery.
    pub fn record_failure() {
        counter!("notifications_failed_total").increment(1);
    }

    /// Record a notification rejected during shutdown.
    pub fn record_rejected() {
        counter!("notifications_rejected_total").increment(1);
    }
}

/// Shutdown metrics recorder.
pub struct ShutdownMetrics;

impl ShutdownMetrics {
    /// Record a clean shutdown.
    pub fn record_completed() {
        counter!("shutdown_completed_total").increment(1);
    }

    /// Record a shutdown that timed out.
    pub fn record_timeout() {
        counter!("shutdown_timeout_total").increment(1);
    }
}
