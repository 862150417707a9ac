//! Booking confirmation delivery.
//!
//! A confirmation is captured from the booking *before* it is scheduled, then
//! delivered on its own task after a simulated preparation delay. The task
//! never touches the ledger, and the session never waits for it; the
//! [`CompletionBarrier`] is what guarantees it finishes before the process exits.

use box_office_core::{Booking, Confirmation, ConfirmationSender, NotifyError};
use box_office_runtime::metrics::NotificationMetrics;
use box_office_runtime::{CompletionBarrier, RuntimeError};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn, Instrument};

/// Schedules confirmations onto background tasks tracked by a barrier.
pub struct Notifier<S> {
    sender: Arc<S>,
    barrier: CompletionBarrier,
    delay: Duration,
}

impl<S> Clone for Notifier<S> {
    fn clone(&self) -> Self {
        Self {
            sender: Arc::clone(&self.sender),
            barrier: self.barrier.clone(),
            delay: self.delay,
        }
    }
}

impl<S> Notifier<S>
where
    S: ConfirmationSender + 'static,
{
    /// Creates a notifier.
    ///
    /// # Arguments
    ///
    /// - `sender`: transport used for delivery
    /// - `barrier`: barrier owned by the application lifecycle
    /// - `delay`: simulated time to prepare and transmit one confirmation
    #[must_use]
    pub fn new(sender: S, barrier: CompletionBarrier, delay: Duration) -> Self {
        Self {
            sender: Arc::new(sender),
            barrier,
            delay,
        }
    }

    /// Simulated delivery delay.
    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Deliver a confirmation for `booking` and wait for it.
    ///
    /// This is the body of every scheduled task; it is exposed for callers
    /// that want to await delivery directly. It is not tracked by the barrier.
    ///
    /// # Errors
    ///
    /// Returns the sender's [`NotifyError`] if delivery fails.
    pub async fn notify(&self, booking: &Booking) -> Result<(), NotifyError> {
        deliver(&*self.sender, &Confirmation::for_booking(booking), self.delay).await
    }

    /// Schedule delivery of a confirmation for `booking` and return immediately.
    ///
    /// Delivery failures are logged and counted; they do not reach the caller.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError::ShutdownInProgress`] if the barrier has started
    /// shutting down. Nothing is scheduled in that case.
    pub fn schedule_notification(&self, booking: &Booking) -> Result<(), RuntimeError> {
        let confirmation = Confirmation::for_booking(booking);
        let sender = Arc::clone(&self.sender);
        let delay = self.delay;
        let barrier = self.barrier.clone();
        let span = tracing::info_span!("notification", booking_id = %confirmation.booking_id);

        let scheduled_at = Instant::now();
        let task = async move {
            match deliver(&*sender, &confirmation, delay).await {
                Ok(()) => NotificationMetrics::record_delivered(scheduled_at.elapsed()),
                Err(error) => {
                    warn!(%error, "Confirmation delivery failed");
                    NotificationMetrics::record_failure();
                }
            }
            // This task's guard is still held, hence the minus one.
            NotificationMetrics::record_finished(barrier.pending().saturating_sub(1));
        }
        .instrument(span);

        match self.barrier.spawn(task) {
            Ok(_) => {
                NotificationMetrics::record_scheduled(self.barrier.pending());
                Ok(())
            }
            Err(error) => {
                warn!(booking_id = %booking.id, %error, "Confirmation not scheduled");
                NotificationMetrics::record_rejected();
                Err(error)
            }
        }
    }
}

impl<S> std::fmt::Debug for Notifier<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Notifier")
            .field("barrier", &self.barrier)
            .field("delay", &self.delay)
            .finish_non_exhaustive()
    }
}

/// Wait out the simulated delay, then hand the confirmation to the sender.
async fn deliver<S>(
    sender: &S,
    confirmation: &Confirmation,
    delay: Duration,
) -> Result<(), NotifyError>
where
    S: ConfirmationSender,
{
    tokio::time::sleep(delay).await;
    sender.send_confirmation(confirmation).await?;
    info!(
        recipient = %confirmation.recipient,
        ticket_count = confirmation.ticket_count,
        "Confirmation sent"
    );
    Ok(())
}
