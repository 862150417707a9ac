//! Console confirmation sender for development.

use box_office_core::{Confirmation, ConfirmationSender, NotifyError};
use tracing::info;

/// Console confirmation sender.
///
/// Prints confirmations to stdout instead of emailing them. There is no real
/// transport behind this sender, so it never fails.
///
/// # Examples
///
/// ```ignore
/// use ticketing::ConsoleConfirmationSender;
///
/// let sender = ConsoleConfirmationSender::new();
/// sender.send_confirmation(&Confirmation::for_booking(&booking)).await?;
/// ```
#[derive(Clone, Debug, Default)]
pub struct ConsoleConfirmationSender;

impl ConsoleConfirmationSender {
    /// Create a new console confirmation sender.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Render the confirmation box exactly as it is printed.
    #[must_use]
    pub fn render(confirmation: &Confirmation) -> String {
        let recipient = &confirmation.recipient;
        let ticket = &confirmation.ticket;
        [
            String::new(),
            "╔══════════════════════════════════════════════════════════════╗".to_string(),
            "║                    TICKET CONFIRMATION                       ║".to_string(),
            "╠══════════════════════════════════════════════════════════════╣".to_string(),
            format!("║ To: {recipient:<57}║"),
            format!("║ {ticket:<61}║"),
            "╚══════════════════════════════════════════════════════════════╝".to_string(),
            String::new(),
        ]
        .join("\n")
    }
}

impl ConfirmationSender for ConsoleConfirmationSender {
    async fn send_confirmation(&self, confirmation: &Confirmation) -> Result<(), NotifyError> {
        info!(
            to = %confirmation.recipient,
            booking_id = %confirmation.booking_id,
            "📧 Ticket confirmation (Development Mode)"
        );
        println!("{}", Self::render(confirmation));
        Ok(())
    }
}
