//! Interactive booking session.
//!
//! A thin line-oriented loop over any async reader/writer pair. It parses
//! nothing beyond trimming lines and reading a ticket count; all rules live
//! in the core and the ledger.
//!
//! ```text
//! greet → loop { sold out? stop : prompt command → book | cancel | list | quit }
//! ```

use crate::app::{AppError, BookingApp};
use box_office_core::{BookingRequest, ConfirmationSender};
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, Lines};
use tracing::debug;

/// Errors that end a session early.
#[derive(Error, Debug)]
pub enum SessionError {
    /// Reading input or writing output failed
    #[error("Session I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// Bookings could not be rendered as JSON
    #[error("Failed to render bookings: {0}")]
    Json(#[from] serde_json::Error),
}

/// What happened during a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionSummary {
    /// Bookings accepted
    pub bookings: usize,
    /// Booking attempts rejected by validation or by the ledger
    pub rejected: usize,
    /// Bookings cancelled
    pub cancellations: usize,
    /// Whether the session ended because inventory ran out
    pub sold_out: bool,
}

enum Flow {
    Continue,
    Stop,
}

/// One interactive session driving a [`BookingApp`].
pub struct Session<'a, S, R, W> {
    app: &'a BookingApp<S>,
    lines: Lines<R>,
    output: W,
    summary: SessionSummary,
}

impl<'a, S, R, W> Session<'a, S, R, W>
where
    S: ConfirmationSender + 'static,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    /// Create a session reading commands from `input` and writing to `output`.
    pub fn new(app: &'a BookingApp<S>, input: R, output: W) -> Self {
        Self {
            app,
            lines: input.lines(),
            output,
            summary: SessionSummary::default(),
        }
    }

    /// Run until the user quits, input ends, or inventory is exhausted.
    ///
    /// Scheduled confirmations may still be in flight when this returns;
    /// call [`BookingApp::shutdown`] before exiting.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if reading or writing fails.
    pub async fn run(mut self) -> Result<SessionSummary, SessionError> {
        self.greet().await?;

        loop {
            if self.app.ledger().is_sold_out().await {
                self.say("Our conference is booked out. Come back next year.")
                    .await?;
                self.summary.sold_out = true;
                break;
            }

            let Some(command) = self
                .ask("Enter a command (book, cancel, list, quit):")
                .await?
            else {
                break;
            };

            let flow = match command.to_ascii_lowercase().as_str() {
                "book" => self.book().await?,
                "cancel" => self.cancel().await?,
                "list" => self.list().await?,
                "" | "quit" | "exit" => Flow::Stop,
                other => {
                    self.say(&format!("Unknown command '{other}'")).await?;
                    Flow::Continue
                }
            };

            if matches!(flow, Flow::Stop) {
                break;
            }
        }

        self.output.flush().await?;
        debug!(summary = ?self.summary, "Session ended");
        Ok(self.summary)
    }

    async fn greet(&mut self) -> Result<(), SessionError> {
        let config = self.app.config();
        let name = config.event.name.clone();
        let total = config.event.total_tickets;
        let remaining = self.app.ledger().remaining_tickets().await;

        self.say(&format!("Welcome to {name} booking application")).await?;
        self.say(&format!(
            "We have total of {total} tickets and {remaining} are still available."
        ))
        .await?;
        self.say("Get your tickets here to attend").await
    }

    async fn book(&mut self) -> Result<Flow, SessionError> {
        let Some(first_name) = self.ask("Enter your first name:").await? else {
            return Ok(Flow::Stop);
        };
        let Some(last_name) = self.ask("Enter your last name:").await? else {
            return Ok(Flow::Stop);
        };
        let Some(email) = self.ask("Enter your email address:").await? else {
            return Ok(Flow::Stop);
        };
        let Some(count) = self.ask("Enter number of tickets:").await? else {
            return Ok(Flow::Stop);
        };

        // Anything that is not a positive integer fails the ticket-count check.
        let ticket_count = count.parse().unwrap_or(0);
        let request = BookingRequest::new(first_name, last_name, email, ticket_count);

        match self.app.submit(request).await {
            Ok(booking) => {
                self.summary.bookings += 1;
                self.say(&format!(
                    "Thank you {} for booking {} tickets. You will receive a confirmation email at {}",
                    booking.full_name(),
                    booking.ticket_count,
                    booking.email
                ))
                .await?;
                self.show_inventory().await?;
                Ok(Flow::Continue)
            }
            Err(AppError::Validation(errors)) => {
                self.summary.rejected += 1;
                for error in errors {
                    self.say(&error.to_string()).await?;
                }
                Ok(Flow::Continue)
            }
            Err(AppError::Booking(error)) => {
                self.summary.rejected += 1;
                self.say(&error.to_string()).await?;
                Ok(Flow::Continue)
            }
            Err(AppError::Runtime(error)) => {
                self.say(&error.to_string()).await?;
                Ok(Flow::Stop)
            }
        }
    }

    async fn cancel(&mut self) -> Result<Flow, SessionError> {
        let Some(email) = self.ask("Enter the email address of the booking:").await? else {
            return Ok(Flow::Stop);
        };
        let Some(count) = self.ask("Enter the number of tickets booked:").await? else {
            return Ok(Flow::Stop);
        };

        // No booking holds zero tickets, so a bad count simply finds nothing.
        let ticket_count = count.parse().unwrap_or(0);

        match self.app.cancel(&email, ticket_count).await {
            Ok(booking) => {
                self.summary.cancellations += 1;
                self.say(&format!(
                    "Cancelled {} tickets for {}",
                    booking.ticket_count,
                    booking.full_name()
                ))
                .await?;
                self.show_inventory().await?;
            }
            Err(error) => self.say(&error.to_string()).await?,
        }
        Ok(Flow::Continue)
    }

    async fn list(&mut self) -> Result<Flow, SessionError> {
        let snapshot = self.app.ledger().snapshot().await;
        let rendered = serde_json::to_string_pretty(&snapshot)?;
        self.say(&rendered).await?;
        Ok(Flow::Continue)
    }

    async fn show_inventory(&mut self) -> Result<(), SessionError> {
        let name = self.app.config().event.name.clone();
        let remaining = self.app.ledger().remaining_tickets().await;
        let first_names = self.app.ledger().list_first_names().await;

        self.say(&format!("{remaining} tickets remaining for {name}"))
            .await?;
        self.say(&format!(
            "The first names of bookings are: [{}]",
            first_names.join(", ")
        ))
        .await
    }

    /// Print a prompt and read one trimmed line; `None` at end of input.
    async fn ask(&mut self, prompt: &str) -> Result<Option<String>, SessionError> {
        self.output.write_all(prompt.as_bytes()).await?;
        self.output.write_all(b" ").await?;
        self.output.flush().await?;
        Ok(self
            .lines
            .next_line()
            .await?
            .map(|line| line.trim().to_string()))
    }

    async fn say(&mut self, text: &str) -> Result<(), SessionError> {
        self.output.write_all(text.as_bytes()).await?;
        self.output.write_all(b"\n").await?;
        Ok(())
    }
}
