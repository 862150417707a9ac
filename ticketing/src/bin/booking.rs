//! Box office booking binary.
//!
//! Runs one interactive booking session on stdin/stdout, then waits for every
//! scheduled confirmation before exiting.
//!
//! Logs go to stderr so they never interleave with the prompts.
//!
//! # Usage
//!
//! ```bash
//! TOTAL_TICKETS=5 NOTIFICATION_DELAY_MS=2000 cargo run --bin booking
//! ```

use box_office_runtime::metrics::MetricsExporter;
use ticketing::{BookingApp, Config, ConsoleConfirmationSender, Session};
use tokio::io::BufReader;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file
    let _ = dotenvy::dotenv();

    let config = Config::from_env();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.runtime.log_level.as_str().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!(
        conference = %config.event.name,
        total_tickets = config.event.total_tickets,
        "Configuration loaded"
    );

    let exporter = if config.runtime.metrics_enabled {
        Some(MetricsExporter::install()?)
    } else {
        None
    };

    let app = BookingApp::new(config, ConsoleConfirmationSender::new());
    let session = Session::new(&app, BufReader::new(tokio::io::stdin()), tokio::io::stdout());

    tokio::select! {
        result = session.run() => {
            let summary = result?;
            tracing::info!(
                bookings = summary.bookings,
                rejected = summary.rejected,
                cancellations = summary.cancellations,
                sold_out = summary.sold_out,
                "Session finished"
            );
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Interrupted, finishing pending confirmations");
        }
    }

    let delivered = app.shutdown().await?;
    tracing::info!(delivered, "All confirmations sent");

    if let Some(rendered) = exporter.as_ref().and_then(MetricsExporter::render) {
        tracing::info!(metrics = %rendered, "Final metrics");
    }

    Ok(())
}
