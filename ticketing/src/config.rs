//! Configuration management for the booking application.
//!
//! Loads configuration from environment variables with sensible defaults.

use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// The event being sold
    pub event: EventConfig,
    /// Confirmation delivery
    pub notifications: NotificationConfig,
    /// Process-level settings
    pub runtime: RuntimeConfig,
}

/// Event configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventConfig {
    /// Display name of the conference
    pub name: String,
    /// Size of the ticket pool
    pub total_tickets: u32,
}

/// Notification configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// Simulated delivery delay in milliseconds
    pub delay_ms: u64,
}

impl NotificationConfig {
    /// Simulated delivery delay.
    #[must_use]
    pub const fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

/// Runtime configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Graceful shutdown timeout in seconds
    pub shutdown_timeout: u64,
    /// Install the Prometheus recorder
    pub metrics_enabled: bool,
}

impl RuntimeConfig {
    /// Graceful shutdown timeout.
    #[must_use]
    pub const fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout)
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Missing or unparsable values fall back to their defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    ///
    /// [`from_env`](Self::from_env) is this with `std::env::var`; tests pass
    /// a map instead of mutating the process environment.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            event: EventConfig {
                name: lookup("CONFERENCE_NAME")
                    .unwrap_or_else(|| "Rust Conference".to_string()),
                total_tickets: parsed(&lookup, "TOTAL_TICKETS").unwrap_or(50),
            },
            notifications: NotificationConfig {
                delay_ms: parsed(&lookup, "NOTIFICATION_DELAY_MS").unwrap_or(10_000),
            },
            runtime: RuntimeConfig {
                log_level: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
                shutdown_timeout: parsed(&lookup, "SHUTDOWN_TIMEOUT").unwrap_or(30),
                metrics_enabled: parsed(&lookup, "METRICS_ENABLED").unwrap_or(false),
            },
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

fn parsed<F, T>(lookup: &F, key: &str) -> Option<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    lookup(key).and_then(|value| value.trim().parse().ok())
}
