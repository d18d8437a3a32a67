//! Error types for gotigram.
//!
//! One enum per failure domain, matching how the failure is handled:
//! configuration errors are fatal at startup, catalog and send errors are
//! recovered locally by their callers, and stream errors end the process.

use thiserror::Error;

/// Error loading configuration from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required env var: {0}")]
    MissingVar(String),

    #[error("Invalid value for {var}: {reason}")]
    InvalidVar { var: String, reason: String },
}

/// Error fetching the application catalog from Gotify.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Catalog request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Gotify returned status {0}")]
    Status(reqwest::StatusCode),
}

/// Error on the Gotify websocket stream.
///
/// Any of these ends the stream loop; the process is expected to exit
/// and be restarted by its supervisor. A graceful server close is not an
/// error — the loop simply returns.
#[derive(Debug, Error)]
pub enum StreamError {
    #[error("Failed to connect to Gotify stream: {0}")]
    Connect(String),

    #[error("Stream transport error: {0}")]
    Transport(String),
}

/// Error delivering a message to Telegram.
#[derive(Debug, Error)]
pub enum SendError {
    #[error("Telegram request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Telegram rejected the message: {0}")]
    Rejected(String),
}
