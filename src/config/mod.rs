//! Configuration for gotigram.
//!
//! Everything comes from env vars (a local `.env` is loaded via dotenvy
//! first). All required settings are validated up front so a missing token
//! fails the process at startup rather than on first use.

use std::path::PathBuf;

use secrecy::SecretString;

use crate::error::ConfigError;

/// Default location of the append-only line log.
pub const DEFAULT_LOG_FILE: &str = "logs/gotigram.log";

/// Main configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub gotify: GotifyConfig,
    pub telegram: TelegramConfig,
    /// Log file path (`GOTIGRAM_LOG_FILE`, default `logs/gotigram.log`).
    pub log_file: PathBuf,
}

/// Gotify server endpoints and credential.
#[derive(Debug, Clone)]
pub struct GotifyConfig {
    /// Base URL for the websocket stream (e.g. `wss://gotify.example.com`).
    pub ws_url: String,
    /// Base URL for the REST API (e.g. `https://gotify.example.com`).
    pub rest_url: String,
    /// Client token, sent as `X-Gotify-Key` / stream `token` query param.
    pub client_token: SecretString,
}

/// Telegram bot credential and destination chat.
#[derive(Debug, Clone)]
pub struct TelegramConfig {
    pub bot_token: SecretString,
    /// The single chat that receives relayed notifications.
    pub chat_id: i64,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        Ok(Self {
            gotify: GotifyConfig::resolve()?,
            telegram: TelegramConfig::resolve()?,
            log_file: std::env::var("GOTIGRAM_LOG_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_LOG_FILE)),
        })
    }
}

impl GotifyConfig {
    fn resolve() -> Result<Self, ConfigError> {
        Ok(Self {
            ws_url: required_env("GOTIFY_WS_URL")?,
            rest_url: required_env("GOTIFY_REST_URL")?,
            client_token: SecretString::new(required_env("GOTIFY_CLIENT_TOKEN")?),
        })
    }
}

impl TelegramConfig {
    fn resolve() -> Result<Self, ConfigError> {
        let chat_id_raw = required_env("TELEGRAM_CHAT_ID")?;
        let chat_id = chat_id_raw
            .trim()
            .parse::<i64>()
            .map_err(|e| ConfigError::InvalidVar {
                var: "TELEGRAM_CHAT_ID".to_string(),
                reason: format!("expected an integer chat id: {}", e),
            })?;

        Ok(Self {
            bot_token: SecretString::new(required_env("TELEGRAM_TOKEN")?),
            chat_id,
        })
    }
}

/// Read an env var, rejecting absent or empty values.
fn required_env(var: &str) -> Result<String, ConfigError> {
    match std::env::var(var) {
        Ok(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ConfigError::MissingVar(var.to_string())),
    }
}
