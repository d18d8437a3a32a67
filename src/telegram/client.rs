//! Minimal Telegram Bot API client.
//!
//! Only the two methods this bot needs: `sendMessage` and long-poll
//! `getUpdates`. Transport errors are stripped of their URL before being
//! surfaced — reqwest includes the full request URL in error messages,
//! which here would contain the bot token.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::config::TelegramConfig;
use crate::error::SendError;

/// Long-poll wait passed to `getUpdates`, in seconds.
const POLL_TIMEOUT_SECS: u64 = 60;

/// Envelope every Bot API response comes in.
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    #[serde(default)]
    result: Option<T>,
    #[serde(default)]
    description: Option<String>,
}

/// One entry from `getUpdates`.
#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<ChatMessage>,
}

/// Inbound chat message, reduced to what command handling needs.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatMessage {
    pub chat: Chat,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

/// Shared HTTP client for the Bot API.
pub struct TelegramClient {
    http: reqwest::Client,
    token: SecretString,
}

impl TelegramClient {
    pub fn new(config: &TelegramConfig) -> Result<Self, SendError> {
        // Client timeout must outlast the getUpdates long poll.
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(POLL_TIMEOUT_SECS + 30))
            .build()
            .map_err(|e| SendError::Http(e.without_url()))?;

        Ok(Self {
            http,
            token: config.bot_token.clone(),
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!(
            "https://api.telegram.org/bot{}/{}",
            self.token.expose_secret(),
            method
        )
    }

    /// Send a text message to a chat. `markdown` enables Telegram's
    /// Markdown parse mode (used for relayed notifications).
    pub async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        markdown: bool,
    ) -> Result<(), SendError> {
        let mut payload = serde_json::json!({
            "chat_id": chat_id,
            "text": text,
        });
        if markdown {
            payload["parse_mode"] = serde_json::Value::String("Markdown".to_string());
        }

        let response = self
            .http
            .post(self.method_url("sendMessage"))
            .json(&payload)
            .send()
            .await
            .map_err(|e| SendError::Http(e.without_url()))?;

        let body: ApiResponse<serde_json::Value> = response
            .json()
            .await
            .map_err(|e| SendError::Http(e.without_url()))?;

        if !body.ok {
            return Err(SendError::Rejected(
                body.description
                    .unwrap_or_else(|| "unknown error".to_string()),
            ));
        }
        Ok(())
    }

    /// Long-poll for updates past `offset`.
    pub async fn get_updates(&self, offset: i64) -> Result<Vec<Update>, SendError> {
        let payload = serde_json::json!({
            "offset": offset,
            "timeout": POLL_TIMEOUT_SECS,
            "allowed_updates": ["message"],
        });

        let response = self
            .http
            .post(self.method_url("getUpdates"))
            .json(&payload)
            .send()
            .await
            .map_err(|e| SendError::Http(e.without_url()))?;

        let body: ApiResponse<Vec<Update>> = response
            .json()
            .await
            .map_err(|e| SendError::Http(e.without_url()))?;

        if !body.ok {
            return Err(SendError::Rejected(
                body.description
                    .unwrap_or_else(|| "unknown error".to_string()),
            ));
        }
        Ok(body.result.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_decode_tolerates_missing_message() {
        let body = r#"{"ok": true, "result": [
            {"update_id": 10},
            {"update_id": 11, "message": {"chat": {"id": 42}, "text": "/help"}}
        ]}"#;

        let parsed: ApiResponse<Vec<Update>> = serde_json::from_str(body).unwrap();
        assert!(parsed.ok);
        let updates = parsed.result.unwrap();
        assert!(updates[0].message.is_none());
        assert_eq!(updates[1].message.as_ref().unwrap().chat.id, 42);
        assert_eq!(
            updates[1].message.as_ref().unwrap().text.as_deref(),
            Some("/help")
        );
    }

    #[test]
    fn error_response_carries_description() {
        let body = r#"{"ok": false, "description": "Bad Request: chat not found"}"#;
        let parsed: ApiResponse<serde_json::Value> = serde_json::from_str(body).unwrap();
        assert!(!parsed.ok);
        assert_eq!(
            parsed.description.as_deref(),
            Some("Bad Request: chat not found")
        );
    }
}
