//! Gotify websocket stream consumer.
//!
//! Holds one persistent connection to `{ws_url}/stream` and feeds every
//! decoded message through the dispatcher, in arrival order. A malformed
//! frame is logged and skipped; a transport error or server close ends
//! the loop and, by design, the process — cleanly for a server close,
//! with an error for a broken transport. Restarting is the supervisor's
//! job, not ours.

use futures_util::{SinkExt, StreamExt};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer};
use tokio_tungstenite::{connect_async, tungstenite::Message};

use crate::config::GotifyConfig;
use crate::dispatch::{Dispatcher, OutboundSender};
use crate::error::StreamError;

/// One decoded stream message. Ephemeral: decoded, dispatched, dropped.
#[derive(Debug, Clone, Deserialize)]
pub struct StreamEvent {
    #[serde(default = "default_title")]
    pub title: String,

    #[serde(default)]
    pub message: String,

    /// Source application id. Absent or non-numeric `appid` values decode
    /// to `None`, which never matches a subscription.
    #[serde(rename = "appid", default, deserialize_with = "lenient_app_id")]
    pub app_id: Option<i64>,
}

impl StreamEvent {
    /// Outbound text for this event.
    pub fn formatted(&self) -> String {
        format!("{} - {}", self.title, self.message)
    }
}

fn default_title() -> String {
    "No Title".to_string()
}

/// Accept any JSON value for `appid`, keeping only integers.
fn lenient_app_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_i64())
}

/// Long-lived consumer of the Gotify message stream.
pub struct StreamConsumer {
    ws_url: String,
    token: SecretString,
}

impl StreamConsumer {
    pub fn new(config: &GotifyConfig) -> Self {
        Self {
            ws_url: config.ws_url.trim_end_matches('/').to_string(),
            token: config.client_token.clone(),
        }
    }

    /// Connect and read frames until the stream ends.
    ///
    /// A server close or graceful stream end returns `Ok(())`; connect
    /// failures and transport errors return `Err`. Every text frame is
    /// handled (or skipped) in-line before the next read, so dispatch
    /// order matches wire order.
    pub async fn run<S: OutboundSender>(
        &self,
        dispatcher: &Dispatcher<S>,
    ) -> Result<(), StreamError> {
        let url = format!(
            "{}/stream?token={}",
            self.ws_url,
            self.token.expose_secret()
        );

        let (mut ws, _) = connect_async(&url)
            .await
            .map_err(|e| StreamError::Connect(e.to_string()))?;

        tracing::info!("Connected to Gotify stream");

        while let Some(frame) = ws.next().await {
            match frame {
                Ok(Message::Text(text)) => handle_frame(&text, dispatcher).await,
                Ok(Message::Ping(payload)) => {
                    let _ = ws.send(Message::Pong(payload)).await;
                }
                Ok(Message::Close(_)) => {
                    tracing::info!("Gotify stream closed by server");
                    break;
                }
                Ok(_) => {}
                Err(e) => return Err(StreamError::Transport(e.to_string())),
            }
        }

        Ok(())
    }
}

/// Decode one text frame and dispatch it.
///
/// Parse failures are logged and dropped; a single malformed message must
/// not kill the stream.
pub async fn handle_frame<S: OutboundSender>(text: &str, dispatcher: &Dispatcher<S>) {
    match serde_json::from_str::<StreamEvent>(text) {
        Ok(event) => {
            tracing::info!(
                app_id = ?event.app_id,
                "Gotify message: {} - {}",
                event.title,
                event.message
            );
            dispatcher.dispatch(&event).await;
        }
        Err(e) => {
            tracing::error!("Error parsing stream message: {}", e);
        }
    }
}
