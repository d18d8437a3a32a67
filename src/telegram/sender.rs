//! Outbound sender: relayed notifications to the configured chat.

use std::sync::Arc;

use async_trait::async_trait;

use crate::dispatch::OutboundSender;
use crate::error::SendError;
use crate::telegram::TelegramClient;

/// Delivers relay messages to the single configured destination chat,
/// with Markdown formatting enabled.
pub struct TelegramSender {
    client: Arc<TelegramClient>,
    chat_id: i64,
}

impl TelegramSender {
    pub fn new(client: Arc<TelegramClient>, chat_id: i64) -> Self {
        Self { client, chat_id }
    }
}

#[async_trait]
impl OutboundSender for TelegramSender {
    async fn send(&self, text: &str) -> Result<(), SendError> {
        self.client.send_message(self.chat_id, text, true).await
    }
}
