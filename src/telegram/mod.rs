//! Telegram Bot API integration.
//!
//! One thin API client shared by two consumers: the outbound sender that
//! relays accepted Gotify messages to the configured chat, and the command
//! adapter that long-polls for `/subscribe`-style commands and answers
//! them.

mod client;
mod commands;
mod sender;

pub use client::{Chat, ChatMessage, TelegramClient, Update};
pub use commands::{
    apps_reply, subscribe_reply, subscriptions_reply, unsubscribe_reply, Command, CommandAdapter,
};
pub use sender::TelegramSender;
