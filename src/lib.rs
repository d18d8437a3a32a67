//! Gotigram - relay Gotify push notifications to a Telegram chat.
//!
//! Two concurrent paths share one piece of state, the
//! [`registry::SubscriptionRegistry`]:
//!
//! - the stream path: [`gotify::StreamConsumer`] reads the Gotify
//!   websocket and hands every decoded event to the
//!   [`dispatch::Dispatcher`], which forwards subscribed events to the
//!   [`telegram::TelegramSender`];
//! - the command path: [`telegram::CommandAdapter`] long-polls Telegram
//!   for `/subscribe`-style commands and mutates the registry.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod gotify;
pub mod registry;
pub mod telegram;
