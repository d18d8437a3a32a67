//! Dispatch filter between the Gotify stream and the outbound sender.
//!
//! Every decoded stream event passes through [`Dispatcher::dispatch`]: if
//! the event's application id is subscribed, exactly one outbound send is
//! made with the formatted text; otherwise the event is dropped with a log
//! line. Send failures are logged and swallowed so a rejected message
//! never stalls the stream loop.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::SendError;
use crate::gotify::StreamEvent;
use crate::registry::SubscriptionRegistry;

/// Outbound delivery to the configured destination.
///
/// A trait seam so dispatch logic can be exercised against a recording
/// mock in tests.
#[async_trait]
pub trait OutboundSender: Send + Sync {
    async fn send(&self, text: &str) -> Result<(), SendError>;
}

/// Forwards subscribed events to an [`OutboundSender`].
pub struct Dispatcher<S> {
    registry: Arc<SubscriptionRegistry>,
    sender: S,
}

impl<S: OutboundSender> Dispatcher<S> {
    pub fn new(registry: Arc<SubscriptionRegistry>, sender: S) -> Self {
        Self { registry, sender }
    }

    /// Filter one event against the registry and forward it if accepted.
    ///
    /// Events whose `app_id` could not be decoded (`None`) never match
    /// any subscription.
    pub async fn dispatch(&self, event: &StreamEvent) {
        let subscribed = event
            .app_id
            .is_some_and(|id| self.registry.contains(id));

        if !subscribed {
            tracing::debug!(
                app_id = ?event.app_id,
                "Message from unsubscribed application, ignoring"
            );
            return;
        }

        let text = event.formatted();
        tracing::info!(app_id = ?event.app_id, "Forwarding message from subscribed application");

        if let Err(e) = self.sender.send(&text).await {
            // Best effort: log and move on so the stream loop keeps going.
            tracing::error!("Failed to deliver message: {}", e);
        }
    }
}
