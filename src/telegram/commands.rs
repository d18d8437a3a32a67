//! Telegram command adapter.
//!
//! Long-polls `getUpdates` and translates chat commands into registry and
//! catalog operations. Every command produces a reply; command-driven
//! errors surface as reply text, never as a silent drop.
//!
//! Reply building is factored into plain functions over the registry and
//! a fetched application list so the semantics are testable without any
//! network.

use std::sync::Arc;

use crate::error::CatalogError;
use crate::gotify::{Application, CatalogClient};
use crate::registry::SubscriptionRegistry;
use crate::telegram::TelegramClient;

const GREETING: &str = "Hi! I'm Gotigram. Subscribe to applications to receive their notifications.\nUse /help to see the available commands.";

const HELP_TEXT: &str = "Available Commands:
/help - Show this help message
/subscribe <app_id> - Subscribe to an app
/unsubscribe <app_id> - Unsubscribe from an app
/subscriptions - Show current subscriptions
/apps - Show all applications";

const CATALOG_UNAVAILABLE: &str = "Unable to fetch application list.";

/// A parsed chat command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    Subscribe(Option<String>),
    Unsubscribe(Option<String>),
    Subscriptions,
    Apps,
    Unknown,
}

impl Command {
    /// Parse a message text. Returns `None` for anything that isn't a
    /// command (doesn't start with `/`).
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if !text.starts_with('/') {
            return None;
        }

        let mut parts = text.split_whitespace();
        let head = parts.next()?;
        // Group chats address commands as /subscribe@botname.
        let name = head[1..].split('@').next().unwrap_or("");

        // All remaining tokens form the argument, so "/subscribe 1 extra"
        // carries "1 extra" and fails the numeric check downstream instead
        // of silently subscribing to 1.
        let rest: Vec<&str> = parts.collect();
        let arg = if rest.is_empty() {
            None
        } else {
            Some(rest.join(" "))
        };

        Some(match name {
            "start" => Command::Start,
            "help" => Command::Help,
            "subscribe" => Command::Subscribe(arg),
            "unsubscribe" => Command::Unsubscribe(arg),
            "subscriptions" => Command::Subscriptions,
            "apps" => Command::Apps,
            _ => Command::Unknown,
        })
    }
}

/// Reply for `/subscribe <arg>` given a fetched catalog.
pub fn subscribe_reply(
    registry: &SubscriptionRegistry,
    apps: &[Application],
    arg: &str,
) -> String {
    let Ok(app_id) = arg.parse::<i64>() else {
        return "App ID must be a number.".to_string();
    };

    if !apps.iter().any(|app| app.id == app_id) {
        return format!("No application found with ID {}.", app_id);
    }

    if registry.add(app_id) {
        format!("Subscribed to application ID {}.", app_id)
    } else {
        format!("Already subscribed to application ID {}.", app_id)
    }
}

/// Reply for `/unsubscribe <arg>`. Needs no catalog.
pub fn unsubscribe_reply(registry: &SubscriptionRegistry, arg: &str) -> String {
    let Ok(app_id) = arg.parse::<i64>() else {
        return "App ID must be a number.".to_string();
    };

    if registry.remove(app_id) {
        format!("Unsubscribed from application ID {}.", app_id)
    } else {
        format!("You are not subscribed to application ID {}.", app_id)
    }
}

/// Reply for `/subscriptions` given a fetched catalog.
pub fn subscriptions_reply(registry: &SubscriptionRegistry, apps: &[Application]) -> String {
    let subscribed = registry.snapshot();
    if subscribed.is_empty() {
        return "You are not subscribed to any applications.".to_string();
    }

    let mut lines = vec!["Current subscriptions:".to_string()];
    for app_id in subscribed {
        let name = apps
            .iter()
            .find(|app| app.id == app_id)
            .map(|app| app.name.as_str())
            .unwrap_or("Unknown");
        lines.push(format!("{}: {}", app_id, name));
    }
    lines.join("\n")
}

/// Reply for `/apps` given a fetched catalog.
pub fn apps_reply(registry: &SubscriptionRegistry, apps: &[Application]) -> String {
    if apps.is_empty() {
        return "No available applications found.".to_string();
    }

    let mut lines = vec!["Available applications:".to_string()];
    for app in apps {
        let status = if registry.contains(app.id) { "✅" } else { "❌" };
        lines.push(format!("{}: {} -> {}", app.id, app.name, status));
    }
    lines.join("\n")
}

/// Reply for `/subscribe <arg>` from a catalog fetch outcome. A failed or
/// empty fetch never mutates the registry.
pub fn subscribe_reply_from_fetch(
    registry: &SubscriptionRegistry,
    fetched: Result<Vec<Application>, CatalogError>,
    arg: &str,
) -> String {
    match fetched {
        Ok(apps) if apps.is_empty() => "No available apps found.".to_string(),
        Ok(apps) => subscribe_reply(registry, &apps, arg),
        Err(e) => {
            tracing::error!("Catalog fetch failed: {}", e);
            CATALOG_UNAVAILABLE.to_string()
        }
    }
}

/// Reply for `/subscriptions` from a catalog fetch outcome.
pub fn subscriptions_reply_from_fetch(
    registry: &SubscriptionRegistry,
    fetched: Result<Vec<Application>, CatalogError>,
) -> String {
    match fetched {
        Ok(apps) => subscriptions_reply(registry, &apps),
        Err(e) => {
            tracing::error!("Catalog fetch failed: {}", e);
            CATALOG_UNAVAILABLE.to_string()
        }
    }
}

/// Reply for `/apps` from a catalog fetch outcome.
pub fn apps_reply_from_fetch(
    registry: &SubscriptionRegistry,
    fetched: Result<Vec<Application>, CatalogError>,
) -> String {
    match fetched {
        Ok(apps) => apps_reply(registry, &apps),
        Err(e) => {
            tracing::error!("Catalog fetch failed: {}", e);
            "No available applications found.".to_string()
        }
    }
}

/// Translates chat commands into registry/catalog operations.
pub struct CommandAdapter {
    client: Arc<TelegramClient>,
    registry: Arc<SubscriptionRegistry>,
    catalog: CatalogClient,
}

impl CommandAdapter {
    pub fn new(
        client: Arc<TelegramClient>,
        registry: Arc<SubscriptionRegistry>,
        catalog: CatalogClient,
    ) -> Self {
        Self {
            client,
            registry,
            catalog,
        }
    }

    /// Long-poll loop. Never returns; transport errors are logged and the
    /// poll resumes after a short pause.
    pub async fn run(&self) {
        let mut offset = 0i64;
        loop {
            match self.client.get_updates(offset).await {
                Ok(updates) => {
                    for update in updates {
                        offset = offset.max(update.update_id + 1);
                        let Some(message) = update.message else {
                            continue;
                        };
                        let Some(text) = message.text else { continue };
                        self.handle_message(message.chat.id, &text).await;
                    }
                }
                Err(e) => {
                    tracing::warn!("getUpdates failed: {}", e);
                    tokio::time::sleep(std::time::Duration::from_secs(3)).await;
                }
            }
        }
    }

    async fn handle_message(&self, chat_id: i64, text: &str) {
        let Some(command) = Command::parse(text) else {
            return;
        };
        tracing::info!(chat_id, "Handling command: {}", text);

        let reply = match command {
            Command::Start => GREETING.to_string(),
            Command::Help => HELP_TEXT.to_string(),
            Command::Subscribe(None) => "Usage: /subscribe <app_id>".to_string(),
            Command::Subscribe(Some(arg)) => subscribe_reply_from_fetch(
                &self.registry,
                self.catalog.fetch_applications().await,
                &arg,
            ),
            Command::Unsubscribe(None) => "Usage: /unsubscribe <app_id>".to_string(),
            Command::Unsubscribe(Some(arg)) => unsubscribe_reply(&self.registry, &arg),
            Command::Subscriptions => {
                if self.registry.is_empty() {
                    "You are not subscribed to any applications.".to_string()
                } else {
                    subscriptions_reply_from_fetch(
                        &self.registry,
                        self.catalog.fetch_applications().await,
                    )
                }
            }
            Command::Apps => {
                apps_reply_from_fetch(&self.registry, self.catalog.fetch_applications().await)
            }
            Command::Unknown => "Unknown command. Use /help for a list of commands.".to_string(),
        };

        if let Err(e) = self.client.send_message(chat_id, &reply, false).await {
            tracing::error!("Failed to send reply: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apps() -> Vec<Application> {
        vec![
            Application {
                id: 1,
                name: "backup".to_string(),
            },
            Application {
                id: 2,
                name: "monitoring".to_string(),
            },
        ]
    }

    #[test]
    fn parses_commands() {
        assert_eq!(Command::parse("/help"), Some(Command::Help));
        assert_eq!(
            Command::parse("/subscribe 3"),
            Some(Command::Subscribe(Some("3".to_string())))
        );
        assert_eq!(Command::parse("/subscribe"), Some(Command::Subscribe(None)));
        assert_eq!(
            Command::parse("/subscriptions@gotigram_bot"),
            Some(Command::Subscriptions)
        );
        assert_eq!(Command::parse("/bogus"), Some(Command::Unknown));
        assert_eq!(Command::parse("hello there"), None);
    }

    #[test]
    fn trailing_argument_tokens_fail_the_numeric_check() {
        assert_eq!(
            Command::parse("/subscribe 1 extra"),
            Some(Command::Subscribe(Some("1 extra".to_string())))
        );

        let registry = SubscriptionRegistry::new();
        let reply = subscribe_reply(&registry, &apps(), "1 extra");
        assert_eq!(reply, "App ID must be a number.");
        assert!(!registry.contains(1));
    }

    #[test]
    fn catalog_failure_replies_unavailable_and_leaves_registry_alone() {
        let registry = SubscriptionRegistry::new();
        let err = || CatalogError::Status(reqwest::StatusCode::INTERNAL_SERVER_ERROR);

        let reply = subscribe_reply_from_fetch(&registry, Err(err()), "1");
        assert_eq!(reply, "Unable to fetch application list.");
        assert!(!registry.contains(1));

        registry.add(2);
        assert_eq!(
            subscriptions_reply_from_fetch(&registry, Err(err())),
            "Unable to fetch application list."
        );
        assert_eq!(
            apps_reply_from_fetch(&registry, Err(err())),
            "No available applications found."
        );
    }

    #[test]
    fn subscribe_with_empty_catalog_does_not_mutate() {
        let registry = SubscriptionRegistry::new();
        let reply = subscribe_reply_from_fetch(&registry, Ok(Vec::new()), "1");
        assert_eq!(reply, "No available apps found.");
        assert!(registry.is_empty());
    }

    #[test]
    fn subscribe_validates_against_catalog() {
        let registry = SubscriptionRegistry::new();

        let reply = subscribe_reply(&registry, &apps(), "1");
        assert_eq!(reply, "Subscribed to application ID 1.");
        assert!(registry.contains(1));

        let reply = subscribe_reply(&registry, &apps(), "1");
        assert_eq!(reply, "Already subscribed to application ID 1.");

        let reply = subscribe_reply(&registry, &apps(), "99");
        assert_eq!(reply, "No application found with ID 99.");
        assert!(!registry.contains(99));

        let reply = subscribe_reply(&registry, &apps(), "one");
        assert_eq!(reply, "App ID must be a number.");
    }

    #[test]
    fn unsubscribe_round_trip() {
        let registry = SubscriptionRegistry::new();
        registry.add(2);

        let reply = unsubscribe_reply(&registry, "2");
        assert_eq!(reply, "Unsubscribed from application ID 2.");
        assert!(!registry.contains(2));

        let reply = unsubscribe_reply(&registry, "2");
        assert_eq!(reply, "You are not subscribed to application ID 2.");

        let reply = unsubscribe_reply(&registry, "x");
        assert_eq!(reply, "App ID must be a number.");
    }

    #[test]
    fn subscriptions_listing_names_and_unknowns() {
        let registry = SubscriptionRegistry::new();
        assert_eq!(
            subscriptions_reply(&registry, &apps()),
            "You are not subscribed to any applications."
        );

        registry.add(2);
        registry.add(7); // no longer in the catalog
        assert_eq!(
            subscriptions_reply(&registry, &apps()),
            "Current subscriptions:\n2: monitoring\n7: Unknown"
        );
    }

    #[test]
    fn apps_listing_marks_subscriptions() {
        let registry = SubscriptionRegistry::new();
        registry.add(1);

        assert_eq!(
            apps_reply(&registry, &apps()),
            "Available applications:\n1: backup -> ✅\n2: monitoring -> ❌"
        );
        assert_eq!(apps_reply(&registry, &[]), "No available applications found.");
    }
}
