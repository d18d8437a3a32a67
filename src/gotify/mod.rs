//! Gotify server integration.
//!
//! Two independent clients: the REST catalog fetch used by chat commands,
//! and the long-lived websocket stream consumer that feeds the dispatcher.

mod catalog;
mod stream;

pub use catalog::{Application, CatalogClient};
pub use stream::{handle_frame, StreamConsumer, StreamEvent};
