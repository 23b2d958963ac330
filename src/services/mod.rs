//! Service layer: the outbound edges of a cycle.
//!
//! - Status fetching (`StatusSource`, `HttpStatusSource`)
//! - Notification delivery (`Notifier`, `DiscordWebhook`)

mod notifier;
mod source;

pub use notifier::{DiscordWebhook, Notifier};
pub use source::{HttpStatusSource, StatusSource};
