// src/models/mod.rs

//! Domain models for the status checker.

mod config;
mod embed;
mod server;

// Re-export all public types
pub use config::{Config, HttpConfig};
pub use embed::{COLOR_GREEN, COLOR_RED, Embed, FETCH_FAILURE_TITLE, WebhookPayload, embed_color};
pub use server::{ServerStatus, find_server};
