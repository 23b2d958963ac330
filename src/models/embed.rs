//! Discord embed payloads.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::models::ServerStatus;

/// Embed color for a congested server or a failed fetch.
pub const COLOR_RED: u32 = 0xFF0000;

/// Embed color for any non-congested server.
pub const COLOR_GREEN: u32 = 0x00FF00;

/// Title of the embed posted when every fetch attempt failed.
pub const FETCH_FAILURE_TITLE: &str = "Error Retrieving Server Status";

/// Embed color for a congestion label.
pub fn embed_color(congestion: &str) -> u32 {
    if congestion.eq_ignore_ascii_case("congested") {
        COLOR_RED
    } else {
        COLOR_GREEN
    }
}

/// A single Discord embed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Embed {
    pub title: String,
    pub description: String,
    pub color: u32,
    /// RFC3339 timestamp
    pub timestamp: String,
}

impl Embed {
    /// Embed announcing the current status of a server.
    pub fn status_update(server: &ServerStatus, at: DateTime<Utc>) -> Self {
        Self {
            title: format!("Updated Status for **{}**", server.name),
            description: server.summary(),
            color: embed_color(&server.congestion),
            timestamp: rfc3339(at),
        }
    }

    /// Embed reporting that the status could not be fetched within the retry budget.
    pub fn fetch_failure(
        server_name: &str,
        max_duration: Duration,
        error: &dyn fmt::Display,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            title: FETCH_FAILURE_TITLE.to_string(),
            description: format!(
                "Error retrieving status for **{}** after {}:\n`{}`",
                server_name,
                humantime::format_duration(max_duration),
                error
            ),
            color: COLOR_RED,
            timestamp: rfc3339(at),
        }
    }
}

/// Webhook request body: `{"embeds": [...]}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WebhookPayload {
    pub embeds: Vec<Embed>,
}

impl From<Embed> for WebhookPayload {
    fn from(embed: Embed) -> Self {
        Self {
            embeds: vec![embed],
        }
    }
}

fn rfc3339(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap()
    }

    fn faerie(congestion: &str) -> ServerStatus {
        ServerStatus {
            name: "Faerie".to_string(),
            status: "Online".to_string(),
            congestion: congestion.to_string(),
            creation: "2023-01-01T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_embed_color() {
        assert_eq!(embed_color("Congested"), COLOR_RED);
        assert_eq!(embed_color("congested"), COLOR_RED);
        assert_eq!(embed_color("Standard"), COLOR_GREEN);
        assert_eq!(embed_color(""), COLOR_GREEN);
    }

    #[test]
    fn test_status_update() {
        let embed = Embed::status_update(&faerie("Standard"), fixed_time());

        assert_eq!(embed.title, "Updated Status for **Faerie**");
        assert_eq!(
            embed.description,
            "Status: Online\nCongestion: Standard\nCreation: 2023-01-01T00:00:00Z"
        );
        assert_eq!(embed.color, COLOR_GREEN);
        assert_eq!(embed.timestamp, "2024-05-01T12:30:00Z");
    }

    #[test]
    fn test_fetch_failure() {
        let embed = Embed::fetch_failure(
            "Faerie",
            Duration::from_secs(300),
            &"failed after 5m: HTTP 503",
            fixed_time(),
        );

        assert_eq!(embed.title, FETCH_FAILURE_TITLE);
        assert_eq!(
            embed.description,
            "Error retrieving status for **Faerie** after 5m:\n`failed after 5m: HTTP 503`"
        );
        assert_eq!(embed.color, COLOR_RED);
    }

    #[test]
    fn test_payload_shape() {
        let payload = WebhookPayload::from(Embed::status_update(&faerie("Congested"), fixed_time()));
        let value = serde_json::to_value(&payload).unwrap();

        assert_eq!(value["embeds"].as_array().map(Vec::len), Some(1));
        assert_eq!(value["embeds"][0]["color"], 0xFF0000);
        assert_eq!(value["embeds"][0]["timestamp"], "2024-05-01T12:30:00Z");
    }
}
