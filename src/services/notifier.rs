// src/services/notifier.rs

//! Discord webhook delivery.

use async_trait::async_trait;
use reqwest::{Client, StatusCode, header};

use crate::error::{AppError, Result};
use crate::models::{Embed, WebhookPayload};
use crate::utils::http::body_text;

/// A sink for notification embeds.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver one embed. Called at most once per cycle and never retried.
    async fn deliver(&self, embed: &Embed) -> Result<()>;
}

/// Posts embeds to a Discord webhook.
pub struct DiscordWebhook {
    client: Client,
    url: String,
}

impl DiscordWebhook {
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl Notifier for DiscordWebhook {
    async fn deliver(&self, embed: &Embed) -> Result<()> {
        let payload = WebhookPayload::from(embed.clone());
        let body = serde_json::to_vec(&payload)?;

        let response = self
            .client
            .post(&self.url)
            .header(header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        // Discord answers 204 No Content, some proxies 200 OK.
        match response.status() {
            StatusCode::OK | StatusCode::NO_CONTENT => Ok(()),
            status => Err(AppError::Delivery {
                status: status.as_u16(),
                body: body_text(response).await,
            }),
        }
    }
}
