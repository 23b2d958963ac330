// src/services/source.rs

//! Status API client.
//!
//! Performs exactly one request per call; retrying is left to
//! [`crate::pipeline::fetch_with_retry`].

use async_trait::async_trait;
use reqwest::Client;

use crate::error::{AppError, Result};
use crate::models::ServerStatus;
use crate::utils::http::body_text;

/// Something that can produce the full server status list.
#[async_trait]
pub trait StatusSource: Send + Sync {
    /// Fetch every server's status once.
    async fn fetch(&self) -> Result<Vec<ServerStatus>>;
}

/// Fetches statuses from an HTTP JSON endpoint.
pub struct HttpStatusSource {
    client: Client,
    url: String,
}

impl HttpStatusSource {
    /// Create a source for the given endpoint.
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl StatusSource for HttpStatusSource {
    async fn fetch(&self) -> Result<Vec<ServerStatus>> {
        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::UnexpectedStatus {
                url: self.url.clone(),
                status: status.as_u16(),
                body: body_text(response).await,
            });
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}
