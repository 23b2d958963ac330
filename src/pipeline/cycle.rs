// src/pipeline/cycle.rs

//! One fetch → decide → notify → persist pass.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use crate::error::{AppError, Result};
use crate::models::{Config, Embed, ServerStatus, find_server};
use crate::pipeline::decision::Decision;
use crate::pipeline::retry::fetch_with_retry;
use crate::services::{DiscordWebhook, HttpStatusSource, Notifier, StatusSource};
use crate::storage::{LocalStateStore, StateStore};
use crate::utils::http;

/// Settings that shape a cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckSettings {
    /// Name of the tracked server
    pub server_name: String,
    /// Retry budget for one fetch
    pub max_retry_duration: Duration,
    /// Time between cycles
    pub interval: Duration,
    /// Notify on every cycle and disable the ticker
    pub debug: bool,
}

impl From<&Config> for CheckSettings {
    fn from(config: &Config) -> Self {
        Self {
            server_name: config.server_name.clone(),
            max_retry_duration: config.max_retry_duration(),
            interval: config.interval,
            debug: config.debug,
        }
    }
}

/// How a cycle ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Retry budget exhausted; a failure embed was sent
    FetchFailed { embed: Embed, delivered: bool },
    /// Tracked server missing from the response
    ServerNotFound,
    /// Status identical to the stored record
    Unchanged,
    /// Status embed sent and state saved
    Notified {
        embed: Embed,
        delivered: bool,
        persisted: bool,
    },
}

impl CycleOutcome {
    /// The embed handed to the notifier, if any.
    pub fn embed(&self) -> Option<&Embed> {
        match self {
            Self::FetchFailed { embed, .. } | Self::Notified { embed, .. } => Some(embed),
            Self::ServerNotFound | Self::Unchanged => None,
        }
    }
}

/// Watches one server and reports its changes.
pub struct StatusChecker {
    settings: CheckSettings,
    source: Arc<dyn StatusSource>,
    notifier: Arc<dyn Notifier>,
    store: Arc<dyn StateStore>,
}

impl StatusChecker {
    pub fn new(
        settings: CheckSettings,
        source: Arc<dyn StatusSource>,
        notifier: Arc<dyn Notifier>,
        store: Arc<dyn StateStore>,
    ) -> Self {
        Self {
            settings,
            source,
            notifier,
            store,
        }
    }

    /// Wire the HTTP source, Discord webhook and local state store.
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = http::create_client(&config.http)?;
        Ok(Self::new(
            CheckSettings::from(config),
            Arc::new(HttpStatusSource::new(client.clone(), &config.api_url)),
            Arc::new(DiscordWebhook::new(client, &config.webhook_url)),
            Arc::new(LocalStateStore::new(&config.state_dir)),
        ))
    }

    pub fn settings(&self) -> &CheckSettings {
        &self.settings
    }

    /// Run one cycle. Every failure is handled and logged here.
    pub async fn run_cycle(&self) -> CycleOutcome {
        let name = &self.settings.server_name;

        let servers =
            match fetch_with_retry(self.source.as_ref(), self.settings.max_retry_duration).await {
                Ok(servers) => servers,
                Err(failure) => {
                    log::error!("Error after retries: {}", failure);
                    let embed =
                        Embed::fetch_failure(name, failure.max_duration, &failure, Utc::now());
                    let delivered = self.deliver(&embed, "error message").await;
                    return CycleOutcome::FetchFailed { embed, delivered };
                }
            };

        let current = match self.lookup(&servers) {
            Ok(current) => current,
            Err(e) => {
                log::warn!("{}", e);
                return CycleOutcome::ServerNotFound;
            }
        };

        let previous = match self.store.load(name).await {
            Ok(previous) => previous,
            Err(e) => {
                log::error!("Error loading last state for server {}: {}", name, e);
                None
            }
        };

        let decision = Decision::evaluate(current, previous.as_ref(), self.settings.debug);
        if !decision.should_notify() {
            log::info!("No change in {}'s status; nothing to post.", name);
            return CycleOutcome::Unchanged;
        }

        log::info!(
            "Updated Status for {} ({}):\n{}",
            current.name,
            decision,
            current.summary()
        );

        let embed = Embed::status_update(current, Utc::now());
        let delivered = self.deliver(&embed, "server status").await;

        let persisted = match self.store.save(name, current).await {
            Ok(()) => true,
            Err(e) => {
                log::error!("Error saving state for server {}: {}", name, e);
                false
            }
        };

        CycleOutcome::Notified {
            embed,
            delivered,
            persisted,
        }
    }

    fn lookup<'a>(&self, servers: &'a [ServerStatus]) -> Result<&'a ServerStatus> {
        find_server(servers, &self.settings.server_name)
            .ok_or_else(|| AppError::ServerNotFound(self.settings.server_name.clone()))
    }

    async fn deliver(&self, embed: &Embed, what: &str) -> bool {
        match self.notifier.deliver(embed).await {
            Ok(()) => {
                log::info!("Posted {} to Discord successfully.", what);
                true
            }
            Err(e) => {
                log::error!("Error posting {} to Discord: {}", what, e);
                false
            }
        }
    }
}
