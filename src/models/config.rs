//! Application configuration structures.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};
use crate::storage::state_file_name;

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Name of the tracked server
    #[serde(default = "defaults::server_name")]
    pub server_name: String,

    /// Status API endpoint returning a JSON array of servers
    #[serde(default = "defaults::api_url")]
    pub api_url: String,

    /// Discord webhook URL (required)
    #[serde(default)]
    pub webhook_url: String,

    /// Time between cycles, e.g. "1m" or "30s"
    #[serde(default = "defaults::interval", with = "duration_str")]
    pub interval: Duration,

    /// Retry budget for one fetch, in multiples of `interval`
    #[serde(default = "defaults::retry_budget_ticks")]
    pub retry_budget_ticks: u32,

    /// Run a single cycle and always notify
    #[serde(default)]
    pub debug: bool,

    /// Directory holding the state file
    #[serde(default = "defaults::state_dir")]
    pub state_dir: PathBuf,

    /// HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Overlay values from an arbitrary variable lookup.
    ///
    /// Empty values are ignored. An unparsable `TICKER_INTERVAL` keeps the
    /// current interval and logs a warning.
    pub fn apply_env_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(name) = get("SERVER_NAME") {
            self.server_name = name;
        }
        if let Some(url) = get("DISCORD_WEBHOOK_URL") {
            self.webhook_url = url;
        }
        if let Some(url) = get("API_URL") {
            self.api_url = url;
        }
        if let Some(dir) = get("STATE_DIR") {
            self.state_dir = PathBuf::from(dir);
        }
        if let Some(debug) = get("DEBUG") {
            self.debug = debug == "true";
        }
        if let Some(raw) = get("TICKER_INTERVAL") {
            match humantime::parse_duration(raw.trim()) {
                Ok(interval) => self.interval = interval,
                Err(e) => log::warn!(
                    "Invalid TICKER_INTERVAL value {:?}, using {}: {}",
                    raw,
                    humantime::format_duration(self.interval),
                    e
                ),
            }
        }
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.webhook_url.trim().is_empty() {
            return Err(AppError::config(
                "Environment variable DISCORD_WEBHOOK_URL is not set",
            ));
        }
        Url::parse(&self.webhook_url)?;
        Url::parse(&self.api_url)?;
        if self.server_name.trim().is_empty() {
            return Err(AppError::validation("server_name is empty"));
        }
        if self.interval.is_zero() {
            return Err(AppError::validation("interval must be > 0"));
        }
        if Instant::now().checked_add(self.interval).is_none() {
            return Err(AppError::validation(format!(
                "interval {} is too large",
                humantime::format_duration(self.interval)
            )));
        }
        if self.http.timeout_secs == 0 {
            return Err(AppError::validation("http.timeout_secs must be > 0"));
        }
        Ok(())
    }

    /// Total time a single fetch may spend retrying. Saturates at `Duration::MAX`.
    pub fn max_retry_duration(&self) -> Duration {
        self.interval.saturating_mul(self.retry_budget_ticks)
    }

    /// Path of the state file for the tracked server.
    pub fn state_path(&self) -> PathBuf {
        self.state_dir.join(state_file_name(&self.server_name))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_name: defaults::server_name(),
            api_url: defaults::api_url(),
            webhook_url: String::new(),
            interval: defaults::interval(),
            retry_budget_ticks: defaults::retry_budget_ticks(),
            debug: false,
            state_dir: defaults::state_dir(),
            http: HttpConfig::default(),
        }
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
        }
    }
}

/// Durations written as humantime strings ("90s", "1m 30s").
mod duration_str {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&humantime::format_duration(*value).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let raw = String::deserialize(deserializer)?;
        humantime::parse_duration(raw.trim()).map_err(D::Error::custom)
    }
}

mod defaults {
    use std::path::PathBuf;
    use std::time::Duration;

    pub fn server_name() -> String {
        "Faerie".into()
    }
    pub fn api_url() -> String {
        "https://api.xivstatus.com/api/servers".into()
    }
    pub fn interval() -> Duration {
        Duration::from_secs(60)
    }
    pub fn retry_budget_ticks() -> u32 {
        5
    }
    pub fn state_dir() -> PathBuf {
        PathBuf::from(".")
    }
    pub fn user_agent() -> String {
        concat!("status-checker/", env!("CARGO_PKG_VERSION")).into()
    }
    pub fn timeout() -> u64 {
        10
    }
}
