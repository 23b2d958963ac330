// src/config.rs

//! Configuration loading utilities.
//!
//! Layers, lowest first: built-in defaults, an optional TOML file, then
//! environment variables (including a `.env` file in the working directory).

use std::path::Path;

use crate::error::Result;
use crate::models::Config;

/// Load `.env` into the process environment if present.
pub fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(path) => log::debug!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => log::info!(
            "No .env file found; proceeding with system environment variables."
        ),
        Err(e) => log::warn!("Error reading .env file: {}", e),
    }
}

/// Build and validate the configuration.
///
/// Fails only when a required value is missing or invalid.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    load_config_with(path, |key| std::env::var(key).ok())
}

/// [`load_config`] with an explicit variable lookup in place of the process
/// environment.
pub fn load_config_with(
    path: Option<&Path>,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<Config> {
    let mut config = match path {
        Some(path) => Config::load_or_default(path),
        None => Config::default(),
    };
    config.apply_env_from(lookup);
    config.validate()?;
    Ok(config)
}
