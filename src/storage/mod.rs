//! Persistence of the last observed server state.
//!
//! One JSON record per tracked server, fully overwritten on every save.
//!
//! ## Storage Layout
//!
//! ```text
//! {state_dir}/
//! └── .status-checker_state_{server}.json
//! ```

pub mod local;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::ServerStatus;

pub use local::LocalStateStore;

/// Trait for state storage backends.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Load the last saved state for `key`.
    ///
    /// A missing record is `Ok(None)`; unreadable or corrupt records are errors.
    async fn load(&self, key: &str) -> Result<Option<ServerStatus>>;

    /// Replace the saved state for `key`.
    async fn save(&self, key: &str, server: &ServerStatus) -> Result<()>;
}

/// Hidden file name holding the state of one server.
///
/// Characters outside `[A-Za-z0-9_-]` are replaced with `_` so the name
/// always stays inside the state directory. The mapping is lossy: names that
/// differ only in replaced characters ("Sea of Clouds", "Sea_of_Clouds")
/// share one file.
pub fn state_file_name(server_name: &str) -> String {
    let safe: String = server_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!(".status-checker_state_{safe}.json")
}
