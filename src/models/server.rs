//! Server status record as returned by the status API.

use serde::{Deserialize, Serialize};

/// A single server's status.
///
/// This is both the element type of the API response and the record kept
/// in the state file between cycles.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServerStatus {
    /// Server name (unique key)
    pub name: String,

    /// Availability, e.g. "Online"
    pub status: String,

    /// Congestion label, e.g. "Standard" or "Congested"
    pub congestion: String,

    /// Character creation availability token
    pub creation: String,
}

impl ServerStatus {
    /// Multi-line summary used in embeds and log output.
    pub fn summary(&self) -> String {
        format!(
            "Status: {}\nCongestion: {}\nCreation: {}",
            self.status, self.congestion, self.creation
        )
    }
}

/// Find a server by exact name.
pub fn find_server<'a>(servers: &'a [ServerStatus], name: &str) -> Option<&'a ServerStatus> {
    servers.iter().find(|s| s.name == name)
}
