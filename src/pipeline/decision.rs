//! Change detection between the stored and the freshly fetched status.

use std::fmt;

use crate::models::ServerStatus;

/// Which comparable fields differ between two observations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatusChange {
    pub status: bool,
    pub congestion: bool,
    pub creation: bool,
}

impl StatusChange {
    /// Compare `current` against `previous` field by field.
    pub fn between(previous: &ServerStatus, current: &ServerStatus) -> Self {
        Self {
            status: previous.status != current.status,
            congestion: previous.congestion != current.congestion,
            creation: previous.creation != current.creation,
        }
    }

    /// Check if there are any changes.
    pub fn has_changes(&self) -> bool {
        self.status || self.congestion || self.creation
    }

    /// Names of the fields that changed.
    pub fn changed_fields(&self) -> Vec<&'static str> {
        [
            (self.status, "status"),
            (self.congestion, "congestion"),
            (self.creation, "creation"),
        ]
        .into_iter()
        .filter_map(|(changed, name)| changed.then_some(name))
        .collect()
    }
}

/// Outcome of comparing a new observation with the stored one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Debug mode notifies on every cycle
    Forced,
    /// Nothing stored yet, or the stored record could not be read
    FirstObservation,
    /// At least one field changed
    Changed(StatusChange),
    /// Identical to the stored record
    Unchanged,
}

impl Decision {
    pub fn evaluate(current: &ServerStatus, previous: Option<&ServerStatus>, debug: bool) -> Self {
        if debug {
            return Self::Forced;
        }
        match previous {
            None => Self::FirstObservation,
            Some(previous) => {
                let change = StatusChange::between(previous, current);
                if change.has_changes() {
                    Self::Changed(change)
                } else {
                    Self::Unchanged
                }
            }
        }
    }

    pub fn should_notify(&self) -> bool {
        !matches!(self, Self::Unchanged)
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Forced => f.write_str("debug mode"),
            Self::FirstObservation => f.write_str("first observation"),
            Self::Changed(change) => write!(f, "changed: {}", change.changed_fields().join(", ")),
            Self::Unchanged => f.write_str("unchanged"),
        }
    }
}

/// Whether a notification is warranted for `current`.
pub fn should_notify(current: &ServerStatus, previous: Option<&ServerStatus>, debug: bool) -> bool {
    Decision::evaluate(current, previous, debug).should_notify()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn server(status: &str, congestion: &str, creation: &str) -> ServerStatus {
        ServerStatus {
            name: "Faerie".to_string(),
            status: status.to_string(),
            congestion: congestion.to_string(),
            creation: creation.to_string(),
        }
    }

    fn baseline() -> ServerStatus {
        server("Online", "Standard", "Available")
    }

    /// Every combination of (status, congestion, creation) equality.
    #[test]
    fn test_all_field_combinations() {
        let previous = baseline();

        for mask in 0u8..8 {
            let status_differs = mask & 0b100 != 0;
            let congestion_differs = mask & 0b010 != 0;
            let creation_differs = mask & 0b001 != 0;

            let current = server(
                if status_differs { "Offline" } else { "Online" },
                if congestion_differs { "Congested" } else { "Standard" },
                if creation_differs { "Unavailable" } else { "Available" },
            );

            let expected = mask != 0;
            assert_eq!(
                should_notify(&current, Some(&previous), false),
                expected,
                "mask {mask:03b}"
            );
            assert_eq!(
                StatusChange::between(&previous, &current),
                StatusChange {
                    status: status_differs,
                    congestion: congestion_differs,
                    creation: creation_differs,
                },
                "mask {mask:03b}"
            );
        }
    }

    #[test]
    fn test_debug_always_notifies() {
        let current = baseline();
        assert!(should_notify(&current, Some(&baseline()), true));
        assert!(should_notify(&current, None, true));
        assert_eq!(Decision::evaluate(&current, Some(&current), true), Decision::Forced);
    }

    #[test]
    fn test_absent_previous_notifies() {
        assert!(should_notify(&baseline(), None, false));
        assert_eq!(Decision::evaluate(&baseline(), None, false), Decision::FirstObservation);
    }

    #[test]
    fn test_name_is_not_compared() {
        let mut previous = baseline();
        previous.name = "Renamed".to_string();
        assert!(!should_notify(&baseline(), Some(&previous), false));
    }

    #[test]
    fn test_comparison_is_case_sensitive() {
        let previous = server("Online", "standard", "Available");
        assert!(should_notify(&baseline(), Some(&previous), false));
    }

    #[test]
    fn test_decision_display() {
        let previous = baseline();
        let current = server("Online", "Congested", "Unavailable");

        let decision = Decision::evaluate(&current, Some(&previous), false);
        assert_eq!(decision.to_string(), "changed: congestion, creation");
    }
}
