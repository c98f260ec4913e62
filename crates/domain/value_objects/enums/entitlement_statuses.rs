use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum EntitlementStatus {
    Pending,
    #[default]
    Active,
    Cancelled,
    Expired,
}

impl EntitlementStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntitlementStatus::Pending => "pending",
            EntitlementStatus::Active => "active",
            EntitlementStatus::Cancelled => "cancelled",
            EntitlementStatus::Expired => "expired",
        }
    }

    /// Unknown column values degrade to `Expired` so a bad row can never
    /// grant access.
    pub fn from_str(value: &str) -> Self {
        match value {
            "pending" => EntitlementStatus::Pending,
            "active" => EntitlementStatus::Active,
            "cancelled" => EntitlementStatus::Cancelled,
            "expired" => EntitlementStatus::Expired,
            _ => EntitlementStatus::Expired,
        }
    }

    /// Cancelled and expired are terminal; rows never leave them.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            EntitlementStatus::Cancelled | EntitlementStatus::Expired
        )
    }
}

impl Display for EntitlementStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_known_statuses() {
        for status in [
            EntitlementStatus::Pending,
            EntitlementStatus::Active,
            EntitlementStatus::Cancelled,
            EntitlementStatus::Expired,
        ] {
            assert_eq!(EntitlementStatus::from_str(status.as_str()), status);
        }
    }

    #[test]
    fn unknown_status_degrades_to_expired() {
        assert_eq!(
            EntitlementStatus::from_str("garbage"),
            EntitlementStatus::Expired
        );
    }

    #[test]
    fn terminal_statuses() {
        assert!(EntitlementStatus::Cancelled.is_terminal());
        assert!(EntitlementStatus::Expired.is_terminal());
        assert!(!EntitlementStatus::Active.is_terminal());
        assert!(!EntitlementStatus::Pending.is_terminal());
    }
}
