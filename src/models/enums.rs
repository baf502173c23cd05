//! Shared domain enums

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

/// Account role, as reported in the `user_type` field
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Student,
    Librarian,
    Admin,
    /// Anything the server sends that this client does not know about.
    #[serde(other)]
    Unknown,
}

impl Role {
    /// Roles that see system-wide aggregates rather than their own rows only.
    pub fn is_privileged(&self) -> bool {
        matches!(self, Role::Librarian | Role::Admin)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Role::Student => "student",
            Role::Librarian => "librarian",
            Role::Admin => "admin",
            Role::Unknown => "unknown",
        };
        write!(f, "{}", label)
    }
}

// ---------------------------------------------------------------------------
// ReservationStatus
// ---------------------------------------------------------------------------

/// Reservation lifecycle status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    #[default]
    Pending,
    Fulfilled,
    Cancelled,
    Expired,
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ReservationStatus::Pending => "Pending",
            ReservationStatus::Fulfilled => "Fulfilled",
            ReservationStatus::Cancelled => "Cancelled",
            ReservationStatus::Expired => "Expired",
            ReservationStatus::Unknown => "Unknown",
        };
        write!(f, "{}", label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_from_unexpected_string() {
        let role: Role = serde_json::from_value(serde_json::json!("superuser")).unwrap();
        assert_eq!(role, Role::Unknown);
    }

    #[test]
    fn test_status_roundtrip() {
        let status: ReservationStatus = serde_json::from_value(serde_json::json!("pending")).unwrap();
        assert_eq!(status, ReservationStatus::Pending);
        assert_eq!(status.to_string(), "Pending");
    }
}
