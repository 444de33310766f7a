//! Staff Role Definitions

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Staff roles a user can hold.
///
/// Roles are non-exclusive: a user may hold both at once. The admin flag on
/// the user account is not a role; it bypasses role checks entirely.
///
/// The serialized names below are canonical and are the only strings ever
/// persisted in the `user_role` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Manages the catalog and all orders
    Manager,
    /// Delivers orders; may update the status of orders assigned to them
    DeliveryCrew,
}

impl Role {
    /// Canonical name as stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Manager => "manager",
            Role::DeliveryCrew => "delivery_crew",
        }
    }

    /// All defined roles.
    pub const ALL: [Role; 2] = [Role::Manager, Role::DeliveryCrew];
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a role name does not match any defined role
#[derive(Debug, Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl std::str::FromStr for Role {
    type Err = UnknownRole;

    /// Accepts the canonical name plus the URL path form (`delivery-crew`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "manager" => Ok(Role::Manager),
            "delivery_crew" | "delivery-crew" => Ok(Role::DeliveryCrew),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}
