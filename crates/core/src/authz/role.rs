//! User roles and the authorization predicates the ledger enforces.
//!
//! Roles gate the sensitive ledger operations: posting into a non-open
//! period, forcing or approving a period close, and re-opening a closed
//! period.

use serde::{Deserialize, Serialize};

/// User role in the company hierarchy.
///
/// Roles are ordered from lowest to highest privilege.
/// Higher roles can perform all actions of lower roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Can only view the ledger and reports.
    Viewer = 0,
    /// Can create documents and draft journals.
    Clerk = 1,
    /// Can post documents and journals.
    Accountant = 2,
    /// Can close periods, approve closes, and override period checks.
    Controller = 3,
    /// Full access.
    Admin = 4,
}

impl UserRole {
    /// Parse a role from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "viewer" => Some(Self::Viewer),
            "clerk" => Some(Self::Clerk),
            "accountant" => Some(Self::Accountant),
            "controller" => Some(Self::Controller),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }

    /// Returns the string representation of the role.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Viewer => "viewer",
            Self::Clerk => "clerk",
            Self::Accountant => "accountant",
            Self::Controller => "controller",
            Self::Admin => "admin",
        }
    }

    /// Returns true if this role may post documents and journals at all.
    #[must_use]
    pub fn can_post(&self) -> bool {
        *self >= Self::Accountant
    }

    /// Returns true if this role may post into a closed (not locked) period
    /// when an explicit override is requested.
    #[must_use]
    pub fn can_override_period(&self) -> bool {
        *self >= Self::Controller
    }

    /// Returns true if this role may close a period. Closes above the
    /// policy approval threshold additionally need an approving role.
    #[must_use]
    pub fn can_close_period(&self) -> bool {
        *self >= Self::Accountant
    }

    /// Returns true if this role may force a close past failing readiness
    /// checks.
    #[must_use]
    pub fn can_force_close(&self) -> bool {
        *self >= Self::Controller
    }

    /// Returns true if this role satisfies the close-approval policy
    /// threshold.
    #[must_use]
    pub fn can_approve_close(&self) -> bool {
        *self >= Self::Controller
    }

    /// Returns true if this role may re-open a closed period.
    #[must_use]
    pub fn can_reopen_period(&self) -> bool {
        *self >= Self::Controller
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
