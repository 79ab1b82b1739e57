//! Plan, status, and role enums for organizations.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`
//! to match the backend's column values.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Plan
// ---------------------------------------------------------------------------

/// Billing plan of an organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Plan {
    #[default]
    Trial,
    Pro,
    Enterprise,
}

impl Plan {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Trial => "trial",
            Self::Pro => "pro",
            Self::Enterprise => "enterprise",
        }
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// OrgStatus
// ---------------------------------------------------------------------------

/// Whether an organization may use the console and place calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrgStatus {
    #[default]
    Active,
    Suspended,
}

impl OrgStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Suspended => "suspended",
        }
    }

    /// The opposite status, used by the optimistic toggle flow.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Active => Self::Suspended,
            Self::Suspended => Self::Active,
        }
    }
}

impl fmt::Display for OrgStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// OrgRole
// ---------------------------------------------------------------------------

/// Privilege of an organization's owning user.
///
/// Derived from the owner, not from invited membership: being listed in
/// another organization's `members` never confers `Admin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrgRole {
    Admin,
    #[default]
    User,
}

impl OrgRole {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
        }
    }

    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl fmt::Display for OrgRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_uses_snake_case() {
        assert_eq!(serde_json::to_string(&Plan::Enterprise).unwrap(), "\"enterprise\"");
        assert_eq!(serde_json::to_string(&OrgStatus::Suspended).unwrap(), "\"suspended\"");
        assert_eq!(serde_json::to_string(&OrgRole::Admin).unwrap(), "\"admin\"");
    }

    #[test]
    fn status_toggle_round_trips() {
        assert_eq!(OrgStatus::Active.toggled(), OrgStatus::Suspended);
        assert_eq!(OrgStatus::Suspended.toggled(), OrgStatus::Active);
    }

    #[test]
    fn only_admin_role_is_admin() {
        assert!(OrgRole::Admin.is_admin());
        assert!(!OrgRole::User.is_admin());
    }
}
