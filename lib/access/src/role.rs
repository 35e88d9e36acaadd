//! Role hierarchy for access control.
//!
//! Roles form a fixed total order: `admin > user > viewer`. A role satisfies
//! a requirement when its rank is at least the required rank. The ordering
//! is not configurable at runtime.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Access role carried by an identity.
///
/// Variants are declared lowest-privilege first so the derived `Ord`
/// matches the hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Read-only access.
    Viewer,
    /// Standard access to create and edit records.
    User,
    /// Full access, including administrative actions.
    Admin,
}

/// Display tone for a role badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoleBadge {
    Red,
    Blue,
    Green,
}

impl Role {
    /// All roles, lowest rank first.
    pub const ALL: [Role; 3] = [Role::Viewer, Role::User, Role::Admin];

    /// Returns the numeric rank of this role (higher is more privileged).
    #[must_use]
    pub const fn rank(&self) -> u8 {
        match self {
            Self::Viewer => 1,
            Self::User => 2,
            Self::Admin => 3,
        }
    }

    /// Returns true if this role meets or exceeds `required`.
    #[must_use]
    pub const fn satisfies(&self, required: Role) -> bool {
        self.rank() >= required.rank()
    }

    /// Returns the lowercase wire code for this role.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Viewer => "viewer",
            Self::User => "user",
            Self::Admin => "admin",
        }
    }

    /// Returns the capitalized name shown in the UI.
    #[must_use]
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::Viewer => "Viewer",
            Self::User => "User",
            Self::Admin => "Admin",
        }
    }

    /// Returns the badge tone used when rendering this role.
    #[must_use]
    pub const fn badge(&self) -> RoleBadge {
        match self {
            Self::Admin => RoleBadge::Red,
            Self::User => RoleBadge::Blue,
            Self::Viewer => RoleBadge::Green,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Error returned when a role code is not recognised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRole(pub String);

impl fmt::Display for UnknownRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown role: {}", self.0)
    }
}

impl std::error::Error for UnknownRole {}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "viewer" => Ok(Self::Viewer),
            "user" => Ok(Self::User),
            "admin" => Ok(Self::Admin),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranks_follow_hierarchy() {
        assert!(Role::Admin.rank() > Role::User.rank());
        assert!(Role::User.rank() > Role::Viewer.rank());
        assert!(Role::Admin > Role::User);
        assert!(Role::User > Role::Viewer);
    }

    #[test]
    fn satisfies_is_rank_comparison() {
        for held in Role::ALL {
            for required in Role::ALL {
                assert_eq!(
                    held.satisfies(required),
                    held.rank() >= required.rank(),
                    "{held} vs {required}"
                );
            }
        }
    }

    #[test]
    fn every_role_satisfies_itself() {
        for role in Role::ALL {
            assert!(role.satisfies(role));
        }
    }

    #[test]
    fn viewer_does_not_satisfy_user() {
        assert!(!Role::Viewer.satisfies(Role::User));
        assert!(!Role::Viewer.satisfies(Role::Admin));
        assert!(Role::Admin.satisfies(Role::Viewer));
    }

    #[test]
    fn role_serialization_format() {
        let json = serde_json::to_string(&Role::Admin).expect("serialize");
        assert_eq!(json, "\"admin\"");

        let json = serde_json::to_string(&Role::Viewer).expect("serialize");
        assert_eq!(json, "\"viewer\"");
    }

    #[test]
    fn unknown_role_fails_to_deserialize() {
        let result: Result<Role, _> = serde_json::from_str("\"superuser\"");
        assert!(result.is_err());
    }

    #[test]
    fn parse_from_code() {
        assert_eq!("user".parse::<Role>(), Ok(Role::User));
        assert_eq!(
            "Admin".parse::<Role>(),
            Err(UnknownRole("Admin".to_string()))
        );
    }

    #[test]
    fn display_names_and_badges() {
        assert_eq!(Role::Admin.display_name(), "Admin");
        assert_eq!(Role::Viewer.to_string(), "viewer");
        assert_eq!(Role::Admin.badge(), RoleBadge::Red);
        assert_eq!(Role::User.badge(), RoleBadge::Blue);
        assert_eq!(Role::Viewer.badge(), RoleBadge::Green);
    }
}
