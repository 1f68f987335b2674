//! Actor roles, supplied by the external authentication subsystem

use crate::Tier;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A closed set of actor roles. Review authorization goes through
/// [`Role::satisfies`] — never through string comparison at call sites.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Member,
    Counselor,
    Lead,
    Director,
    Admin,
}

impl Role {
    /// Check whether this role may review at the given tier.
    ///
    /// Admin is director-equivalent: it satisfies the director tier but
    /// not the lower ones, which belong to their own reviewers.
    pub fn satisfies(self, tier: Tier) -> bool {
        self == tier.required_role() || (self == Role::Admin && tier == Tier::last())
    }

    /// Check whether this role may perform administrative operations
    /// (reset, delete)
    pub fn is_admin(self) -> bool {
        self == Role::Admin
    }

    pub fn name(self) -> &'static str {
        match self {
            Role::Member => "member",
            Role::Counselor => "counselor",
            Role::Lead => "lead",
            Role::Director => "director",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error parsing a role string
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown role '{0}'")]
pub struct ParseRoleError(pub String);

impl FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "member" => Ok(Role::Member),
            "counselor" => Ok(Role::Counselor),
            "lead" => Ok(Role::Lead),
            "director" => Ok(Role::Director),
            "admin" => Ok(Role::Admin),
            _ => Err(ParseRoleError(s.to_string())),
        }
    }
}
