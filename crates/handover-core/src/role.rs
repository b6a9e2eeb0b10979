//! Participant roles

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Fixed set of participant roles.
///
/// Every non-admin role is responsible for at most one step; `Admin` may act
/// on any step but is never a step's responsible role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Club advisor
    Advisor,
    /// Student life representative
    #[serde(rename = "studentlife")]
    StudentLife,
    /// Outgoing office holder
    Outgoing,
    /// Incoming office holder
    Incoming,
    /// Administrator
    Admin,
}

impl Role {
    /// All roles, in declaration order
    pub const ALL: [Role; 5] = [
        Role::Advisor,
        Role::StudentLife,
        Role::Outgoing,
        Role::Incoming,
        Role::Admin,
    ];

    /// Wire identifier for this role
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Advisor => "advisor",
            Role::StudentLife => "studentlife",
            Role::Outgoing => "outgoing",
            Role::Incoming => "incoming",
            Role::Admin => "admin",
        }
    }

    /// Whether this is the administrator role
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == lowered)
            .ok_or_else(|| format!("unknown role: {s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse_roundtrip() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>(), Ok(role));
        }
        assert_eq!("StudentLife".parse::<Role>(), Ok(Role::StudentLife));
        assert!("treasurer".parse::<Role>().is_err());
    }

    #[test]
    fn test_role_wire_format() {
        let json = serde_json::to_string(&Role::StudentLife).unwrap();
        assert_eq!(json, "\"studentlife\"");
        let role: Role = serde_json::from_str("\"incoming\"").unwrap();
        assert_eq!(role, Role::Incoming);
    }

    #[test]
    fn test_only_admin_is_admin() {
        assert!(Role::Admin.is_admin());
        assert_eq!(Role::ALL.iter().filter(|r| r.is_admin()).count(), 1);
    }
}
