//! User roles and their permission order.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when a role string is not one of the known roles.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid role: {0} (expected admin, editor or consultor)")]
pub struct RoleParseError(pub String);

/// Dashboard role with an explicit permission order.
///
/// `Consultor < Editor < Admin`. A role satisfies a requirement when it is at
/// least as privileged, so every role check goes through [`Role::satisfies`]
/// instead of comparing strings.
///
/// ```
/// use ruta_segura_core::Role;
///
/// assert!(Role::Admin.satisfies(Role::Editor));
/// assert!(!Role::Consultor.satisfies(Role::Editor));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Read-only access to records and analytics.
    #[serde(alias = "consultant")]
    Consultor,
    /// May create and edit accidents, avenues and crime reports.
    Editor,
    /// Everything, including user management.
    Admin,
}

impl Role {
    /// All roles, least privileged first.
    pub const ALL: [Self; 3] = [Self::Consultor, Self::Editor, Self::Admin];

    /// Whether this role grants at least the permissions of `required`.
    #[must_use]
    pub fn satisfies(self, required: Self) -> bool {
        self >= required
    }

    /// Wire name used by the backend.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Consultor => "consultor",
            Self::Editor => "editor",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = RoleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "consultor" | "consultant" => Ok(Self::Consultor),
            "editor" => Ok(Self::Editor),
            "admin" => Ok(Self::Admin),
            _ => Err(RoleParseError(s.to_owned())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_satisfies_is_the_partial_order() {
        for held in Role::ALL {
            for required in Role::ALL {
                let expected = Role::ALL.iter().position(|r| *r == held)
                    >= Role::ALL.iter().position(|r| *r == required);
                assert_eq!(held.satisfies(required), expected, "{held} vs {required}");
            }
        }
    }

    #[test]
    fn test_parse_accepts_aliases_and_case() {
        assert_eq!("ADMIN".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!("consultant".parse::<Role>().unwrap(), Role::Consultor);
        assert!("superuser".parse::<Role>().is_err());
    }

    #[test]
    fn test_serde_wire_names() {
        assert_eq!(serde_json::to_string(&Role::Consultor).unwrap(), "\"consultor\"");
        let role: Role = serde_json::from_str("\"consultant\"").unwrap();
        assert_eq!(role, Role::Consultor);
        assert!(serde_json::from_str::<Role>("\"root\"").is_err());
    }
}
