use serde::Serialize;

/// Privilege level of a caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Standard,
    Elevated,
}

impl Role {
    /// Maps the role string served by the identity service.
    /// Only `"admin"` grants elevated privilege.
    pub fn from_authority(role: &str) -> Self {
        if role == "admin" {
            Role::Elevated
        } else {
            Role::Standard
        }
    }
}

/// Where the role on a [`Principal`] came from.
///
/// - `Baseline`: token verified, role not resolved (standard routes)
/// - `Authoritative`: answered by the identity service for this request
/// - `Degraded`: identity service unavailable, taken from the token's `is_admin` claim
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleSource {
    Baseline,
    Authoritative,
    Degraded,
}

/// Authenticated caller, built fresh per request and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Principal {
    pub id: i64,
    pub role: Role,
    pub role_source: RoleSource,
}

impl Principal {
    pub fn new(id: i64) -> Self {
        Self {
            id,
            role: Role::Standard,
            role_source: RoleSource::Baseline,
        }
    }

    pub fn is_elevated(&self) -> bool {
        self.role == Role::Elevated
    }
}
