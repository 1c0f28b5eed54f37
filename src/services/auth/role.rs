use std::sync::Arc;

use tracing::{debug, warn};

use crate::services::auth::principal::{Role, RoleSource};
use crate::services::authority::RoleAuthority;

/// Outcome of a role lookup: the role plus how it was decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleResolution {
    pub role: Role,
    pub source: RoleSource,
}

/// Resolves the caller's current role, preferring the identity service.
///
/// Never fails:
/// - authority answered -> its answer is ground truth for this request
/// - authority failed -> fall back to the token's `is_admin` claim (absent = standard)
///
/// The fallback is a trust downgrade (the claim may be stale), so every degraded
/// decision is emitted on the `access_guard::trust` target for alerting.
#[derive(Clone)]
pub struct RoleResolver {
    authority: Arc<dyn RoleAuthority>,
}

impl std::fmt::Debug for RoleResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoleResolver").finish_non_exhaustive()
    }
}

impl RoleResolver {
    pub fn new(authority: Arc<dyn RoleAuthority>) -> Self {
        Self { authority }
    }

    pub async fn resolve(&self, subject_id: i64, embedded_admin: Option<bool>) -> RoleResolution {
        match self.authority.get_role(subject_id).await {
            Ok(role) => {
                debug!(subject_id, role = %role, "role resolved by authority");
                RoleResolution {
                    role: Role::from_authority(&role),
                    source: RoleSource::Authoritative,
                }
            }
            Err(err) => {
                let role = if embedded_admin == Some(true) {
                    Role::Elevated
                } else {
                    Role::Standard
                };
                warn!(
                    target: "access_guard::trust",
                    subject_id,
                    fallback_role = ?role,
                    embedded_claim = ?embedded_admin,
                    error = %err,
                    "authority unavailable; role taken from token claim"
                );
                RoleResolution {
                    role,
                    source: RoleSource::Degraded,
                }
            }
        }
    }
}
