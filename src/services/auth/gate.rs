use crate::services::auth::error::AuthError;
use crate::services::auth::principal::{Principal, Role};
use crate::services::auth::role::RoleResolver;
use crate::services::auth::token::TokenVerifier;

/// Two-stage request gate: authenticate, then (if required) authorize.
///
/// Stage 1 always runs first and a failure there ends the request;
/// the identity service is only consulted for routes that require `Elevated`.
#[derive(Clone, Debug)]
pub struct AuthGate {
    verifier: TokenVerifier,
    resolver: RoleResolver,
}

impl AuthGate {
    pub fn new(verifier: TokenVerifier, resolver: RoleResolver) -> Self {
        Self { verifier, resolver }
    }

    pub async fn authorize(
        &self,
        authorization: Option<&str>,
        required: Role,
    ) -> Result<Principal, AuthError> {
        let verified = self.verifier.verify_header(authorization)?;
        let mut principal = verified.principal;

        if required == Role::Elevated {
            let resolution = self
                .resolver
                .resolve(principal.id, verified.embedded_admin)
                .await;
            principal.role = resolution.role;
            principal.role_source = resolution.source;

            if !principal.is_elevated() {
                return Err(AuthError::Forbidden);
            }
        }

        Ok(principal)
    }
}
