use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::Serialize;
use tracing::error;

#[derive(Debug, Serialize)]
struct IssuedClaims {
    sub: i64,
    iat: i64,
    exp: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    is_admin: Option<bool>,
}

#[derive(Debug, thiserror::Error)]
#[error("failed to sign token: {0}")]
pub struct IssueError(#[from] jsonwebtoken::errors::Error);

/// Mints HS256 bearer tokens that [`TokenVerifier`](super::token::TokenVerifier) accepts.
///
/// Issuance belongs to the identity service; this exists for local tooling and tests.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    ttl_minutes: i64,
}

impl TokenIssuer {
    pub fn new(secret: &str, ttl_minutes: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            ttl_minutes,
        }
    }

    pub fn ttl_minutes(&self) -> i64 {
        self.ttl_minutes
    }

    pub fn issue(&self, subject: i64, is_admin: Option<bool>) -> Result<String, IssueError> {
        let now = Utc::now();
        let claims = IssuedClaims {
            sub: subject,
            iat: now.timestamp(),
            exp: (now + Duration::minutes(self.ttl_minutes)).timestamp(),
            is_admin,
        };

        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(
            |e| {
                error!(error = %e, "failed to sign JWT");
                IssueError(e)
            },
        )
    }
}
