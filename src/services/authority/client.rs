//! Interface to the central identity service ("authority").
use async_trait::async_trait;
use thiserror::Error;

/// Failures talking to the identity service.
///
/// Kept independent from `AppError` so callers pick the policy:
/// the role resolver degrades, admin handlers answer 502.
#[derive(Debug, Error)]
pub enum AuthorityError {
    #[error("invalid authority url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("authority request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("authority responded {status}: {body}")]
    Status { status: u16, body: String },
    #[error("malformed authority response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl AuthorityError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, AuthorityError::Status { status: 404, .. })
    }
}

/// The one question the role resolver asks.
///
/// Split out from the full client so tests and other transports can stand in for it.
#[async_trait]
pub trait RoleAuthority: Send + Sync {
    // Current role string for the subject (`"admin"`, `"user"`, ...).
    async fn get_role(&self, subject_id: i64) -> Result<String, AuthorityError>;
}
