//! Audit store interface used by the recorder and the read endpoints.
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::repos::error::RepoError;

/// An append-only entry: who did what, when.
///
/// `actor_id` is `None` for system-initiated actions. It is a loose reference to the
/// identity service; nothing here checks that the user still exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct AuditRecord {
    pub id: i64,
    pub actor_id: Option<i64>,
    pub action: String,
    pub created_at: DateTime<Utc>,
}

/// Insert shape; the store assigns `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewAuditRecord {
    pub actor_id: Option<i64>,
    pub action: String,
    pub created_at: DateTime<Utc>,
}

/// Read filter. Results are newest first.
#[derive(Debug, Clone)]
pub struct AuditQuery {
    pub actor_id: Option<i64>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub limit: i64,
}

impl Default for AuditQuery {
    fn default() -> Self {
        Self {
            actor_id: None,
            from: None,
            to: None,
            limit: 100,
        }
    }
}

impl AuditQuery {
    pub(crate) fn matches(&self, record: &AuditRecord) -> bool {
        self.actor_id.is_none_or(|id| record.actor_id == Some(id))
            && self.from.is_none_or(|from| record.created_at >= from)
            && self.to.is_none_or(|to| record.created_at <= to)
    }
}

#[derive(Debug, Error)]
pub enum AuditError {
    #[error(transparent)]
    Repo(#[from] RepoError),
    #[error("remote audit sink request failed: {0}")]
    Remote(#[from] reqwest::Error),
    #[error("remote audit sink responded {0}")]
    RemoteStatus(u16),
    #[error("audit store unavailable: {0}")]
    Unavailable(String),
    #[error("{0} audit backend does not support reads")]
    Unsupported(&'static str),
}

/// Append-only audit storage. There is deliberately no update or delete.
///
/// Implementations must be cheap to share (`Arc<dyn AuditStore>`).
#[async_trait]
pub trait AuditStore: Send + Sync {
    // Backend name for logs.
    fn backend_name(&self) -> &'static str;

    async fn append(&self, record: &NewAuditRecord) -> Result<AuditRecord, AuditError>;

    async fn query(&self, query: &AuditQuery) -> Result<Vec<AuditRecord>, AuditError>;
}
