use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use url::Url;

use crate::services::audit::store::{
    AuditError, AuditQuery, AuditRecord, AuditStore, NewAuditRecord,
};

/// Ships audit records to a separate logging service over HTTP.
///
/// Same best-effort contract as the local stores; the recorder swallows failures.
/// The remote service owns the data, so reads are not served from here.
#[derive(Clone, Debug)]
pub struct RemoteAuditSink {
    http: reqwest::Client,
    endpoint: Url,
}

impl RemoteAuditSink {
    pub fn new(endpoint: Url, timeout: Duration) -> Result<Self, AuditError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http, endpoint })
    }
}

#[async_trait]
impl AuditStore for RemoteAuditSink {
    fn backend_name(&self) -> &'static str {
        "remote"
    }

    async fn append(&self, record: &NewAuditRecord) -> Result<AuditRecord, AuditError> {
        let resp = self
            .http
            .post(self.endpoint.clone())
            .json(&json!({
                "user_id": record.actor_id,
                "action": record.action,
                "timestamp": record.created_at,
            }))
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(AuditError::RemoteStatus(resp.status().as_u16()));
        }

        // The remote id is not part of its contract; 0 marks "assigned elsewhere".
        Ok(AuditRecord {
            id: 0,
            actor_id: record.actor_id,
            action: record.action.clone(),
            created_at: record.created_at,
        })
    }

    async fn query(&self, _query: &AuditQuery) -> Result<Vec<AuditRecord>, AuditError> {
        Err(AuditError::Unsupported("remote"))
    }
}
