use std::sync::Mutex;

use async_trait::async_trait;

use crate::services::audit::store::{
    AuditError, AuditQuery, AuditRecord, AuditStore, NewAuditRecord,
};

/// Process-local audit store (development, tests).
#[derive(Debug, Default)]
pub struct MemoryAuditStore {
    records: Mutex<Vec<AuditRecord>>,
}

impl MemoryAuditStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Vec<AuditRecord>>, AuditError> {
        self.records
            .lock()
            .map_err(|_| AuditError::Unavailable("memory store poisoned".into()))
    }
}

#[async_trait]
impl AuditStore for MemoryAuditStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn append(&self, record: &NewAuditRecord) -> Result<AuditRecord, AuditError> {
        let mut records = self.lock()?;
        let row = AuditRecord {
            id: records.len() as i64 + 1,
            actor_id: record.actor_id,
            action: record.action.clone(),
            created_at: record.created_at,
        };
        records.push(row.clone());
        Ok(row)
    }

    async fn query(&self, query: &AuditQuery) -> Result<Vec<AuditRecord>, AuditError> {
        let records = self.lock()?;
        let mut rows: Vec<AuditRecord> = records
            .iter()
            .filter(|r| query.matches(r))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        rows.truncate(query.limit.max(0) as usize);
        Ok(rows)
    }
}
