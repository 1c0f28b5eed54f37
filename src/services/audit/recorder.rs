use std::sync::Arc;

use chrono::Utc;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::services::audit::store::{AuditStore, NewAuditRecord};

/// Fire-and-forget audit trail for privileged mutations.
///
/// `record` returns as soon as the append is spawned. The append:
/// - runs on its own tokio task, so it survives cancellation of the request that started it
/// - never reports failure to the caller; failures are logged and dropped (at most once)
///
/// The returned handle may be dropped; it only exists so tests can wait on the append.
#[derive(Clone)]
pub struct AuditRecorder {
    store: Arc<dyn AuditStore>,
}

impl std::fmt::Debug for AuditRecorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuditRecorder")
            .field("backend", &self.store.backend_name())
            .finish()
    }
}

impl AuditRecorder {
    pub fn new(store: Arc<dyn AuditStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn AuditStore> {
        &self.store
    }

    pub fn record(&self, actor_id: Option<i64>, action: impl Into<String>) -> JoinHandle<()> {
        let entry = NewAuditRecord {
            actor_id,
            action: action.into(),
            created_at: Utc::now(),
        };
        let store = Arc::clone(&self.store);

        tokio::spawn(async move {
            match store.append(&entry).await {
                Ok(record) => {
                    info!(
                        target: "access_guard::audit",
                        id = record.id,
                        actor_id = ?record.actor_id,
                        action = %record.action,
                        "audit recorded"
                    );
                }
                Err(err) => {
                    error!(
                        target: "access_guard::audit",
                        backend = store.backend_name(),
                        actor_id = ?entry.actor_id,
                        action = %entry.action,
                        error = %err,
                        "audit write failed"
                    );
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::audit::memory::MemoryAuditStore;
    use crate::services::audit::store::{AuditError, AuditQuery, AuditRecord};
    use async_trait::async_trait;

    struct BrokenStore;

    #[async_trait]
    impl AuditStore for BrokenStore {
        fn backend_name(&self) -> &'static str {
            "broken"
        }

        async fn append(&self, _record: &NewAuditRecord) -> Result<AuditRecord, AuditError> {
            Err(AuditError::Unavailable("disk on fire".into()))
        }

        async fn query(&self, _query: &AuditQuery) -> Result<Vec<AuditRecord>, AuditError> {
            Err(AuditError::Unavailable("disk on fire".into()))
        }
    }

    #[tokio::test]
    async fn record_appends_with_actor_and_timestamp() {
        let store = Arc::new(MemoryAuditStore::new());
        let recorder = AuditRecorder::new(store.clone());

        let before = Utc::now();
        recorder.record(Some(7), "created product id=1").await.unwrap();
        recorder.record(None, "nightly cleanup").await.unwrap();

        let rows = store.query(&AuditQuery::default()).await.unwrap();
        assert_eq!(rows.len(), 2);
        let created = rows.iter().find(|r| r.actor_id == Some(7)).unwrap();
        assert_eq!(created.action, "created product id=1");
        assert!(created.created_at >= before);
        assert!(rows.iter().any(|r| r.actor_id.is_none()));
    }

    #[tokio::test]
    async fn append_failure_is_swallowed() {
        let recorder = AuditRecorder::new(Arc::new(BrokenStore));
        // The task completes normally; the error never leaves the recorder.
        recorder.record(Some(1), "deleted project id=4").await.unwrap();
    }

    #[tokio::test]
    async fn dropped_handle_still_completes() {
        let store = Arc::new(MemoryAuditStore::new());
        let recorder = AuditRecorder::new(store.clone());

        drop(recorder.record(Some(3), "updated contact id=9"));

        for _ in 0..50 {
            if !store.query(&AuditQuery::default()).await.unwrap().is_empty() {
                return;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        panic!("detached audit append never landed");
    }
}
