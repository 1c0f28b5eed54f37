/*
 * Responsibility
 * - audit_logs テーブル向け SQLx 操作 (INSERT / SELECT のみ)
 * - UPDATE / DELETE は持たない (append-only)
 */
use async_trait::async_trait;
use sqlx::PgPool;

use crate::repos::error::{RepoError, RepoResult};
use crate::services::audit::store::{
    AuditError, AuditQuery, AuditRecord, AuditStore, NewAuditRecord,
};

/// Postgres-backed audit store.
///
/// Schema (see `migrations/0001_create_audit_logs.sql`):
/// - audit_logs.id (bigserial)
/// - audit_logs.actor_id (bigint, nullable)
/// - audit_logs.action (text)
/// - audit_logs.created_at (timestamptz)
#[derive(Clone, Debug)]
pub struct PgAuditStore {
    pool: PgPool,
}

impl PgAuditStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, record: &NewAuditRecord) -> RepoResult<AuditRecord> {
        let row = sqlx::query_as::<_, AuditRecord>(
            r#"
            INSERT INTO audit_logs (actor_id, action, created_at)
            VALUES ($1, $2, $3)
            RETURNING id, actor_id, action, created_at
            "#,
        )
        .bind(record.actor_id)
        .bind(&record.action)
        .bind(record.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(RepoError::Db)?;

        Ok(row)
    }

    pub async fn list(&self, query: &AuditQuery) -> RepoResult<Vec<AuditRecord>> {
        let rows = sqlx::query_as::<_, AuditRecord>(
            r#"
            SELECT id, actor_id, action, created_at
            FROM audit_logs
            WHERE ($1::BIGINT IS NULL OR actor_id = $1)
                AND ($2::TIMESTAMPTZ IS NULL OR created_at >= $2)
                AND ($3::TIMESTAMPTZ IS NULL OR created_at <= $3)
            ORDER BY created_at DESC, id DESC
            LIMIT $4
            "#,
        )
        .bind(query.actor_id)
        .bind(query.from)
        .bind(query.to)
        .bind(query.limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}

#[async_trait]
impl AuditStore for PgAuditStore {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    async fn append(&self, record: &NewAuditRecord) -> Result<AuditRecord, AuditError> {
        Ok(self.insert(record).await?)
    }

    async fn query(&self, query: &AuditQuery) -> Result<Vec<AuditRecord>, AuditError> {
        Ok(self.list(query).await?)
    }
}
