/*
 * Responsibility
 * - GET /logs (elevated gate), 監査ログを新しい順に返す
 */
use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};

use crate::{
    api::v1::dto::logs::LogsQuery, error::AppError, services::audit::AuditRecord,
    state::AppState,
};

pub async fn list_logs(
    State(state): State<AppState>,
    query: Result<Query<LogsQuery>, QueryRejection>,
) -> Result<Json<Vec<AuditRecord>>, AppError> {
    let Query(query) = query.map_err(|e| AppError::bad_request(e.body_text()))?;
    let records = state.audit.store().query(&query.to_query()).await?;
    Ok(Json(records))
}
