/*
 * Responsibility
 * - /users 系 handler (elevated gate)
 * - 一覧と role 変更は identity service への proxy, 変更は監査ログに残す
 * - activity は監査ログから対象ユーザーの操作を読む
 */
use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
};

use crate::{
    api::v1::{
        dto::{
            logs::ActivityQuery,
            users::{ChangeRoleRequest, ChangeRoleResponse, ListUsersQuery, ListUsersResponse},
        },
        extractors::CurrentPrincipal,
    },
    error::AppError,
    services::audit::AuditRecord,
    state::AppState,
};

fn user_id(path: Result<Path<i64>, PathRejection>) -> Result<i64, AppError> {
    let Path(id) = path.map_err(|_| AppError::bad_request("user id must be an integer"))?;
    if id < 0 {
        return Err(AppError::bad_request("user id must not be negative"));
    }
    Ok(id)
}

pub async fn list_users(
    State(state): State<AppState>,
    query: Result<Query<ListUsersQuery>, QueryRejection>,
) -> Result<Json<ListUsersResponse>, AppError> {
    let Query(query) = query.map_err(|e| AppError::bad_request(e.body_text()))?;
    let (page_no, size) = (query.page(), query.size());

    let page = state
        .authority
        .list_users(page_no, size, &query.filters())
        .await?;

    Ok(Json(ListUsersResponse::new(page, page_no, size)))
}

pub async fn change_role(
    State(state): State<AppState>,
    CurrentPrincipal(actor): CurrentPrincipal,
    path: Result<Path<i64>, PathRejection>,
    body: Result<Json<ChangeRoleRequest>, JsonRejection>,
) -> Result<Json<ChangeRoleResponse>, AppError> {
    let target_id = user_id(path)?;
    let Json(req) = body.map_err(|e| AppError::bad_request(e.body_text()))?;
    req.validate().map_err(AppError::bad_request)?;

    let target = state.authority.get_user(target_id).await.map_err(|e| {
        if e.is_not_found() {
            AppError::not_found("user")
        } else {
            AppError::from(e)
        }
    })?;

    state.authority.update_role(target_id, &req.role).await?;

    // 監査の失敗はレスポンスに影響させない
    state.audit.record(
        Some(actor.id),
        format!(
            "changed role for user id={} from {} to {}",
            target_id, target.role, req.role
        ),
    );

    Ok(Json(ChangeRoleResponse {
        id: target_id,
        role: req.role,
    }))
}

pub async fn user_activity(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    query: Result<Query<ActivityQuery>, QueryRejection>,
) -> Result<Json<Vec<AuditRecord>>, AppError> {
    let target_id = user_id(path)?;
    let Query(query) = query.map_err(|e| AppError::bad_request(e.body_text()))?;
    let audit_query = query.to_query(target_id).map_err(AppError::bad_request)?;

    let records = state.audit.store().query(&audit_query).await?;

    Ok(Json(records))
}
