/*
 * Responsibility
 * - GET /me (standard gate)
 * - gate が作った Principal をそのまま返す
 */
use axum::Json;

use crate::api::v1::extractors::CurrentPrincipal;
use crate::services::auth::Principal;

pub async fn me(CurrentPrincipal(principal): CurrentPrincipal) -> Json<Principal> {
    Json(principal)
}
