/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - gate の要求レベルごとに Router を分けて route_layer で適用し, merge する
 *   - public:   /health
 *   - standard: /me
 *   - elevated: /users, /users/{id}/role, /users/{id}/activity, /logs
 */
use axum::{
    Router,
    routing::{get, patch},
};

use crate::api::v1::handlers::{
    health::health,
    logs::list_logs,
    me::me,
    users::{change_role, list_users, user_activity},
};
use crate::middleware::auth::gate;
use crate::services::auth::Role;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    let public = Router::new().route("/health", get(health));

    let standard = gate::apply(
        Router::new().route("/me", get(me)),
        state.gate.clone(),
        Role::Standard,
    );

    let elevated = gate::apply(
        Router::new()
            .route("/users", get(list_users))
            .route("/users/{user_id}/role", patch(change_role))
            .route("/users/{user_id}/activity", get(user_activity))
            .route("/logs", get(list_logs)),
        state.gate,
        Role::Elevated,
    );

    public.merge(standard).merge(elevated)
}
