/*
 * Responsibility
 * - Authentication / authorization failures surfaced to callers
 * - IntoResponse: 401 / 403 with `{"error": "<message>"}`
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("missing Authorization header")]
    MissingCredential,
    #[error("invalid token")]
    InvalidCredential,
    #[error("token expired")]
    ExpiredCredential,
    #[error("admin only")]
    Forbidden,
}

impl AuthError {
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::MissingCredential
            | AuthError::InvalidCredential
            | AuthError::ExpiredCredential => StatusCode::UNAUTHORIZED,
            AuthError::Forbidden => StatusCode::FORBIDDEN,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}
