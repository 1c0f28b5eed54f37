/*
 * Responsibility
 * - アプリ共通の AppError 定義
 * - IntoResponse 実装 (HTTP status / `{"error": "<message>"}`)
 * - auth / authority / audit の各エラーを統一的に変換
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::services::audit::AuditError;
use crate::services::auth::AuthError;
use crate::services::authority::AuthorityError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("{resource} not found")]
    NotFound { resource: &'static str },
    #[error("{0}")]
    BadGateway(String),
    #[error("{0}")]
    NotImplemented(String),
    #[error("internal server error")]
    Internal,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn not_found(resource: &'static str) -> Self {
        Self::NotFound { resource }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Auth(e) => e.status(),
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::BadGateway(_) => StatusCode::BAD_GATEWAY,
            AppError::NotImplemented(_) => StatusCode::NOT_IMPLEMENTED,
            AppError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}

impl From<AuthorityError> for AppError {
    fn from(e: AuthorityError) -> Self {
        tracing::warn!(error = %e, "identity service call failed");
        AppError::BadGateway("identity service request failed".to_string())
    }
}

impl From<AuditError> for AppError {
    fn from(e: AuditError) -> Self {
        match e {
            AuditError::Unsupported(backend) => {
                AppError::NotImplemented(format!("{backend} audit backend does not support reads"))
            }
            other => {
                tracing::error!(error = %other, "audit read failed");
                AppError::Internal
            }
        }
    }
}
