use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::services::auth::{AuthError, Principal};

/// Handler で Principal を受け取るための extractor
/// gate middleware が Principal を request.extensions() に insert 済みである前提
/// 見つからない場合は 401 (gate が掛かっていない route で使われた)
pub struct CurrentPrincipal(pub Principal);

impl<S> FromRequestParts<S> for CurrentPrincipal
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .map(CurrentPrincipal)
            .ok_or(AuthError::MissingCredential)
    }
}
