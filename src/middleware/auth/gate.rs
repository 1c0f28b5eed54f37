//! Bearer token gate → Principal を request extensions に入れる
//!
//! - Stage 1: `Authorization: Bearer <jwt>` を検証 (失敗なら 401, handler には到達しない)
//! - Stage 2: `Role::Elevated` が必要な route のみ identity service に role を問い合わせる (不足なら 403)
//!
//! 例：
//! ```ignore
//! let admin = Router::new().route("/users", get(list_users));
//! let admin = middleware::auth::gate::apply(admin, state.gate.clone(), Role::Elevated);
//! ```

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::{self, Next},
    response::Response,
};

use crate::services::auth::{AuthError, AuthGate, Role};

#[derive(Clone)]
struct GatePolicy {
    gate: AuthGate,
    required: Role,
}

/// Put every route already on `router` behind the gate with the given requirement.
///
/// Uses `route_layer`, so unmatched paths still answer 404 rather than 401.
pub fn apply<S>(router: Router<S>, gate: AuthGate, required: Role) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.route_layer(middleware::from_fn_with_state(
        GatePolicy { gate, required },
        gate_middleware,
    ))
}

async fn gate_middleware(
    State(policy): State<GatePolicy>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AuthError> {
    let authorization = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    let principal = match policy.gate.authorize(authorization, policy.required).await {
        Ok(principal) => principal,
        Err(err) => {
            tracing::warn!(
                error = %err,
                required = ?policy.required,
                path = %req.uri().path(),
                "request rejected by auth gate"
            );
            return Err(err);
        }
    };

    // middleware → extractor への受け渡し
    req.extensions_mut().insert(principal);

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::v1::extractors::CurrentPrincipal;
    use crate::services::auth::{RoleResolver, TokenIssuer, TokenVerifier};
    use crate::services::authority::{AuthorityError, RoleAuthority};
    use async_trait::async_trait;
    use axum::{Json, http::StatusCode, routing::get};
    use std::sync::Arc;
    use tower::ServiceExt;

    const SECRET: &str = "layer-secret";

    struct Unreachable;

    #[async_trait]
    impl RoleAuthority for Unreachable {
        async fn get_role(&self, _subject_id: i64) -> Result<String, AuthorityError> {
            Err(AuthorityError::Status {
                status: 502,
                body: String::new(),
            })
        }
    }

    async fn whoami(CurrentPrincipal(principal): CurrentPrincipal) -> Json<i64> {
        Json(principal.id)
    }

    fn app(required: Role) -> Router {
        let gate = AuthGate::new(
            TokenVerifier::new(SECRET),
            RoleResolver::new(Arc::new(Unreachable)),
        );
        apply(Router::new().route("/whoami", get(whoami)), gate, required)
    }

    fn request(authorization: Option<String>) -> Request<Body> {
        let mut builder = Request::builder().uri("/whoami");
        if let Some(value) = authorization {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn missing_header_is_401_with_json_error() {
        let res = app(Role::Standard).oneshot(request(None)).await.unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

        let body = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "missing Authorization header");
    }

    #[tokio::test]
    async fn principal_reaches_handler() {
        let token = TokenIssuer::new(SECRET, 5).issue(77, None).unwrap();
        let res = app(Role::Standard)
            .oneshot(request(Some(format!("Bearer {token}"))))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        let body = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"77");
    }

    #[tokio::test]
    async fn degraded_claim_admits_or_forbids() {
        let issuer = TokenIssuer::new(SECRET, 5);

        let admin = issuer.issue(1, Some(true)).unwrap();
        let res = app(Role::Elevated)
            .oneshot(request(Some(format!("Bearer {admin}"))))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        let plain = issuer.issue(2, None).unwrap();
        let res = app(Role::Elevated)
            .oneshot(request(Some(format!("Bearer {plain}"))))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn unknown_path_is_404_not_401() {
        let res = app(Role::Standard)
            .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}
