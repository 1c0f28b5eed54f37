#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use access_guard::app::{build_router, build_state};
use access_guard::config::Config;
use access_guard::services::audit::{AuditRecorder, AuditStore};
use access_guard::services::auth::TokenIssuer;
use access_guard::state::AppState;
use axum::{
    Json, Router,
    body::Body,
    extract::{Path, Query, State},
    http::{Request, StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::{Value, json};

pub const SECRET: &str = "integration-secret";

/// In-process stand-in for the identity service.
#[derive(Clone, Default)]
pub struct StubAuthority {
    pub roles: Arc<Mutex<HashMap<i64, String>>>,
    pub role_lookups: Arc<AtomicUsize>,
    pub last_list_query: Arc<Mutex<Option<HashMap<String, String>>>>,
}

impl StubAuthority {
    pub fn with_users(users: &[(i64, &str)]) -> Self {
        let stub = Self::default();
        {
            let mut roles = stub.roles.lock().unwrap();
            for (id, role) in users {
                roles.insert(*id, role.to_string());
            }
        }
        stub
    }

    pub fn role_of(&self, id: i64) -> Option<String> {
        self.roles.lock().unwrap().get(&id).cloned()
    }

    pub fn lookups(&self) -> usize {
        self.role_lookups.load(Ordering::SeqCst)
    }

    /// Serve on an ephemeral port and return its base URL.
    pub async fn spawn(self) -> String {
        let app = Router::new()
            .route(
                "/api/v1/internal/users/{id}/role",
                get(get_role).patch(patch_role),
            )
            .route("/api/v1/internal/users/{id}", get(get_user))
            .route("/api/v1/users", get(list_users))
            .with_state(self);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(json!({"error": "user not found"}))).into_response()
}

async fn get_role(State(stub): State<StubAuthority>, Path(id): Path<i64>) -> Response {
    stub.role_lookups.fetch_add(1, Ordering::SeqCst);
    match stub.role_of(id) {
        Some(role) => Json(json!({"data": {"id": id, "role": role}})).into_response(),
        None => not_found(),
    }
}

async fn get_user(State(stub): State<StubAuthority>, Path(id): Path<i64>) -> Response {
    match stub.role_of(id) {
        Some(role) => Json(json!({"data": {
            "id": id,
            "email": format!("user{id}@example.com"),
            "full_name": format!("User {id}"),
            "role": role,
        }}))
        .into_response(),
        None => not_found(),
    }
}

async fn patch_role(
    State(stub): State<StubAuthority>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    let role = body["role"].as_str().unwrap_or_default().to_string();
    let mut roles = stub.roles.lock().unwrap();
    match roles.get_mut(&id) {
        Some(current) => {
            *current = role.clone();
            Json(json!({"data": {"id": id, "role": role}})).into_response()
        }
        None => not_found(),
    }
}

async fn list_users(
    State(stub): State<StubAuthority>,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Value> {
    *stub.last_list_query.lock().unwrap() = Some(query);
    let roles = stub.roles.lock().unwrap();
    let mut items: Vec<Value> = roles
        .iter()
        .map(|(id, role)| json!({"id": id, "email": format!("user{id}@example.com"), "full_name": "", "role": role}))
        .collect();
    items.sort_by_key(|v| v["id"].as_i64());
    Json(json!({"data": {"total": items.len(), "items": items}}))
}

/// A base URL nothing is listening on.
pub async fn unreachable_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

pub fn config(authority_url: &str, audit_backend: &str) -> Config {
    let env: HashMap<&str, String> = HashMap::from([
        ("JWT_SECRET", SECRET.to_string()),
        ("AUTH_SERVICE_URL", authority_url.to_string()),
        ("AUTH_SERVICE_TIMEOUT_SECONDS", "2".to_string()),
        ("AUDIT_BACKEND", audit_backend.to_string()),
        ("AUDIT_REMOTE_URL", format!("{authority_url}/api/logs")),
    ]);
    Config::from_lookup(|key| env.get(key).cloned()).unwrap()
}

/// Router wired like production, optionally with a custom audit store.
pub async fn app(authority_url: &str, store: Option<Arc<dyn AuditStore>>) -> Router {
    let config = config(authority_url, "memory");
    let mut state = build_state(&config).await.unwrap();
    if let Some(store) = store {
        state = AppState::new(state.gate, state.authority, AuditRecorder::new(store));
    }
    build_router(state, &config)
}

pub fn token(sub: i64, is_admin: Option<bool>) -> String {
    TokenIssuer::new(SECRET, 5).issue(sub, is_admin).unwrap()
}

pub fn request(method: &str, uri: &str, bearer: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = bearer {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn json_body(res: Response) -> Value {
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
