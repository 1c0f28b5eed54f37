/*
 * Responsibility
 * - Config読み込み → 依存生成 (gate / authority / audit store) → Router 組み立て
 * - Middleware の適用 (auth gate は routes 側, http 系はここ)
 * - axum::serve() で起動
 */
use std::{panic, process, sync::Arc};

use anyhow::{Context, Result};
use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api;
use crate::config::{AuditBackend, Config};
use crate::middleware::http::{self, HttpLimits};
use crate::repos::audit_repo::PgAuditStore;
use crate::services::audit::{AuditRecorder, AuditStore, MemoryAuditStore, RemoteAuditSink};
use crate::services::auth::{AuthGate, RoleResolver, TokenVerifier};
use crate::services::authority::AuthorityClient;
use crate::state::AppState;

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,access_guard::trust=warn,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    // Keep the default hook as a fallback (prints to stderr with location/payload).
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        tracing::error!(?info, "panic");

        // development: crash the whole process so we notice immediately.
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env().context("failed to load configuration")?;

    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting access-guard in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config).await?;
    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Build process-level services and inject them into the shared application state.
pub async fn build_state(config: &Config) -> Result<AppState> {
    let authority = AuthorityClient::new(
        config.guard.authority_base_url.clone(),
        config.guard.authority_timeout,
    )?;
    tracing::info!(authority = %authority.base_url(), "identity service client ready");

    let gate = AuthGate::new(
        TokenVerifier::new(&config.guard.jwt_secret),
        RoleResolver::new(Arc::new(authority.clone())),
    );

    let store = build_audit_store(config).await?;
    tracing::info!(backend = store.backend_name(), "audit store ready");

    Ok(AppState::new(gate, authority, AuditRecorder::new(store)))
}

async fn build_audit_store(config: &Config) -> Result<Arc<dyn AuditStore>> {
    let store: Arc<dyn AuditStore> = match &config.audit_backend {
        AuditBackend::Postgres { database_url } => {
            let pool = PgPoolOptions::new()
                .max_connections(5)
                .connect(database_url)
                .await
                .context("failed to connect to audit database")?;
            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .context("failed to run audit migrations")?;
            Arc::new(PgAuditStore::new(pool))
        }
        AuditBackend::Memory => Arc::new(MemoryAuditStore::new()),
        AuditBackend::Remote { url } => Arc::new(RemoteAuditSink::new(
            url.clone(),
            config.guard.authority_timeout,
        )?),
    };
    Ok(store)
}

pub fn build_router(state: AppState, config: &Config) -> Router {
    let router = Router::new()
        .nest("/api/v1", api::v1::routes(state.clone()))
        .with_state(state);

    http::apply(
        router,
        HttpLimits {
            timeout: config.request_timeout,
            body_limit_bytes: config.request_body_limit_bytes,
        },
    )
}
