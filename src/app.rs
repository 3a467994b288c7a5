/*
 * Responsibility
 * - tracing / panic hook の初期化
 * - Config読み込み → 依存生成 (TokenVerifier, StepUpGate, UserRepo) → Router 組み立て
 * - Middleware の適用 (CORS / HTTP)
 * - axum::serve() で起動
 */
use std::{panic, process};

use anyhow::{Context, Result};
use axum::Router;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::middleware;
use crate::repos::user_repo::UserRepo;
use crate::services::auth::{build_step_up_gate, build_token_verifier};
use crate::state::AppState;
use crate::api;

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,stepup_gateway=debug,tower_http=debug cargo run
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

        // In development, fail fast so we notice immediately.
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
        "starting API in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config)?;
    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn build_state(config: &Config) -> Result<AppState> {
    // Process-level services, built once and shared read-only via Arc.
    let auth = build_token_verifier(config).context("failed to build access token verifier")?;

    let step_up = build_step_up_gate(config, api::v1::step_up_routes())
        .context("failed to build step-up gate")?;
    if step_up.routes().is_empty() {
        tracing::warn!("no routes require step-up authentication");
    }
    tracing::info!(
        issuer = %config.auth_issuer_uri,
        client_id = %config.auth_client_id,
        "step-up gate ready"
    );

    Ok(AppState::new(UserRepo::seeded(), auth, step_up))
}

pub fn build_router(state: AppState, config: &Config) -> Router {
    let router = Router::new()
        .nest(api::v1::PREFIX, api::v1::routes(state.clone()))
        .with_state(state);

    let router = middleware::cors::apply(router, config);
    middleware::http::apply(router)
}
