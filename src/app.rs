/*
 * Responsibility
 * - Config load → dependency build → Router assembly → axum::serve
 * - Middleware application order lives here
 */
use std::net::SocketAddr;
use std::sync::Arc;
use std::{panic, process};

use anyhow::Result;
use axum::Router;
use axum::middleware::{from_fn, from_fn_with_state};
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api;
use crate::config::Config;
use crate::middleware::{conditional, cors, http, rate_limit, security_headers};
use crate::services::auth::password::PasswordHasher;
use crate::services::auth::token::TokenService;
use crate::services::rate_limit::{MemoryRateLimiter, RateLimiter, ValkeyRateLimiter};
use crate::state::AppState;

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex: RUST_LOG=info,book_library_api=debug,tower_http=debug cargo run
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
        // Surface panics via tracing so they don't get lost when stderr is hidden.
        tracing::error!(?info, "panic");

        // Development fails fast; production keeps serving and relies on the
        // default hook's stderr output.
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env()?;
    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting API in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config).await?;

    sqlx::migrate!().run(&state.db).await?;

    let app = build_router(state, &config);
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

async fn build_state(config: &Config) -> Result<AppState> {
    let db = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .connect(&config.database_url)
        .await?;

    let tokens = Arc::new(TokenService::new(
        &config.jwt_secret,
        config.token_ttl_seconds,
    ));
    let passwords = PasswordHasher::new(config.bcrypt_cost);

    let rate_limiter: Arc<dyn RateLimiter> = match &config.rate_limit_redis_url {
        Some(url) => {
            let limiter = ValkeyRateLimiter::new(
                url,
                config.rate_limit_max_requests,
                config.rate_limit_window_seconds,
            )
            .await?;
            tracing::info!("rate limiting backed by valkey");
            Arc::new(limiter)
        }
        None => Arc::new(MemoryRateLimiter::new(
            config.rate_limit_max_requests,
            config.rate_limit_window_seconds,
        )),
    };

    Ok(AppState::new(db, tokens, passwords, rate_limiter))
}

fn build_router(state: AppState, config: &Config) -> Router {
    let router = api::routes(state.clone())
        .layer(from_fn_with_state(state.clone(), rate_limit::limit))
        .with_state(state);

    // Conditional GET wraps the handler chain so validators are always
    // computed from the final body bytes.
    let router = router.layer(from_fn(conditional::etag));

    let router = security_headers::apply(router);
    let router = cors::apply(router, config);
    http::apply(router)
}
