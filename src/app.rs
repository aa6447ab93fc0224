/*
 * Responsibility
 * - tracing / panic hook setup
 * - Config → dependencies (PgPool, identity client, route policy) → Router
 * - middleware order and axum::serve()
 */
use std::{panic, process, sync::Arc};

use anyhow::{Context, Result};
use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    api,
    config::Config,
    middleware,
    services::auth::{IdentityClient, build_identity_client},
    state::AppState,
};
use crate::middleware::auth::RoutePolicy;

fn init_tracing() {
    // RUST_LOG wins, e.g. RUST_LOG=info,materials_api=debug,tower_http=debug
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        tracing::error!(?info, "panic");

        // development: crash loudly; production: keep serving
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env().context("loading configuration")?;
    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting materials API in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let db = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await
        .context("connecting to postgres")?;

    if config.run_migrations {
        sqlx::migrate!()
            .run(&db)
            .await
            .context("running database migrations")?;
    }

    let identity = build_identity_client(&config.auth).await?;
    let policy = Arc::new(RoutePolicy::materials_api().context("building route policy")?);

    let app = build_router(AppState::new(db), identity, policy, &config);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("binding {}", config.addr))?;
    axum::serve(listener, app).await.context("serving http")?;

    Ok(())
}

pub fn build_router(
    state: AppState,
    identity: Arc<dyn IdentityClient>,
    policy: Arc<RoutePolicy>,
    config: &Config,
) -> Router {
    let router = api::routes().with_state(state);

    // inner → outer
    let router = middleware::auth::apply(router, identity, policy);
    let router = middleware::security_headers::apply(router);
    let router = middleware::cors::apply(router, config);
    middleware::http::apply(router)
}
