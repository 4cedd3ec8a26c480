//! Backend entry-point: loads settings, connects adapters and serves GraphQL.

mod server;

use std::sync::Arc;

use actix_web::web;
use color_eyre::eyre::Context;
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use accounts::inbound::http::health::HealthState;
use accounts::inbound::http::session_config::{BuildMode, session_settings_from_env};
use accounts::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use accounts::outbound::session::RedisSessionStore;
use accounts::settings::AppSettings;

use server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load().wrap_err("load settings")?;
    let bind_addr = settings.bind_addr()?;
    let session = session_settings_from_env(
        &DefaultEnv::new(),
        BuildMode::from_debug_assertions(),
        settings.session_ttl()?,
    )
    .wrap_err("configure session cookies")?;

    let mut config = ServerConfig::new(session, bind_addr);

    if let Some(database_url) = settings.database_url.as_deref() {
        let applied = run_pending_migrations(database_url)
            .await
            .wrap_err("apply database migrations")?;
        info!(applied, "database migrations up to date");
        let pool = DbPool::new(
            PoolConfig::new(database_url).with_max_size(settings.db_max_connections()),
        )
        .await
        .wrap_err("create database pool")?;
        config = config.with_db_pool(pool);
    }

    if let Some(redis_url) = settings.redis_url.as_deref() {
        let store = RedisSessionStore::connect(redis_url)
            .await
            .wrap_err("connect to session store")?;
        config = config.with_session_store(Arc::new(store));
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config).wrap_err("start HTTP server")?;
    info!(%bind_addr, "listening");
    server.await.wrap_err("run HTTP server")
}
