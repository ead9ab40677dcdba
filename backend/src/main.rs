//! Backend entry-point: loads settings, prepares storage and serves the API.

use std::ffi::OsString;

use actix_web::web;
use mockable::DefaultEnv;
use ortho_config::OrthoConfig as _;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use roombook::inbound::http::health::HealthState;
use roombook::inbound::http::session_config::{BuildMode, session_settings_from_env};
#[cfg(feature = "metrics")]
use roombook::server::default_metrics;
use roombook::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use roombook::server::{AppSettings, ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load_from_iter([OsString::from("roombook")])
        .map_err(|e| std::io::Error::other(format!("failed to load settings: {e}")))?;
    let env = DefaultEnv::new();
    let session = session_settings_from_env(&env, BuildMode::from_debug_assertions())
        .map_err(std::io::Error::other)?;

    let config = ServerConfig::new(
        session.key,
        session.cookie_secure,
        session.same_site,
        settings.bind_addr().map_err(std::io::Error::other)?,
    )
    .with_default_timezone(settings.default_timezone().map_err(std::io::Error::other)?)
    .with_seed_file(settings.seed_file.clone());

    let config = match settings.database_url.as_deref() {
        Some(url) => config.with_db_pool(prepare_database(&settings, url).await?),
        None => config,
    };

    #[cfg(feature = "metrics")]
    let config = config.with_metrics(default_metrics());

    let health_state = web::Data::new(HealthState::new());
    create_server(health_state, config).await?.await
}

async fn prepare_database(settings: &AppSettings, url: &str) -> std::io::Result<DbPool> {
    if settings.run_migrations() {
        let migration_url = url.to_owned();
        tokio::task::spawn_blocking(move || run_pending_migrations(&migration_url))
            .await
            .map_err(std::io::Error::other)?
            .map_err(std::io::Error::other)?;
        info!("database migrations applied");
    }
    let max_size = settings.db_max_connections().map_err(std::io::Error::other)?;
    DbPool::new(PoolConfig::new(url).with_max_size(max_size))
        .await
        .map_err(|e| std::io::Error::other(e.into_message()))
}
