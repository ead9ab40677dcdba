//! Server construction and middleware wiring.
//!
//! Middleware order, outermost first: metrics (feature-gated), [`Trace`],
//! then on the `/api/v1` scope the session cookie layer and
//! [`UserTimezone`]. Health probes and Swagger UI sit outside the session.

mod config;
#[cfg(feature = "metrics")]
mod metrics;
mod seed;
mod settings;
mod state_builders;

pub use config::ServerConfig;
#[cfg(feature = "metrics")]
pub use metrics::{default_metrics, initialize_metrics};
pub use seed::{SeedError, seed_users};
pub use settings::{AppSettings, SettingsError};
pub use state_builders::{ServiceBundle, build_services, services_over};

#[cfg(feature = "metrics")]
use metrics::MetricsLayer;

use actix_session::{
    SessionMiddleware,
    config::{CookieContentSecurity, PersistentSession},
    storage::CookieSessionStore,
};
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use chrono_tz::Tz;
use tracing::info;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::inbound::http::health::{HealthState, live, ready};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::{configure_api, json_config, path_config, query_config};
use crate::middleware::{Trace, UserTimezone};

const SESSION_COOKIE: &str = "session";
const SESSION_TTL_HOURS: i64 = 2;

/// Everything one app instance needs; cloned into each worker.
#[derive(Clone)]
pub struct AppDependencies {
    pub health_state: web::Data<HealthState>,
    pub http_state: web::Data<HttpState>,
    pub key: Key,
    pub cookie_secure: bool,
    pub same_site: SameSite,
    pub default_timezone: Tz,
}

fn session_middleware(
    key: Key,
    cookie_secure: bool,
    same_site: SameSite,
) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name(SESSION_COOKIE.to_owned())
        .cookie_path("/".to_owned())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(same_site)
        .session_lifecycle(PersistentSession::default().session_ttl(
            actix_web::cookie::time::Duration::hours(SESSION_TTL_HOURS),
        ))
        .build()
}

/// Assemble the application: probes, the `/api/v1` scope and, in debug
/// builds, Swagger UI at `/docs`.
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use actix_web::cookie::{Key, SameSite};
/// use actix_web::web;
/// use roombook::domain::ports::FixturePasswordHasher;
/// use roombook::inbound::http::health::HealthState;
/// use roombook::outbound::memory::InMemoryStore;
/// use roombook::server::{AppDependencies, build_app, services_over};
///
/// let store = Arc::new(InMemoryStore::new());
/// let hasher = Arc::new(FixturePasswordHasher);
/// let bundle = services_over(store.clone(), store.clone(), store, hasher);
/// let app = build_app(AppDependencies {
///     health_state: web::Data::new(HealthState::new()),
///     http_state: web::Data::new(bundle.http_state),
///     key: Key::generate(),
///     cookie_secure: false,
///     same_site: SameSite::Lax,
///     default_timezone: chrono_tz::UTC,
/// });
/// ```
pub fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        key,
        cookie_secure,
        same_site,
        default_timezone,
    } = deps;

    let users = http_state.users.clone();
    let api = web::scope("/api/v1")
        .wrap(UserTimezone::new(users, default_timezone))
        .wrap(session_middleware(key, cookie_secure, same_site))
        .configure(configure_api);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .app_data(json_config())
        .app_data(query_config())
        .app_data(path_config())
        .wrap(Trace)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Wire services, apply the optional seed file and start listening.
///
/// Readiness is flipped once the listener is bound.
///
/// # Errors
/// Propagates [`std::io::Error`] when seeding, binding the socket or
/// starting the server fails.
pub async fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let services = build_services(&config);
    if let Some(path) = &config.seed_file {
        let created = seed_users(path, services.users.as_ref(), config.default_timezone)
            .await
            .map_err(std::io::Error::other)?;
        info!(created, path = %path.display(), "seed file applied");
    }
    let http_state = web::Data::new(services.http_state);
    let server_health_state = health_state.clone();
    let ServerConfig {
        key,
        cookie_secure,
        same_site,
        bind_addr,
        default_timezone,
        db_pool: _,
        seed_file: _,
        #[cfg(feature = "metrics")]
        prometheus,
    } = config;

    #[cfg(feature = "metrics")]
    let metrics_layer = MetricsLayer::from_option(prometheus);

    let server = HttpServer::new(move || {
        let app = build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            key: key.clone(),
            cookie_secure,
            same_site,
            default_timezone,
        });

        #[cfg(feature = "metrics")]
        let app = app.wrap(metrics_layer.clone());

        app
    })
    .bind(bind_addr)?
    .run();

    info!(%bind_addr, "listening");
    health_state.mark_ready();
    Ok(server)
}
