//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::path::PathBuf;

use actix_web::cookie::{Key, SameSite};
use chrono_tz::Tz;

use crate::outbound::persistence::DbPool;

#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetrics;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) default_timezone: Tz,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) seed_file: Option<PathBuf>,
    #[cfg(feature = "metrics")]
    pub(crate) prometheus: Option<PrometheusMetrics>,
}

impl ServerConfig {
    /// Construct a server configuration from validated session settings.
    ///
    /// Storage defaults to the in-memory store and the display timezone
    /// for anonymous requests to UTC.
    ///
    /// # Examples
    /// ```
    /// use actix_web::cookie::{Key, SameSite};
    /// use roombook::server::ServerConfig;
    ///
    /// let config = ServerConfig::new(
    ///     Key::generate(),
    ///     true,
    ///     SameSite::Lax,
    ///     "127.0.0.1:8080".parse().unwrap(),
    /// )
    /// .with_default_timezone(chrono_tz::Europe::Warsaw);
    /// assert_eq!(config.default_timezone(), chrono_tz::Europe::Warsaw);
    /// ```
    #[must_use]
    pub fn new(key: Key, cookie_secure: bool, same_site: SameSite, bind_addr: SocketAddr) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            default_timezone: chrono_tz::UTC,
            db_pool: None,
            seed_file: None,
            #[cfg(feature = "metrics")]
            prometheus: None,
        }
    }

    /// Attach a database connection pool for persistence adapters.
    ///
    /// Without a pool every port is served from a process-local store that
    /// starts empty and is lost on shutdown.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Timezone used to read and render timestamps for anonymous requests.
    #[must_use]
    pub fn with_default_timezone(mut self, tz: Tz) -> Self {
        self.default_timezone = tz;
        self
    }

    /// JSON file of accounts registered before the listener starts.
    #[must_use]
    pub fn with_seed_file(mut self, path: Option<PathBuf>) -> Self {
        self.seed_file = path;
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }

    #[must_use]
    pub fn default_timezone(&self) -> Tz {
        self.default_timezone
    }

    #[cfg(feature = "metrics")]
    /// Attach Prometheus middleware to the configuration.
    #[must_use]
    pub fn with_metrics(mut self, prometheus: Option<PrometheusMetrics>) -> Self {
        self.prometheus = prometheus;
        self
    }

    #[cfg(feature = "metrics")]
    /// Return the configured Prometheus middleware, if any.
    #[must_use]
    pub fn metrics(&self) -> Option<&PrometheusMetrics> {
        self.prometheus.as_ref()
    }
}
