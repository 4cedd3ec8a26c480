//! Process configuration loaded via OrthoConfig.
//!
//! Values come from `ACCOUNTS_*` environment variables, configuration files
//! and command-line flags, merged by OrthoConfig. Cookie signing settings are
//! read separately; see [`crate::inbound::http::session_config`].

use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

/// Address the HTTP server binds to when none is configured.
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
/// Session lifetime when none is configured: fourteen days.
pub const DEFAULT_SESSION_TTL_SECS: u64 = 14 * 24 * 60 * 60;
/// Database pool size when none is configured.
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;

/// Errors raised while interpreting loaded settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// The bind address did not parse as `host:port`.
    #[error("invalid bind address `{value}`: {source}")]
    InvalidBindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
    /// A zero session lifetime would expire sessions immediately.
    #[error("session TTL must be at least one second")]
    ZeroSessionTtl,
}

/// Service settings.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "ACCOUNTS")]
pub struct AppSettings {
    /// Socket address for the HTTP listener.
    #[ortho_config(default = String::from(DEFAULT_BIND_ADDR))]
    pub bind_addr: String,
    /// PostgreSQL connection URL; an in-memory repository is used when unset.
    pub database_url: Option<String>,
    /// Redis connection URL; an in-memory session store is used when unset.
    pub redis_url: Option<String>,
    /// Session lifetime in seconds.
    #[ortho_config(default = DEFAULT_SESSION_TTL_SECS)]
    pub session_ttl_secs: u64,
    /// Upper bound on pooled database connections.
    #[ortho_config(default = DEFAULT_DB_MAX_CONNECTIONS)]
    pub db_max_connections: u32,
}

impl AppSettings {
    /// Parsed bind address; [`DEFAULT_BIND_ADDR`] unless configured.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        self.bind_addr
            .parse()
            .map_err(|source| SettingsError::InvalidBindAddr {
                value: self.bind_addr.clone(),
                source,
            })
    }

    /// Session lifetime; fourteen days unless configured.
    pub fn session_ttl(&self) -> Result<Duration, SettingsError> {
        match self.session_ttl_secs {
            0 => Err(SettingsError::ZeroSessionTtl),
            secs => Ok(Duration::from_secs(secs)),
        }
    }

    /// Upper bound on pooled database connections.
    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections
    }
}
