//! Server configuration.
//!
//! Everything is read from `QPG_*` environment variables once, at startup. `QPG_DATABASE_URL` and `QPG_SERVER_KEY`
//! are required; the server refuses to start without them. Everything else has a sensible default.
use std::env;

use log::*;
use qpg_common::{parse_boolean_flag, require_non_empty, Secret};

use crate::errors::ServerError;

const DEFAULT_QPG_HOST: &str = "127.0.0.1";
const DEFAULT_QPG_PORT: u16 = 8370;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// The sqlx connection URL. Credentials, if the store needs any, are part of the URL.
    pub database_url: String,
    pub db_max_connections: u32,
    /// The key shared with the payment gateway, used to verify notification signatures.
    pub server_key: Secret<String>,
    /// If true, the X-Forwarded-For header will be used to determine the client's IP address, rather than the
    /// connection's remote address.
    pub use_x_forwarded_for: bool,
    /// If true, the Forwarded header will be used to determine the client's IP address, rather than the
    /// connection's remote address.
    pub use_forwarded: bool,
}

/// The subset of the configuration that route handlers need to identify callers behind a reverse proxy.
#[derive(Clone, Copy, Debug, Default)]
pub struct ProxyConfig {
    pub use_x_forwarded_for: bool,
    pub use_forwarded: bool,
}

impl ServerConfig {
    pub fn try_from_env() -> Result<Self, ServerError> {
        Self::try_from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup, so that it can be tested without touching the
    /// process environment.
    pub fn try_from_lookup<F>(lookup: F) -> Result<Self, ServerError>
    where F: Fn(&str) -> Option<String> {
        let database_url = require_non_empty(lookup("QPG_DATABASE_URL")).ok_or_else(|| {
            ServerError::ConfigurationError(
                "QPG_DATABASE_URL is not set. Please set it to the URL for the QPG database.".into(),
            )
        })?;
        let server_key = require_non_empty(lookup("QPG_SERVER_KEY")).map(Secret::new).ok_or_else(|| {
            ServerError::ConfigurationError(
                "QPG_SERVER_KEY is not set. Please set it to the server key issued by the payment gateway.".into(),
            )
        })?;
        let host = require_non_empty(lookup("QPG_HOST")).unwrap_or_else(|| DEFAULT_QPG_HOST.into());
        let port = lookup("QPG_PORT")
            .map(|s| {
                s.trim().parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for QPG_PORT. {e} Using the default, {DEFAULT_QPG_PORT}, instead."
                    );
                    DEFAULT_QPG_PORT
                })
            })
            .unwrap_or(DEFAULT_QPG_PORT);
        let db_max_connections = lookup("QPG_DB_MAX_CONNECTIONS")
            .map(|s| match s.trim().parse::<u32>() {
                Ok(n) if n > 0 => n,
                _ => {
                    warn!(
                        "🪛️ Invalid configuration value for QPG_DB_MAX_CONNECTIONS ({s}). Using the default of \
                         {DEFAULT_DB_MAX_CONNECTIONS}."
                    );
                    DEFAULT_DB_MAX_CONNECTIONS
                },
            })
            .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS);
        let use_x_forwarded_for = parse_boolean_flag(lookup("QPG_USE_X_FORWARDED_FOR"), false);
        let use_forwarded = parse_boolean_flag(lookup("QPG_USE_FORWARDED"), false);
        Ok(Self {
            host,
            port,
            database_url,
            db_max_connections,
            server_key,
            use_x_forwarded_for,
            use_forwarded,
        })
    }

    pub fn proxy_config(&self) -> ProxyConfig {
        ProxyConfig { use_x_forwarded_for: self.use_x_forwarded_for, use_forwarded: self.use_forwarded }
    }
}
