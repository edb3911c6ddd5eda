//! Layered application configuration.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use jiff::SignedDuration;
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::server::DEFAULT_MAX_BODY_BYTES;

/// The top-level configuration object.
///
/// # Loading
///
/// [`Config::load`] merges, lowest priority first:
///
/// 1. the defaults in [`Config::default`],
/// 2. `configuration/base.yml`, if it exists,
/// 3. environment variables prefixed with `APP_`.
///
/// Nested keys are joined with a double underscore, so `APP_SERVER__PORT=8080`
/// overrides [`ServerConfig::port`].
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct Config {
    pub server: ServerConfig,
    pub session: SessionConfig,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ServerConfig {
    pub ip: IpAddr,
    pub port: u16,
    /// Largest request body accepted, in bytes.
    pub max_body_bytes: usize,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.ip, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            ip: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 3000,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct SessionConfig {
    /// Name of the cookie carrying the session id.
    pub cookie_name: String,
    /// Whether the session cookie is marked `Secure` (HTTPS only).
    pub secure: bool,
    /// Idle time after which a session record expires, in seconds.
    pub ttl_seconds: u64,
    /// How often expired session records are swept, in seconds.
    pub cleanup_interval_seconds: u64,
}

impl SessionConfig {
    pub fn ttl(&self) -> SignedDuration {
        SignedDuration::from_secs(i64::try_from(self.ttl_seconds).unwrap_or(i64::MAX))
    }

    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval_seconds.max(1))
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: "chirp.sid".to_owned(),
            secure: false,
            ttl_seconds: 24 * 60 * 60,
            cleanup_interval_seconds: 60,
        }
    }
}

impl Config {
    pub fn load() -> Result<Config, Error> {
        Self::figment().extract().map_err(|e| Error::Config(Box::new(e)))
    }

    fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Yaml::file("configuration/base.yml"))
            .merge(Env::prefixed("APP_").split("__"))
    }
}
