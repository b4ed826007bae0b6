//! Bridge Configuration
//!
//! Loads configuration from environment variables once at startup. The
//! resulting [`Config`] is immutable and shared behind an `Arc`.

use std::env;
use std::fmt;
use std::time::Duration;

use anyhow::{Context, Result};

/// Horizon's own default key namespace.
pub const DEFAULT_HORIZON_PREFIX: &str = "laravel_horizon:";

/// Suffix appended to `APP_NAME` when deriving the queue key namespace.
const QUEUE_PREFIX_SUFFIX: &str = "-database-";

/// Application name used when `APP_NAME` is not set.
const DEFAULT_APP_NAME: &str = "laravel";

/// Bridge configuration loaded from environment variables.
#[derive(Clone)]
pub struct Config {
    /// TCP port the HTTP listener binds to on all interfaces
    pub listen_port: u16,

    /// Redis connection URL
    pub redis_url: String,

    /// Redis password, overriding any password embedded in the URL
    pub redis_password: Option<String>,

    /// Shared webhook secret compared against the Telegram secret header
    pub secret_token: Option<String>,

    /// Namespace for the work queue list key (e.g. "laravel-database-")
    pub queue_prefix: String,

    /// Namespace for Horizon bookkeeping keys (e.g. "laravel_horizon:")
    pub horizon_prefix: String,

    /// Upper bound on one Redis command or transaction
    pub redis_timeout: Duration,

    /// Maximum number of requests processed concurrently
    pub max_concurrent_requests: usize,

    /// Maximum accepted request body size in bytes (default: 1MB)
    pub max_body_size: usize,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Empty values are treated the same as unset ones.
    pub fn from_env() -> Result<Self> {
        let listen_port = match var("LISTEN_PORT") {
            Some(port) => port
                .parse()
                .with_context(|| format!("LISTEN_PORT must be a port number, got {port:?}"))?,
            None => 8080,
        };

        Ok(Self {
            listen_port,
            redis_url: var("REDIS_URL").unwrap_or_else(|| "redis://localhost:6379".into()),
            redis_password: var("REDIS_PASSWORD"),
            secret_token: var("SECRET_TOKEN"),
            queue_prefix: var("REDIS_PREFIX")
                .unwrap_or_else(|| default_queue_prefix(var("APP_NAME").as_deref())),
            horizon_prefix: var("HORIZON_PREFIX").unwrap_or_else(|| DEFAULT_HORIZON_PREFIX.into()),
            redis_timeout: Duration::from_secs(parsed_var("REDIS_TIMEOUT_SECS").unwrap_or(5)),
            max_concurrent_requests: parsed_var("MAX_CONCURRENT_REQUESTS").unwrap_or(10_000),
            max_body_size: parsed_var("MAX_BODY_SIZE").unwrap_or(1024 * 1024),
        })
    }

    /// Address the HTTP listener binds to.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("0.0.0.0:{}", self.listen_port)
    }

    /// Check if webhook requests must carry the shared secret.
    #[must_use]
    pub const fn has_secret(&self) -> bool {
        self.secret_token.is_some()
    }

    /// Create a default configuration for testing.
    ///
    /// Uses a local Redis test container:
    /// `docker run -d --name bridge-test-redis -e ALLOW_EMPTY_PASSWORD=yes -p 6380:6379 bitnami/redis:latest`
    #[must_use]
    pub fn default_for_test() -> Self {
        Self {
            listen_port: 8080,
            redis_url: "redis://localhost:6380".into(),
            redis_password: None,
            secret_token: None,
            queue_prefix: "test-database-".into(),
            horizon_prefix: "test_horizon:".into(),
            redis_timeout: Duration::from_secs(5),
            max_concurrent_requests: 100,
            max_body_size: 1024 * 1024,
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("listen_port", &self.listen_port)
            .field("redis_url", &self.redis_url)
            .field("redis_password", &self.redis_password.as_ref().map(|_| "[redacted]"))
            .field("secret_token", &self.secret_token.as_ref().map(|_| "[redacted]"))
            .field("queue_prefix", &self.queue_prefix)
            .field("horizon_prefix", &self.horizon_prefix)
            .field("redis_timeout", &self.redis_timeout)
            .field("max_concurrent_requests", &self.max_concurrent_requests)
            .field("max_body_size", &self.max_body_size)
            .finish()
    }
}

/// Derive Laravel's queue key namespace from the application name.
fn default_queue_prefix(app_name: Option<&str>) -> String {
    format!("{}{QUEUE_PREFIX_SUFFIX}", app_name.unwrap_or(DEFAULT_APP_NAME))
}

fn var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.is_empty())
}

fn parsed_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    var(name).and_then(|v| v.parse().ok())
}
