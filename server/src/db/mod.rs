//! Store Layer
//!
//! Redis connection shared by every request handler.

use std::time::Duration;

use anyhow::{Context, Result};
use fred::prelude::*;
use tracing::info;

/// Create the Redis client and wait for the first connection.
///
/// A non-empty `password` replaces any password embedded in `redis_url`.
/// Every command fails after `command_timeout` instead of waiting for a
/// connection, and dropped connections are re-established in the background.
/// Failing to connect is fatal to startup.
pub async fn create_redis_client(
    redis_url: &str,
    password: Option<&str>,
    command_timeout: Duration,
) -> Result<Client> {
    let config = redis_config(redis_url, password)?;
    let client = Client::new(
        config,
        Some(performance_config(command_timeout)),
        None,
        Some(reconnect_policy()),
    );
    client.connect();
    client
        .wait_for_connect()
        .await
        .context("Failed to connect to Redis")?;

    info!(command_timeout = ?command_timeout, "Connected to Redis");
    Ok(client)
}

/// Parse the connection URL and apply the password override.
fn redis_config(redis_url: &str, password: Option<&str>) -> Result<Config> {
    let mut config = Config::from_url(redis_url).context("Invalid REDIS_URL")?;
    if let Some(password) = password.filter(|p| !p.is_empty()) {
        config.password = Some(password.to_owned());
    }
    Ok(config)
}

fn performance_config(command_timeout: Duration) -> PerformanceConfig {
    PerformanceConfig {
        default_command_timeout: command_timeout,
        ..Default::default()
    }
}

/// Retry forever, backing off from 100ms up to 30s.
fn reconnect_policy() -> ReconnectPolicy {
    ReconnectPolicy::new_exponential(0, 100, 30_000, 2)
}
