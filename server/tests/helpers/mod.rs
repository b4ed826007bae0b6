//! Reusable test helpers for HTTP integration tests.
//!
//! Provides `TestApp` for building and sending requests through the full axum
//! router, plus Redis utilities for inspecting what a request wrote.
//!
//! ## Redis
//!
//! [`TestApp::offline`] uses a Redis client that never connects, so any
//! command sent through it stalls until the handler gives up on Redis. [`TestApp::with_redis`] connects to the test Redis from
//! [`Config::default_for_test`] and namespaces every key with a fresh prefix
//! so tests never see each other's jobs.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{self, Method, Request, Response};
use axum::Router;
use fred::prelude::*;
use http_body_util::BodyExt;
use tower::ServiceExt;
use uuid::Uuid;
use webhook_bridge::api::{create_router, AppState};
use webhook_bridge::config::Config;
use webhook_bridge::db;
use webhook_bridge::queue::KeySpace;

/// Path Telegram delivers updates for `bot_id` to.
pub fn webhook_path(bot_id: &str) -> String {
    format!("/telegram/bot/webhook/{bot_id}")
}

// ============================================================================
// Test App
// ============================================================================

/// A test application wrapping the full axum router.
pub struct TestApp {
    pub router: Router,
    pub redis: Client,
    pub config: Arc<Config>,
}

impl TestApp {
    /// Create a test app whose Redis client is never connected.
    pub fn offline(config: Config) -> Self {
        let redis = Client::new(fred::prelude::Config::default(), None, None, None);
        Self::build(redis, config)
    }

    /// Create a test app backed by the test Redis, with isolated key prefixes.
    pub async fn with_redis(config: Config) -> Self {
        let test_id = Uuid::new_v4().simple().to_string();
        let config = Config {
            queue_prefix: format!("test:{test_id}:database-"),
            horizon_prefix: format!("test:{test_id}:horizon:"),
            ..config
        };
        let redis = db::create_redis_client(
            &config.redis_url,
            config.redis_password.as_deref(),
            config.redis_timeout,
        )
        .await
        .expect("Failed to connect to test Redis");
        Self::build(redis, config)
    }

    fn build(redis: Client, config: Config) -> Self {
        let state = AppState::new(redis.clone(), config.clone());
        Self {
            router: create_router(state),
            redis,
            config: Arc::new(config),
        }
    }

    /// Build an HTTP request with the given method and URI.
    pub fn request(method: Method, uri: &str) -> http::request::Builder {
        Request::builder().method(method).uri(uri)
    }

    /// Send a request through the router via `tower::ServiceExt::oneshot`.
    pub async fn oneshot(&self, request: Request<Body>) -> Response<Body> {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("oneshot request failed")
    }

    /// POST an update for `bot_id`, optionally carrying the secret header.
    pub async fn post_update(
        &self,
        bot_id: &str,
        secret: Option<&str>,
        body: impl Into<Body>,
    ) -> Response<Body> {
        let mut builder = Self::request(Method::POST, &webhook_path(bot_id));
        if let Some(secret) = secret {
            builder = builder.header("X-Telegram-Bot-Api-Secret-Token", secret);
        }
        self.oneshot(builder.body(body.into()).unwrap()).await
    }

    /// Key namespaces this app writes under.
    pub fn keys(&self) -> KeySpace<'_> {
        KeySpace {
            queue_prefix: &self.config.queue_prefix,
            horizon_prefix: &self.config.horizon_prefix,
        }
    }

    /// All job payloads currently on the work queue, oldest first.
    pub async fn queued_payloads(&self) -> Vec<serde_json::Value> {
        let items: Vec<String> = self
            .redis
            .lrange(self.keys().queue_key(), 0, -1)
            .await
            .expect("Failed to LRANGE");
        items
            .iter()
            .map(|item| serde_json::from_str(item).expect("Queued payload is not JSON"))
            .collect()
    }

    /// Bookkeeping hash for a job.
    pub async fn job_record(&self, job_id: &str) -> HashMap<String, String> {
        self.redis
            .hgetall(self.keys().job_key(job_id))
            .await
            .expect("Failed to HGETALL")
    }

    /// Number of keys under this app's prefixes.
    pub async fn key_count(&self) -> usize {
        let mut count = 0;
        for prefix in [&self.config.queue_prefix, &self.config.horizon_prefix] {
            let keys: Vec<String> = self
                .redis
                .custom(fred::cmd!("KEYS"), vec![format!("{prefix}*")])
                .await
                .expect("Failed to KEYS");
            count += keys.len();
        }
        count
    }

    /// Delete every key this app wrote.
    pub async fn cleanup(&self) {
        for prefix in [&self.config.queue_prefix, &self.config.horizon_prefix] {
            let keys: Vec<String> = self
                .redis
                .custom(fred::cmd!("KEYS"), vec![format!("{prefix}*")])
                .await
                .unwrap_or_default();
            for key in keys {
                let _ = self.redis.del::<(), _>(key).await;
            }
        }
    }
}

/// Collect a response body into bytes.
pub async fn body_bytes(response: Response<Body>) -> bytes::Bytes {
    response
        .into_body()
        .collect()
        .await
        .expect("Failed to collect response body")
        .to_bytes()
}
