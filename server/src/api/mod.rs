//! API Router and Application State
//!
//! Central routing configuration and shared state.

use axum::{extract::DefaultBodyLimit, Router};
use std::sync::Arc;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::{config::Config, queue::KeySpace, webhook};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Redis client
    pub redis: fred::clients::Client,
    /// Bridge configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(redis: fred::clients::Client, config: Config) -> Self {
        Self {
            redis,
            config: Arc::new(config),
        }
    }

    /// Key namespaces shared with the Laravel application.
    #[must_use]
    pub fn key_space(&self) -> KeySpace<'_> {
        KeySpace {
            queue_prefix: &self.config.queue_prefix,
            horizon_prefix: &self.config.horizon_prefix,
        }
    }
}

/// Create the main application router.
///
/// Every method and path reaches the webhook handler, which decides what to
/// ignore; there are no other routes. There is no request timeout layer: a
/// slow Redis is bounded by [`Config::redis_timeout`] inside the handler so
/// the caller is still answered `200 OK`.
pub fn create_router(state: AppState) -> Router {
    let max_body_size = state.config.max_body_size;
    let max_concurrent_requests = state.config.max_concurrent_requests;

    Router::new()
        .fallback(webhook::receive)
        // Middleware
        .layer(DefaultBodyLimit::max(max_body_size))
        .layer(TraceLayer::new_for_http())
        .layer(ConcurrencyLimitLayer::new(max_concurrent_requests))
        // State
        .with_state(state)
}
