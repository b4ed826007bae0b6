//! Webhook Handler
//!
//! Runs every inbound request through the gate and, when admitted, queues the
//! update. Callers only ever see `200 OK` unless the job cannot be encoded,
//! including when the Redis transaction fails or times out.

use axum::{
    extract::{rejection::BytesRejection, State},
    http::{HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use tracing::{debug, error, info};
use uuid::Uuid;

use super::gate::{self, Rejection};
use crate::api::AppState;
use crate::queue::{self, EnqueueError, EnqueuePlan, Job};

/// What happened to one webhook request.
#[derive(Debug)]
pub enum Outcome {
    /// The update was turned into a job.
    ///
    /// `persisted` is false when the Redis transaction failed; the caller is
    /// answered the same way either way.
    Accepted { job_id: Uuid, persisted: bool },

    /// The request was dropped without side effects.
    RejectedSilently(Rejection),

    /// The job could not be encoded; nothing was written.
    InternalError(EnqueueError),
}

impl IntoResponse for Outcome {
    fn into_response(self) -> Response {
        match self {
            Self::Accepted { .. } | Self::RejectedSilently(_) => StatusCode::OK.into_response(),
            Self::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        }
    }
}

/// Fallback handler receiving every request the bridge gets.
pub async fn receive(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Outcome {
    process(&state, &method, uri.path(), &headers, body).await
}

/// Gate, encode and enqueue one request.
pub async fn process(
    state: &AppState,
    method: &Method,
    path: &str,
    headers: &HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Outcome {
    let bot_id = match gate::admit(method, path, headers, state.config.secret_token.as_deref()) {
        Ok(bot_id) => bot_id,
        Err(reason) => return rejected(reason, path),
    };

    let body = match body {
        Ok(body) => body,
        Err(e) => {
            debug!(error = %e, "Failed to read webhook body");
            return rejected(Rejection::UnreadableBody, path);
        }
    };

    let update = match String::from_utf8(body.to_vec()) {
        Ok(update) => update,
        Err(_) => return internal_error(EnqueueError::NonUtf8Body, bot_id),
    };

    let job = Job::new(bot_id, update);
    let plan = match EnqueuePlan::new(&job, state.key_space()) {
        Ok(plan) => plan,
        Err(e) => return internal_error(e, bot_id),
    };

    let persisted = match queue::enqueue(&state.redis, &plan, state.config.redis_timeout).await {
        Ok(()) => {
            info!(
                job_id = %job.id,
                bot_id = %job.bot_id,
                queue_key = %plan.queue_key,
                "Job pushed to queue"
            );
            true
        }
        Err(e) => {
            error!(
                job_id = %job.id,
                bot_id = %job.bot_id,
                queue_key = %plan.queue_key,
                error = %e,
                "Redis transaction failed, update dropped"
            );
            false
        }
    };

    Outcome::Accepted {
        job_id: job.id,
        persisted,
    }
}

fn rejected(reason: Rejection, path: &str) -> Outcome {
    info!(
        reason = reason.as_str(),
        bot_id = gate::bot_id(path).unwrap_or_default(),
        path = %path,
        "Webhook request ignored: {}",
        reason
    );
    Outcome::RejectedSilently(reason)
}

fn internal_error(e: EnqueueError, bot_id: &str) -> Outcome {
    error!(bot_id = %bot_id, error = %e, "Job encoding failed");
    Outcome::InternalError(e)
}
