//! Enqueue Error Types

use std::time::Duration;

use thiserror::Error;

/// Errors raised while turning an update into a queued job.
#[derive(Debug, Error)]
pub enum EnqueueError {
    /// The request body cannot be embedded in a JSON payload.
    #[error("Update body is not valid UTF-8")]
    NonUtf8Body,

    /// JSON encoding of the job payload failed.
    #[error("Job payload encoding failed: {0}")]
    Encoding(#[from] serde_json::Error),

    /// The Redis transaction could not be applied.
    #[error("Redis transaction failed: {0}")]
    Redis(#[from] fred::error::Error),

    /// Redis did not answer the transaction in time.
    #[error("Redis transaction timed out after {0:?}")]
    Timeout(Duration),
}
