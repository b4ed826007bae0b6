//! Laravel Queue Integration
//!
//! Builds Laravel job payloads for incoming updates and pushes them onto the
//! Redis queue together with the bookkeeping Horizon reads for its dashboard.
//!
//! Key layout:
//! - `<queue_prefix>queues:<queue>` (list, RPUSH): the work queue.
//! - `<horizon_prefix>recent_jobs`, `<horizon_prefix>pending_jobs`
//!   (sorted sets, score = negated receipt time).
//! - `<horizon_prefix><job_id>` (hash, expires 60 minutes after receipt).

pub mod command;
pub mod envelope;
mod error;
pub mod writer;

pub use envelope::{CommandData, Job, JobEnvelope};
pub use error::EnqueueError;
pub use writer::{enqueue, EnqueuePlan, KeySpace};

/// Job class the worker instantiates from the serialized command.
pub const COMMAND_CLASS: &str = "App\\Jobs\\ProcessTelegramUpdate";

/// Laravel's handler entry point for queued commands.
pub const QUEUED_HANDLER: &str = "Illuminate\\Queue\\CallQueuedHandler@call";

/// Name of the Laravel queue connection the worker listens on.
pub const CONNECTION_NAME: &str = "redis";

/// Queue the worker consumes updates from.
pub const QUEUE_NAME: &str = "telegram-updates";

/// Tags Horizon shows for every update job.
pub const JOB_TAGS: [&str; 3] = ["telegram", "telegram-bot", "telegram-bot-update"];

/// Lifetime of the per-job bookkeeping hash, counted from receipt.
pub const BOOKKEEPING_TTL_SECS: i64 = 60 * 60;
