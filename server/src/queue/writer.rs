//! Queue and Bookkeeping Writer
//!
//! Pushes a job onto the Laravel queue and registers it with Horizon in a
//! single `MULTI`/`EXEC` transaction.

use std::time::Duration;

use fred::interfaces::{
    HashesInterface, KeysInterface, ListInterface, SortedSetsInterface, TransactionInterface,
};
use fred::prelude::*;
use tracing::debug;

use super::{
    EnqueueError, Job, BOOKKEEPING_TTL_SECS, COMMAND_CLASS, CONNECTION_NAME, QUEUE_NAME,
};

/// Status Horizon gives a job that has not been reserved yet.
const PENDING_STATUS: &str = "pending";

/// Key namespaces shared with the Laravel application.
#[derive(Debug, Clone, Copy)]
pub struct KeySpace<'a> {
    /// Laravel's Redis key prefix (e.g. "laravel-database-")
    pub queue_prefix: &'a str,
    /// Horizon's key prefix (e.g. "laravel_horizon:")
    pub horizon_prefix: &'a str,
}

impl KeySpace<'_> {
    /// List the worker pops jobs from.
    pub fn queue_key(&self) -> String {
        format!("{}queues:{QUEUE_NAME}", self.queue_prefix)
    }

    /// Sorted set behind Horizon's "recent jobs" view.
    pub fn recent_jobs_key(&self) -> String {
        format!("{}recent_jobs", self.horizon_prefix)
    }

    /// Sorted set behind Horizon's "pending jobs" view.
    pub fn pending_jobs_key(&self) -> String {
        format!("{}pending_jobs", self.horizon_prefix)
    }

    /// Per-job bookkeeping hash.
    pub fn job_key(&self, job_id: &str) -> String {
        format!("{}{job_id}", self.horizon_prefix)
    }
}

/// Every key, score and value one job writes, computed before touching Redis.
#[derive(Debug, Clone, PartialEq)]
pub struct EnqueuePlan {
    pub job_id: String,
    /// Negated receipt time, shared by both sorted sets
    pub score: f64,
    pub recent_jobs_key: String,
    pub pending_jobs_key: String,
    pub job_key: String,
    /// Bookkeeping hash fields, in write order
    pub record: Vec<(&'static str, String)>,
    /// Unix time the bookkeeping hash expires at
    pub expire_at: i64,
    pub queue_key: String,
    /// JSON job payload pushed onto the queue
    pub payload: String,
}

impl EnqueuePlan {
    /// Encode the job and lay out its writes.
    ///
    /// This is the only step that can fail before Redis is contacted.
    pub fn new(job: &Job, keys: KeySpace<'_>) -> Result<Self, EnqueueError> {
        let payload = serde_json::to_string(&job.envelope())?;
        let job_id = job.id.to_string();
        let pushed_at = job.pushed_at();

        let record = vec![
            ("id", job_id.clone()),
            ("connection", CONNECTION_NAME.to_owned()),
            ("queue", QUEUE_NAME.to_owned()),
            ("name", COMMAND_CLASS.to_owned()),
            ("status", PENDING_STATUS.to_owned()),
            ("payload", payload.clone()),
            ("created_at", pushed_at.clone()),
            ("updated_at", pushed_at),
        ];

        Ok(Self {
            score: job.score(),
            recent_jobs_key: keys.recent_jobs_key(),
            pending_jobs_key: keys.pending_jobs_key(),
            job_key: keys.job_key(&job_id),
            record,
            expire_at: job.received_at.timestamp() + BOOKKEEPING_TTL_SECS,
            queue_key: keys.queue_key(),
            payload,
            job_id,
        })
    }
}

/// Apply a plan atomically, giving up after `limit`.
///
/// Commands are queued in Horizon's order (recent, pending, hash, expiry,
/// push) and executed with `EXEC`. A failure or timeout leaves no guarantee
/// about which commands were applied.
pub async fn enqueue(
    redis: &Client,
    plan: &EnqueuePlan,
    limit: Duration,
) -> Result<(), EnqueueError> {
    tokio::time::timeout(limit, apply(redis, plan))
        .await
        .map_err(|_| EnqueueError::Timeout(limit))?
}

async fn apply(redis: &Client, plan: &EnqueuePlan) -> Result<(), EnqueueError> {
    let trx = redis.multi();

    trx.zadd::<(), _, _>(
        plan.recent_jobs_key.as_str(),
        None,
        None,
        false,
        false,
        (plan.score, plan.job_id.as_str()),
    )
    .await?;
    trx.zadd::<(), _, _>(
        plan.pending_jobs_key.as_str(),
        None,
        None,
        false,
        false,
        (plan.score, plan.job_id.as_str()),
    )
    .await?;
    trx.hset::<(), _, _>(plan.job_key.as_str(), plan.record.clone())
        .await?;
    trx.expire_at::<(), _>(plan.job_key.as_str(), plan.expire_at, None)
        .await?;
    trx.rpush::<(), _, _>(plan.queue_key.as_str(), plan.payload.as_str())
        .await?;

    trx.exec::<()>(true).await?;

    debug!(job_id = %plan.job_id, "Enqueue transaction applied");
    Ok(())
}
