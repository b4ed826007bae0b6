//! Job Payload Construction
//!
//! A [`Job`] captures one accepted update; [`JobEnvelope`] is the JSON
//! payload the Laravel worker pops from the queue.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::command::serialize_command;
use super::{COMMAND_CLASS, JOB_TAGS, QUEUED_HANDLER};

/// An accepted webhook update waiting to be queued.
#[derive(Debug, Clone)]
pub struct Job {
    /// Job identifier (UUID v4)
    pub id: Uuid,
    /// Bot the update was delivered for
    pub bot_id: String,
    /// Raw update body, passed through untouched
    pub update: String,
    /// Time the request was received
    pub received_at: DateTime<Utc>,
}

impl Job {
    /// Create a job for an update received now.
    pub fn new(bot_id: impl Into<String>, update: impl Into<String>) -> Self {
        Self::received_at(bot_id, update, Utc::now())
    }

    /// Create a job for an update received at a known time.
    pub fn received_at(
        bot_id: impl Into<String>,
        update: impl Into<String>,
        received_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            bot_id: bot_id.into(),
            update: update.into(),
            received_at,
        }
    }

    /// Receipt time as fractional Unix seconds.
    pub fn received_at_secs(&self) -> f64 {
        self.received_at.timestamp_micros() as f64 / 1_000_000.0
    }

    /// Receipt time in the text form Horizon stores (`1718035200.1234`).
    pub fn pushed_at(&self) -> String {
        format!("{:.4}", self.received_at_secs())
    }

    /// Sorted-set score: newest jobs get the lowest score.
    pub fn score(&self) -> f64 {
        -self.received_at_secs()
    }

    /// Build the queue payload for this job.
    pub fn envelope(&self) -> JobEnvelope {
        let id = self.id.to_string();
        JobEnvelope {
            uuid: id.clone(),
            display_name: COMMAND_CLASS.to_owned(),
            job: QUEUED_HANDLER.to_owned(),
            max_tries: None,
            max_exceptions: None,
            fail_on_timeout: false,
            backoff: None,
            timeout: None,
            retry_until: None,
            data: CommandData {
                command_name: COMMAND_CLASS.to_owned(),
                command: serialize_command(
                    &self.bot_id,
                    &self.update,
                    self.received_at.timestamp(),
                ),
            },
            id,
            attempts: 0,
            tags: JOB_TAGS.iter().map(|t| (*t).to_owned()).collect(),
            silenced: false,
            pushed_at: self.pushed_at(),
        }
    }
}

/// Laravel queue payload for a queued command.
///
/// Unset retry controls serialize as explicit `null`; Laravel treats a
/// missing key differently from a null one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobEnvelope {
    pub uuid: String,
    pub display_name: String,
    pub job: String,
    pub max_tries: Option<u32>,
    pub max_exceptions: Option<u32>,
    pub fail_on_timeout: bool,
    pub backoff: Option<String>,
    pub timeout: Option<u32>,
    pub retry_until: Option<i64>,
    pub data: CommandData,
    /// Same value as `uuid`; Horizon looks jobs up by `id`.
    pub id: String,
    pub attempts: u32,
    pub tags: Vec<String>,
    pub silenced: bool,
    pub pushed_at: String,
}

/// The command half of the payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandData {
    pub command_name: String,
    /// PHP-serialized command object
    pub command: String,
}
