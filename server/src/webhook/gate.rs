//! Webhook Request Gate
//!
//! Decides whether an inbound request is a Telegram webhook delivery this
//! bridge should enqueue.

use axum::http::{HeaderMap, Method};
use thiserror::Error;

/// Path prefix Telegram delivers updates to; the bot id follows it.
pub const WEBHOOK_PATH_PREFIX: &str = "/telegram/bot/webhook/";

/// Header Telegram echoes the webhook `secret_token` in.
pub const SECRET_HEADER: &str = "x-telegram-bot-api-secret-token";

/// Why a request was dropped without enqueueing anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("Request method is not POST")]
    MethodNotAllowed,

    #[error("Request path is not a webhook path")]
    PathMismatch,

    #[error("Bot id is empty")]
    EmptyBotId,

    #[error("Invalid secret token")]
    InvalidSecret,

    #[error("Request body could not be read")]
    UnreadableBody,
}

impl Rejection {
    /// Short machine-readable code for logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MethodNotAllowed => "method_not_allowed",
            Self::PathMismatch => "path_mismatch",
            Self::EmptyBotId => "empty_bot_id",
            Self::InvalidSecret => "invalid_secret",
            Self::UnreadableBody => "unreadable_body",
        }
    }
}

/// Check a request and return the bot id it targets.
///
/// The bot id is everything after [`WEBHOOK_PATH_PREFIX`], untrimmed. When
/// `secret` is set the [`SECRET_HEADER`] must match it exactly; a missing
/// header counts as a mismatch.
pub fn admit<'a>(
    method: &Method,
    path: &'a str,
    headers: &HeaderMap,
    secret: Option<&str>,
) -> Result<&'a str, Rejection> {
    if method != Method::POST {
        return Err(Rejection::MethodNotAllowed);
    }

    let bot_id = bot_id(path).ok_or(Rejection::PathMismatch)?;
    if bot_id.is_empty() {
        return Err(Rejection::EmptyBotId);
    }

    if let Some(secret) = secret {
        let provided = headers
            .get(SECRET_HEADER)
            .map(|v| v.as_bytes())
            .unwrap_or_default();
        if !secrets_match(secret.as_bytes(), provided) {
            return Err(Rejection::InvalidSecret);
        }
    }

    Ok(bot_id)
}

/// Bot id a webhook path targets, or `None` when it is not a webhook path.
pub fn bot_id(path: &str) -> Option<&str> {
    path.strip_prefix(WEBHOOK_PATH_PREFIX)
}

/// Byte-for-byte comparison that does not stop at the first difference.
fn secrets_match(expected: &[u8], provided: &[u8]) -> bool {
    expected.len() == provided.len()
        && expected
            .iter()
            .zip(provided)
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
}
