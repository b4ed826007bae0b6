//! Telegram Webhook Endpoint
//!
//! Accepts update deliveries at `/telegram/bot/webhook/{bot_id}` and hands
//! them to the queue writer.

pub mod gate;
pub mod handler;

pub use gate::{Rejection, SECRET_HEADER, WEBHOOK_PATH_PREFIX};
pub use handler::{process, receive, Outcome};
