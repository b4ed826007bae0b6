//! Webhook Bridge
//!
//! Receives Telegram bot webhooks and enqueues each update as a Laravel job
//! on Redis, registered with Horizon, for an existing PHP worker to process.

pub mod api;
pub mod config;
pub mod db;
pub mod queue;
pub mod webhook;
