//! Waitlist relay: accepts `{name, email}` signups and forwards them to an operator configured webhook.

pub mod app;
pub mod config;
mod error;
pub mod web;
pub mod webhook_client;

pub use app::{serve, App, AppState};
pub use error::{Error, Result};
pub use webhook_client::{WebhookClient, WebhookRelay};

use tracing_subscriber::{fmt::format::FmtSpan, EnvFilter};

/// Human readable tracing for local development.
/// Honors `RUST_LOG`, defaults to `debug`.
pub fn init_dbg_tracing() {
    tracing_subscriber::fmt()
        .without_time()
        .with_span_events(FmtSpan::CLOSE)
        .with_target(false)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "debug".into()))
        .compact()
        .init();
}

/// JSON tracing for production, one object per line.
/// Honors `RUST_LOG`, defaults to `info`.
pub fn init_production_tracing() {
    tracing_subscriber::fmt()
        .json()
        .with_current_span(true)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();
}
