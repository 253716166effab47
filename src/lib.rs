//! An HTTP service for creating, reading, updating, deleting and aggregating subscription records.
//!
//! Requests flow `web` → `manager` → `storage`: handlers decode JSON, the manager validates and
//! the storage runs parameterized SQL against the `subscriptions` table.

pub mod app;
pub mod config;
pub mod database;
mod error;
pub mod manager;
pub mod model;
pub mod storage;
mod utils;
pub mod web;

// re-exports
pub use app::{serve, App, AppState};
pub use error::{Error, Result};

use tracing_subscriber::{fmt::format::FmtSpan, EnvFilter};

/// Human readable logging for local development, honours `RUST_LOG` and defaults to `debug`.
pub fn init_dbg_tracing() {
    tracing_subscriber::fmt()
        .without_time()
        .with_span_events(FmtSpan::CLOSE)
        .with_target(false)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .compact()
        .init();
}

/// Plain, uncoloured logging for release builds, honours `RUST_LOG` and defaults to `info`.
pub fn init_production_tracing() {
    tracing_subscriber::fmt()
        .with_ansi(false)
        .with_target(true)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}
