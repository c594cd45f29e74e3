//! Tracing Setup
//!
//! Subscriber initialization for binaries and services embedding the
//! pipeline. Library code only emits via `tracing` macros; installing a
//! subscriber is the host's choice.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Install a formatted subscriber honoring `RUST_LOG`, falling back to the
/// given default filter (e.g. "info"). Safe to call once per process.
pub fn init(default_filter: &str) {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();
}
