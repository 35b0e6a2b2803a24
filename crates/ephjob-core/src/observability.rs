//! Observability infrastructure for ephjob.
//!
//! Structured logging with consistent spans. This module provides the
//! initialization helper and span constructors used across the controller
//! process; the trigger layer itself only emits events into whatever
//! subscriber the embedding process installed.

use std::sync::Once;
use tracing::Span;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

static INIT: Once = Once::new();

/// Log output format.
#[derive(Debug, Clone, Copy, Default)]
pub enum LogFormat {
    /// JSON structured logs (for production).
    Json,
    /// Pretty-printed logs (for development).
    #[default]
    Pretty,
}

/// Initializes the logging subsystem.
///
/// Call once at process startup. Safe to call multiple times; subsequent
/// calls are no-ops.
///
/// # Environment Variables
///
/// - `RUST_LOG`: Controls log levels (e.g., `info`, `ephjob_watch=debug`)
///
/// # Example
///
/// ```rust
/// use ephjob_core::observability::{init_logging, LogFormat};
///
/// init_logging(LogFormat::Pretty);
/// ```
pub fn init_logging(format: LogFormat) {
    INIT.call_once(|| {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        match format {
            LogFormat::Json => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(fmt::layer().json())
                    .init();
            }
            LogFormat::Pretty => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(fmt::layer().pretty())
                    .init();
            }
        }
    });
}

/// Creates a span for watch-event classification with standard fields.
///
/// # Example
///
/// ```rust
/// use ephjob_core::observability::watch_span;
///
/// let span = watch_span("update", "pod", "debug");
/// let _guard = span.enter();
/// // ... classify the event
/// ```
#[must_use]
pub fn watch_span(operation: &str, kind: &str, namespace: &str) -> Span {
    tracing::info_span!(
        "watch",
        op = operation,
        kind = kind,
        namespace = namespace,
    )
}

/// Creates a span for reconcile operations on a single job.
#[must_use]
pub fn reconcile_span(operation: &str, job: &str) -> Span {
    tracing::info_span!("reconcile", op = operation, job = job)
}
