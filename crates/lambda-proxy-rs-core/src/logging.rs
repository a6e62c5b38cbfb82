//! Logging integration for proxy applications.
//!
//! Provides helpers for configuring [`tracing`]-based logging from
//! [`Settings`](crate::settings::Settings) and for creating per-invocation
//! spans.

use crate::settings::Settings;

/// Sets up the global tracing subscriber based on the given settings.
///
/// The filter is read from `settings.log_level` (e.g. "debug", "info",
/// "warn", "error"). In debug mode a pretty, human-readable format with
/// file/line locations is used; otherwise a structured JSON format.
/// Timestamps are suppressed in both: the hosting platform's log ingestion
/// adds its own.
///
/// Installing a subscriber when one is already set is a no-op, so calling
/// this from multiple application objects in one process is safe.
pub fn setup_logging(settings: &Settings) {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let filter =
        EnvFilter::try_new(&settings.log_level).unwrap_or_else(|_| EnvFilter::new("error"));

    if settings.debug {
        fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .without_time()
            .pretty()
            .try_init()
            .ok();
    } else {
        fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_target(true)
            .without_time()
            .json()
            .try_init()
            .ok();
    }
}

/// Creates a tracing span for one gateway invocation.
///
/// Attach this span to the dispatch pipeline so that all log entries
/// emitted while handling the event carry the invocation ID.
///
/// # Examples
///
/// ```
/// use lambda_proxy_rs_core::logging::invocation_span;
///
/// let span = invocation_span("abc-123");
/// let _guard = span.enter();
/// tracing::info!("handling event");
/// ```
pub fn invocation_span(request_id: &str) -> tracing::Span {
    tracing::info_span!("invocation", id = request_id)
}
