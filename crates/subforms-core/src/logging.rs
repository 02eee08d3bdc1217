//! Logging integration for the subforms library.
//!
//! The library instruments its mapping and validation paths with
//! [`tracing`]. Hosting applications bring their own subscriber; this
//! module provides a small setup helper for binaries and tests that do not.

use tracing_subscriber::fmt;
use tracing_subscriber::EnvFilter;

/// Installs a global tracing subscriber.
///
/// `directive` follows the usual `EnvFilter` syntax (e.g. "debug",
/// "subforms_forms=trace") and falls back to "info" when it does not parse.
/// `debug` selects a pretty human-readable format with source locations;
/// otherwise output is structured JSON. Installing a second subscriber is a
/// no-op, so calling this from multiple tests is safe.
pub fn setup_logging(directive: &str, debug: bool) {
    let filter = EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_target(true);

    let result = if debug {
        builder
            .with_file(true)
            .with_line_number(true)
            .pretty()
            .try_init()
    } else {
        builder.json().try_init()
    };
    result.ok();
}

/// Creates a tracing span for one validation/mapping pass over a form tree.
///
/// # Examples
///
/// ```
/// use subforms_core::logging::form_span;
///
/// let span = form_span("registration");
/// let _guard = span.enter();
/// tracing::info!("validating form tree");
/// ```
pub fn form_span(form_name: &str) -> tracing::Span {
    tracing::info_span!("form", name = form_name)
}
