//! Per-session span helpers.

use tracing::Span;

use crate::init::build_sha;

/// Span wrapping one `show()` session.
///
/// The `view` field starts empty and is filled by [`record_view`].
#[must_use]
pub fn session_span(client_id: &str, session_id: &str) -> Span {
    tracing::info_span!(
        "widget_session",
        client_id = %client_id,
        session_id = %session_id,
        build_sha = %build_sha(),
        view = tracing::field::Empty,
    )
}

/// Record the active view on a session span.
pub fn record_view(span: &Span, view: &str) {
    span.record("view", tracing::field::display(view));
}
