//! Event kind identifiers used for listener routing.

use crate::payloads::{ViewKind, WidgetEvent};

/// Routing key for listeners. View readiness is keyed per view so hosts can
/// wait for a specific view (`signup ready`) rather than any view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Readiness of one particular view.
    ViewEntered(ViewKind),
    /// Whole-widget readiness.
    WidgetReady,
    /// Widget teardown.
    WidgetHidden,
    /// Accepted submission.
    RequestCompleted,
    /// Any fault.
    Fault,
}

impl EventKind {
    /// Topic string, kept compatible with the names hosts already listen for.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ViewEntered(ViewKind::SignIn) => "signin ready",
            Self::ViewEntered(ViewKind::SignUp) => "signup ready",
            Self::ViewEntered(ViewKind::Reset) => "reset ready",
            Self::ViewEntered(ViewKind::LoggedIn) => "loggedin ready",
            Self::WidgetReady => "ready",
            Self::WidgetHidden => "hidden",
            Self::RequestCompleted => "completed",
            Self::Fault => "fault",
        }
    }
}

/// Routing key for an event.
#[must_use]
pub const fn event_kind(event: &WidgetEvent) -> EventKind {
    event.kind()
}
