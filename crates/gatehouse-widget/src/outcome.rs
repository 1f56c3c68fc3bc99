//! Results returned to the host and the read-only render snapshot.

use gatehouse_core::{Catalog, SsoDisplay, ValidationFault, ViewState};
use gatehouse_events::{FaultKind, ViewKind};
use serde::Serialize;

/// Result of [`WidgetController::show`](crate::WidgetController::show).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShowOutcome {
    /// The widget entered its initial view.
    Shown(ViewKind),
    /// Another `show()` was in flight or the widget was already visible.
    Ignored,
    /// `hide()` ran before the session was ready.
    Cancelled,
    /// A fault ended the `show()`; the matching event was published.
    Faulted(FaultKind),
}

/// Result of a user action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The request was accepted by the identity client.
    Dispatched,
    /// Local validation failed; nothing was sent.
    Invalid(ValidationFault),
    /// The identity client reported a failure; the view is unchanged.
    Failed(String),
    /// The action does not apply to the current view, another submission is
    /// in flight, or the session ended before the result arrived.
    Ignored,
}

/// Links offered by the credential views.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Affordances {
    /// Show the signup link.
    pub show_signup: bool,
    /// Show the forgot-password link.
    pub show_forgot: bool,
}

/// Everything a renderer needs to draw the widget.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WidgetSnapshot {
    /// Active view.
    pub view: ViewState,
    /// Catalog of the active session.
    pub catalog: Option<Catalog>,
    /// Previous session shown in the logged-in view.
    pub sso: Option<SsoDisplay>,
    /// Signup and forgot-password links.
    pub affordances: Affordances,
    /// Whether a submission is in flight.
    pub submitting: bool,
}
