//! Event payload types carried across the widget.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::topics::EventKind;

/// Identifier assigned to each event emitted by the widget.
pub type EventId = u64;

/// Default buffer size for the in-memory replay ring.
pub const DEFAULT_REPLAY_CAPACITY: usize = 256;

/// Views the widget can present.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ViewKind {
    /// Credential form plus social icons ("not logged in").
    SignIn,
    /// Database signup form.
    SignUp,
    /// Change-password form.
    Reset,
    /// "Already logged in" shortcut backed by SSO data.
    LoggedIn,
}

impl ViewKind {
    /// Lowercase name used in topic strings and logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SignIn => "signin",
            Self::SignUp => "signup",
            Self::Reset => "reset",
            Self::LoggedIn => "loggedin",
        }
    }
}

/// Fault taxonomy surfaced to the host application.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FaultKind {
    /// Options or catalog left the widget unable to render.
    Configuration,
    /// A form submission was rejected locally.
    Validation,
    /// An external collaborator call failed.
    Transport,
}

/// Operation a fault or completion refers to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// The `show()` boot sequence.
    Show,
    /// A login submission.
    Login,
    /// A signup submission.
    Signup,
    /// A change-password submission.
    ChangePassword,
}

impl Operation {
    /// Lowercase name used in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Show => "show",
            Self::Login => "login",
            Self::Signup => "signup",
            Self::ChangePassword => "change_password",
        }
    }
}

/// Typed widget events.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WidgetEvent {
    /// A view finished settling and is interactive.
    ViewEntered {
        /// View that was entered.
        view: ViewKind,
    },
    /// The widget as a whole is interactive; fires once per `show()`.
    WidgetReady {
        /// Initial view of the session.
        view: ViewKind,
    },
    /// The widget was torn down.
    WidgetHidden,
    /// A submission was accepted by the identity client.
    RequestCompleted {
        /// Submitted operation.
        operation: Operation,
        /// Connection the request targeted.
        connection: String,
    },
    /// Something went wrong; see [`FaultKind`].
    Fault {
        /// Fault category.
        kind: FaultKind,
        /// Operation that raised the fault.
        operation: Operation,
        /// Machine-readable reason.
        code: String,
        /// Human-readable detail.
        detail: String,
    },
}

impl WidgetEvent {
    /// Discriminator used for listener routing.
    #[must_use]
    pub const fn kind(&self) -> EventKind {
        match self {
            Self::ViewEntered { view } => EventKind::ViewEntered(*view),
            Self::WidgetReady { .. } => EventKind::WidgetReady,
            Self::WidgetHidden => EventKind::WidgetHidden,
            Self::RequestCompleted { .. } => EventKind::RequestCompleted,
            Self::Fault { .. } => EventKind::Fault,
        }
    }
}

/// Metadata wrapper around events. Each envelope tracks the event id and
/// emission timestamp.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EventEnvelope {
    /// Sequential identifier.
    pub id: EventId,
    /// Emission time.
    pub timestamp: DateTime<Utc>,
    /// Event payload.
    pub event: WidgetEvent,
}
