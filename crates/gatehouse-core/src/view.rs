//! Single owner of the active widget view.
//!
//! The machine does not publish anything itself: every operation returns the
//! events it produced so the caller can publish them after releasing
//! whatever lock guards the machine.

use gatehouse_events::{ViewKind, WidgetEvent};
use serde::Serialize;

use crate::sso::InitialView;

/// Current view of the widget.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewState {
    /// Nothing rendered.
    #[default]
    Hidden,
    /// "Not logged in" view.
    SignIn,
    /// Signup form.
    SignUp,
    /// Reset-password form.
    Reset,
    /// "Already logged in" view.
    LoggedIn,
}

impl ViewState {
    /// View identifier for events; `None` while hidden.
    #[must_use]
    pub const fn kind(self) -> Option<ViewKind> {
        match self {
            Self::Hidden => None,
            Self::SignIn => Some(ViewKind::SignIn),
            Self::SignUp => Some(ViewKind::SignUp),
            Self::Reset => Some(ViewKind::Reset),
            Self::LoggedIn => Some(ViewKind::LoggedIn),
        }
    }

    const fn from_kind(kind: ViewKind) -> Self {
        match kind {
            ViewKind::SignIn => Self::SignIn,
            ViewKind::SignUp => Self::SignUp,
            ViewKind::Reset => Self::Reset,
            ViewKind::LoggedIn => Self::LoggedIn,
        }
    }

    /// Whether a view is rendered.
    #[must_use]
    pub const fn is_visible(self) -> bool {
        !matches!(self, Self::Hidden)
    }
}

/// User or controller input driving view transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewEvent {
    /// "Sign up" link.
    SignUpClicked,
    /// "Forgot your password?" link.
    ForgotPasswordClicked,
    /// "Back" link on the signup or reset form.
    BackClicked,
    /// "Not you? / show all" link on the logged-in view.
    SwitchAccountClicked,
    /// A password change was accepted.
    ResetCompleted,
    /// Close control.
    Close,
}

/// Explicit transition table over [`ViewState`].
#[derive(Debug, Default)]
pub struct ViewStateMachine {
    state: ViewState,
}

impl ViewStateMachine {
    /// Machine in the hidden state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current view.
    #[must_use]
    pub const fn state(&self) -> ViewState {
        self.state
    }

    /// Leave `Hidden` for the initial view of a `show()`.
    ///
    /// Emits `ViewEntered` followed by exactly one `WidgetReady`. Does
    /// nothing when a view is already visible.
    pub fn enter(&mut self, initial: &InitialView) -> Vec<WidgetEvent> {
        if self.state.is_visible() {
            return Vec::new();
        }
        let view = initial.view();
        self.state = ViewState::from_kind(view);
        vec![
            WidgetEvent::ViewEntered { view },
            WidgetEvent::WidgetReady { view },
        ]
    }

    /// Apply a user or controller event.
    ///
    /// Transitions missing from the table leave the state untouched and emit
    /// nothing.
    pub fn fire(&mut self, event: ViewEvent) -> Vec<WidgetEvent> {
        if event == ViewEvent::Close {
            return self.hide();
        }
        let next = match (self.state, event) {
            (ViewState::SignIn, ViewEvent::SignUpClicked) => ViewState::SignUp,
            (ViewState::SignIn, ViewEvent::ForgotPasswordClicked) => ViewState::Reset,
            (ViewState::SignUp | ViewState::Reset, ViewEvent::BackClicked)
            | (ViewState::Reset, ViewEvent::ResetCompleted)
            | (ViewState::LoggedIn, ViewEvent::SwitchAccountClicked) => ViewState::SignIn,
            _ => return Vec::new(),
        };
        self.state = next;
        next.kind()
            .map(|view| vec![WidgetEvent::ViewEntered { view }])
            .unwrap_or_default()
    }

    /// Move to `Hidden`, emitting `WidgetHidden` when a view was visible.
    pub fn hide(&mut self) -> Vec<WidgetEvent> {
        let was_visible = self.state.is_visible();
        self.state = ViewState::Hidden;
        if was_visible {
            vec![WidgetEvent::WidgetHidden]
        } else {
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sso::SsoDisplay;

    fn shown() -> ViewStateMachine {
        let mut machine = ViewStateMachine::new();
        let _ = machine.enter(&InitialView::SignIn);
        machine
    }

    #[test]
    fn enter_emits_view_then_single_ready() {
        let mut machine = ViewStateMachine::new();
        let events = machine.enter(&InitialView::SignIn);
        assert_eq!(
            events,
            vec![
                WidgetEvent::ViewEntered {
                    view: ViewKind::SignIn
                },
                WidgetEvent::WidgetReady {
                    view: ViewKind::SignIn
                },
            ]
        );
        assert!(machine.enter(&InitialView::SignIn).is_empty());
    }

    #[test]
    fn enter_logged_in() {
        let mut machine = ViewStateMachine::new();
        let display = SsoDisplay {
            username: Some("john@gmail.com".into()),
            strategy: Some("google-oauth2".into()),
            connection: None,
            title: Some("Google".into()),
            in_catalog: true,
        };
        let events = machine.enter(&InitialView::LoggedIn(display));
        assert_eq!(machine.state(), ViewState::LoggedIn);
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn listed_transitions() {
        let mut machine = shown();
        assert_eq!(
            machine.fire(ViewEvent::SignUpClicked),
            vec![WidgetEvent::ViewEntered {
                view: ViewKind::SignUp
            }]
        );
        let _ = machine.fire(ViewEvent::BackClicked);
        assert_eq!(machine.state(), ViewState::SignIn);
        let _ = machine.fire(ViewEvent::ForgotPasswordClicked);
        assert_eq!(machine.state(), ViewState::Reset);
        let _ = machine.fire(ViewEvent::ResetCompleted);
        assert_eq!(machine.state(), ViewState::SignIn);
    }

    #[test]
    fn unlisted_transitions_are_no_ops() {
        let mut machine = shown();
        assert!(machine.fire(ViewEvent::BackClicked).is_empty());
        assert!(machine.fire(ViewEvent::SwitchAccountClicked).is_empty());
        let _ = machine.fire(ViewEvent::SignUpClicked);
        assert!(machine.fire(ViewEvent::ForgotPasswordClicked).is_empty());
        assert_eq!(machine.state(), ViewState::SignUp);

        let mut hidden = ViewStateMachine::new();
        assert!(hidden.fire(ViewEvent::SignUpClicked).is_empty());
        assert_eq!(hidden.state(), ViewState::Hidden);
    }

    #[test]
    fn close_hides_from_any_view() {
        let mut machine = shown();
        let _ = machine.fire(ViewEvent::SignUpClicked);
        assert_eq!(machine.fire(ViewEvent::Close), vec![WidgetEvent::WidgetHidden]);
        assert_eq!(machine.state(), ViewState::Hidden);
        assert!(machine.hide().is_empty());
    }
}
