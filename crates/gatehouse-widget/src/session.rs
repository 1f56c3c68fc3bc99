//! State owned by one `show()` session.

use gatehouse_config::ResolvedOptions;
use gatehouse_core::{
    Catalog, FormValidator, InitialView, RequestBuilder, SsoDisplay, ViewStateMachine,
};
use tracing::Span;

use crate::outcome::{Affordances, WidgetSnapshot};

pub(crate) struct Session {
    pub(crate) span: Span,
    pub(crate) options: ResolvedOptions,
    pub(crate) catalog: Catalog,
    pub(crate) sso: Option<SsoDisplay>,
    pub(crate) machine: ViewStateMachine,
    pub(crate) submitting: bool,
}

impl Session {
    pub(crate) fn new(
        span: Span,
        options: ResolvedOptions,
        catalog: Catalog,
        initial: &InitialView,
    ) -> Self {
        let sso = match initial {
            InitialView::LoggedIn(display) => Some(display.clone()),
            InitialView::SignIn => None,
        };
        Self {
            span,
            options,
            catalog,
            sso,
            machine: ViewStateMachine::new(),
            submitting: false,
        }
    }

    pub(crate) fn builder<'a>(&'a self, validator: &'a dyn FormValidator) -> RequestBuilder<'a> {
        RequestBuilder::new(&self.catalog, &self.options.auth_params)
            .with_default_connection(self.options.default_user_password_connection.as_deref())
            .with_validator(validator)
    }

    pub(crate) fn snapshot(&self, validator: &dyn FormValidator) -> WidgetSnapshot {
        let affordances = self
            .builder(validator)
            .database_connection()
            .map(|(_, connection)| Affordances {
                show_signup: connection.show_signup(),
                show_forgot: connection.show_forgot(),
            })
            .unwrap_or_default();
        WidgetSnapshot {
            view: self.machine.state(),
            catalog: Some(self.catalog.clone()),
            sso: self.sso.clone(),
            affordances,
            submitting: self.submitting,
        }
    }
}
