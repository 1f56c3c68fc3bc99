//! Initial view resolution from SSO state.

use gatehouse_events::ViewKind;
use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::strategies::strategy_title;

/// Connection the user last signed in with.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LastUsedConnection {
    /// Strategy identifier.
    pub strategy: String,
    /// Connection identifier.
    #[serde(default, alias = "name")]
    pub connection: String,
}

/// SSO state reported by the backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SsoState {
    /// Whether an SSO session exists.
    #[serde(rename = "sso", alias = "available", default)]
    pub available: bool,
    /// Username of the SSO session.
    #[serde(default)]
    pub last_used_username: Option<String>,
    /// Connection of the SSO session.
    #[serde(default)]
    pub last_used_connection: Option<LastUsedConnection>,
}

impl SsoState {
    /// State used when SSO is disabled or its lookup failed.
    #[must_use]
    pub const fn unavailable() -> Self {
        Self {
            available: false,
            last_used_username: None,
            last_used_connection: None,
        }
    }
}

/// What the logged-in view shows about the previous session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SsoDisplay {
    /// Username of the previous session.
    pub username: Option<String>,
    /// Strategy identifier.
    pub strategy: Option<String>,
    /// Connection identifier.
    pub connection: Option<String>,
    /// Strategy display title.
    pub title: Option<String>,
    /// Whether the strategy is offered by the current catalog.
    pub in_catalog: bool,
}

impl SsoDisplay {
    /// Label such as `john@gmail.com (Google)`.
    #[must_use]
    pub fn label(&self) -> String {
        match (self.username.as_deref(), self.title.as_deref()) {
            (Some(username), Some(title)) => format!("{username} ({title})"),
            (Some(username), None) => username.to_string(),
            (None, Some(title)) => title.to_string(),
            (None, None) => String::new(),
        }
    }
}

/// View the widget opens with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitialView {
    /// Regular sign-in view.
    SignIn,
    /// "Already logged in" view.
    LoggedIn(SsoDisplay),
}

impl InitialView {
    /// View identifier for events.
    #[must_use]
    pub const fn view(&self) -> ViewKind {
        match self {
            Self::SignIn => ViewKind::SignIn,
            Self::LoggedIn(_) => ViewKind::LoggedIn,
        }
    }
}

/// Decides whether the logged-in view applies.
#[derive(Debug, Clone, Copy, Default)]
pub struct SsoResolver;

impl SsoResolver {
    /// Resolve the initial view.
    ///
    /// An SSO session whose strategy is missing from the catalog still
    /// yields the logged-in view, with `in_catalog` cleared.
    #[must_use]
    pub fn resolve(state: &SsoState, catalog: &Catalog) -> InitialView {
        if !state.available {
            return InitialView::SignIn;
        }

        let last = state.last_used_connection.as_ref();
        let strategy = last.map(|last| last.strategy.clone());
        let in_catalog = last
            .and_then(|last| catalog.find_strategy(&last.strategy))
            .is_some();

        InitialView::LoggedIn(SsoDisplay {
            username: state.last_used_username.clone(),
            title: strategy.as_deref().map(|name| strategy_title(name).to_string()),
            connection: last
                .map(|last| last.connection.clone())
                .filter(|connection| !connection.is_empty()),
            strategy,
            in_catalog,
        })
    }
}
