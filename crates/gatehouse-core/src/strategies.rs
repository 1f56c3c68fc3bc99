//! Static registry of known identity strategies.
//!
//! The registry decides how a strategy behaves in the widget (icon button,
//! credential form, domain routing) and what title the renderer shows for it.

use serde::Serialize;

/// Behavioural family of a strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// Redirect-based social provider, shown as an icon.
    Social,
    /// Hosted username/password store.
    Database,
    /// Redirect-based enterprise federation, selected by email domain.
    Enterprise,
    /// AD/LDAP connector: enterprise domain routing with credentials.
    Directory,
}

impl StrategyKind {
    /// Whether logins of this kind send a username from the credential form.
    #[must_use]
    pub const fn uses_credentials(self) -> bool {
        matches!(self, Self::Database | Self::Directory)
    }

    /// Whether connections of this kind are selected by email domain.
    #[must_use]
    pub const fn routes_by_domain(self) -> bool {
        matches!(self, Self::Enterprise | Self::Directory)
    }
}

struct StrategyInfo {
    name: &'static str,
    title: &'static str,
    kind: StrategyKind,
}

const fn info(name: &'static str, title: &'static str, kind: StrategyKind) -> StrategyInfo {
    StrategyInfo { name, title, kind }
}

const REGISTRY: &[StrategyInfo] = &[
    info("auth0", "Auth0", StrategyKind::Database),
    info("ad", "AD / LDAP", StrategyKind::Directory),
    info("auth0-adldap", "AD/LDAP", StrategyKind::Directory),
    info("adfs", "ADFS", StrategyKind::Enterprise),
    info("google-apps", "Google Apps", StrategyKind::Enterprise),
    info("office365", "Office365", StrategyKind::Enterprise),
    info("waad", "Windows Azure AD", StrategyKind::Enterprise),
    info("samlp", "SAML", StrategyKind::Enterprise),
    info("pingfederate", "Ping Federate", StrategyKind::Enterprise),
    info("sharepoint", "SharePoint Apps", StrategyKind::Enterprise),
    info("ip", "IP Address Authentication", StrategyKind::Enterprise),
    info("amazon", "Amazon", StrategyKind::Social),
    info("bitbucket", "Bitbucket", StrategyKind::Social),
    info("box", "Box", StrategyKind::Social),
    info("dropbox", "Dropbox", StrategyKind::Social),
    info("evernote", "Evernote", StrategyKind::Social),
    info("facebook", "Facebook", StrategyKind::Social),
    info("fitbit", "Fitbit", StrategyKind::Social),
    info("github", "GitHub", StrategyKind::Social),
    info("google-oauth2", "Google", StrategyKind::Social),
    info("instagram", "Instagram", StrategyKind::Social),
    info("linkedin", "LinkedIn", StrategyKind::Social),
    info("paypal", "PayPal", StrategyKind::Social),
    info("salesforce", "Salesforce", StrategyKind::Social),
    info("soundcloud", "Soundcloud", StrategyKind::Social),
    info("twitter", "Twitter", StrategyKind::Social),
    info("vkontakte", "vKontakte", StrategyKind::Social),
    info("windowslive", "Microsoft Account", StrategyKind::Social),
    info("yahoo", "Yahoo!", StrategyKind::Social),
    info("yandex", "Yandex", StrategyKind::Social),
];

fn lookup(name: &str) -> Option<&'static StrategyInfo> {
    REGISTRY.iter().find(|entry| entry.name == name)
}

/// Kind of a strategy; unknown names are treated as social providers.
#[must_use]
pub fn strategy_kind(name: &str) -> StrategyKind {
    lookup(name).map_or(StrategyKind::Social, |entry| entry.kind)
}

/// Display title of a strategy; unknown names display as themselves.
#[must_use]
pub fn strategy_title(name: &str) -> &str {
    lookup(name).map_or(name, |entry| entry.title)
}
