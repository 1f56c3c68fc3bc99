//! Reference client configuration and SSO states.

use gatehouse_core::{
    ClientConfiguration, ConnectionRecord, LastUsedConnection, SsoState, StrategyRecord,
};

/// Client identifier used by the fixtures.
pub const CLIENT_ID: &str = "0HP71GSd6PuoRYJ3DXKdiXCUUdGmBbup";

/// Tenant domain used by the fixtures.
pub const DOMAIN: &str = "abc.auth0.com:3000";

fn connection(name: &str, domain: &str) -> ConnectionRecord {
    ConnectionRecord {
        name: name.to_string(),
        domain: Some(domain.to_string()),
        show_signup: false,
        show_forgot: false,
    }
}

fn strategy(name: &str, connections: Vec<ConnectionRecord>) -> StrategyRecord {
    StrategyRecord {
        name: name.to_string(),
        connections,
    }
}

/// Seven strategies covering every strategy kind.
///
/// `dbTest` is the first database connection and offers signup and
/// forgot-password links.
#[must_use]
pub fn sample_client_configuration() -> ClientConfiguration {
    let db_test = ConnectionRecord {
        show_signup: true,
        show_forgot: true,
        ..connection("dbTest", "")
    };
    ClientConfiguration {
        id: CLIENT_ID.to_string(),
        strategies: vec![
            strategy("facebook", vec![connection("facebook", "")]),
            strategy("twitter", vec![connection("twitter", "")]),
            strategy("google-oauth2", vec![connection("google-oauth2", "")]),
            strategy("adfs", vec![connection("contoso", "contoso.com")]),
            strategy("auth0-adldap", vec![connection("adldap", "litware.com")]),
            strategy(
                "auth0",
                vec![db_test, connection("Username-Password-Authentication", "")],
            ),
            strategy(
                "google-apps",
                vec![
                    connection("google-app1", ""),
                    connection("google-app2", ""),
                    connection("google-app3", ""),
                ],
            ),
        ],
    }
}

/// Configuration with no strategies at all.
#[must_use]
pub fn empty_client_configuration() -> ClientConfiguration {
    ClientConfiguration {
        id: CLIENT_ID.to_string(),
        strategies: Vec::new(),
    }
}

/// No SSO session.
#[must_use]
pub const fn sso_unavailable() -> SsoState {
    SsoState::unavailable()
}

/// SSO session of `john@gmail.com` through Google.
#[must_use]
pub fn sso_google() -> SsoState {
    SsoState {
        available: true,
        last_used_username: Some("john@gmail.com".to_string()),
        last_used_connection: Some(LastUsedConnection {
            strategy: "google-oauth2".to_string(),
            connection: "google-oauth2".to_string(),
        }),
    }
}

/// SSO session of `john@fabrikam.com` on the `dbTest` database connection.
#[must_use]
pub fn sso_database() -> SsoState {
    SsoState {
        available: true,
        last_used_username: Some("john@fabrikam.com".to_string()),
        last_used_connection: Some(LastUsedConnection {
            strategy: "auth0".to_string(),
            connection: "dbTest".to_string(),
        }),
    }
}
