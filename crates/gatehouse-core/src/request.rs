//! Normalization of user input into identity requests.
//!
//! # Design
//! - Pure: the builder reads the catalog and options, it never mutates them.
//! - Credential logins resolve their connection in a fixed order: explicit
//!   connection, email domain, then the default credential connection.
//! - Reserved auth parameters are consumed here and never forwarded raw.

use gatehouse_config::AuthParams;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::catalog::{Catalog, Connection, Strategy};
use crate::error::ValidationFault;
use crate::strategies::StrategyKind;
use crate::validation::{DefaultValidator, FormValidator};

/// Credential form contents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CredentialForm {
    /// Email field.
    pub email: String,
    /// Password field; may be empty for enterprise redirects.
    pub password: String,
    /// Connection picked explicitly by the user, bypassing domain routing.
    pub connection: Option<String>,
}

impl CredentialForm {
    /// Form with email and password only.
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            connection: None,
        }
    }
}

/// Signup form contents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignupForm {
    /// Email field.
    pub email: String,
    /// Password field.
    pub password: String,
}

/// Reset-password form contents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResetForm {
    /// Email field.
    pub email: String,
    /// New password.
    pub password: String,
    /// Confirmation of the new password.
    pub repeat_password: String,
}

/// What the user picked to sign in with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentitySelection {
    /// Icon button for a social connection or strategy.
    Social {
        /// Connection or strategy identifier.
        name: String,
    },
    /// Email and password form.
    Credentials(CredentialForm),
    /// The previous session shown in the logged-in view.
    LastUsed {
        /// Connection of the previous session.
        connection: String,
        /// Username of the previous session.
        username: Option<String>,
        /// Password, for credential connections.
        password: Option<String>,
    },
}

/// Login request handed to the identity client.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoginRequest {
    /// Target connection.
    pub connection: String,
    /// Username for credential connections.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Password for credential connections.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Opaque state round-tripped through the provider.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    /// Scopes requested for the target connection.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connection_scope: Option<Vec<String>>,
    /// Remaining auth parameters, passed through.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Signup request handed to the identity client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignupRequest {
    /// Database connection.
    pub connection: String,
    /// Email used as username.
    pub username: String,
    /// Chosen password.
    pub password: String,
}

/// Change-password request handed to the identity client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangePasswordRequest {
    /// Database connection.
    pub connection: String,
    /// Email used as username.
    pub username: String,
    /// New password.
    pub password: String,
}

/// Builds identity requests against one catalog and option set.
pub struct RequestBuilder<'a> {
    catalog: &'a Catalog,
    auth_params: &'a AuthParams,
    default_connection: Option<&'a str>,
    validator: &'a dyn FormValidator,
}

impl<'a> RequestBuilder<'a> {
    /// Builder using the default validator and no default connection.
    #[must_use]
    pub const fn new(catalog: &'a Catalog, auth_params: &'a AuthParams) -> Self {
        Self {
            catalog,
            auth_params,
            default_connection: None,
            validator: &DefaultValidator,
        }
    }

    /// Preferred credential connection (`defaultUserPasswordConnection`).
    #[must_use]
    pub const fn with_default_connection(mut self, connection: Option<&'a str>) -> Self {
        self.default_connection = connection;
        self
    }

    /// Replace the form validator.
    #[must_use]
    pub const fn with_validator(mut self, validator: &'a dyn FormValidator) -> Self {
        self.validator = validator;
        self
    }

    /// Build a login request.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationFault`] when the selection cannot be resolved to
    /// a connection or the form fields are invalid.
    pub fn login(&self, selection: &IdentitySelection) -> Result<LoginRequest, ValidationFault> {
        match selection {
            IdentitySelection::Social { name } => {
                let connection = self.social_connection(name)?;
                Ok(self.finish(connection.name(), None, None))
            }
            IdentitySelection::Credentials(form) => self.credential_login(form),
            IdentitySelection::LastUsed {
                connection,
                username,
                password,
            } => self.last_used_login(connection, username.as_deref(), password.as_deref()),
        }
    }

    /// Build a signup request for the database connection.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationFault`] for invalid fields or a catalog without
    /// a database connection.
    pub fn signup(&self, form: &SignupForm) -> Result<SignupRequest, ValidationFault> {
        let (_, connection) = self.database_connection()?;
        let username = self.validator.validate_email(&form.email)?;
        self.validator.validate_password(&form.password)?;
        Ok(SignupRequest {
            connection: connection.name().to_string(),
            username,
            password: form.password.clone(),
        })
    }

    /// Build a change-password request for the database connection.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationFault`] for invalid fields, a mismatched
    /// confirmation, or a catalog without a database connection.
    pub fn change_password(
        &self,
        form: &ResetForm,
    ) -> Result<ChangePasswordRequest, ValidationFault> {
        let (_, connection) = self.database_connection()?;
        let username = self.validator.validate_email(&form.email)?;
        self.validator.validate_password(&form.password)?;
        self.validator
            .validate_password_confirmation(&form.password, &form.repeat_password)?;
        Ok(ChangePasswordRequest {
            connection: connection.name().to_string(),
            username,
            password: form.password.clone(),
        })
    }

    /// Connection the credential form falls back to.
    #[must_use]
    pub fn credential_connection(&self) -> Option<(&'a Strategy, &'a Connection)> {
        if let Some(name) = self.default_connection {
            match self.catalog.find_connection(name) {
                Some(found) if found.0.kind().uses_credentials() => return Some(found),
                Some(_) => {
                    warn!(connection = name, "default connection does not accept credentials");
                }
                None => warn!(connection = name, "default connection not in catalog"),
            }
        }
        self.catalog
            .first_connection_of_kind(StrategyKind::Database)
            .or_else(|| self.catalog.first_connection_of_kind(StrategyKind::Directory))
    }

    /// Database connection used for signup and password reset.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationFault::NoDatabaseConnection`] when the catalog has none.
    pub fn database_connection(&self) -> Result<(&'a Strategy, &'a Connection), ValidationFault> {
        self.default_connection
            .and_then(|name| self.catalog.find_connection(name))
            .filter(|(strategy, _)| strategy.kind() == StrategyKind::Database)
            .or_else(|| self.catalog.first_connection_of_kind(StrategyKind::Database))
            .ok_or(ValidationFault::NoDatabaseConnection)
    }

    fn social_connection(&self, name: &str) -> Result<&'a Connection, ValidationFault> {
        if let Some((_, connection)) = self.catalog.find_connection(name) {
            return Ok(connection);
        }
        self.catalog
            .find_strategy(name)
            .and_then(|strategy| strategy.connections().first())
            .ok_or_else(|| ValidationFault::UnknownConnection {
                name: name.to_string(),
            })
    }

    fn credential_login(&self, form: &CredentialForm) -> Result<LoginRequest, ValidationFault> {
        let email = form.email.trim();
        if email.is_empty() {
            return Err(ValidationFault::MissingEmail);
        }
        let domain = email
            .rsplit_once('@')
            .map(|(_, domain)| domain)
            .filter(|domain| !domain.is_empty());

        let (strategy, connection) = match form.connection.as_deref() {
            Some(name) => self.catalog.find_connection(name).ok_or_else(|| {
                ValidationFault::UnknownConnection {
                    name: name.to_string(),
                }
            })?,
            None => self.route_credentials(email, domain)?,
        };

        debug!(
            connection = connection.name(),
            kind = ?strategy.kind(),
            "credential login routed"
        );

        match strategy.kind() {
            StrategyKind::Database => {
                let username = self.validator.validate_email(email)?;
                self.validator.validate_password(&form.password)?;
                Ok(self.finish(
                    connection.name(),
                    Some(username),
                    Some(form.password.clone()),
                ))
            }
            StrategyKind::Directory => {
                let username = strip_domain(email, connection.domain());
                let password = (!form.password.is_empty()).then(|| form.password.clone());
                Ok(self.finish(connection.name(), Some(username), password))
            }
            StrategyKind::Enterprise | StrategyKind::Social => {
                let password = (!form.password.is_empty()).then(|| form.password.clone());
                Ok(self.finish(connection.name(), None, password))
            }
        }
    }

    fn route_credentials(
        &self,
        email: &str,
        domain: Option<&str>,
    ) -> Result<(&'a Strategy, &'a Connection), ValidationFault> {
        if let Some(found) = domain.and_then(|domain| self.catalog.connection_for_domain(domain)) {
            return Ok(found);
        }
        if let Some(found) = self.credential_connection() {
            return Ok(found);
        }
        match domain {
            Some(domain) => Err(ValidationFault::UnmatchedDomain {
                domain: domain.to_string(),
            }),
            None => {
                self.validator.validate_email(email)?;
                Err(ValidationFault::NoCredentialConnection)
            }
        }
    }

    fn last_used_login(
        &self,
        connection: &str,
        username: Option<&str>,
        password: Option<&str>,
    ) -> Result<LoginRequest, ValidationFault> {
        let credentials = self
            .catalog
            .find_connection(connection)
            .is_some_and(|(strategy, _)| strategy.kind().uses_credentials());
        if !credentials {
            return Ok(self.finish(connection, None, None));
        }

        let password = password.unwrap_or_default();
        self.validator.validate_password(password)?;
        let username = username.ok_or(ValidationFault::MissingEmail)?;
        Ok(self.finish(
            connection,
            Some(username.to_string()),
            Some(password.to_string()),
        ))
    }

    fn finish(
        &self,
        connection: &str,
        username: Option<String>,
        password: Option<String>,
    ) -> LoginRequest {
        LoginRequest {
            connection: connection.to_string(),
            username,
            password,
            state: self.auth_params.state(),
            connection_scope: self.auth_params.connection_scope_for(connection),
            extra: self.auth_params.forwarded(),
        }
    }
}

fn strip_domain(email: &str, domain: Option<&str>) -> String {
    let Some(domain) = domain else {
        return email.to_string();
    };
    match email.rsplit_once('@') {
        Some((local, host)) if host.eq_ignore_ascii_case(domain) => local.to_string(),
        _ => email.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ClientConfiguration;
    use serde_json::json;

    fn catalog() -> Catalog {
        let config: ClientConfiguration = serde_json::from_value(json!({
            "id": "123456789",
            "strategies": [
                { "name": "facebook", "connections": [{ "name": "facebook", "domain": "" }] },
                { "name": "twitter", "connections": [{ "name": "twitter", "domain": "" }] },
                {
                    "name": "google-oauth2",
                    "connections": [{ "name": "google-oauth2", "domain": "" }]
                },
                { "name": "adfs", "connections": [{ "name": "contoso", "domain": "contoso.com" }] },
                {
                    "name": "auth0-adldap",
                    "connections": [{ "name": "adldap", "domain": "litware.com" }]
                },
                { "name": "auth0", "connections": [
                    { "name": "dbTest", "showSignup": true, "showForgot": true },
                    { "name": "Username-Password-Authentication" }
                ] },
                { "name": "google-apps", "connections": [
                    { "name": "google-app1", "domain": "" },
                    { "name": "google-app2", "domain": "" },
                    { "name": "google-app3", "domain": "" }
                ] }
            ]
        }))
        .expect("fixture parses");
        Catalog::build(&config.strategies, None)
    }

    fn social(name: &str) -> IdentitySelection {
        IdentitySelection::Social { name: name.into() }
    }

    #[test]
    fn social_login_sends_only_the_connection() {
        let catalog = catalog();
        let params = AuthParams::new();
        let request = RequestBuilder::new(&catalog, &params)
            .login(&social("google-oauth2"))
            .expect("request builds");
        assert_eq!(
            serde_json::to_value(&request).expect("serializes"),
            json!({ "connection": "google-oauth2" })
        );
    }

    #[test]
    fn strategy_name_selects_its_first_connection() {
        let catalog = catalog();
        let params = AuthParams::new();
        let request = RequestBuilder::new(&catalog, &params)
            .login(&social("google-apps"))
            .expect("request builds");
        assert_eq!(request.connection, "google-app1");
        let err = RequestBuilder::new(&catalog, &params)
            .login(&social("github"))
            .unwrap_err();
        assert_eq!(
            err,
            ValidationFault::UnknownConnection {
                name: "github".into()
            }
        );
    }

    #[test]
    fn auth_params_pass_through_and_scopes_resolve() {
        let catalog = catalog();
        let params = AuthParams::new()
            .with("state", "foo")
            .with("offline_mode", true)
            .with("access_type", "offline")
            .with("connection_scopes", json!({ "twitter": ["grant1", "grant2"] }));
        let builder = RequestBuilder::new(&catalog, &params);

        let twitter = builder.login(&social("twitter")).expect("request builds");
        assert_eq!(
            serde_json::to_value(&twitter).expect("serializes"),
            json!({
                "connection": "twitter",
                "state": "foo",
                "connection_scope": ["grant1", "grant2"],
                "offline_mode": true,
                "access_type": "offline"
            })
        );

        let facebook = builder.login(&social("facebook")).expect("request builds");
        assert_eq!(facebook.connection_scope, None);
        assert!(!facebook.extra.contains_key("connection_scopes"));
    }

    #[test]
    fn explicit_empty_scope_is_forwarded() {
        let catalog = catalog();
        let params = AuthParams::new().with("connection_scopes", json!({ "twitter": [] }));
        let twitter = RequestBuilder::new(&catalog, &params)
            .login(&social("twitter"))
            .expect("request builds");
        assert_eq!(twitter.connection_scope, Some(Vec::new()));
        assert_eq!(
            serde_json::to_value(&twitter).expect("serializes"),
            json!({ "connection": "twitter", "connection_scope": [] })
        );
    }

    #[test]
    fn database_login_uses_default_database_connection() {
        let catalog = catalog();
        let params = AuthParams::new();
        let request = RequestBuilder::new(&catalog, &params)
            .login(&IdentitySelection::Credentials(CredentialForm::new(
                "john@fabrikam.com",
                "xyz",
            )))
            .expect("request builds");
        assert_eq!(request.connection, "dbTest");
        assert_eq!(request.username.as_deref(), Some("john@fabrikam.com"));
        assert_eq!(request.password.as_deref(), Some("xyz"));
    }

    #[test]
    fn directory_login_strips_connection_domain() {
        let catalog = catalog();
        let params = AuthParams::new();
        let request = RequestBuilder::new(&catalog, &params)
            .with_default_connection(Some("adldap"))
            .login(&IdentitySelection::Credentials(CredentialForm::new(
                "peter@litware.com",
                "zzz",
            )))
            .expect("request builds");
        assert_eq!(request.connection, "adldap");
        assert_eq!(request.username.as_deref(), Some("peter"));
        assert_eq!(request.password.as_deref(), Some("zzz"));
    }

    #[test]
    fn directory_login_omits_empty_password() {
        let catalog = catalog();
        let params = AuthParams::new();
        let request = RequestBuilder::new(&catalog, &params)
            .login(&IdentitySelection::Credentials(CredentialForm::new(
                "peter@litware.com",
                "",
            )))
            .expect("request builds");
        assert_eq!(request.connection, "adldap");
        assert_eq!(request.username.as_deref(), Some("peter"));
        assert_eq!(request.password, None);
    }

    #[test]
    fn enterprise_domain_routes_without_username() {
        let catalog = catalog();
        let params = AuthParams::new();
        let request = RequestBuilder::new(&catalog, &params)
            .login(&IdentitySelection::Credentials(CredentialForm::new(
                "mary@contoso.com",
                "",
            )))
            .expect("request builds");
        assert_eq!(request.connection, "contoso");
        assert_eq!(request.username, None);
        assert_eq!(request.password, None);
    }

    #[test]
    fn explicit_connection_wins_over_domain() {
        let catalog = catalog();
        let params = AuthParams::new();
        let form = CredentialForm {
            connection: Some("Username-Password-Authentication".into()),
            ..CredentialForm::new("mary@contoso.com", "secret")
        };
        let request = RequestBuilder::new(&catalog, &params)
            .login(&IdentitySelection::Credentials(form))
            .expect("request builds");
        assert_eq!(request.connection, "Username-Password-Authentication");
        assert_eq!(request.username.as_deref(), Some("mary@contoso.com"));
    }

    #[test]
    fn credential_faults() {
        let catalog = catalog();
        let params = AuthParams::new();
        let builder = RequestBuilder::new(&catalog, &params);
        let login = |email: &str, password: &str| {
            builder.login(&IdentitySelection::Credentials(CredentialForm::new(
                email, password,
            )))
        };
        assert_eq!(login("", "xyz").unwrap_err(), ValidationFault::MissingEmail);
        assert_eq!(
            login("john@fabrikam.com", "").unwrap_err(),
            ValidationFault::MissingPassword
        );
        assert!(matches!(
            login("john", "xyz").unwrap_err(),
            ValidationFault::InvalidEmail { .. }
        ));
    }

    #[test]
    fn unmatched_domain_without_credential_connection() {
        let catalog = catalog().filter(&["contoso".to_string(), "twitter".to_string()]);
        let params = AuthParams::new();
        let err = RequestBuilder::new(&catalog, &params)
            .login(&IdentitySelection::Credentials(CredentialForm::new(
                "john@fabrikam.com",
                "xyz",
            )))
            .unwrap_err();
        assert_eq!(
            err,
            ValidationFault::UnmatchedDomain {
                domain: "fabrikam.com".into()
            }
        );
    }

    #[test]
    fn default_connection_outside_catalog_falls_back() {
        let catalog = catalog();
        let params = AuthParams::new();
        let builder = RequestBuilder::new(&catalog, &params).with_default_connection(Some("nope"));
        let (_, connection) = builder.credential_connection().expect("fallback exists");
        assert_eq!(connection.name(), "dbTest");
    }

    #[test]
    fn last_used_login() {
        let catalog = catalog();
        let params = AuthParams::new().with("state", "foo");
        let builder = RequestBuilder::new(&catalog, &params);
        let request = builder
            .login(&IdentitySelection::LastUsed {
                connection: "google-oauth2".into(),
                username: Some("john@gmail.com".into()),
                password: None,
            })
            .expect("request builds");
        assert_eq!(request.connection, "google-oauth2");
        assert_eq!(request.username, None);
        assert_eq!(request.state.as_deref(), Some("foo"));

        let err = builder
            .login(&IdentitySelection::LastUsed {
                connection: "dbTest".into(),
                username: Some("john@fabrikam.com".into()),
                password: None,
            })
            .unwrap_err();
        assert_eq!(err, ValidationFault::MissingPassword);
    }

    #[test]
    fn signup_and_change_password_target_database() {
        let catalog = catalog();
        let params = AuthParams::new();
        let builder = RequestBuilder::new(&catalog, &params);
        let signup = builder
            .signup(&SignupForm {
                email: "john@fabrikam.com".into(),
                password: "xyz".into(),
            })
            .expect("signup builds");
        assert_eq!(
            signup,
            SignupRequest {
                connection: "dbTest".into(),
                username: "john@fabrikam.com".into(),
                password: "xyz".into(),
            }
        );

        let reset = ResetForm {
            email: "john@fabrikam.com".into(),
            password: "xyz".into(),
            repeat_password: "xyz".into(),
        };
        let change = builder.change_password(&reset).expect("change builds");
        assert_eq!(change.connection, "dbTest");

        let mismatch = ResetForm {
            repeat_password: "abc".into(),
            ..reset
        };
        assert_eq!(
            builder.change_password(&mismatch).unwrap_err(),
            ValidationFault::PasswordMismatch
        );
    }

    #[test]
    fn signup_without_database_connection_fails() {
        let catalog = catalog().filter(&["twitter".to_string()]);
        let params = AuthParams::new();
        let err = RequestBuilder::new(&catalog, &params)
            .signup(&SignupForm {
                email: "john@fabrikam.com".into(),
                password: "xyz".into(),
            })
            .unwrap_err();
        assert_eq!(err, ValidationFault::NoDatabaseConnection);
    }
}
