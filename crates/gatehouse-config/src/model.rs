//! Typed configuration models.
//!
//! # Design
//! - `WidgetSettings` and `WidgetOptions` mirror what the host passes in
//!   (camelCase, everything optional); `Resolved*` types are what the engine
//!   consumes after defaults and validation.
//! - `AuthParams` stays an open JSON map because hosts forward arbitrary
//!   provider parameters; only a handful of keys carry meaning here.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{ConfigError, ConfigResult};

/// Construction-time widget settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct WidgetSettings {
    /// Application client identifier.
    #[serde(rename = "clientID")]
    pub client_id: String,
    /// Tenant domain, optionally with a port.
    pub domain: String,
    /// Override for the asset root.
    pub assets_url: Option<String>,
    /// Override for the CDN root.
    pub cdn: Option<String>,
}

impl WidgetSettings {
    /// Settings for a client on a domain, with derived asset locations.
    #[must_use]
    pub fn new(client_id: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            domain: domain.into(),
            assets_url: None,
            cdn: None,
        }
    }
}

/// Validated construction-time settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSettings {
    /// Application client identifier.
    pub client_id: String,
    /// Tenant domain.
    pub domain: String,
    /// Asset root, always ending in `/`.
    pub assets_url: String,
    /// CDN root, always ending in `/`.
    pub cdn: String,
}

/// OAuth response type requested from the identity provider.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ResponseType {
    /// Authorization code delivered to the callback URL.
    Code,
    /// Token delivered in the location hash.
    Token,
}

impl ResponseType {
    /// Wire spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Code => "code",
            Self::Token => "token",
        }
    }
}

impl FromStr for ResponseType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "code" => Ok(Self::Code),
            "token" => Ok(Self::Token),
            other => Err(ConfigError::invalid(
                "responseType",
                Some(other),
                "must be 'code' or 'token'",
            )),
        }
    }
}

impl fmt::Display for ResponseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options supplied to a single `show()` call.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct WidgetOptions {
    /// Redirect target after authentication.
    #[serde(rename = "callbackURL")]
    pub callback_url: Option<String>,
    /// `code` or `token`.
    pub response_type: Option<String>,
    /// Transport hint: use JSONP instead of CORS.
    #[serde(rename = "forceJSONP")]
    pub force_jsonp: Option<bool>,
    /// Requested subset of connection names.
    pub connections: Option<Vec<String>>,
    /// Extra parameters forwarded with login requests.
    pub auth_params: AuthParams,
    /// Connection used by the credential form when no domain matches.
    pub default_user_password_connection: Option<String>,
    /// Transport hint: deliver the result in the location hash.
    pub callback_on_location_hash: Option<bool>,
    /// Whether to look up SSO state.
    pub sso: Option<bool>,
    /// Whether directory (integrated Windows) SSO may be requested.
    pub integrated_windows_login: Option<bool>,
}

impl WidgetOptions {
    /// Parse options from a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the document is not a valid options object.
    pub fn from_json_str(raw: &str) -> ConfigResult<Self> {
        serde_json::from_str(raw).map_err(|source| ConfigError::Parse { source })
    }

    /// Parse options from an already-decoded JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the value is not a valid options object.
    pub fn from_value(value: Value) -> ConfigResult<Self> {
        serde_json::from_value(value).map_err(|source| ConfigError::Parse { source })
    }
}

/// Settings handed to the identity client's transport before any fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportSettings {
    /// Redirect target, validated as an absolute http(s) URL.
    pub callback_url: Option<String>,
    /// Response type requested from the provider.
    pub response_type: ResponseType,
    /// Use JSONP instead of CORS.
    pub force_jsonp: bool,
    /// Deliver the result in the location hash.
    pub callback_on_location_hash: bool,
}

/// Options after defaults and validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedOptions {
    /// Transport configuration.
    pub transport: TransportSettings,
    /// Requested connection subset, blanks removed.
    pub connections: Option<Vec<String>>,
    /// Extra login parameters.
    pub auth_params: AuthParams,
    /// Preferred credential connection.
    pub default_user_password_connection: Option<String>,
    /// Look up SSO state during `show()`.
    pub sso: bool,
    /// Allow directory SSO lookups.
    pub integrated_windows_login: bool,
}

/// Extra parameters forwarded with login requests.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct AuthParams(Map<String, Value>);

impl AuthParams {
    /// Per-connection scope map; resolved to `connection_scope`.
    pub const CONNECTION_SCOPES: &'static str = "connection_scopes";
    /// Resolved scope for the target connection.
    pub const CONNECTION_SCOPE: &'static str = "connection_scope";
    /// Opaque state round-tripped through the provider.
    pub const STATE: &'static str = "state";

    /// Keys never copied into the extra parameters of a request.
    pub const RESERVED: [&'static str; 6] = [
        Self::CONNECTION_SCOPES,
        Self::CONNECTION_SCOPE,
        Self::STATE,
        "connection",
        "username",
        "password",
    ];

    /// Empty parameter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Raw value for a key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Whether no parameters were supplied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The `state` parameter, verbatim for strings and JSON-rendered otherwise.
    #[must_use]
    pub fn state(&self) -> Option<String> {
        match self.0.get(Self::STATE)? {
            Value::Null => None,
            Value::String(state) => Some(state.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Scope list configured for `connection` under `connection_scopes`.
    ///
    /// A single string counts as a one-element list and an explicit empty
    /// list is kept. Missing or malformed entries yield `None`.
    #[must_use]
    pub fn connection_scope_for(&self, connection: &str) -> Option<Vec<String>> {
        let scopes = self.0.get(Self::CONNECTION_SCOPES)?.as_object()?;
        match scopes.get(connection)? {
            Value::String(single) => Some(vec![single.clone()]),
            Value::Array(items) => Some(
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect(),
            ),
            _ => None,
        }
    }

    /// Parameters copied verbatim into requests, reserved keys removed.
    #[must_use]
    pub fn forwarded(&self) -> Map<String, Value> {
        self.0
            .iter()
            .filter(|(key, _)| !Self::RESERVED.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    pub(crate) const fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for AuthParams {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}
