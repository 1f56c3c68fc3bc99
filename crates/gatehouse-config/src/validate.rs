//! Merge host-supplied settings and options with defaults and validate them.

use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::defaults;
use crate::error::{ConfigError, ConfigResult};
use crate::model::{
    AuthParams, ResolvedOptions, ResolvedSettings, ResponseType, TransportSettings,
    WidgetOptions, WidgetSettings,
};

/// Validate construction-time settings and derive asset locations.
///
/// # Errors
///
/// Returns [`ConfigError`] when the client id or domain is missing, or an
/// explicit asset override is not an absolute URL.
pub fn resolve_settings(settings: &WidgetSettings) -> ConfigResult<ResolvedSettings> {
    let client_id = settings.client_id.trim();
    if client_id.is_empty() {
        return Err(ConfigError::MissingField { field: "clientID" });
    }
    let domain = settings.domain.trim().trim_end_matches('/');
    if domain.is_empty() {
        return Err(ConfigError::MissingField { field: "domain" });
    }
    if domain.chars().any(char::is_whitespace) || domain.contains("://") {
        return Err(ConfigError::invalid(
            "domain",
            Some(domain),
            "must be a bare host name",
        ));
    }

    let (derived_assets, derived_cdn) = derive_asset_locations(domain);
    let assets_url = match settings.assets_url.as_deref() {
        Some(url) => normalize_root("assetsUrl", url)?,
        None => derived_assets,
    };
    let cdn = match settings.cdn.as_deref() {
        Some(url) => normalize_root("cdn", url)?,
        None => derived_cdn,
    };

    Ok(ResolvedSettings {
        client_id: client_id.to_string(),
        domain: domain.to_string(),
        assets_url,
        cdn,
    })
}

/// Asset and CDN roots for a tenant domain.
///
/// Hosted tenants (`*.auth0.com`, any port) share fixed locations; custom
/// domains serve assets from themselves.
#[must_use]
pub fn derive_asset_locations(domain: &str) -> (String, String) {
    let host = domain.split(':').next().unwrap_or(domain).to_ascii_lowercase();
    if host.ends_with(defaults::HOSTED_DOMAIN_SUFFIX) {
        (
            defaults::HOSTED_ASSETS_URL.to_string(),
            defaults::HOSTED_CDN_URL.to_string(),
        )
    } else {
        let root = format!("https://{domain}/");
        let cdn = format!("{root}{}", defaults::CUSTOM_CDN_PATH);
        (root, cdn)
    }
}

/// Merge `show()` options with defaults and validate them.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidField`] for a malformed callback URL, an
/// unknown response type, or a malformed `authParams.connection_scopes`.
pub fn resolve_options(options: &WidgetOptions) -> ConfigResult<ResolvedOptions> {
    let callback_url = options
        .callback_url
        .as_deref()
        .map(parse_callback_url)
        .transpose()?;

    let response_type = match options.response_type.as_deref() {
        Some(raw) => raw.trim().parse::<ResponseType>()?,
        None if callback_url.is_some() => ResponseType::Code,
        None => ResponseType::Token,
    };

    let callback_on_location_hash = options
        .callback_on_location_hash
        .unwrap_or(response_type == ResponseType::Token);

    validate_auth_params(&options.auth_params)?;

    let resolved = ResolvedOptions {
        transport: TransportSettings {
            callback_url,
            response_type,
            force_jsonp: options.force_jsonp.unwrap_or(defaults::FORCE_JSONP),
            callback_on_location_hash,
        },
        connections: options.connections.as_deref().map(normalize_connections),
        auth_params: options.auth_params.clone(),
        default_user_password_connection: options
            .default_user_password_connection
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string),
        sso: options.sso.unwrap_or(defaults::SSO_ENABLED),
        integrated_windows_login: options
            .integrated_windows_login
            .unwrap_or(defaults::INTEGRATED_WINDOWS_LOGIN),
    };
    debug!(
        response_type = %resolved.transport.response_type,
        requested_connections = resolved.connections.as_ref().map_or(0, Vec::len),
        sso = resolved.sso,
        "widget options resolved"
    );
    Ok(resolved)
}

fn parse_callback_url(raw: &str) -> ConfigResult<String> {
    let url = Url::parse(raw.trim())
        .map_err(|_| ConfigError::invalid("callbackURL", Some(raw), "must be an absolute URL"))?;
    match url.scheme() {
        "http" | "https" => Ok(raw.trim().to_string()),
        _ => Err(ConfigError::invalid(
            "callbackURL",
            Some(raw),
            "must use http or https",
        )),
    }
}

fn normalize_root(field: &str, raw: &str) -> ConfigResult<String> {
    let url = Url::parse(raw.trim())
        .map_err(|_| ConfigError::invalid(field, Some(raw), "must be an absolute URL"))?;
    let mut root = url.to_string();
    if !root.ends_with('/') {
        root.push('/');
    }
    Ok(root)
}

fn normalize_connections(requested: &[String]) -> Vec<String> {
    requested
        .iter()
        .map(|name| name.trim())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

fn validate_auth_params(params: &AuthParams) -> ConfigResult<()> {
    let Some(scopes) = params.as_map().get(AuthParams::CONNECTION_SCOPES) else {
        return Ok(());
    };
    let Some(scopes) = scopes.as_object() else {
        return Err(ConfigError::invalid(
            "authParams.connection_scopes",
            None,
            "must be an object keyed by connection name",
        ));
    };
    for (connection, scope) in scopes {
        let valid = match scope {
            Value::String(_) => true,
            Value::Array(items) => items.iter().all(Value::is_string),
            _ => false,
        };
        if !valid {
            return Err(ConfigError::invalid(
                &format!("authParams.connection_scopes.{connection}"),
                None,
                "must be a string or a list of strings",
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn custom_domain_serves_its_own_assets() {
        let (assets, cdn) = derive_asset_locations("abc.contoso.com");
        assert_eq!(assets, "https://abc.contoso.com/");
        assert_eq!(cdn, "https://abc.contoso.com/w2/");
    }

    #[test]
    fn hosted_domain_uses_shared_assets_even_with_port() {
        let (assets, cdn) = derive_asset_locations("abc.auth0.com:3000");
        assert_eq!(assets, "https://s3.amazonaws.com/assets.auth0.com/");
        assert_eq!(cdn, "https://d19p4zemcycm7a.cloudfront.net/w2/");
    }

    #[test]
    fn explicit_asset_overrides_win() {
        let settings = WidgetSettings {
            assets_url: Some("https://assets.example.com".into()),
            cdn: Some("https://cdn.example.com/lock/".into()),
            ..WidgetSettings::new("123456789", "abc.auth0.com")
        };
        let resolved = resolve_settings(&settings).expect("settings resolve");
        assert_eq!(resolved.assets_url, "https://assets.example.com/");
        assert_eq!(resolved.cdn, "https://cdn.example.com/lock/");
    }

    #[test]
    fn settings_require_client_and_domain() {
        let err = resolve_settings(&WidgetSettings::new("", "abc.auth0.com")).unwrap_err();
        assert!(matches!(err, ConfigError::MissingField { field: "clientID" }));
        let err = resolve_settings(&WidgetSettings::new("123", "  ")).unwrap_err();
        assert!(matches!(err, ConfigError::MissingField { field: "domain" }));
        let err = resolve_settings(&WidgetSettings::new("123", "https://abc.com")).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidField { .. }));
    }

    #[test]
    fn token_response_infers_location_hash_callback() {
        let options = WidgetOptions {
            response_type: Some("token".into()),
            ..WidgetOptions::default()
        };
        let resolved = resolve_options(&options).expect("options resolve");
        assert!(resolved.transport.callback_on_location_hash);
        assert!(resolved.sso);
        assert!(!resolved.transport.force_jsonp);
    }

    #[test]
    fn explicit_location_hash_flag_wins() {
        let options = WidgetOptions {
            response_type: Some("token".into()),
            callback_on_location_hash: Some(false),
            ..WidgetOptions::default()
        };
        let resolved = resolve_options(&options).expect("options resolve");
        assert!(!resolved.transport.callback_on_location_hash);
    }

    #[test]
    fn callback_url_defaults_response_type_to_code() {
        let options = WidgetOptions {
            callback_url: Some("http://myapp.com/callback".into()),
            ..WidgetOptions::default()
        };
        let resolved = resolve_options(&options).expect("options resolve");
        assert_eq!(resolved.transport.response_type, ResponseType::Code);
        assert!(!resolved.transport.callback_on_location_hash);
        assert_eq!(
            resolved.transport.callback_url.as_deref(),
            Some("http://myapp.com/callback")
        );
    }

    #[test]
    fn rejects_bad_callback_and_response_type() {
        let bad_url = WidgetOptions {
            callback_url: Some("myapp/callback".into()),
            ..WidgetOptions::default()
        };
        assert!(resolve_options(&bad_url).is_err());

        let bad_scheme = WidgetOptions {
            callback_url: Some("ftp://myapp.com/callback".into()),
            ..WidgetOptions::default()
        };
        assert!(resolve_options(&bad_scheme).is_err());

        let bad_type = WidgetOptions {
            response_type: Some("id_token".into()),
            ..WidgetOptions::default()
        };
        let err = resolve_options(&bad_type).unwrap_err();
        assert_eq!(err.detail(), "responseType: must be 'code' or 'token'");
    }

    #[test]
    fn connections_are_trimmed_and_blanks_dropped() {
        let options = WidgetOptions {
            connections: Some(vec![" twitter ".into(), String::new(), "dbTest".into()]),
            default_user_password_connection: Some("  ".into()),
            ..WidgetOptions::default()
        };
        let resolved = resolve_options(&options).expect("options resolve");
        assert_eq!(
            resolved.connections,
            Some(vec!["twitter".to_string(), "dbTest".to_string()])
        );
        assert_eq!(resolved.default_user_password_connection, None);
    }

    #[test]
    fn malformed_connection_scopes_are_rejected() {
        let options = WidgetOptions {
            auth_params: AuthParams::new().with("connection_scopes", json!(["twitter"])),
            ..WidgetOptions::default()
        };
        assert!(resolve_options(&options).is_err());

        let options = WidgetOptions {
            auth_params: AuthParams::new()
                .with("connection_scopes", json!({ "twitter": [1, 2] })),
            ..WidgetOptions::default()
        };
        let err = resolve_options(&options).unwrap_err();
        assert!(err.detail().starts_with("authParams.connection_scopes.twitter"));
    }
}
