use gatehouse_config::{
    ResponseType, WidgetOptions, WidgetSettings, resolve_options, resolve_settings,
};

#[test]
fn host_document_resolves_into_transport_and_auth_params() -> anyhow::Result<()> {
    let options = WidgetOptions::from_json_str(
        r#"{
            "callbackURL": "http://myapp.com/callback",
            "responseType": "token",
            "forceJSONP": true,
            "connections": ["twitter", "google-oauth2", "invalid-connection"],
            "authParams": {
                "state": "foo",
                "access_type": "offline",
                "connection_scopes": { "twitter": ["grant1", "grant2"] }
            }
        }"#,
    )?;
    let resolved = resolve_options(&options)?;

    assert_eq!(resolved.transport.response_type, ResponseType::Token);
    assert!(resolved.transport.force_jsonp);
    assert!(resolved.transport.callback_on_location_hash);
    assert_eq!(
        resolved.transport.callback_url.as_deref(),
        Some("http://myapp.com/callback")
    );
    assert_eq!(resolved.connections.as_ref().map(Vec::len), Some(3));
    assert_eq!(resolved.auth_params.state().as_deref(), Some("foo"));
    assert_eq!(
        resolved.auth_params.connection_scope_for("twitter"),
        Some(vec!["grant1".to_string(), "grant2".to_string()])
    );
    let forwarded = resolved.auth_params.forwarded();
    assert_eq!(forwarded.len(), 1);
    assert_eq!(forwarded["access_type"], "offline");
    Ok(())
}

#[test]
fn malformed_document_is_reported_as_parse_error() {
    let err = WidgetOptions::from_json_str(r#"{ "connections": "twitter" }"#).unwrap_err();
    assert_eq!(err.code(), "invalid_options_document");
}

#[test]
fn settings_document_uses_host_spelling() -> anyhow::Result<()> {
    let settings: WidgetSettings =
        serde_json::from_str(r#"{ "clientID": "123456789", "domain": "abc.contoso.com" }"#)?;
    let resolved = resolve_settings(&settings)?;
    assert_eq!(resolved.client_id, "123456789");
    assert_eq!(resolved.assets_url, "https://abc.contoso.com/");
    assert_eq!(resolved.cdn, "https://abc.contoso.com/w2/");
    Ok(())
}
