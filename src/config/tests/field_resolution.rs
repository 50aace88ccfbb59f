//! Tests for `require_api_url`, `resolve_token`, and `resource_kind`.

use rstest::rstest;

use crate::AlarmdeskConfig;
use crate::api::ApiError;
use crate::config::SESSION_TOKEN_ENV;
use crate::resources::Resource;

#[rstest]
fn require_api_url_returns_value_when_present() {
    let config = AlarmdeskConfig {
        api_url: Some("https://alarms.example.com/api/".to_owned()),
        ..Default::default()
    };

    assert_eq!(
        config.require_api_url(),
        Ok("https://alarms.example.com/api/")
    );
}

#[rstest]
#[case::missing(None)]
#[case::blank(Some("  "))]
fn require_api_url_rejects_missing_values(#[case] api_url: Option<&str>) {
    let config = AlarmdeskConfig {
        api_url: api_url.map(str::to_owned),
        ..Default::default()
    };

    assert_eq!(config.require_api_url(), Err(ApiError::MissingBaseUrl));
}

#[rstest]
fn resolve_token_prefers_configured_value() {
    let _guard = env_lock::lock_env([(SESSION_TOKEN_ENV, Some("session-token"))]);
    let config = AlarmdeskConfig {
        token: Some("configured".to_owned()),
        ..Default::default()
    };

    let token = config.resolve_token().expect("token should resolve");
    assert_eq!(token.value(), "configured");
}

#[rstest]
fn resolve_token_falls_back_to_session_variable() {
    let _guard = env_lock::lock_env([(SESSION_TOKEN_ENV, Some("session-token"))]);
    let config = AlarmdeskConfig::default();

    let token = config.resolve_token().expect("token should resolve");
    assert_eq!(token.value(), "session-token");
}

#[rstest]
fn resolve_token_returns_error_when_none() {
    let _guard = env_lock::lock_env([(SESSION_TOKEN_ENV, None::<&str>)]);
    let config = AlarmdeskConfig::default();

    assert!(matches!(
        config.resolve_token(),
        Err(ApiError::MissingToken)
    ));
}

#[rstest]
#[case(None, Resource::Properties)]
#[case(Some("jobs"), Resource::AlarmJobs)]
#[case(Some("beeping-alarms"), Resource::BeepingAlarms)]
fn resource_kind_defaults_to_properties(#[case] raw: Option<&str>, #[case] expected: Resource) {
    let config = AlarmdeskConfig {
        resource: raw.map(str::to_owned),
        ..Default::default()
    };

    assert_eq!(config.resource_kind(), Ok(expected));
}

#[rstest]
fn resource_kind_rejects_unknown_names() {
    let config = AlarmdeskConfig {
        resource: Some("tenants".to_owned()),
        ..Default::default()
    };

    assert!(matches!(
        config.resource_kind(),
        Err(ApiError::Configuration { message }) if message.contains("tenants")
    ));
}
