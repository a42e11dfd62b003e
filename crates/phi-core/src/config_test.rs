use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

#[test]
fn parse_environment_development() {
    assert_eq!(
        parse_environment("development").unwrap(),
        Environment::Development
    );
}

#[test]
fn parse_environment_test() {
    assert_eq!(parse_environment("test").unwrap(), Environment::Test);
}

#[test]
fn parse_environment_production() {
    assert_eq!(
        parse_environment("production").unwrap(),
        Environment::Production
    );
}

#[test]
fn parse_environment_unknown_fails() {
    let err = parse_environment("staging").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "PHI_ENV"));
}

#[test]
fn build_app_config_uses_defaults_with_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).expect("defaults should be valid");
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.api_base_url, "http://localhost:7272");
    assert_eq!(cfg.log_level, "debug");
    assert_eq!(cfg.request_timeout_secs, 30);
    assert_eq!(cfg.user_agent, "phi-client/0.1");
    assert_eq!(cfg.poll_interval_ms, 2000);
    assert_eq!(cfg.notice_ttl_secs, 3);
    assert_eq!(cfg.max_retries, 3);
    assert_eq!(cfg.retry_backoff_base_ms, 1000);
    assert!(cfg.session_cookie.is_none());
}

#[test]
fn build_app_config_reads_overrides() {
    let mut map = HashMap::new();
    map.insert("PHI_API_BASE_URL", "https://phi.example.org");
    map.insert("PHI_ENV", "production");
    map.insert("PHI_POLL_INTERVAL_MS", "500");
    map.insert("PHI_NOTICE_TTL_SECS", "5");
    map.insert("PHI_SESSION_COOKIE", "abc123");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.api_base_url, "https://phi.example.org");
    assert_eq!(cfg.env, Environment::Production);
    assert_eq!(cfg.poll_interval_ms, 500);
    assert_eq!(cfg.notice_ttl_secs, 5);
    assert_eq!(cfg.session_cookie.as_deref(), Some("abc123"));
}

#[test]
fn build_app_config_rejects_non_http_base_url() {
    let mut map = HashMap::new();
    map.insert("PHI_API_BASE_URL", "ftp://phi.example.org");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "PHI_API_BASE_URL"),
        "expected InvalidEnvVar(PHI_API_BASE_URL), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_zero_poll_interval() {
    let mut map = HashMap::new();
    map.insert("PHI_POLL_INTERVAL_MS", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "PHI_POLL_INTERVAL_MS"),
        "expected InvalidEnvVar(PHI_POLL_INTERVAL_MS), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_non_numeric_timeout() {
    let mut map = HashMap::new();
    map.insert("PHI_REQUEST_TIMEOUT_SECS", "not-a-number");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "PHI_REQUEST_TIMEOUT_SECS"),
        "expected InvalidEnvVar(PHI_REQUEST_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_non_numeric_max_retries() {
    let mut map = HashMap::new();
    map.insert("PHI_MAX_RETRIES", "many");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "PHI_MAX_RETRIES"),
        "expected InvalidEnvVar(PHI_MAX_RETRIES), got: {result:?}"
    );
}

#[test]
fn blank_session_cookie_is_treated_as_unset() {
    let mut map = HashMap::new();
    map.insert("PHI_SESSION_COOKIE", "   ");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.session_cookie.is_none());
}

#[test]
fn debug_output_redacts_session_cookie() {
    let mut map = HashMap::new();
    map.insert("PHI_SESSION_COOKIE", "super-secret");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let rendered = format!("{cfg:?}");
    assert!(!rendered.contains("super-secret"));
    assert!(rendered.contains("[redacted]"));
}

#[test]
fn log_level_default_follows_environment() {
    for (env, expected) in [("development", "debug"), ("test", "warn"), ("production", "info")] {
        let map = HashMap::from([("PHI_ENV", env)]);
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.log_level, expected, "PHI_ENV={env}");
    }
}

#[test]
fn explicit_log_level_wins_over_environment() {
    let map = HashMap::from([("PHI_ENV", "production"), ("PHI_LOG_LEVEL", "trace")]);
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.log_level, "trace");
    assert!(!cfg.env.is_development());
}
