//! Configuration tests
//!
//! These tests guard the file template against drift: every field written by
//! `to_toml()` must parse back, and env values must win over file values.

use super::*;
use std::collections::HashMap;

fn no_env(_: &str) -> Option<String> {
    None
}

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key: &str| map.get(key).cloned()
}

// ─────────────────────────────────────────────────────────────────────────────
// Round-trip tests
// ─────────────────────────────────────────────────────────────────────────────

/// Verify that the serialized default config parses back to the same values
#[test]
fn test_config_roundtrip_default() {
    let toml_str = Config::default().to_toml();

    let file = Config::parse_file_config(&toml_str).unwrap_or_else(|e| {
        panic!("Default config should round-trip.\nTOML:\n{}\nError: {:?}", toml_str, e)
    });
    let config = Config::from_sources(file, no_env).unwrap();

    assert_eq!(config.theme, "dark");
    assert_eq!(config.session.max_length, 300);
    assert_eq!(config.processor.kind, ProcessorKind::Mock);
    assert_eq!(config.processor.delay_ms, 1000);
    assert_eq!(config.server.bind_addr.to_string(), "127.0.0.1:8787");
    assert_eq!(config.logging.file_rotation, LogRotation::Daily);
    assert!(config.clipboard.fallback);
}

/// Every section of a customized config survives serialization
#[test]
fn test_config_roundtrip_custom_values() {
    let mut config = Config::default();
    config.theme = "nord".to_string();
    config.session.max_length = 42;
    config.processor.kind = ProcessorKind::Remote;
    config.processor.endpoint = "http://example.test/api/process".to_string();
    config.processor.timeout_secs = 5;
    config.clipboard.fallback = false;
    config.logging.file_enabled = true;
    config.logging.file_rotation = LogRotation::Hourly;

    let file = Config::parse_file_config(&config.to_toml()).unwrap();
    let parsed = Config::from_sources(file, no_env).unwrap();

    assert_eq!(parsed.theme, "nord");
    assert_eq!(parsed.session.max_length, 42);
    assert_eq!(parsed.processor.kind, ProcessorKind::Remote);
    assert_eq!(parsed.processor.endpoint, "http://example.test/api/process");
    assert_eq!(parsed.processor.timeout_secs, 5);
    assert!(!parsed.clipboard.fallback);
    assert!(parsed.logging.file_enabled);
    assert_eq!(parsed.logging.file_rotation, LogRotation::Hourly);
}

// ─────────────────────────────────────────────────────────────────────────────
// Precedence tests
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_empty_file_uses_defaults() {
    let file = Config::parse_file_config("").unwrap();
    let config = Config::from_sources(file, no_env).unwrap();
    assert_eq!(config.session.max_length, crate::session::MAX_LENGTH);
    assert_eq!(config.processor.kind, ProcessorKind::Mock);
}

#[test]
fn test_env_overrides_file() {
    let file = Config::parse_file_config(
        r#"
theme = "light"
[session]
max_length = 100
[processor]
kind = "failing"
delay_ms = 5
[server]
bind_addr = "0.0.0.0:9000"
"#,
    )
    .unwrap();

    let env = env_from(&[
        (ENV_THEME, "nord"),
        (ENV_MAX_LENGTH, "50"),
        (ENV_PROCESSOR, "mock"),
        (ENV_BIND, "127.0.0.1:9999"),
    ]);
    let config = Config::from_sources(file, env).unwrap();

    assert_eq!(config.theme, "nord");
    assert_eq!(config.session.max_length, 50);
    assert_eq!(config.processor.kind, ProcessorKind::Mock);
    // Not overridden by env
    assert_eq!(config.processor.delay_ms, 5);
    assert_eq!(config.server.bind_addr.port(), 9999);
}

// ─────────────────────────────────────────────────────────────────────────────
// Validation tests
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_unknown_processor_rejected() {
    let file = Config::parse_file_config("[processor]\nkind = \"telepathy\"\n").unwrap();
    let err = Config::from_sources(file, no_env).unwrap_err();
    assert!(err.to_string().contains("telepathy"), "{}", err);
}

#[test]
fn test_zero_max_length_rejected() {
    let file = Config::parse_file_config("[session]\nmax_length = 0\n").unwrap();
    assert!(Config::from_sources(file, no_env).is_err());
}

#[test]
fn test_bad_bind_address_rejected() {
    let file = Config::parse_file_config("").unwrap();
    let env = env_from(&[(ENV_BIND, "not-an-address")]);
    assert!(Config::from_sources(file, env).is_err());
}

#[test]
fn test_malformed_toml_rejected() {
    assert!(Config::parse_file_config("theme = ").is_err());
}

#[test]
fn test_unknown_rotation_falls_back_to_daily() {
    assert_eq!(LogRotation::parse("weekly"), LogRotation::Daily);
    assert_eq!(LogRotation::parse("HOURLY"), LogRotation::Hourly);
}
