//! Validación de configuración (sin I/O).

use serde_json::json;
use sqlattribs_core::config::{DEFAULT_DSN, DEFAULT_IDENTIFYING_ATTRIBUTE, DEFAULT_TABLE};
use sqlattribs_core::{EngineConfig, EnrichError};

fn invalid(v: serde_json::Value) -> String {
    match EngineConfig::from_value(&v) {
        Err(EnrichError::InvalidConfig(msg)) => msg,
        other => panic!("expected InvalidConfig, got {other:?}"),
    }
}

#[test]
fn empty_config_uses_defaults() {
    let cfg = EngineConfig::from_value(&json!({})).unwrap();
    assert_eq!(cfg.identifying_attribute(), DEFAULT_IDENTIFYING_ATTRIBUTE);
    assert_eq!(cfg.database().dsn, DEFAULT_DSN);
    assert_eq!(cfg.database().table, DEFAULT_TABLE);
    assert!(!cfg.replace());
    assert!(!cfg.ignore_expiry());
    assert!(cfg.limit().is_none());
    assert!(cfg.database().credentials.username.is_none());
}

#[test]
fn full_config_is_parsed() {
    let cfg = EngineConfig::from_value(&json!({
        "identifyingAttribute": "uid",
        "database": {
            "dsn": "pgsql:host=db.example.org;dbname=idp",
            "username": "phpunit",
            "password": "phpunit",
            "driver_options": { "connect_timeout": 5, "sslmode": "require" },
            "table": "extra_attributes"
        },
        "replace": true,
        "limit": ["mail", "eduPersonAffiliation"],
        "ignoreExpiry": true
    })).unwrap();
    assert_eq!(cfg.identifying_attribute(), "uid");
    assert_eq!(cfg.database().dsn, "pgsql:host=db.example.org;dbname=idp");
    assert_eq!(cfg.database().table, "extra_attributes");
    assert_eq!(cfg.database().driver_options.get("connect_timeout").map(String::as_str), Some("5"));
    assert_eq!(cfg.database().driver_options.get("sslmode").map(String::as_str), Some("require"));
    assert!(cfg.replace());
    assert!(cfg.ignore_expiry());
    assert!(cfg.limit().unwrap().contains("mail"));
}

#[test]
fn legacy_attribute_key_is_accepted() {
    let cfg = EngineConfig::from_value(&json!({ "attribute": "uid" })).unwrap();
    assert_eq!(cfg.identifying_attribute(), "uid");
    let cfg = EngineConfig::from_value(&json!({ "attribute": "uid", "identifyingAttribute": "mail" })).unwrap();
    assert_eq!(cfg.identifying_attribute(), "mail");
}

#[test]
fn identifying_attribute_must_be_non_empty_string() {
    assert!(invalid(json!({ "identifyingAttribute": "" })).contains("identifyingAttribute"));
    assert!(invalid(json!({ "identifyingAttribute": 42 })).contains("identifyingAttribute"));
}

#[test]
fn empty_dsn_or_table_is_rejected() {
    assert!(invalid(json!({ "database": { "dsn": "" } })).contains("DSN"));
    assert!(invalid(json!({ "database": { "table": "" } })).contains("table"));
}

#[test]
fn wrongly_typed_database_keys_keep_defaults() {
    let cfg = EngineConfig::from_value(&json!({
        "database": { "dsn": 12, "table": ["x"], "username": false }
    })).unwrap();
    assert_eq!(cfg.database().dsn, DEFAULT_DSN);
    assert_eq!(cfg.database().table, DEFAULT_TABLE);
    assert!(cfg.database().credentials.username.is_none());
}

#[test]
fn limit_must_be_array_of_strings() {
    assert!(invalid(json!({ "limit": "mail" })).contains("limit"));
    assert!(invalid(json!({ "limit": ["mail", 3] })).contains("limit"));
    let cfg = EngineConfig::from_value(&json!({ "limit": [] })).unwrap();
    assert!(cfg.limit().unwrap().is_empty());
}

#[test]
fn flags_must_be_booleans() {
    invalid(json!({ "replace": "yes" }));
    invalid(json!({ "ignoreExpiry": 1 }));
}

#[test]
fn non_mapping_sections_are_rejected() {
    invalid(json!(["not", "a", "map"]));
    invalid(json!({ "database": "mysql:host=localhost" }));
    invalid(json!({ "database": { "driver_options": { "nested": { "a": 1 } } } }));
}

#[test]
fn builder_applies_same_rules() {
    let err = EngineConfig::builder().table("").build().unwrap_err();
    assert_eq!(err, EnrichError::invalid_config("invalid database table"));
    let cfg = EngineConfig::builder().dsn("sqlite::memory:")
                                     .replace(true)
                                     .limit(["mail"])
                                     .build()
                                     .unwrap();
    assert!(cfg.replace());
    assert_eq!(cfg.database().dsn, "sqlite::memory:");
}

#[test]
fn from_json_str_reports_malformed_documents() {
    assert!(matches!(EngineConfig::from_json_str("{"), Err(EnrichError::InvalidConfig(_))));
    assert!(EngineConfig::from_json_str(r#"{"replace": false}"#).is_ok());
}
