//! Casos límite del store real: sentinel de relying party, filas inválidas,
//! duplicados y fallos de conexión/consulta.
#![cfg(feature = "sqlite")]


use std::sync::Arc;

use sqlattribs::{attribute_set, AttributeFromSql, EngineConfig, EnrichError, EnrichOutcome, EventLevel, MemorySink, QueryPhase};
use test_support::{seeded_store, store_with, IDP, OTHER_SP};

fn engine(dsn: String) -> (AttributeFromSql, Arc<MemorySink>) {
    let cfg = EngineConfig::builder().dsn(dsn).build().expect("config");
    let sink = Arc::new(MemorySink::new());
    (AttributeFromSql::new(cfg).with_sink(sink.clone()), sink)
}

#[test]
fn relying_party_specific_rows_stay_with_their_relying_party() {
    let store = seeded_store();
    let (engine, _) = engine(store.dsn());

    let mut attrs = attribute_set! { "eduPersonPrincipalName" => ["user@example.org"] };
    engine.enrich(&mut attrs, OTHER_SP).unwrap();

    assert_eq!(attrs.get("eduPersonEntitlement").unwrap(),
               ["urn:mace:example.org:demo-admin", "urn:mace:example.org:other-sp-only"]);
}

#[test]
fn percent_is_an_exact_sentinel_not_a_pattern() {
    let store = seeded_store();
    let (engine, _) = engine(store.dsn());

    let mut attrs = attribute_set! { "eduPersonPrincipalName" => ["user@example.org"] };
    engine.enrich(&mut attrs, IDP).unwrap();
    assert!(!attrs.contains("eduPersonOrcid"));

    let mut attrs = attribute_set! { "eduPersonPrincipalName" => ["user@example.org"] };
    engine.enrich(&mut attrs, "https://idp.example.org/%").unwrap();
    assert_eq!(attrs.get("eduPersonOrcid").unwrap(), ["https://orcid.org/0000-0002-1825-0097"]);
}

#[test]
fn unknown_user_yields_no_rows() {
    let store = seeded_store();
    let (engine, sink) = engine(store.dsn());
    let mut attrs = attribute_set! { "eduPersonPrincipalName" => ["nobody@example.org"] };
    let before = attrs.clone();

    assert_eq!(engine.enrich(&mut attrs, IDP).unwrap(), EnrichOutcome::NoRows);
    assert_eq!(attrs, before);
    assert_eq!(sink.count(EventLevel::Info), 1);
}

#[test]
fn invalid_rows_are_skipped_with_a_debug_event() {
    let store = seeded_store();
    let (engine, sink) = engine(store.dsn());
    let mut attrs = attribute_set! { "eduPersonPrincipalName" => ["broken@example.org"] };

    let EnrichOutcome::Merged(stats) = engine.enrich(&mut attrs, IDP).unwrap() else {
        panic!("expected merge");
    };

    assert_eq!(stats.invalid, 3);
    assert_eq!(stats.appended, 1);
    assert_eq!(attrs.get("mail").unwrap(), ["broken@example.org"]);
    assert_eq!(sink.count(EventLevel::Debug), 3);
}

#[test]
fn duplicate_rows_collapse_into_one_value() {
    let store = seeded_store();
    let (engine, _) = engine(store.dsn());
    let mut attrs = attribute_set! { "eduPersonPrincipalName" => ["dup@example.org"] };

    engine.enrich(&mut attrs, IDP).unwrap();

    assert_eq!(attrs.get("mail").unwrap(), ["dup@example.org"]);
}

#[test]
fn replace_clears_once_then_appends_every_row() {
    let store = seeded_store();
    let cfg = EngineConfig::builder().dsn(store.dsn()).replace(true).build().unwrap();
    let engine = AttributeFromSql::new(cfg);
    let mut attrs = attribute_set! {
        "eduPersonPrincipalName" => ["multi@example.org"],
        "eduPersonAffiliation" => ["member", "student"],
    };

    engine.enrich(&mut attrs, IDP).unwrap();

    assert_eq!(attrs.get("eduPersonAffiliation").unwrap(), ["faculty", "staff"]);
}

#[test]
fn unreachable_database_is_a_connection_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("attributes.db");
    let (engine, sink) = engine(format!("sqlite:{}", path.display()));
    let mut attrs = attribute_set! { "eduPersonPrincipalName" => ["user@example.org"] };
    let before = attrs.clone();

    let err = engine.enrich(&mut attrs, IDP).unwrap_err();

    assert!(matches!(err, EnrichError::Connection { .. }), "got {err:?}");
    assert_eq!(attrs, before);
    assert_eq!(sink.count(EventLevel::Error), 1);
}

#[test]
fn missing_table_is_a_query_error() {
    let store = store_with("CREATE TABLE unrelated (id INTEGER PRIMARY KEY);");
    let (engine, _) = engine(store.dsn());
    let mut attrs = attribute_set! { "eduPersonPrincipalName" => ["user@example.org"] };
    let before = attrs.clone();

    let err = engine.enrich(&mut attrs, IDP).unwrap_err();

    let EnrichError::Query { phase, message } = err else {
        panic!("expected query error, got {err:?}");
    };
    assert_eq!(phase, QueryPhase::Prepare);
    assert!(message.contains("AttributeFromSQL"), "{message}");
    assert_eq!(attrs, before);
}

#[test]
fn custom_table_name_is_used_verbatim() {
    let store = store_with(
        "CREATE TABLE extra_attrs (uid TEXT, sp TEXT, attribute TEXT, value TEXT, expires DATE DEFAULT '9999-12-31');
         INSERT INTO extra_attrs (uid, sp, attribute, value) VALUES ('user@example.org', '%', 'mail', 'user@example.org');",
    );
    let cfg = EngineConfig::builder().dsn(store.dsn()).table("extra_attrs").build().unwrap();
    let engine = AttributeFromSql::new(cfg);
    let mut attrs = attribute_set! { "eduPersonPrincipalName" => ["user@example.org"] };

    engine.enrich(&mut attrs, IDP).unwrap();

    assert_eq!(attrs.get("mail").unwrap(), ["user@example.org"]);
}

#[test]
fn sqlite_driver_options_become_pragmas() {
    let store = seeded_store();
    let cfg = EngineConfig::builder().dsn(store.dsn())
                                     .driver_option("busy_timeout", "2000")
                                     .build()
                                     .unwrap();
    let engine = AttributeFromSql::new(cfg);
    let mut attrs = attribute_set! { "eduPersonPrincipalName" => ["other@example.org"] };

    engine.enrich(&mut attrs, IDP).unwrap();

    assert_eq!(attrs.get("mail").unwrap(), ["other@example.org"]);
}

#[test]
fn malformed_sqlite_driver_option_is_rejected_before_connecting() {
    let store = seeded_store();
    let cfg = EngineConfig::builder().dsn(store.dsn())
                                     .driver_option("busy_timeout; DROP TABLE AttributeFromSQL", "1")
                                     .build()
                                     .unwrap();
    let engine = AttributeFromSql::new(cfg);
    let mut attrs = attribute_set! { "eduPersonPrincipalName" => ["other@example.org"] };

    assert!(matches!(engine.enrich(&mut attrs, IDP), Err(EnrichError::Connection { .. })));
}
