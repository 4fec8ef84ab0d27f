//! Lookup contra un Postgres real. Requiere `DATABASE_URL` y la feature
//! `postgres`; sin la variable el test se omite.
#![cfg(feature = "postgres")]

use diesel::connection::SimpleConnection;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use sqlattribs_core::{attribute_set, EngineConfig};
use sqlattribs_persistence::{AttributeFromSql, EnrichOutcome};

const SP: &str = "https://idp.example.org/idp/shibboleth";

#[test]
fn pg_lookup_with_numbered_placeholders() {
    let Ok(url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set; skipping integration test");
        return;
    };
    let table = format!("attrs_it_{}", std::process::id());
    let mut admin = PgConnection::establish(&url).expect("connect");
    admin.batch_execute(&format!(
        "CREATE TABLE {table} (uid TEXT NOT NULL, sp TEXT NOT NULL DEFAULT '%', attribute TEXT, value TEXT,
                               expires DATE NOT NULL DEFAULT '9999-12-31');
         INSERT INTO {table} (uid, sp, attribute, value) VALUES
             ('user@example.org', '%', 'eduPersonAffiliation', 'faculty'),
             ('user@example.org', '{SP}', 'eduPersonEntitlement', 'urn:mace:grnet.gr:eduroam:admin'),
             ('user@example.org', 'https://sp.example.org/other', 'eduPersonEntitlement', 'urn:x:other');
         INSERT INTO {table} (uid, sp, attribute, value, expires) VALUES
             ('user@example.org', '%', 'mail', 'marty@example.org', '2015-10-21');"
    ))
         .expect("seed");

    let cfg = EngineConfig::builder().dsn(url.clone()).table(table.clone()).build().expect("config");
    let engine = AttributeFromSql::new(cfg);
    let mut attrs = attribute_set! { "eduPersonPrincipalName" => ["user@example.org"] };
    let outcome = engine.enrich(&mut attrs, SP);

    admin.batch_execute(&format!("DROP TABLE {table}")).expect("cleanup");

    assert!(matches!(outcome.expect("enrich"), EnrichOutcome::Merged(_)));
    assert_eq!(attrs.get("eduPersonAffiliation").unwrap(), ["faculty"]);
    assert_eq!(attrs.get("eduPersonEntitlement").unwrap(), ["urn:mace:grnet.gr:eduroam:admin"]);
    assert!(!attrs.contains("mail"));
}
