//! sqlattribs-persistence
//!
//! Acceso al store relacional (Diesel) y el motor de enriquecimiento.
//!
//! Módulos:
//! - `dsn`: traducción del descriptor de conexión (estilo PDO o URL) al
//!   formato nativo de cada backend.
//! - `dialect`: quoting de identificadores e init de sesión por esquema.
//! - `query`: construcción de la consulta de lookup.
//! - `connection`: conexión por invocación (sin pool) y lectura de filas.
//! - `engine`: `AttributeFromSql`, el filtro que el host invoca.

#[cfg(not(any(feature = "sqlite", feature = "postgres", feature = "mysql")))]
compile_error!("enable at least one store backend feature: `sqlite`, `postgres` or `mysql`");

pub mod connection;
pub mod dialect;
pub mod dsn;
pub mod engine;
pub mod error;
pub mod query;

pub use connection::{AttributeStore, ConnectionProvider, DieselConnector};
pub use dialect::Dialect;
pub use dsn::{ConnectTarget, Driver};
pub use engine::{AttributeFromSql, EnrichOutcome};
pub use query::{LookupQuery, Placeholders};
