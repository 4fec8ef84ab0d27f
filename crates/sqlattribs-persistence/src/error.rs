//! Mapeo de errores de Diesel a la taxonomía del filtro.
//!
//! Diesel prepara, ejecuta y materializa en una sola llamada (`load`), así que
//! la fase se infiere de la variante del error y, para errores del servidor,
//! del mensaje: tabla/columna inexistente o error de sintaxis ocurren al
//! preparar la sentencia.

use diesel::result::{ConnectionError, DatabaseErrorInformation, Error as DieselError};
use sqlattribs_core::{EnrichError, QueryPhase};

pub fn phase_of(err: &DieselError) -> QueryPhase {
    match err {
        DieselError::QueryBuilderError(_) | DieselError::InvalidCString(_) => QueryPhase::Prepare,
        DieselError::DeserializationError(_) => QueryPhase::Fetch,
        DieselError::DatabaseError(_, info) if rejected_at_prepare(&**info) => QueryPhase::Prepare,
        _ => QueryPhase::Execute,
    }
}

// Mensajes de SQLite, Postgres y MySQL para sentencias que no compilan.
fn rejected_at_prepare(info: &(dyn DatabaseErrorInformation + Send + Sync)) -> bool {
    let msg = info.message().to_ascii_lowercase();
    msg.starts_with("no such table")
    || msg.starts_with("no such column")
    || msg.contains("syntax error")
    || ((msg.starts_with("relation ") || msg.starts_with("column ")) && msg.contains("does not exist"))
    || (msg.starts_with("table ") && msg.contains("doesn't exist"))
    || msg.starts_with("unknown column")
}

pub fn query_error(err: DieselError) -> EnrichError {
    let phase = phase_of(&err);
    let message = match &err {
        DieselError::DatabaseError(kind, info) => format!("db error kind {:?}: {}", kind, info.message()),
        DieselError::DeserializationError(e) => format!("deser: {e}"),
        DieselError::QueryBuilderError(e) => format!("query builder: {e}"),
        other => other.to_string(),
    };
    EnrichError::query(phase, message)
}

pub fn connect_error(descriptor: &str, err: ConnectionError) -> EnrichError {
    EnrichError::connection(descriptor, err.to_string())
}

/// Falla de las sentencias de init de sesión: la conexión no es utilizable.
pub fn session_error(descriptor: &str, statement: &str, err: DieselError) -> EnrichError {
    EnrichError::connection(descriptor, format!("session init `{statement}` failed: {err}"))
}
