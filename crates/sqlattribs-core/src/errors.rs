//! Errores del filtro de enriquecimiento.
//!
//! Las tres variantes son fatales para la invocación en curso; ninguna se
//! reintenta localmente. Las anomalías por fila (nombre vacío, valor nulo,
//! atributo fuera del allow-list, duplicados) no son errores.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fase de la consulta en la que ocurrió el fallo.
///
/// `Prepare` cubre también las sentencias que el servidor rechaza al
/// compilarlas (tabla o columna inexistente, sintaxis).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QueryPhase {
    Prepare,
    Execute,
    Fetch,
}

impl QueryPhase {
    pub fn as_str(self) -> &'static str {
        match self {
            QueryPhase::Prepare => "prepare",
            QueryPhase::Execute => "execute",
            QueryPhase::Fetch => "fetch",
        }
    }
}

impl fmt::Display for QueryPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EnrichError {
    /// Configuración inválida detectada en construcción (no reintentable).
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// Store inalcanzable, credenciales rechazadas o init de sesión fallida.
    #[error("failed to connect to '{descriptor}': {message}")]
    Connection { descriptor: String, message: String },
    #[error("{phase}() failed: {message}")]
    Query { phase: QueryPhase, message: String },
}

impl EnrichError {
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    pub fn connection(descriptor: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Connection { descriptor: descriptor.into(),
                           message: message.into() }
    }

    pub fn query(phase: QueryPhase, message: impl Into<String>) -> Self {
        Self::Query { phase,
                      message: message.into() }
    }

    /// Etiqueta estable para logs / códigos de salida.
    pub fn kind(&self) -> &'static str {
        match self {
            EnrichError::InvalidConfig(_) => "invalid_config",
            EnrichError::Connection { .. } => "connection",
            EnrichError::Query { .. } => "query",
        }
    }
}
