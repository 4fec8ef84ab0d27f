//! sqlattribs-core
//!
//! Núcleo sin I/O del filtro de enriquecimiento de atributos: modelo de datos,
//! configuración tipada y validada, taxonomía de errores, sink de eventos
//! inyectable y la política determinista de merge.
//!
//! Módulos:
//! - `model`: `AttributeSet`, `LookupContext`, `RequestState`, `ResultRow`.
//! - `config`: `EngineConfig` (validación única en construcción).
//! - `errors`: `EnrichError` / `QueryPhase`.
//! - `event`: `EventSink` y sus implementaciones (`LogSink`, `MemorySink`).
//! - `merge`: fusión de filas en el `AttributeSet`.
//! - `filter`: contrato `ProcessingFilter` y `FilterChain` para el host.

pub mod config;
pub mod errors;
pub mod event;
pub mod filter;
pub mod merge;
pub mod model;

pub use config::{Credentials, DatabaseConfig, EngineConfig, EngineConfigBuilder};
pub use errors::{EnrichError, QueryPhase};
pub use event::{Event, EventLevel, EventSink, LogSink, MemorySink, NullSink};
pub use filter::{FilterChain, ProcessingFilter};
pub use merge::{merge_rows, MergePolicy, MergeStats};
pub use model::{AttributeSet, Destination, LookupContext, RequestState, ResultRow};
