//! sqlattribs
//!
//! Paso de enriquecimiento de atributos para un intercambio de identidad
//! federada: busca pares `(attribute, value)` en un store relacional, por
//! valor identificador y relying party, y los fusiona en el conjunto de
//! atributos antes de emitir la aserción.
//!
//! Este crate sólo re-exporta la API pública:
//! - `sqlattribs-core`: modelo, configuración, errores, eventos y merge.
//! - `sqlattribs-persistence`: dialectos, consulta y el filtro `AttributeFromSql`.
//!
//! Uso típico desde el host:
//!
//! ```no_run
//! use sqlattribs::{AttributeFromSql, FilterChain, RequestState};
//!
//! let filter = AttributeFromSql::from_value(&serde_json::json!({
//!     "identifyingAttribute": "eduPersonPrincipalName",
//!     "database": { "dsn": "sqlite:/var/lib/idp/attributes.db" },
//!     "limit": ["eduPersonEntitlement"]
//! })).expect("valid config");
//! let chain = FilterChain::new().push(filter);
//! let mut state = RequestState::default();
//! chain.run(&mut state).expect("enrichment");
//! ```

pub use sqlattribs_core::{attribute_set, config, AttributeSet, Credentials, DatabaseConfig, Destination, EngineConfig, EngineConfigBuilder, EnrichError, Event, EventLevel, EventSink, FilterChain, LogSink, LookupContext, MemorySink, MergePolicy, MergeStats, NullSink, ProcessingFilter, QueryPhase, RequestState, ResultRow};
pub use sqlattribs_persistence::{dsn, AttributeFromSql, AttributeStore, ConnectionProvider, Dialect, DieselConnector, EnrichOutcome, LookupQuery, Placeholders};
