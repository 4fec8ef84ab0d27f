//! Motor de enriquecimiento: `AttributeFromSql`.
//!
//! Una invocación = conectar -> consultar -> leer -> merge, en ese orden y de
//! forma síncrona. El merge sólo ocurre tras una lectura completa y exitosa:
//! ante un error fatal el `AttributeSet` queda intacto.
//!
//! La configuración es de sólo lectura tras la construcción, por lo que una
//! misma instancia puede atender invocaciones concurrentes del host sin
//! sincronización adicional.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use sqlattribs_core::{merge_rows, AttributeSet, EngineConfig, EnrichError, EventSink, LogSink, LookupContext, MergePolicy, MergeStats, ProcessingFilter, RequestState, ResultRow};

use crate::connection::{ConnectionProvider, DieselConnector};
use crate::query::LookupQuery;

pub const FILTER_NAME: &str = "AttributeFromSQL";

/// Resultado de una invocación exitosa.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnrichOutcome {
    /// El atributo identificador no está: no se accedió al store.
    Declined,
    /// El store no devolvió filas; atributos sin cambios.
    NoRows,
    Merged(MergeStats),
}

pub struct AttributeFromSql<P: ConnectionProvider = DieselConnector> {
    config: EngineConfig,
    provider: P,
    sink: Arc<dyn EventSink>,
}

impl AttributeFromSql<DieselConnector> {
    pub fn new(config: EngineConfig) -> Self {
        Self::with_provider(config, DieselConnector)
    }

    /// Valida la configuración dinámica y construye el filtro.
    pub fn from_value(raw: &Value) -> Result<Self, EnrichError> {
        EngineConfig::from_value(raw).map(Self::new)
    }
}

impl<P: ConnectionProvider> AttributeFromSql<P> {
    pub fn with_provider(config: EngineConfig, provider: P) -> Self {
        Self { config,
               provider,
               sink: Arc::new(LogSink) }
    }

    /// Reemplaza el sink de eventos (por defecto `LogSink`).
    pub fn with_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Enriquece `attributes` para la relying party `relying_party`.
    pub fn enrich(&self, attributes: &mut AttributeSet, relying_party: &str) -> Result<EnrichOutcome, EnrichError> {
        let identifying = self.config.identifying_attribute();
        let Some(ctx) = LookupContext::resolve(identifying, attributes, relying_party) else {
            self.sink.info(&format!("attribute '{identifying}' not set, declining"));
            return Ok(EnrichOutcome::Declined);
        };

        let rows = match self.lookup(&ctx) {
            Ok(rows) => rows,
            Err(e) => {
                self.sink.error(&format!("enrichment aborted for {identifying}='{}': {e}", ctx.identifying_value()));
                return Err(e);
            }
        };

        if rows.is_empty() {
            self.sink.info(&format!("no additional attributes for {identifying}='{}'", ctx.identifying_value()));
            return Ok(EnrichOutcome::NoRows);
        }

        let policy = MergePolicy { replace: self.config.replace(),
                                   limit: self.config.limit() };
        Ok(EnrichOutcome::Merged(merge_rows(attributes, rows, policy, self.sink.as_ref())))
    }

    // La conexión vive sólo dentro de esta función.
    fn lookup(&self, ctx: &LookupContext) -> Result<Vec<ResultRow>, EnrichError> {
        let mut store = self.provider.connect(self.config.database())?;
        let query = LookupQuery::for_config(&self.config, store.dialect());
        store.fetch(&query, ctx)
    }
}

impl<P: ConnectionProvider> ProcessingFilter for AttributeFromSql<P> {
    fn name(&self) -> &str {
        FILTER_NAME
    }

    fn process(&self, state: &mut RequestState) -> Result<(), EnrichError> {
        self.enrich(&mut state.attributes, &state.destination.entity_id)
            .map(|_| ())
    }
}

impl<P: ConnectionProvider> fmt::Debug for AttributeFromSql<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttributeFromSql")
         .field("config", &self.config)
         .finish_non_exhaustive()
    }
}
