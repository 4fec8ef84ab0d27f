//! Conexión al store por invocación.
//!
//! No hay pool: cada invocación abre una conexión, ejecuta una consulta y la
//! libera al salir de scope (también en los caminos de error). Los timeouts
//! quedan en manos del driver vía `driver_options`.

use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::sql_types::{Nullable, Text};
use log::debug;
use sqlattribs_core::{DatabaseConfig, EnrichError, LookupContext, ResultRow};

#[cfg(feature = "mysql")]
use diesel::mysql::MysqlConnection;
#[cfg(feature = "postgres")]
use diesel::pg::PgConnection;
#[cfg(feature = "sqlite")]
use diesel::sqlite::SqliteConnection;

use crate::dialect::Dialect;
use crate::dsn::{self, ConnectTarget, Driver};
use crate::error::{connect_error, query_error, session_error};
use crate::query::{LookupQuery, Placeholders};

/// Conexión abierta y lista para el lookup.
pub trait AttributeStore {
    /// Dialecto seleccionado al conectar.
    fn dialect(&self) -> Dialect;

    /// Ejecuta `query` con `(valor identificador, relying party)` y devuelve
    /// las filas en el orden del store.
    fn fetch(&mut self, query: &LookupQuery, ctx: &LookupContext) -> Result<Vec<ResultRow>, EnrichError>;
}

/// Proveedor abstracto de conexiones.
///
/// Permite inyectar el conector real (Diesel) o uno simulado en tests.
/// Contrato: devolver un store inicializado o `EnrichError::Connection`.
pub trait ConnectionProvider: Send + Sync {
    fn connect(&self, db: &DatabaseConfig) -> Result<Box<dyn AttributeStore>, EnrichError>;
}

/// Conector Diesel: un `Connection::establish` por llamada.
#[derive(Debug, Clone, Copy, Default)]
pub struct DieselConnector;

impl ConnectionProvider for DieselConnector {
    fn connect(&self, db: &DatabaseConfig) -> Result<Box<dyn AttributeStore>, EnrichError> {
        let descriptor = dsn::redact(&db.dsn);
        let target = dsn::resolve(db)?;
        debug!("connect:start driver={} descriptor={descriptor}", target.driver.name());
        let conn = StoreConnection::establish(&target).map_err(|e| match e {
                                                          EstablishError::Diesel(e) => connect_error(&descriptor, e),
                                                          EstablishError::Disabled(driver) => {
                                                              EnrichError::connection(&descriptor,
                                                                                      format!("driver '{}' not enabled in this build", driver.name()))
                                                          }
                                                      })?;
        let mut store = DieselStore { conn,
                                      dialect: Dialect::from_descriptor(&db.dsn),
                                      descriptor };
        store.initialize(&target)?;
        debug!("connect:done dialect={:?}", store.dialect);
        Ok(Box::new(store))
    }
}

/// Fila leída vía `sql_query`; las columnas se resuelven por nombre.
#[derive(QueryableByName, Debug)]
struct AttributeRow {
    #[diesel(sql_type = Nullable<Text>)]
    attribute: Option<String>,
    #[diesel(sql_type = Nullable<Text>)]
    value: Option<String>,
}

impl From<AttributeRow> for ResultRow {
    fn from(row: AttributeRow) -> Self {
        ResultRow { attribute: row.attribute,
                    value: row.value }
    }
}

#[allow(dead_code)]
enum EstablishError {
    Diesel(diesel::result::ConnectionError),
    Disabled(Driver),
}

/// Conexión concreta según el backend compilado.
pub enum StoreConnection {
    #[cfg(feature = "postgres")]
    Pg(PgConnection),
    #[cfg(feature = "mysql")]
    Mysql(MysqlConnection),
    #[cfg(feature = "sqlite")]
    Sqlite(SqliteConnection),
}

// Mismo cuerpo para cada backend; cada brazo se tipa por separado.
macro_rules! with_connection {
    ($self:expr, $conn:ident => $body:expr) => {
        match $self {
            #[cfg(feature = "postgres")]
            StoreConnection::Pg($conn) => $body,
            #[cfg(feature = "mysql")]
            StoreConnection::Mysql($conn) => $body,
            #[cfg(feature = "sqlite")]
            StoreConnection::Sqlite($conn) => $body,
        }
    };
}

impl StoreConnection {
    fn establish(target: &ConnectTarget) -> Result<Self, EstablishError> {
        match target.driver {
            #[cfg(feature = "postgres")]
            Driver::Postgres => PgConnection::establish(&target.url).map(StoreConnection::Pg)
                                                                     .map_err(EstablishError::Diesel),
            #[cfg(feature = "mysql")]
            Driver::Mysql => MysqlConnection::establish(&target.url).map(StoreConnection::Mysql)
                                                                    .map_err(EstablishError::Diesel),
            #[cfg(feature = "sqlite")]
            Driver::Sqlite => SqliteConnection::establish(&target.url).map(StoreConnection::Sqlite)
                                                                      .map_err(EstablishError::Diesel),
            #[allow(unreachable_patterns)]
            other => Err(EstablishError::Disabled(other)),
        }
    }

    pub fn placeholders(&self) -> Placeholders {
        match self {
            #[cfg(feature = "postgres")]
            StoreConnection::Pg(_) => Placeholders::Numbered,
            #[allow(unreachable_patterns)]
            _ => Placeholders::Positional,
        }
    }

    fn batch_execute(&mut self, sql: &str) -> QueryResult<()> {
        with_connection!(self, conn => conn.batch_execute(sql))
    }

    fn load_rows(&mut self, sql: &str, uid: &str, sp: &str) -> QueryResult<Vec<AttributeRow>> {
        with_connection!(self, conn => diesel::sql_query(sql).bind::<Text, _>(uid)
                                                             .bind::<Text, _>(sp)
                                                             .load::<AttributeRow>(conn))
    }
}

struct DieselStore {
    conn: StoreConnection,
    dialect: Dialect,
    descriptor: String,
}

impl DieselStore {
    /// Init específico del dialecto y `PRAGMA`s de SQLite. Cualquier fallo
    /// invalida la conexión.
    fn initialize(&mut self, target: &ConnectTarget) -> Result<(), EnrichError> {
        for stmt in self.dialect.init_statements() {
            self.conn
                .batch_execute(stmt)
                .map_err(|e| session_error(&self.descriptor, stmt, e))?;
        }
        for (key, value) in &target.pragmas {
            let stmt = format!("PRAGMA {key} = {value}");
            self.conn
                .batch_execute(&stmt)
                .map_err(|e| session_error(&self.descriptor, &stmt, e))?;
        }
        Ok(())
    }
}

impl AttributeStore for DieselStore {
    fn dialect(&self) -> Dialect {
        self.dialect
    }

    fn fetch(&mut self, query: &LookupQuery, ctx: &LookupContext) -> Result<Vec<ResultRow>, EnrichError> {
        let sql = query.to_sql(self.conn.placeholders());
        debug!("fetch:start sql={sql}");
        let rows = self.conn
                       .load_rows(&sql, ctx.identifying_value(), ctx.relying_party())
                       .map_err(query_error)?;
        debug!("fetch:done rows={}", rows.len());
        Ok(rows.into_iter().map(ResultRow::from).collect())
    }
}

impl Drop for DieselStore {
    fn drop(&mut self) {
        debug!("connect:release descriptor={}", self.descriptor);
    }
}

#[cfg(all(test, feature = "sqlite"))]
mod tests {
    use super::*;
    use sqlattribs_core::{EngineConfig, QueryPhase};

    fn memory_db() -> DatabaseConfig {
        EngineConfig::builder().dsn("sqlite::memory:").build().unwrap().database().clone()
    }

    #[test]
    fn in_memory_store_uses_generic_dialect() {
        let store = DieselConnector.connect(&memory_db()).unwrap();
        assert_eq!(store.dialect(), Dialect::Generic);
    }

    #[test]
    fn missing_table_fails_in_prepare_phase() {
        let mut store = DieselConnector.connect(&memory_db()).unwrap();
        let query = LookupQuery::new("AttributeFromSQL", store.dialect(), false);
        let err = store.fetch(&query, &LookupContext::new("user@example.org", "sp")).unwrap_err();
        assert!(matches!(err, EnrichError::Query { phase: QueryPhase::Prepare, .. }), "{err:?}");
    }

    #[test]
    fn pragma_driver_options_run_after_connect() {
        let mut db = memory_db();
        db.driver_options.insert("busy_timeout".into(), "1500".into());
        assert!(DieselConnector.connect(&db).is_ok());
    }
}
