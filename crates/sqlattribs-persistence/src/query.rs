//! Consulta de lookup.
//!
//! Forma generada (con `<q>` el carácter de quoting del dialecto):
//!
//! ```text
//! SELECT <q>attribute<q>, <q>value<q> FROM <table>
//! WHERE <q>uid<q> = ? AND (<q>sp<q> = '%' OR <q>sp<q> = ?)
//! [AND <q>expires<q> > CURRENT_DATE]
//! ```
//!
//! `'%'` es un valor centinela de igualdad exacta (fila válida para cualquier
//! relying party), no un patrón LIKE. El nombre de tabla se interpola sin
//! parametrizar: la configuración es la frontera de confianza.

use sqlattribs_core::EngineConfig;

use crate::dialect::Dialect;

/// Sintaxis de placeholders del backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Placeholders {
    /// `?` (MySQL, SQLite).
    #[default]
    Positional,
    /// `$1`, `$2`, ... (Postgres).
    Numbered,
}

impl Placeholders {
    fn nth(self, n: usize) -> String {
        match self {
            Placeholders::Positional => "?".to_owned(),
            Placeholders::Numbered => format!("${n}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupQuery {
    table: String,
    dialect: Dialect,
    check_expiry: bool,
}

impl LookupQuery {
    pub fn new(table: impl Into<String>, dialect: Dialect, ignore_expiry: bool) -> Self {
        Self { table: table.into(),
               dialect,
               check_expiry: !ignore_expiry }
    }

    pub fn for_config(config: &EngineConfig, dialect: Dialect) -> Self {
        Self::new(config.database().table.clone(), dialect, config.ignore_expiry())
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn checks_expiry(&self) -> bool {
        self.check_expiry
    }

    /// SQL con placeholders `?`. Parámetros: valor identificador, relying party.
    pub fn sql(&self) -> String {
        self.to_sql(Placeholders::Positional)
    }

    pub fn to_sql(&self, placeholders: Placeholders) -> String {
        let q = |ident: &str| self.dialect.quote(ident);
        let mut sql = format!("SELECT {}, {} FROM {} WHERE {} = {} AND ({} = '%' OR {} = {})",
                              q("attribute"),
                              q("value"),
                              self.table,
                              q("uid"),
                              placeholders.nth(1),
                              q("sp"),
                              q("sp"),
                              placeholders.nth(2));
        if self.check_expiry {
            sql.push_str(&format!(" AND {} > CURRENT_DATE", q("expires")));
        }
        sql
    }
}
