//! Selección de dialecto a partir del esquema del descriptor.
//!
//! El esquema es el texto previo al primer `:` (sin distinguir mayúsculas):
//! - `mysql`: sesión en UTF-8, identificadores entre backticks.
//! - `pgsql`: sesión en UTF-8, identificadores entre comillas dobles.
//! - cualquier otro: sin init, comillas dobles (SQL:1999).

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dialect {
    MySql,
    PgSql,
    #[default]
    Generic,
}

impl Dialect {
    pub fn from_scheme(scheme: &str) -> Self {
        match scheme.to_ascii_lowercase().as_str() {
            "mysql" => Dialect::MySql,
            "pgsql" => Dialect::PgSql,
            _ => Dialect::Generic,
        }
    }

    pub fn from_descriptor(descriptor: &str) -> Self {
        Self::from_scheme(crate::dsn::scheme_of(descriptor))
    }

    pub fn quote_char(self) -> char {
        match self {
            Dialect::MySql => '`',
            Dialect::PgSql | Dialect::Generic => '"',
        }
    }

    pub fn quote(self, ident: &str) -> String {
        let q = self.quote_char();
        format!("{q}{ident}{q}")
    }

    /// Sentencias a ejecutar justo después de conectar.
    pub fn init_statements(self) -> &'static [&'static str] {
        match self {
            Dialect::MySql => &["SET NAMES 'utf8'"],
            Dialect::PgSql => &["SET NAMES 'UTF8'"],
            Dialect::Generic => &[],
        }
    }
}
