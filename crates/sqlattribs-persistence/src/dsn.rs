//! Traducción del descriptor de conexión al formato de Diesel.
//!
//! Formatos aceptados:
//! - PDO: `mysql:host=H;port=P;dbname=D`, `pgsql:host=H;dbname=D;sslmode=...`,
//!   `sqlite:/ruta/al.db`, `sqlite::memory:`.
//! - URL: `mysql://...`, `postgres://...`, `postgresql://...`, `pgsql://...`.
//!
//! Las credenciales de la configuración tienen prioridad sobre `user` /
//! `password` embebidos en un DSN PDO; en forma URL sólo completan lo que
//! falte. Las opciones de driver se agregan como parámetros de query
//! (Postgres/MySQL) o se aplican como `PRAGMA` (SQLite).

use log::debug;
use sqlattribs_core::{Credentials, DatabaseConfig, EnrichError};
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Driver {
    Postgres,
    Mysql,
    Sqlite,
}

impl Driver {
    pub fn from_scheme(scheme: &str) -> Option<Self> {
        match scheme.to_ascii_lowercase().as_str() {
            "pgsql" | "postgres" | "postgresql" => Some(Driver::Postgres),
            "mysql" => Some(Driver::Mysql),
            "sqlite" => Some(Driver::Sqlite),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Driver::Postgres => "postgres",
            Driver::Mysql => "mysql",
            Driver::Sqlite => "sqlite",
        }
    }
}

/// Destino de conexión ya resuelto.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectTarget {
    pub driver: Driver,
    /// URL (Postgres/MySQL) o ruta (SQLite) aceptada por `Connection::establish`.
    pub url: String,
    /// `PRAGMA`s a aplicar tras conectar (sólo SQLite).
    pub pragmas: Vec<(String, String)>,
}

impl std::fmt::Debug for ConnectTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectTarget")
         .field("driver", &self.driver)
         .field("url", &redact(&self.url))
         .field("pragmas", &self.pragmas)
         .finish()
    }
}

/// Esquema del descriptor: texto previo al primer `:`.
pub fn scheme_of(descriptor: &str) -> &str {
    descriptor.split_once(':').map_or(descriptor, |(scheme, _)| scheme)
}

/// Oculta cualquier password presente en el descriptor.
pub use sqlattribs_core::config::redact_dsn as redact;

pub fn resolve(db: &DatabaseConfig) -> Result<ConnectTarget, EnrichError> {
    let scheme = scheme_of(&db.dsn);
    let fail = |msg: String| EnrichError::connection(redact(&db.dsn), msg);
    let driver = Driver::from_scheme(scheme).ok_or_else(|| fail(format!("unsupported driver '{scheme}'")))?;
    let body = db.dsn.split_once(':').map_or("", |(_, body)| body);

    match driver {
        Driver::Sqlite => sqlite_target(body, db).map_err(fail),
        _ if body.starts_with("//") => url_target(driver, db).map_err(fail),
        _ => pdo_target(driver, body, db).map_err(fail),
    }
}

fn sqlite_target(body: &str, db: &DatabaseConfig) -> Result<ConnectTarget, String> {
    let path = body.strip_prefix("//").unwrap_or(body);
    let path = if path.is_empty() { ":memory:" } else { path };
    let mut pragmas = Vec::with_capacity(db.driver_options.len());
    for (key, value) in &db.driver_options {
        if !is_pragma_key(key) || !is_pragma_value(value) {
            return Err(format!("invalid sqlite driver option '{key}'"));
        }
        pragmas.push((key.clone(), value.clone()));
    }
    Ok(ConnectTarget { driver: Driver::Sqlite,
                       url: path.to_owned(),
                       pragmas })
}

fn is_pragma_key(key: &str) -> bool {
    !key.is_empty() && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn is_pragma_value(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

fn url_target(driver: Driver, db: &DatabaseConfig) -> Result<ConnectTarget, String> {
    let mut url = Url::parse(&db.dsn).map_err(|e| format!("malformed descriptor: {e}"))?;
    if driver == Driver::Postgres && url.scheme() != "postgres" {
        url.set_scheme("postgres")
           .map_err(|_| "cannot normalize postgres scheme".to_owned())?;
    }
    let Credentials { username, password } = &db.credentials;
    if url.username().is_empty() {
        if let Some(user) = username {
            url.set_username(user)
               .map_err(|_| "descriptor cannot carry credentials".to_owned())?;
        }
    }
    if url.password().is_none() {
        if let Some(pass) = password {
            url.set_password(Some(pass))
               .map_err(|_| "descriptor cannot carry credentials".to_owned())?;
        }
    }
    append_query(&mut url, db.driver_options.iter().map(|(k, v)| (k.clone(), v.clone())));
    Ok(ConnectTarget { driver,
                       url: url.to_string(),
                       pragmas: vec![] })
}

fn pdo_target(driver: Driver, body: &str, db: &DatabaseConfig) -> Result<ConnectTarget, String> {
    let mut host = "localhost".to_owned();
    let mut port: Option<u16> = None;
    let mut dbname = String::new();
    let mut user: Option<String> = None;
    let mut pass: Option<String> = None;
    let mut params: Vec<(String, String)> = Vec::new();

    for segment in body.split(';').map(str::trim).filter(|s| !s.is_empty()) {
        let (key, value) = segment.split_once('=')
                                  .ok_or_else(|| format!("malformed descriptor segment '{segment}'"))?;
        let (key, value) = (key.trim(), value.trim());
        match (driver, key.to_ascii_lowercase().as_str()) {
            (_, "host") => host = value.to_owned(),
            (_, "port") => port = Some(value.parse().map_err(|_| format!("invalid port '{value}'"))?),
            (_, "dbname") => dbname = value.to_owned(),
            (_, "user") => user = Some(value.to_owned()),
            (_, "password") => pass = Some(value.to_owned()),
            // La sesión se fuerza a UTF-8 en el init del dialecto.
            (Driver::Mysql, "charset") => debug!("dsn:ignore key=charset value={value}"),
            (Driver::Mysql, "unix_socket") => params.push(("unix_socket".to_owned(), value.to_owned())),
            (Driver::Mysql, other) => debug!("dsn:ignore key={other}"),
            (_, _) => params.push((key.to_owned(), value.to_owned())),
        }
    }

    // Postgres: un host que empieza con `/` es el directorio del socket unix.
    if driver == Driver::Postgres && host.starts_with('/') {
        params.insert(0, ("host".to_owned(), std::mem::replace(&mut host, "localhost".to_owned())));
    }
    if host.contains(':') && !host.starts_with('[') {
        host = format!("[{host}]");
    }

    let scheme = match driver {
        Driver::Postgres => "postgres",
        _ => "mysql",
    };
    let mut url = Url::parse(&format!("{scheme}://{host}")).map_err(|e| format!("invalid host '{host}': {e}"))?;
    url.set_port(port)
       .map_err(|_| "descriptor cannot carry a port".to_owned())?;
    url.set_path(&format!("/{dbname}"));

    let user = db.credentials.username.clone().or(user);
    let pass = db.credentials.password.clone().or(pass);
    if let Some(user) = user.as_deref().filter(|u| !u.is_empty()) {
        url.set_username(user)
           .map_err(|_| "descriptor cannot carry credentials".to_owned())?;
    }
    // Password sin usuario: se envía igual (`scheme://:pass@host`).
    if let Some(pass) = pass.as_deref() {
        url.set_password(Some(pass))
           .map_err(|_| "descriptor cannot carry credentials".to_owned())?;
    }

    params.extend(db.driver_options.iter().map(|(k, v)| (k.clone(), v.clone())));
    append_query(&mut url, params);
    Ok(ConnectTarget { driver,
                       url: url.to_string(),
                       pragmas: vec![] })
}

fn append_query(url: &mut Url, pairs: impl IntoIterator<Item = (String, String)>) {
    let pairs: Vec<(String, String)> = pairs.into_iter().collect();
    if !pairs.is_empty() {
        url.query_pairs_mut().extend_pairs(pairs);
    }
}
