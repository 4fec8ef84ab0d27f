use serde::{Deserialize, Serialize};

/// Fila `(attribute, value)` leída del store.
///
/// Ambos campos llegan como texto; `None` representa NULL. Una fila sin nombre
/// (o con nombre vacío) o con valor NULL se descarta antes del merge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRow {
    pub attribute: Option<String>,
    pub value: Option<String>,
}

impl ResultRow {
    pub fn new(attribute: impl Into<String>, value: impl Into<String>) -> Self {
        Self { attribute: Some(attribute.into()),
               value: Some(value.into()) }
    }

    /// Devuelve `(nombre, valor)` si la fila es utilizable.
    pub fn as_pair(&self) -> Option<(&str, &str)> {
        match (self.attribute.as_deref(), self.value.as_deref()) {
            (Some(name), Some(value)) if !name.is_empty() => Some((name, value)),
            _ => None,
        }
    }
}
