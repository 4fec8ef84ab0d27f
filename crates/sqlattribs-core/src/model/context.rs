use serde::{Deserialize, Serialize};

use super::AttributeSet;

/// Metadatos del destino (relying party) provistos por el host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Destination {
    #[serde(alias = "entityid")]
    pub entity_id: String,
}

/// Estado de la petición que el pipeline del host entrega a cada filtro.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestState {
    #[serde(alias = "Attributes")]
    pub attributes: AttributeSet,
    #[serde(alias = "Destination")]
    pub destination: Destination,
}

impl RequestState {
    pub fn new(attributes: AttributeSet, entity_id: impl Into<String>) -> Self {
        Self { attributes,
               destination: Destination { entity_id: entity_id.into() } }
    }
}

/// Claves de búsqueda de una invocación: valor identificador + relying party.
/// Inmutable; se construye por invocación y se descarta al terminar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupContext {
    identifying_value: String,
    relying_party: String,
}

impl LookupContext {
    pub fn new(identifying_value: impl Into<String>, relying_party: impl Into<String>) -> Self {
        Self { identifying_value: identifying_value.into(),
               relying_party: relying_party.into() }
    }

    /// Extrae el primer valor de `identifying_attribute`. `None` si el
    /// atributo no está o no tiene valores (el filtro declina).
    pub fn resolve(identifying_attribute: &str, attributes: &AttributeSet, relying_party: &str) -> Option<Self> {
        attributes.first_value(identifying_attribute)
                  .map(|value| Self::new(value, relying_party))
    }

    pub fn identifying_value(&self) -> &str {
        &self.identifying_value
    }

    pub fn relying_party(&self) -> &str {
        &self.relying_party
    }
}
