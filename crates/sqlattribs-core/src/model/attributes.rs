//! `AttributeSet`: mapa ordenado nombre -> secuencia ordenada de valores.
//!
//! El orden de inserción de nombres y de valores se preserva (los tests y el
//! consumidor aguas abajo dependen de ello). Dentro de un mismo nombre no se
//! admiten valores repetidos: toda vía de construcción deduplica conservando
//! la primera aparición.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// La igualdad compara nombres y valores en orden: dos conjuntos con el
/// mismo contenido en distinto orden no son iguales.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "IndexMap<String, Vec<String>>", into = "IndexMap<String, Vec<String>>")]
pub struct AttributeSet {
    inner: IndexMap<String, Vec<String>>,
}

impl AttributeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.inner.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.inner.get(name).map(Vec::as_slice)
    }

    /// Primer valor del atributo, si existe y no está vacío.
    pub fn first_value(&self, name: &str) -> Option<&str> {
        self.inner.get(name).and_then(|v| v.first()).map(String::as_str)
    }

    /// Inserta (o reemplaza) un atributo completo. Los valores repetidos se
    /// descartan conservando el orden de primera aparición.
    pub fn insert<I, S>(&mut self, name: impl Into<String>, values: I) -> Option<Vec<String>>
        where I: IntoIterator<Item = S>,
              S: Into<String>
    {
        self.inner.insert(name.into(), dedup(values.into_iter().map(Into::into)))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.inner.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.inner.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Vacía la secuencia de valores de `name`, creándola si no existía.
    pub(crate) fn reset(&mut self, name: &str) {
        match self.inner.get_mut(name) {
            Some(values) => values.clear(),
            None => {
                self.inner.insert(name.to_owned(), Vec::new());
            }
        }
    }

    /// Agrega `value` al final de `name` salvo que ya esté presente.
    /// Devuelve `false` si era duplicado.
    pub(crate) fn push_unique(&mut self, name: &str, value: &str) -> bool {
        let values = self.inner.entry(name.to_owned()).or_default();
        if values.iter().any(|v| v == value) {
            return false;
        }
        values.push(value.to_owned());
        true
    }
}

impl PartialEq for AttributeSet {
    fn eq(&self, other: &Self) -> bool {
        self.inner.len() == other.inner.len() && self.inner.iter().eq(other.inner.iter())
    }
}

impl Eq for AttributeSet {}

fn dedup(values: impl Iterator<Item = String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for v in values {
        if !out.contains(&v) {
            out.push(v);
        }
    }
    out
}

impl From<IndexMap<String, Vec<String>>> for AttributeSet {
    fn from(map: IndexMap<String, Vec<String>>) -> Self {
        map.into_iter().collect()
    }
}

impl From<AttributeSet> for IndexMap<String, Vec<String>> {
    fn from(set: AttributeSet) -> Self {
        set.inner
    }
}

impl<S: Into<String>> FromIterator<(S, Vec<String>)> for AttributeSet {
    fn from_iter<T: IntoIterator<Item = (S, Vec<String>)>>(iter: T) -> Self {
        let mut set = AttributeSet::new();
        for (name, values) in iter {
            set.insert(name, values);
        }
        set
    }
}

/// Construye un `AttributeSet` literal:
/// `attribute_set! { "mail" => ["a@example.org"], "cn" => ["A"] }`.
#[macro_export]
macro_rules! attribute_set {
    () => { $crate::model::AttributeSet::new() };
    ($($name:expr => [$($value:expr),* $(,)?]),+ $(,)?) => {{
        let mut set = $crate::model::AttributeSet::new();
        $({
            let values: ::std::vec::Vec<::std::string::String> =
                ::std::vec![$(::std::string::String::from($value)),*];
            set.insert($name, values);
        })+
        set
    }};
}
