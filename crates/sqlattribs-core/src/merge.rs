//! Merge determinista de filas del store sobre el `AttributeSet`.
//!
//! Las filas se procesan en el orden entregado por el store (sin reordenar).
//! Por cada fila:
//! 1. se descarta si no tiene nombre o el valor es NULL (debug);
//! 2. se descarta si hay allow-list y el nombre no está (notice);
//! 3. si el nombre no existe, o `replace` está activo y es la primera fila de
//!    ese nombre en esta pasada, se vacía su secuencia;
//! 4. se descarta si el valor ya está presente (debug);
//! 5. se agrega al final.
//!
//! Los nombres no tocados por ninguna fila quedan intactos.

use std::collections::HashSet;

use indexmap::IndexSet;

use crate::event::EventSink;
use crate::model::{AttributeSet, ResultRow};

/// Política de merge derivada de la configuración.
#[derive(Debug, Clone, Copy, Default)]
pub struct MergePolicy<'a> {
    pub replace: bool,
    pub limit: Option<&'a IndexSet<String>>,
}

impl MergePolicy<'_> {
    fn allows(&self, name: &str) -> bool {
        self.limit.map_or(true, |l| l.contains(name))
    }
}

/// Contadores de una pasada de merge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeStats {
    pub appended: usize,
    pub invalid: usize,
    pub unwanted: usize,
    pub duplicate: usize,
    /// Nombres tocados, en orden de primer contacto.
    pub touched: Vec<String>,
}

/// Fusiona `rows` dentro de `attributes` según `policy`.
pub fn merge_rows<I>(attributes: &mut AttributeSet, rows: I, policy: MergePolicy<'_>, sink: &dyn EventSink) -> MergeStats
    where I: IntoIterator<Item = ResultRow>
{
    let mut stats = MergeStats::default();
    // Conjunto transitorio: replace vacía cada nombre una sola vez por pasada.
    let mut seen: HashSet<String> = HashSet::new();

    for row in rows {
        let Some((name, value)) = row.as_pair() else {
            sink.debug(&format!("skipping invalid attribute/value tuple: {row:?}"));
            stats.invalid += 1;
            continue;
        };

        if !policy.allows(name) {
            let limited: Vec<&str> = policy.limit.map(|l| l.iter().map(String::as_str).collect()).unwrap_or_default();
            sink.notice(&format!("skipping unwanted attribute {name} [limited to: {}]", limited.join(", ")));
            stats.unwanted += 1;
            continue;
        }

        let first_touch = seen.insert(name.to_owned());
        if first_touch {
            stats.touched.push(name.to_owned());
        }
        if !attributes.contains(name) || (policy.replace && first_touch) {
            attributes.reset(name);
        }

        if attributes.push_unique(name, value) {
            stats.appended += 1;
        } else {
            sink.debug(&format!("skipping duplicate attribute/value tuple {name}='{value}'"));
            stats.duplicate += 1;
        }
    }
    stats
}
