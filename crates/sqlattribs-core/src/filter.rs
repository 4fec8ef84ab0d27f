//! Contrato de filtro de procesamiento expuesto al pipeline del host.
//!
//! El host entrega un `RequestState` mutable y espera, de forma síncrona,
//! retorno normal o un error fatal que debe propagar (el procesamiento de la
//! petición se detiene).

use crate::errors::EnrichError;
use crate::model::RequestState;

pub trait ProcessingFilter: Send + Sync {
    /// Nombre estable del filtro (logs / diagnóstico).
    fn name(&self) -> &str;

    fn process(&self, state: &mut RequestState) -> Result<(), EnrichError>;
}

/// Aplica una secuencia de filtros en orden fijo. Se detiene en el primer
/// error y lo devuelve tal cual.
#[derive(Default)]
pub struct FilterChain {
    filters: Vec<Box<dyn ProcessingFilter>>,
}

impl FilterChain {
    pub fn new() -> Self {
        Self { filters: vec![] }
    }

    pub fn with_filters(filters: Vec<Box<dyn ProcessingFilter>>) -> Self {
        Self { filters }
    }

    pub fn push(mut self, filter: impl ProcessingFilter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn run(&self, state: &mut RequestState) -> Result<(), EnrichError> {
        for f in self.filters.iter() {
            log::debug!("filter:start name={}", f.name());
            f.process(state)?;
            log::debug!("filter:done name={}", f.name());
        }
        Ok(())
    }
}

impl std::fmt::Debug for FilterChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.filters.iter().map(|x| x.name())).finish()
    }
}
