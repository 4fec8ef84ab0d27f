//! Modelo de datos del filtro.
pub mod attributes;
pub mod context;
pub mod row;

pub use attributes::AttributeSet;
pub use context::{Destination, LookupContext, RequestState};
pub use row::ResultRow;
