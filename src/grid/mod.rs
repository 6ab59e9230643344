//! Grid construction: from a declarative [`GridSpec`] to a concrete,
//! ordered coordinate array.

mod error;
pub mod generators;
mod spec;

pub use error::GridError;
pub use generators::{linspace, logspace, MAX_POINTS};
pub use spec::{GridSpec, GridType};

/// A one-dimensional coordinate grid.
///
/// Integer and categorical grids are stored as floats.
pub type Grid = ndarray::Array1<f64>;
