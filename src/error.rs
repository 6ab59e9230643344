use thiserror::Error;

use crate::functions::GraphError;
use crate::grid::GridError;
use crate::Name;

/// Errors raised while building grids, masks, or the state-choice space.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SpaceError {
    #[error(transparent)]
    Grid(#[from] GridError),

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error("Fixed input '{0}' is required by a filter but was not supplied")]
    MissingFixedInput(Name),

    #[error("Unknown variable '{0}': neither a grid axis nor a fixed input")]
    UnknownVariable(Name),

    #[error("Not implemented: {0}")]
    NotImplementedFeature(String),
}
