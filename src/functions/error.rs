use thiserror::Error;

use crate::Name;

/// Errors raised while analysing or composing a function graph.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("Function graph contains a cycle through '{0}'")]
    CycleDetected(Name),

    #[error("Unknown target: '{0}' is not a node of the function graph")]
    UnknownTarget(Name),

    #[error("Function '{function}' expects {expected} arguments, got {found}")]
    ArityMismatch {
        function: Name,
        expected: usize,
        found: usize,
    },

    #[error("Evaluation plan was compiled from a different composition")]
    PlanMismatch,
}
