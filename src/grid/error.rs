use thiserror::Error;

/// Errors raised while turning a grid specification into coordinates.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GridError {
    #[error("Unknown grid type: {0}")]
    UnknownGridType(String),

    #[error("Grid type '{grid_type}' requires parameter '{parameter}'")]
    MissingGridParameter { grid_type: String, parameter: String },

    #[error("Invalid parameters for grid type '{grid_type}': {reason}")]
    InvalidGridParameter { grid_type: String, reason: String },
}
