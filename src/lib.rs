//! statechoice - compressed state-choice spaces for dynamic models
//!
//! Splits the state and discrete-choice variables of a model into **dense**
//! variables, stored as independent 1-D grids, and **sparse** variables whose
//! feasibility is tied together by filters. Feasibility of variable
//! combinations is evaluated as an N-dimensional boolean mask over the outer
//! product of their grids.

pub mod broadcast;
pub mod error;
pub mod functions;
pub mod grid;
pub mod mask;
pub mod space;

pub use error::SpaceError;
pub use mask::{build_mask, MaskBuilder, MaskOptions};
pub use space::{classify, create_state_choice_space, Model, StateChoiceSpace, VariablePartition};

/// Name of a variable, function, or fixed input.
pub type Name = String;
