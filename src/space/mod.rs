//! State-choice space of a dynamic model.
//!
//! [`create_state_choice_space`] runs the pipeline
//! `classify → build grids → value grid / combination grid`.

mod assemble;
mod classify;
mod model;

pub use assemble::{create_state_choice_space, StateChoiceSpace};
pub use classify::{classify, VariablePartition};
pub use model::{Model, VariableSpecs};

#[cfg(test)]
mod tests;
