//! Named scalar functions, their dependency graph, and composition of
//! several functions into a single aggregated predicate.

mod composed;
mod error;
mod function;
mod graph;
mod value;

pub use composed::{Aggregator, ComposedFunction, EvaluationPlan};
pub use error::GraphError;
pub use function::{FunctionBody, FunctionSet, ModelFunction};
pub use graph::FunctionGraph;
pub use value::Value;
