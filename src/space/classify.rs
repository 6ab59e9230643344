//! Dense/sparse partition of a model's variables.

use std::collections::BTreeSet;

use tracing::trace;

use super::model::Model;
use crate::error::SpaceError;
use crate::functions::{FunctionGraph, ModelFunction};
use crate::Name;

/// Disjoint split of the states and discrete choices of a model.
///
/// # Invariants
///
/// - `dense ∪ sparse` is exactly [`Model::classifiable_variables`]
/// - `dense ∩ sparse = ∅`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariablePartition {
    /// Variables no state filter reads; stored as independent 1-D grids.
    pub dense: BTreeSet<Name>,
    /// Variables some state filter reads, directly or through an auxiliary function.
    pub sparse: BTreeSet<Name>,
}

impl VariablePartition {
    pub fn is_dense(&self, name: &str) -> bool {
        self.dense.contains(name)
    }

    pub fn is_sparse(&self, name: &str) -> bool {
        self.sparse.contains(name)
    }
}

/// Splits the model's variables into dense and sparse ones.
///
/// A variable is sparse iff it lies in the dependency closure of at least
/// one state filter: the filter's own arguments, expanded through the
/// model's auxiliary functions. Only the filter's own signature seeds the
/// closure, so an auxiliary function sharing a filter's name cannot hide
/// what the filter reads.
pub fn classify(model: &Model) -> Result<VariablePartition, SpaceError> {
    let all_variables = model.classifiable_variables();
    let graph = FunctionGraph::new(&model.functions);

    let mut filtered: BTreeSet<Name> = BTreeSet::new();
    for filter in model.state_filters.iter() {
        let reads = filter_dependencies(filter, &graph)?;
        trace!(filter = filter.name(), reads = ?reads, "state filter dependencies");
        filtered.extend(reads);
    }

    let dense: BTreeSet<Name> = all_variables.difference(&filtered).cloned().collect();
    let sparse: BTreeSet<Name> = all_variables.difference(&dense).cloned().collect();
    Ok(VariablePartition { dense, sparse })
}

fn filter_dependencies(
    filter: &ModelFunction,
    auxiliary: &FunctionGraph,
) -> Result<BTreeSet<Name>, SpaceError> {
    let mut reads = BTreeSet::new();
    for argument in filter.arguments() {
        reads.insert(argument.clone());
        if auxiliary.contains(argument) {
            reads.extend(auxiliary.ancestors(argument)?);
        }
    }
    Ok(reads)
}
