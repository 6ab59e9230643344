//! Assembly of the state-choice space.

use std::collections::BTreeSet;

use indexmap::IndexMap;
use tracing::{debug, trace};

use super::classify::classify;
use super::model::Model;
use crate::error::SpaceError;
use crate::functions::FunctionSet;
use crate::grid::Grid;
use crate::Name;

/// Compressed representation of all feasible states and choices.
///
/// Dense variables are stored as independent 1-D grids in `value_grid`;
/// feasible combinations of sparse variables would be stored column-wise in
/// `combination_grid`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StateChoiceSpace {
    value_grid: IndexMap<Name, Grid>,
    combination_grid: IndexMap<Name, Grid>,
}

impl StateChoiceSpace {
    pub fn value_grid(&self) -> &IndexMap<Name, Grid> {
        &self.value_grid
    }

    pub fn combination_grid(&self) -> &IndexMap<Name, Grid> {
        &self.combination_grid
    }

    pub fn dense_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.value_grid.keys().map(|k| k.as_str())
    }

    /// Number of points in the outer product of the dense grids.
    pub fn n_dense_points(&self) -> usize {
        self.value_grid.values().map(|grid| grid.len()).product()
    }
}

/// Builds the state-choice space of `model`.
///
/// # Errors
///
/// - `Grid` if a grid spec cannot be built
/// - `NotImplementedFeature` if the model has sparse variables or filters
pub fn create_state_choice_space(model: &Model) -> Result<StateChoiceSpace, SpaceError> {
    let partition = classify(model)?;
    debug!(
        dense = partition.dense.len(),
        sparse = partition.sparse.len(),
        "partitioned model variables"
    );

    let grids = build_grids(model)?;
    debug!(grids = grids.len(), "built variable grids");

    let combination_grid = create_combination_grid(&grids, &partition.sparse, &model.filters)?;
    let value_grid = create_value_grid(&grids, &partition.dense);

    Ok(StateChoiceSpace {
        value_grid,
        combination_grid,
    })
}

/// Grids for every state and choice. Choices come first so that a state of
/// the same name replaces the choice spec in place.
fn build_grids(model: &Model) -> Result<IndexMap<Name, Grid>, SpaceError> {
    let mut specs = model.choices.clone();
    for (name, spec) in &model.states {
        specs.insert(name.clone(), spec.clone());
    }

    let mut grids = IndexMap::with_capacity(specs.len());
    for (name, spec) in specs {
        let grid = spec.build()?;
        trace!(name = %name, points = grid.len(), "grid");
        grids.insert(name, grid);
    }
    Ok(grids)
}

fn create_combination_grid(
    _grids: &IndexMap<Name, Grid>,
    sparse: &BTreeSet<Name>,
    filters: &FunctionSet,
) -> Result<IndexMap<Name, Grid>, SpaceError> {
    if !sparse.is_empty() || !filters.is_empty() {
        return Err(SpaceError::NotImplementedFeature(format!(
            "combination grid for sparse variables [{}] under {} filter(s)",
            sparse.iter().map(|s| s.as_str()).collect::<Vec<_>>().join(", "),
            filters.len()
        )));
    }
    Ok(IndexMap::new())
}

fn create_value_grid(grids: &IndexMap<Name, Grid>, dense: &BTreeSet<Name>) -> IndexMap<Name, Grid> {
    grids
        .iter()
        .filter(|(name, _)| dense.contains(name.as_str()))
        .map(|(name, grid)| (name.clone(), grid.clone()))
        .collect()
}
