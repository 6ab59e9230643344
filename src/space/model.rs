//! Declarative model description.

use std::collections::BTreeSet;

use indexmap::IndexMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::functions::{FunctionSet, ModelFunction};
use crate::grid::GridSpec;
use crate::Name;

/// Grid specifications of a model's states and choices.
///
/// This is the serializable part of a [`Model`]; functions are attached in
/// code.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VariableSpecs {
    #[cfg_attr(feature = "serde", serde(default))]
    pub states: IndexMap<Name, GridSpec>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub choices: IndexMap<Name, GridSpec>,
}

/// A dynamic model: state and choice grids plus feasibility filters.
///
/// - `state_filters` decide which variables are sparse
/// - `filters` are general feasibility filters on the state-choice space
/// - `functions` are auxiliary derived variables the filters may read
///
/// A choice whose spec is [`GridSpec::Options`] is discrete; every other
/// choice is continuous and never becomes a dense or sparse axis.
#[derive(Debug, Clone, Default)]
pub struct Model {
    pub states: IndexMap<Name, GridSpec>,
    pub choices: IndexMap<Name, GridSpec>,
    pub state_filters: FunctionSet,
    pub filters: FunctionSet,
    pub functions: FunctionSet,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_specs(specs: VariableSpecs) -> Self {
        Self {
            states: specs.states,
            choices: specs.choices,
            ..Self::default()
        }
    }

    pub fn with_state(mut self, name: impl Into<Name>, spec: GridSpec) -> Self {
        self.states.insert(name.into(), spec);
        self
    }

    pub fn with_choice(mut self, name: impl Into<Name>, spec: GridSpec) -> Self {
        self.choices.insert(name.into(), spec);
        self
    }

    pub fn with_state_filter(mut self, filter: ModelFunction) -> Self {
        self.state_filters.insert(filter);
        self
    }

    pub fn with_filter(mut self, filter: ModelFunction) -> Self {
        self.filters.insert(filter);
        self
    }

    pub fn with_function(mut self, function: ModelFunction) -> Self {
        self.functions.insert(function);
        self
    }

    /// Names of choices with an enumerated option set, in declaration order.
    pub fn discrete_choices(&self) -> impl Iterator<Item = &str> + '_ {
        self.choices
            .iter()
            .filter(|(_, spec)| spec.is_discrete())
            .map(|(name, _)| name.as_str())
    }

    /// States and discrete choices: the variables that can be dense or sparse.
    pub fn classifiable_variables(&self) -> BTreeSet<Name> {
        self.states
            .keys()
            .map(|name| name.as_str())
            .chain(self.discrete_choices())
            .map(str::to_string)
            .collect()
    }
}
