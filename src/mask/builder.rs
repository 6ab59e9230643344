//! Feasibility masks over the outer product of named grids.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use indexmap::IndexMap;
use ndarray::{ArrayD, ArrayView1};
use tracing::debug;

use super::cache;
use crate::broadcast::product_map;
use crate::error::SpaceError;
use crate::functions::{Aggregator, ComposedFunction, FunctionGraph, FunctionSet, Value};
use crate::grid::Grid;
use crate::Name;

/// N-dimensional boolean array; one axis per selected grid.
pub type Mask = ArrayD<bool>;

/// External scalars handed to every filter, e.g. the model period.
pub type FixedInputs = IndexMap<Name, Value>;

/// Names starting with this prefix are fixed inputs by convention.
pub const FIXED_INPUT_PREFIX: &str = "_";

/// Evaluation options for [`MaskBuilder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaskOptions {
    /// Evaluate through a compiled, cached plan instead of by name lookup.
    pub jit: bool,
}

impl Default for MaskOptions {
    fn default() -> Self {
        Self { jit: true }
    }
}

impl MaskOptions {
    pub fn with_jit(mut self, jit: bool) -> Self {
        self.jit = jit;
        self
    }
}

#[derive(Debug, Clone, Copy)]
enum ArgumentSource {
    Axis(usize),
    Fixed(Value),
}

/// Builds the mask that is `true` wherever every filter holds.
///
/// The mask has one axis per grid name selected by the subset, in the
/// iteration order of `grids`. Filters and auxiliary functions are composed
/// into one predicate (see [`FunctionGraph::compose`]) and evaluated at every
/// point of the grids' outer product.
///
/// ```
/// use indexmap::IndexMap;
/// use ndarray::arr1;
/// use statechoice::functions::{FunctionSet, ModelFunction};
/// use statechoice::mask::MaskBuilder;
///
/// let grids = IndexMap::from([
///     ("a".to_string(), arr1(&[0.0, 1.0])),
///     ("b".to_string(), arr1(&[0.0, 1.0, 2.0])),
/// ]);
/// let filters = FunctionSet::new()
///     .with(ModelFunction::predicate("f", ["a", "b"], |x| x[0] + x[1] <= 2.0));
///
/// let mask = MaskBuilder::new(&grids, &filters).build().unwrap();
/// assert_eq!(mask.shape(), &[2, 3]);
/// ```
#[derive(Debug, Clone)]
pub struct MaskBuilder<'a> {
    grids: &'a IndexMap<Name, Grid>,
    filters: &'a FunctionSet,
    fixed_inputs: Option<&'a FixedInputs>,
    subset: Option<Vec<Name>>,
    aux_functions: Option<&'a FunctionSet>,
    options: MaskOptions,
}

impl<'a> MaskBuilder<'a> {
    pub fn new(grids: &'a IndexMap<Name, Grid>, filters: &'a FunctionSet) -> Self {
        Self {
            grids,
            filters,
            fixed_inputs: None,
            subset: None,
            aux_functions: None,
            options: MaskOptions::default(),
        }
    }

    pub fn fixed_inputs(mut self, fixed_inputs: &'a FixedInputs) -> Self {
        self.fixed_inputs = Some(fixed_inputs);
        self
    }

    /// Restricts the mask axes to these names. Names absent from the grids
    /// are ignored; axis order stays that of the grids.
    pub fn subset<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Name>,
    {
        self.subset = Some(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn aux_functions(mut self, aux_functions: &'a FunctionSet) -> Self {
        self.aux_functions = Some(aux_functions);
        self
    }

    pub fn options(mut self, options: MaskOptions) -> Self {
        self.options = options;
        self
    }

    pub fn jit(mut self, jit: bool) -> Self {
        self.options.jit = jit;
        self
    }

    /// Names of the mask axes, in axis order.
    pub fn axis_names(&self) -> Vec<&'a str> {
        self.selected_grids().map(|(name, _)| name).collect()
    }

    /// Evaluates the mask.
    ///
    /// # Errors
    ///
    /// - `MissingFixedInput` if an argument named like a fixed input (`_period`) is not supplied
    /// - `UnknownVariable` if any other argument is neither an axis nor a fixed input
    /// - `Graph` if the filters cannot be composed (cycle, unknown target)
    pub fn build(&self) -> Result<Mask, SpaceError> {
        let axes: Vec<(&str, ArrayView1<'a, f64>)> = self
            .selected_grids()
            .map(|(name, grid)| (name, grid.view()))
            .collect();
        let axis_names: Vec<&str> = axes.iter().map(|(name, _)| *name).collect();
        let views: Vec<ArrayView1<'a, f64>> = axes.iter().map(|(_, view)| view.clone()).collect();

        let composed = self.compose()?;
        let sources = self.resolve_arguments(composed.arguments(), &axis_names)?;

        debug!(
            axes = ?axis_names,
            shape = ?views.iter().map(|v| v.len()).collect::<Vec<_>>(),
            filters = self.filters.len(),
            arguments = sources.len(),
            jit = self.options.jit,
            "building feasibility mask"
        );

        let mut args = vec![Value::default(); sources.len()];
        let mask = if self.options.jit {
            let key = self.plan_key(&composed, &axes);
            let mut plan = cache::get_or_compile(key, || composed.compile());
            if plan.fingerprint() != composed.fingerprint() {
                plan = Arc::new(composed.compile());
            }
            let mut scratch = Vec::with_capacity(plan.slot_count());
            product_map(&views, |point| {
                bind(&sources, point, &mut args);
                composed.run_plan(&plan, &args, &mut scratch)
            })
        } else {
            product_map(&views, |point| {
                bind(&sources, point, &mut args);
                composed.interpret(&args)
            })
        };

        Ok(mask)
    }

    fn selected_grids(&self) -> impl Iterator<Item = (&'a str, &'a Grid)> + '_ {
        let grids: &'a IndexMap<Name, Grid> = self.grids;
        grids
            .iter()
            .filter(move |(name, _)| match &self.subset {
                Some(subset) => subset.iter().any(|s| s == *name),
                None => true,
            })
            .map(|(name, grid)| (name.as_str(), grid))
    }

    fn compose(&self) -> Result<ComposedFunction, SpaceError> {
        let functions = match self.aux_functions {
            // A filter shadows an auxiliary function of the same name.
            Some(aux) => aux.merged(self.filters),
            None => self.filters.clone(),
        };
        let targets: Vec<&str> = self.filters.names().collect();
        let composed = FunctionGraph::new(&functions).compose(&targets, Aggregator::LogicalAnd)?;
        Ok(composed)
    }

    fn resolve_arguments(
        &self,
        arguments: &[Name],
        axis_names: &[&str],
    ) -> Result<Vec<ArgumentSource>, SpaceError> {
        arguments
            .iter()
            .map(|argument| {
                if let Some(position) = axis_names.iter().position(|axis| axis == argument) {
                    return Ok(ArgumentSource::Axis(position));
                }
                if let Some(value) = self
                    .fixed_inputs
                    .and_then(|inputs| inputs.get(argument.as_str()))
                {
                    return Ok(ArgumentSource::Fixed(*value));
                }
                if argument.starts_with(FIXED_INPUT_PREFIX) {
                    Err(SpaceError::MissingFixedInput(argument.clone()))
                } else {
                    Err(SpaceError::UnknownVariable(argument.clone()))
                }
            })
            .collect()
    }

    fn plan_key(&self, composed: &ComposedFunction, axes: &[(&str, ArrayView1<'_, f64>)]) -> u64 {
        let mut hasher = DefaultHasher::new();
        composed.structure_hash(&mut hasher);
        for (name, axis) in axes {
            name.hash(&mut hasher);
            axis.len().hash(&mut hasher);
        }
        if let Some(inputs) = self.fixed_inputs {
            for name in inputs.keys() {
                name.hash(&mut hasher);
            }
        }
        hasher.finish()
    }

    #[cfg(test)]
    pub(crate) fn cache_key(&self) -> Result<u64, SpaceError> {
        let axes: Vec<(&str, ArrayView1<'a, f64>)> = self
            .selected_grids()
            .map(|(name, grid)| (name, grid.view()))
            .collect();
        Ok(self.plan_key(&self.compose()?, &axes))
    }
}

#[inline]
fn bind(sources: &[ArgumentSource], point: &[f64], args: &mut [Value]) {
    for (slot, source) in args.iter_mut().zip(sources) {
        *slot = match *source {
            ArgumentSource::Axis(k) => Value::Float(point[k]),
            ArgumentSource::Fixed(value) => value,
        };
    }
}

/// Free-function form of [`MaskBuilder`].
pub fn build_mask(
    grids: &IndexMap<Name, Grid>,
    filters: &FunctionSet,
    fixed_inputs: Option<&FixedInputs>,
    subset: Option<&[&str]>,
    aux_functions: Option<&FunctionSet>,
    options: MaskOptions,
) -> Result<Mask, SpaceError> {
    let mut builder = MaskBuilder::new(grids, filters).options(options);
    if let Some(fixed_inputs) = fixed_inputs {
        builder = builder.fixed_inputs(fixed_inputs);
    }
    if let Some(subset) = subset {
        builder = builder.subset(subset.iter().copied());
    }
    if let Some(aux_functions) = aux_functions {
        builder = builder.aux_functions(aux_functions);
    }
    builder.build()
}
