//! A set of functions composed into one callable.

use std::collections::HashMap;
use std::hash::{Hash, Hasher};

use super::error::GraphError;
use super::function::ModelFunction;
use super::value::Value;
use crate::Name;

/// How the outputs of the composition targets are folded into one result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Aggregator {
    /// True iff every target is truthy. Zero targets give `true`.
    LogicalAnd,
    /// True iff any target is truthy. Zero targets give `false`.
    LogicalOr,
}

impl Aggregator {
    pub const fn identity(self) -> bool {
        match self {
            Aggregator::LogicalAnd => true,
            Aggregator::LogicalOr => false,
        }
    }

    #[inline]
    fn fold<I: Iterator<Item = Value>>(self, values: I) -> bool {
        let mut values = values.map(Value::is_truthy);
        match self {
            Aggregator::LogicalAnd => values.all(|v| v),
            Aggregator::LogicalOr => values.any(|v| v),
        }
    }
}

/// Topologically ordered functions plus the external arguments they read.
///
/// Calling it binds `arguments()` positionally, evaluates every function
/// once in dependency order, and folds the target outputs with the
/// aggregator.
#[derive(Debug, Clone)]
pub struct ComposedFunction {
    functions: Vec<ModelFunction>,
    arguments: Vec<Name>,
    targets: Vec<Name>,
    aggregator: Aggregator,
}

impl ComposedFunction {
    pub(crate) fn new(
        functions: Vec<ModelFunction>,
        arguments: Vec<Name>,
        targets: Vec<Name>,
        aggregator: Aggregator,
    ) -> Self {
        Self {
            functions,
            arguments,
            targets,
            aggregator,
        }
    }

    /// External argument names, in the positional order `call` expects.
    pub fn arguments(&self) -> &[Name] {
        &self.arguments
    }

    pub fn targets(&self) -> &[Name] {
        &self.targets
    }

    /// Functions in evaluation order.
    pub fn functions(&self) -> &[ModelFunction] {
        &self.functions
    }

    pub fn aggregator(&self) -> Aggregator {
        self.aggregator
    }

    /// Evaluates the composition by name lookup.
    ///
    /// # Errors
    ///
    /// `ArityMismatch` if `args` does not match `arguments()`.
    pub fn call(&self, args: &[Value]) -> Result<bool, GraphError> {
        self.check_arity(args)?;
        Ok(self.interpret(args))
    }

    pub(crate) fn interpret(&self, args: &[Value]) -> bool {
        let mut env: HashMap<&str, Value> = self
            .arguments
            .iter()
            .map(|name| name.as_str())
            .zip(args.iter().copied())
            .collect();

        let mut inputs = Vec::new();
        for function in &self.functions {
            inputs.clear();
            inputs.extend(
                function
                    .arguments()
                    .iter()
                    .map(|a| env.get(a.as_str()).copied().unwrap_or_default()),
            );
            let out = function.apply(&inputs);
            env.insert(function.name(), out);
        }

        self.aggregator.fold(
            self.targets
                .iter()
                .map(|t| env.get(t.as_str()).copied().unwrap_or_default()),
        )
    }

    /// Resolves every name to a slot index so evaluation needs no lookups.
    pub fn compile(&self) -> EvaluationPlan {
        let mut slot_by_name: HashMap<&str, usize> = HashMap::new();
        for (slot, name) in self.arguments.iter().enumerate() {
            slot_by_name.insert(name.as_str(), slot);
        }

        let mut steps = Vec::with_capacity(self.functions.len());
        for (index, function) in self.functions.iter().enumerate() {
            let inputs = function
                .arguments()
                .iter()
                .map(|a| slot_by_name[a.as_str()])
                .collect();
            let output = self.arguments.len() + index;
            slot_by_name.insert(function.name(), output);
            steps.push(PlanStep { inputs, output });
        }

        let targets = self
            .targets
            .iter()
            .map(|t| slot_by_name[t.as_str()])
            .collect();

        EvaluationPlan {
            fingerprint: self.fingerprint(),
            n_arguments: self.arguments.len(),
            n_slots: self.arguments.len() + self.functions.len(),
            steps,
            targets,
        }
    }

    /// Evaluates the composition through a plan compiled from it.
    ///
    /// `scratch` is reused across calls to avoid allocating per evaluation.
    ///
    /// # Errors
    ///
    /// `ArityMismatch` if `args` does not match `arguments()`, and
    /// `PlanMismatch` if `plan` was compiled from a structurally different
    /// composition.
    pub fn call_with_plan(
        &self,
        plan: &EvaluationPlan,
        args: &[Value],
        scratch: &mut Vec<Value>,
    ) -> Result<bool, GraphError> {
        self.check_arity(args)?;
        if plan.fingerprint != self.fingerprint() {
            return Err(GraphError::PlanMismatch);
        }
        Ok(self.run_plan(plan, args, scratch))
    }

    pub(crate) fn run_plan(
        &self,
        plan: &EvaluationPlan,
        args: &[Value],
        scratch: &mut Vec<Value>,
    ) -> bool {
        scratch.clear();
        scratch.resize(plan.n_slots, Value::default());
        scratch[..plan.n_arguments].copy_from_slice(args);

        let mut inputs = Vec::new();
        for (function, step) in self.functions.iter().zip(&plan.steps) {
            inputs.clear();
            inputs.extend(step.inputs.iter().map(|&slot| scratch[slot]));
            scratch[step.output] = function.apply(&inputs);
        }

        self.aggregator
            .fold(plan.targets.iter().map(|&slot| scratch[slot]))
    }

    /// Structural hash: names, argument lists, targets, and aggregator.
    /// Function bodies do not take part.
    pub fn structure_hash<H: Hasher>(&self, state: &mut H) {
        for function in &self.functions {
            function.name().hash(state);
            function.arguments().hash(state);
        }
        self.arguments.hash(state);
        self.targets.hash(state);
        self.aggregator.hash(state);
    }

    /// 64-bit digest of [`structure_hash`](Self::structure_hash).
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        self.structure_hash(&mut hasher);
        hasher.finish()
    }

    fn check_arity(&self, args: &[Value]) -> Result<(), GraphError> {
        if args.len() != self.arguments.len() {
            return Err(GraphError::ArityMismatch {
                function: format!("composition of [{}]", self.targets.join(", ")),
                expected: self.arguments.len(),
                found: args.len(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct PlanStep {
    inputs: Vec<usize>,
    output: usize,
}

/// Slot-indexed evaluation order for a [`ComposedFunction`].
///
/// Slots `0..n_arguments` hold the external arguments; each function writes
/// its output to the next slot. Contains no function bodies, so a plan can
/// be shared by any composition with the same structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationPlan {
    fingerprint: u64,
    n_arguments: usize,
    n_slots: usize,
    steps: Vec<PlanStep>,
    targets: Vec<usize>,
}

impl EvaluationPlan {
    pub fn fingerprint(&self) -> u64 {
        self.fingerprint
    }

    pub fn slot_count(&self) -> usize {
        self.n_slots
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::functions::{FunctionGraph, FunctionSet};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn budget_filters() -> FunctionSet {
        FunctionSet::new()
            .with(ModelFunction::derived("wealth", ["savings", "income"], |x| {
                x[0] + x[1]
            }))
            .with(ModelFunction::predicate(
                "budget",
                ["consumption", "wealth"],
                |x| x[0] <= x[1],
            ))
            .with(ModelFunction::predicate("positive", ["consumption"], |x| {
                x[0] > 0.0
            }))
    }

    fn bind(composed: &ComposedFunction, values: &[(&str, f64)]) -> Vec<Value> {
        composed
            .arguments()
            .iter()
            .map(|name| {
                let (_, v) = values.iter().find(|(n, _)| n == name).unwrap();
                Value::from(*v)
            })
            .collect()
    }

    #[test]
    fn and_aggregation() {
        let graph = FunctionGraph::new(&budget_filters());
        let composed = graph
            .compose(&["budget", "positive"], Aggregator::LogicalAnd)
            .unwrap();

        let ok = bind(&composed, &[("consumption", 1.0), ("savings", 0.5), ("income", 1.0)]);
        assert!(composed.call(&ok).unwrap());

        let broke = bind(&composed, &[("consumption", 2.0), ("savings", 0.5), ("income", 1.0)]);
        assert!(!composed.call(&broke).unwrap());

        let zero = bind(&composed, &[("consumption", 0.0), ("savings", 0.5), ("income", 1.0)]);
        assert!(!composed.call(&zero).unwrap());
    }

    #[test]
    fn or_aggregation() {
        let graph = FunctionGraph::new(&budget_filters());
        let composed = graph
            .compose(&["budget", "positive"], Aggregator::LogicalOr)
            .unwrap();
        let broke = bind(&composed, &[("consumption", 2.0), ("savings", 0.5), ("income", 1.0)]);
        assert!(composed.call(&broke).unwrap());
    }

    #[test]
    fn empty_targets_give_identity() {
        let graph = FunctionGraph::new(&budget_filters());
        let none: [&str; 0] = [];
        let and = graph.compose(&none, Aggregator::LogicalAnd).unwrap();
        let or = graph.compose(&none, Aggregator::LogicalOr).unwrap();
        assert!(and.arguments().is_empty());
        assert!(and.call(&[]).unwrap());
        assert!(!or.call(&[]).unwrap());
    }

    #[test]
    fn shared_dependency_evaluated_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let functions = FunctionSet::new()
            .with(ModelFunction::derived("shared", ["x"], move |x| {
                counter.fetch_add(1, Ordering::SeqCst);
                x[0] * 2.0
            }))
            .with(ModelFunction::predicate("f1", ["shared"], |x| x[0] > 1.0))
            .with(ModelFunction::predicate("f2", ["shared"], |x| x[0] < 10.0));

        let composed = FunctionGraph::new(&functions)
            .compose(&["f1", "f2"], Aggregator::LogicalAnd)
            .unwrap();
        assert!(composed.call(&[Value::from(2.0)]).unwrap());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn plan_matches_interpretation() {
        let composed = FunctionGraph::new(&budget_filters())
            .compose(&["budget", "positive"], Aggregator::LogicalAnd)
            .unwrap();
        let plan = composed.compile();
        assert_eq!(plan.slot_count(), 3 + 3);

        let mut scratch = Vec::new();
        for consumption in [0.0, 0.5, 1.0, 1.5, 2.0] {
            let args = bind(
                &composed,
                &[("consumption", consumption), ("savings", 0.5), ("income", 1.0)],
            );
            assert_eq!(
                composed.call_with_plan(&plan, &args, &mut scratch).unwrap(),
                composed.call(&args).unwrap()
            );
        }
    }

    #[test]
    fn plan_from_other_structure_is_rejected() {
        let graph = FunctionGraph::new(&budget_filters());
        let budget = graph.compose(&["budget"], Aggregator::LogicalAnd).unwrap();
        let positive = graph.compose(&["positive"], Aggregator::LogicalAnd).unwrap();

        let plan = budget.compile();
        let mut scratch = Vec::new();
        assert_eq!(
            positive.call_with_plan(&plan, &[Value::from(1.0)], &mut scratch),
            Err(GraphError::PlanMismatch)
        );
    }

    #[test]
    fn call_checks_arity() {
        let composed = FunctionGraph::new(&budget_filters())
            .compose(&["positive"], Aggregator::LogicalAnd)
            .unwrap();
        assert!(matches!(
            composed.call(&[]),
            Err(GraphError::ArityMismatch { expected: 1, found: 0, .. })
        ));
    }
}
