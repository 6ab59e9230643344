//! Dependency graph over a [`FunctionSet`].
//!
//! Every function and every argument name becomes a node; an edge
//! `argument → function` records that the function reads the argument.
//! Names that are not functions themselves are the graph's external inputs.

use std::collections::{BTreeSet, HashMap, HashSet};

use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::{Dfs, NodeFiltered, Reversed};

use super::composed::{Aggregator, ComposedFunction};
use super::error::GraphError;
use super::function::FunctionSet;
use crate::Name;

#[derive(Debug, Clone)]
pub struct FunctionGraph {
    functions: FunctionSet,
    graph: DiGraph<Name, ()>,
    node_by_name: HashMap<Name, NodeIndex>,
}

impl FunctionGraph {
    pub fn new(functions: &FunctionSet) -> Self {
        let mut graph = DiGraph::new();
        let mut node_by_name: HashMap<Name, NodeIndex> = HashMap::new();

        let mut node_for = |graph: &mut DiGraph<Name, ()>, name: &str| -> NodeIndex {
            *node_by_name
                .entry(name.to_string())
                .or_insert_with(|| graph.add_node(name.to_string()))
        };

        for function in functions.iter() {
            let target = node_for(&mut graph, function.name());
            for argument in function.arguments() {
                let source = node_for(&mut graph, argument);
                graph.update_edge(source, target, ());
            }
        }

        Self {
            functions: functions.clone(),
            graph,
            node_by_name,
        }
    }

    pub fn functions(&self) -> &FunctionSet {
        &self.functions
    }

    /// Whether `name` is a function or an argument of this graph.
    pub fn contains(&self, name: &str) -> bool {
        self.node_by_name.contains_key(name)
    }

    /// Names read by the graph that no function produces.
    pub fn external_inputs(&self) -> BTreeSet<Name> {
        self.graph
            .node_weights()
            .filter(|name| !self.functions.contains(name))
            .cloned()
            .collect()
    }

    /// Every name `target` transitively depends on, not including `target`.
    ///
    /// # Errors
    ///
    /// `UnknownTarget` if `target` is not a node of the graph.
    pub fn ancestors(&self, target: &str) -> Result<BTreeSet<Name>, GraphError> {
        let start = self.node(target)?;
        let reversed = Reversed(&self.graph);
        let mut dfs = Dfs::new(reversed, start);

        let mut out = BTreeSet::new();
        while let Some(node) = dfs.next(reversed) {
            if node != start {
                out.insert(self.graph[node].clone());
            }
        }
        Ok(out)
    }

    /// Composes the functions needed to evaluate `targets` into a single
    /// callable whose outputs are folded with `aggregator`.
    ///
    /// Only `targets` and their ancestors take part; functions that nothing
    /// requested are left out and may even be cyclic.
    ///
    /// # Errors
    ///
    /// - `UnknownTarget` if a target is not a function of the set
    /// - `CycleDetected` if the required part of the graph is cyclic
    pub fn compose<S: AsRef<str>>(
        &self,
        targets: &[S],
        aggregator: Aggregator,
    ) -> Result<ComposedFunction, GraphError> {
        let mut required: HashSet<NodeIndex> = HashSet::new();
        for target in targets {
            let target = target.as_ref();
            if !self.functions.contains(target) {
                return Err(GraphError::UnknownTarget(target.to_string()));
            }
            let start = self.node(target)?;
            let reversed = Reversed(&self.graph);
            let mut dfs = Dfs::new(reversed, start);
            while let Some(node) = dfs.next(reversed) {
                required.insert(node);
            }
        }

        let subgraph = NodeFiltered::from_fn(&self.graph, |node| required.contains(&node));
        let order = toposort(&subgraph, None)
            .map_err(|cycle| GraphError::CycleDetected(self.graph[cycle.node_id()].clone()))?;

        let mut functions = Vec::new();
        let mut arguments: Vec<Name> = Vec::new();
        for node in order {
            let name = &self.graph[node];
            match self.functions.get(name) {
                Some(function) => functions.push(function.clone()),
                None => arguments.push(name.clone()),
            }
        }

        Ok(ComposedFunction::new(
            functions,
            arguments,
            targets.iter().map(|t| t.as_ref().to_string()).collect(),
            aggregator,
        ))
    }

    fn node(&self, name: &str) -> Result<NodeIndex, GraphError> {
        self.node_by_name
            .get(name)
            .copied()
            .ok_or_else(|| GraphError::UnknownTarget(name.to_string()))
    }
}
