//! Named scalar functions and ordered collections of them.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use super::error::GraphError;
use super::value::Value;
use crate::Name;

/// Shared body of a [`ModelFunction`]. Receives its arguments in declaration order.
pub type FunctionBody = Arc<dyn Fn(&[Value]) -> Value + Send + Sync>;

/// A named scalar function over named arguments.
///
/// Argument names refer to state/choice variables, fixed inputs, or the
/// outputs of other functions in the same [`FunctionSet`].
#[derive(Clone)]
pub struct ModelFunction {
    name: Name,
    arguments: Vec<Name>,
    body: FunctionBody,
}

impl ModelFunction {
    pub fn new<N, I, A, F>(name: N, arguments: I, body: F) -> Self
    where
        N: Into<Name>,
        I: IntoIterator<Item = A>,
        A: Into<Name>,
        F: Fn(&[Value]) -> Value + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            arguments: arguments.into_iter().map(Into::into).collect(),
            body: Arc::new(body),
        }
    }

    /// A boolean-valued function over numeric arguments.
    pub fn predicate<N, I, A, F>(name: N, arguments: I, f: F) -> Self
    where
        N: Into<Name>,
        I: IntoIterator<Item = A>,
        A: Into<Name>,
        F: Fn(&[f64]) -> bool + Send + Sync + 'static,
    {
        Self::new(name, arguments, move |args: &[Value]| {
            let xs: Vec<f64> = args.iter().map(|v| v.as_f64()).collect();
            Value::Bool(f(&xs))
        })
    }

    /// A numeric derived variable over numeric arguments.
    pub fn derived<N, I, A, F>(name: N, arguments: I, f: F) -> Self
    where
        N: Into<Name>,
        I: IntoIterator<Item = A>,
        A: Into<Name>,
        F: Fn(&[f64]) -> f64 + Send + Sync + 'static,
    {
        Self::new(name, arguments, move |args: &[Value]| {
            let xs: Vec<f64> = args.iter().map(|v| v.as_f64()).collect();
            Value::Float(f(&xs))
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arguments(&self) -> &[Name] {
        &self.arguments
    }

    /// Calls the function with positional arguments.
    ///
    /// # Errors
    ///
    /// `ArityMismatch` if `args` does not match the declared argument count.
    pub fn call(&self, args: &[Value]) -> Result<Value, GraphError> {
        if args.len() != self.arguments.len() {
            return Err(GraphError::ArityMismatch {
                function: self.name.clone(),
                expected: self.arguments.len(),
                found: args.len(),
            });
        }
        Ok((self.body)(args))
    }

    /// Calls the body without checking arity.
    #[inline]
    pub(crate) fn apply(&self, args: &[Value]) -> Value {
        (self.body)(args)
    }
}

impl fmt::Debug for ModelFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelFunction")
            .field("name", &self.name)
            .field("arguments", &self.arguments)
            .finish_non_exhaustive()
    }
}

/// Insertion-ordered collection of functions keyed by name.
#[derive(Debug, Clone, Default)]
pub struct FunctionSet(IndexMap<Name, ModelFunction>);

impl FunctionSet {
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    /// Inserts `function` under its own name, replacing any previous entry
    /// of that name in place.
    pub fn insert(&mut self, function: ModelFunction) -> Option<ModelFunction> {
        self.0.insert(function.name.clone(), function)
    }

    pub fn with(mut self, function: ModelFunction) -> Self {
        self.insert(function);
        self
    }

    pub fn get(&self, name: &str) -> Option<&ModelFunction> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.0.keys().map(|k| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &ModelFunction> + '_ {
        self.0.values()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns `self` extended by `other`; on a name clash `other` wins.
    pub fn merged(&self, other: &FunctionSet) -> FunctionSet {
        let mut out = self.clone();
        for function in other.iter() {
            out.insert(function.clone());
        }
        out
    }
}

impl FromIterator<ModelFunction> for FunctionSet {
    fn from_iter<I: IntoIterator<Item = ModelFunction>>(iter: I) -> Self {
        let mut set = FunctionSet::new();
        for function in iter {
            set.insert(function);
        }
        set
    }
}
