//! Scalar values flowing between model functions.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A scalar argument or result of a [`ModelFunction`](super::ModelFunction).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Value {
    Bool(bool),
    Float(f64),
}

impl Value {
    /// Numeric view: `true` is 1.0, `false` is 0.0.
    #[inline]
    pub fn as_f64(self) -> f64 {
        match self {
            Value::Bool(b) => f64::from(u8::from(b)),
            Value::Float(x) => x,
        }
    }

    /// Truthiness: booleans as-is, numbers are true when non-zero.
    #[inline]
    pub fn is_truthy(self) -> bool {
        match self {
            Value::Bool(b) => b,
            Value::Float(x) => x != 0.0,
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Float(0.0)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<i32> for Value {
    fn from(x: i32) -> Self {
        Value::Float(f64::from(x))
    }
}

impl From<i64> for Value {
    fn from(x: i64) -> Self {
        Value::Float(x as f64)
    }
}
