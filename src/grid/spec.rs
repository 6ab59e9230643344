//! Declarative grid specifications.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use ndarray::Array1;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::error::GridError;
use super::generators::{self, MAX_POINTS};
use super::Grid;

/// Registered parametric grid families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GridType {
    Linspace,
    Logspace,
}

impl GridType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            GridType::Linspace => "linspace",
            GridType::Logspace => "logspace",
        }
    }
}

impl FromStr for GridType {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "linspace" => Ok(GridType::Linspace),
            "logspace" => Ok(GridType::Logspace),
            other => Err(GridError::UnknownGridType(other.to_string())),
        }
    }
}

impl fmt::Display for GridType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Specification of a one-dimensional coordinate grid.
///
/// `Options` is an explicitly enumerated value set and marks a variable as
/// discrete. The remaining variants are parametric families whose
/// coordinates come from [`generators`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(try_from = "RawGridSpec", into = "RawGridSpec")
)]
pub enum GridSpec {
    Options(Vec<f64>),
    Linspace { start: f64, stop: f64, n_points: usize },
    Logspace { start: f64, stop: f64, n_points: usize },
}

impl GridSpec {
    pub fn options<I, T>(values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<f64>,
    {
        GridSpec::Options(values.into_iter().map(Into::into).collect())
    }

    pub const fn linspace(start: f64, stop: f64, n_points: usize) -> Self {
        GridSpec::Linspace {
            start,
            stop,
            n_points,
        }
    }

    pub const fn logspace(start: f64, stop: f64, n_points: usize) -> Self {
        GridSpec::Logspace {
            start,
            stop,
            n_points,
        }
    }

    /// Builds a parametric spec from a string discriminator and its keyword
    /// parameters.
    ///
    /// # Errors
    ///
    /// - `UnknownGridType` if `grid_type` names no registered family
    /// - `MissingGridParameter` if a required parameter is absent
    /// - `InvalidGridParameter` for unexpected parameters or a non-integral `n_points`
    pub fn parametric<'a, I>(grid_type: &str, params: I) -> Result<Self, GridError>
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        let kind: GridType = grid_type.parse()?;
        let params: BTreeMap<&str, f64> = params.into_iter().collect();

        if let Some(extra) = params
            .keys()
            .find(|k| !matches!(**k, "start" | "stop" | "n_points"))
        {
            return Err(GridError::InvalidGridParameter {
                grid_type: kind.to_string(),
                reason: format!("unexpected parameter '{extra}'"),
            });
        }

        let require = |name: &str| {
            params
                .get(name)
                .copied()
                .ok_or_else(|| GridError::MissingGridParameter {
                    grid_type: kind.to_string(),
                    parameter: name.to_string(),
                })
        };
        let start = require("start")?;
        let stop = require("stop")?;
        let n_points = require("n_points")?;
        if n_points < 0.0 || n_points.fract() != 0.0 {
            return Err(GridError::InvalidGridParameter {
                grid_type: kind.to_string(),
                reason: format!("n_points must be a non-negative integer, got {n_points}"),
            });
        }
        if n_points > MAX_POINTS as f64 {
            return Err(GridError::InvalidGridParameter {
                grid_type: kind.to_string(),
                reason: format!("n_points must be <= {MAX_POINTS}, got {n_points}"),
            });
        }
        let n_points = n_points as usize;

        Ok(match kind {
            GridType::Linspace => GridSpec::linspace(start, stop, n_points),
            GridType::Logspace => GridSpec::logspace(start, stop, n_points),
        })
    }

    /// Returns the parametric family, or `None` for an enumerated option set.
    pub fn grid_type(&self) -> Option<GridType> {
        match self {
            GridSpec::Options(_) => None,
            GridSpec::Linspace { .. } => Some(GridType::Linspace),
            GridSpec::Logspace { .. } => Some(GridType::Logspace),
        }
    }

    /// Whether this spec enumerates its values explicitly.
    pub fn is_discrete(&self) -> bool {
        matches!(self, GridSpec::Options(_))
    }

    /// Produces the coordinate sequence.
    ///
    /// Options are returned as given: order preserved, duplicates kept.
    pub fn build(&self) -> Result<Grid, GridError> {
        match self {
            GridSpec::Options(values) => Ok(Array1::from(values.clone())),
            GridSpec::Linspace {
                start,
                stop,
                n_points,
            } => generators::linspace(*start, *stop, *n_points),
            GridSpec::Logspace {
                start,
                stop,
                n_points,
            } => generators::logspace(*start, *stop, *n_points),
        }
    }
}

/// Wire form of a [`GridSpec`]: either `{"options": [...]}` or
/// `{"grid_type": "...", <params>}`.
#[cfg(feature = "serde")]
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawGridSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    options: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    grid_type: Option<String>,
    #[serde(flatten)]
    params: BTreeMap<String, f64>,
}

#[cfg(feature = "serde")]
impl TryFrom<RawGridSpec> for GridSpec {
    type Error = GridError;

    fn try_from(raw: RawGridSpec) -> Result<Self, Self::Error> {
        if let Some(options) = raw.options {
            return Ok(GridSpec::Options(options));
        }
        let grid_type = raw
            .grid_type
            .ok_or_else(|| GridError::UnknownGridType("<missing grid_type>".to_string()))?;
        GridSpec::parametric(
            &grid_type,
            raw.params.iter().map(|(k, v)| (k.as_str(), *v)),
        )
    }
}

#[cfg(feature = "serde")]
impl From<GridSpec> for RawGridSpec {
    fn from(spec: GridSpec) -> Self {
        let grid_type = spec.grid_type().map(|t| t.to_string());
        match spec {
            GridSpec::Options(options) => RawGridSpec {
                options: Some(options),
                grid_type: None,
                params: BTreeMap::new(),
            },
            GridSpec::Linspace {
                start,
                stop,
                n_points,
            }
            | GridSpec::Logspace {
                start,
                stop,
                n_points,
            } => RawGridSpec {
                options: None,
                grid_type,
                params: BTreeMap::from([
                    ("start".to_string(), start),
                    ("stop".to_string(), stop),
                    ("n_points".to_string(), n_points as f64),
                ]),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_returned_unchanged() {
        let spec = GridSpec::options([1, 2, 3]);
        assert_eq!(spec.build().unwrap().to_vec(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn options_keep_order_and_duplicates() {
        let spec = GridSpec::options([3.0, 1.0, 3.0]);
        assert_eq!(spec.build().unwrap().to_vec(), vec![3.0, 1.0, 3.0]);
    }

    #[test]
    fn parametric_linspace_matches_generator() {
        let spec = GridSpec::parametric(
            "linspace",
            [("start", 0.0), ("stop", 1.0), ("n_points", 3.0)],
        )
        .unwrap();
        assert_eq!(spec, GridSpec::linspace(0.0, 1.0, 3));
        assert_eq!(spec.build().unwrap().to_vec(), vec![0.0, 0.5, 1.0]);
    }

    #[test]
    fn parametric_unknown_type() {
        let err = GridSpec::parametric("chebyshev", [("n_points", 3.0)]).unwrap_err();
        assert_eq!(err, GridError::UnknownGridType("chebyshev".to_string()));
    }

    #[test]
    fn parametric_missing_parameter() {
        let err = GridSpec::parametric("logspace", [("start", 1.0), ("stop", 2.0)]).unwrap_err();
        assert_eq!(
            err,
            GridError::MissingGridParameter {
                grid_type: "logspace".to_string(),
                parameter: "n_points".to_string(),
            }
        );
    }

    #[test]
    fn parametric_rejects_unexpected_parameter() {
        let err = GridSpec::parametric(
            "linspace",
            [("start", 0.0), ("stop", 1.0), ("n_points", 3.0), ("base", 2.0)],
        )
        .unwrap_err();
        assert!(matches!(err, GridError::InvalidGridParameter { .. }));
    }

    #[test]
    fn parametric_rejects_fractional_points() {
        let err = GridSpec::parametric(
            "linspace",
            [("start", 0.0), ("stop", 1.0), ("n_points", 2.5)],
        )
        .unwrap_err();
        assert!(matches!(err, GridError::InvalidGridParameter { .. }));
    }

    #[test]
    fn parametric_rejects_unallocatable_point_count() {
        let err = GridSpec::parametric(
            "linspace",
            [("start", 0.0), ("stop", 1.0), ("n_points", 1e19)],
        )
        .unwrap_err();
        assert!(matches!(err, GridError::InvalidGridParameter { .. }));
    }

    #[test]
    fn oversized_spec_fails_to_build() {
        let err = GridSpec::linspace(0.0, 1.0, usize::MAX).build().unwrap_err();
        assert!(matches!(err, GridError::InvalidGridParameter { .. }));
    }

    #[test]
    fn discrete_only_for_options() {
        assert!(GridSpec::options([0.0, 1.0]).is_discrete());
        assert!(!GridSpec::linspace(0.0, 1.0, 2).is_discrete());
        assert_eq!(
            GridSpec::logspace(1.0, 2.0, 2).grid_type(),
            Some(GridType::Logspace)
        );
    }

    #[cfg(feature = "serde")]
    mod serde_form {
        use super::*;

        #[test]
        fn deserialize_options() {
            let spec: GridSpec = serde_json::from_str(r#"{"options": [0, 1, 1]}"#).unwrap();
            assert_eq!(spec, GridSpec::options([0.0, 1.0, 1.0]));
        }

        #[test]
        fn deserialize_parametric() {
            let spec: GridSpec = serde_json::from_str(
                r#"{"grid_type": "linspace", "start": 1, "stop": 5, "n_points": 5}"#,
            )
            .unwrap();
            assert_eq!(spec, GridSpec::linspace(1.0, 5.0, 5));
        }

        #[test]
        fn deserialize_unknown_grid_type_fails() {
            let err = serde_json::from_str::<GridSpec>(
                r#"{"grid_type": "chebyshev", "start": 1, "stop": 5, "n_points": 5}"#,
            )
            .unwrap_err();
            assert!(err.to_string().contains("Unknown grid type: chebyshev"));
        }

        #[test]
        fn serialize_parametric_carries_discriminator() {
            let json = serde_json::to_value(GridSpec::logspace(1.0, 10.0, 4)).unwrap();
            assert_eq!(json["grid_type"], "logspace");
            assert_eq!(json["n_points"], 4.0);
        }
    }
}
