//! Grid-point generators.
//!
//! Each generator is a pure function of its parameters and returns the
//! coordinates in ascending order with both endpoints included exactly.

use ndarray::Array1;

use super::error::GridError;
use super::Grid;

/// Largest point count a grid can hold without exceeding the allocation limit.
pub const MAX_POINTS: usize = isize::MAX as usize / std::mem::size_of::<f64>();

fn check_bounds(grid_type: &str, start: f64, stop: f64, n_points: usize) -> Result<(), GridError> {
    if !(start.is_finite() && stop.is_finite()) {
        return Err(GridError::InvalidGridParameter {
            grid_type: grid_type.to_string(),
            reason: format!("bounds must be finite (start={start}, stop={stop})"),
        });
    }
    if n_points == 0 {
        return Err(GridError::InvalidGridParameter {
            grid_type: grid_type.to_string(),
            reason: "n_points must be >= 1".to_string(),
        });
    }
    if n_points > MAX_POINTS {
        return Err(GridError::InvalidGridParameter {
            grid_type: grid_type.to_string(),
            reason: format!("n_points must be <= {MAX_POINTS}, got {n_points}"),
        });
    }
    Ok(())
}

/// Generate `n_points` evenly spaced points between `start` and `stop` (inclusive).
pub fn linspace(start: f64, stop: f64, n_points: usize) -> Result<Grid, GridError> {
    check_bounds("linspace", start, stop, n_points)?;
    if n_points == 1 {
        return Ok(Array1::from(vec![start]));
    }

    let step = (stop - start) / (n_points as f64 - 1.0);
    let mut out = Array1::from_shape_fn(n_points, |i| start + step * i as f64);
    out[n_points - 1] = stop;
    Ok(out)
}

/// Generate `n_points` log-spaced points between `start` and `stop` (inclusive).
///
/// Both bounds must be strictly positive.
pub fn logspace(start: f64, stop: f64, n_points: usize) -> Result<Grid, GridError> {
    check_bounds("logspace", start, stop, n_points)?;
    if start <= 0.0 || stop <= 0.0 {
        return Err(GridError::InvalidGridParameter {
            grid_type: "logspace".to_string(),
            reason: format!("bounds must be > 0 (start={start}, stop={stop})"),
        });
    }
    if n_points == 1 {
        return Ok(Array1::from(vec![start]));
    }

    let ln_start = start.ln();
    let step = (stop.ln() - ln_start) / (n_points as f64 - 1.0);
    let mut out = Array1::from_shape_fn(n_points, |i| (ln_start + step * i as f64).exp());
    out[0] = start;
    out[n_points - 1] = stop;
    Ok(out)
}
