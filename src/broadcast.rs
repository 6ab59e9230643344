//! Outer-product evaluation over named axes.
//!
//! [`product_map`] lifts a scalar function of one coordinate per axis to the
//! full Cartesian product of the axes. The result has one dimension per
//! axis, in the order the axes were given.

use ndarray::{ArrayD, ArrayView1, IxDyn};

/// Evaluates `f` at every point of the outer product of `axes`.
///
/// `f` receives one coordinate per axis, in axis order. The output shape is
/// `[axes[0].len(), axes[1].len(), ...]`; zero axes yield a 0-dimensional
/// array holding a single evaluation.
pub fn product_map<T, F>(axes: &[ArrayView1<'_, f64>], mut f: F) -> ArrayD<T>
where
    F: FnMut(&[f64]) -> T,
{
    let shape: Vec<usize> = axes.iter().map(|axis| axis.len()).collect();
    let mut point = vec![0.0; axes.len()];

    ArrayD::from_shape_fn(IxDyn(&shape), |index| {
        for (k, axis) in axes.iter().enumerate() {
            point[k] = axis[index[k]];
        }
        f(&point)
    })
}
