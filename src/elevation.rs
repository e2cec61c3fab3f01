//! Surface elevation time series at selected nodes
//!
//! FVCOM stores free surface elevation as `zeta(time, node)`. The functions
//! here pick whole time columns out of that array for a list of nodes, where
//! a node may be missing (for instance a gauge that fell outside the grid).

use crate::errors::{FvcomError, Result};
use crate::extract::FvcomData;
use ndarray::{Array2, ArrayView2, Axis, Ix2};

/// Extracts the time series at each node in `idx`.
///
/// The output has shape `(nt, idx.len())`. Column `i` is a copy of column
/// `idx[i]` of `z`, or all NaN when `idx[i]` is `None`.
///
/// # Errors
///
/// Returns [`FvcomError::IndexOutOfBounds`] when a node index is not a column
/// of `z`.
pub fn surface_elevation(z: ArrayView2<f64>, idx: &[Option<usize>]) -> Result<Array2<f64>> {
    let (nt, nx) = z.dim();

    let mut elevation = Array2::from_elem((nt, idx.len()), f64::NAN);
    for (mut column, node) in elevation.axis_iter_mut(Axis(1)).zip(idx) {
        if let Some(node) = *node {
            if node >= nx {
                return Err(FvcomError::IndexOutOfBounds {
                    index: node,
                    len: nx,
                });
            }
            column.assign(&z.column(node));
        }
    }

    Ok(elevation)
}

/// Looks up `var` in an extraction result and applies [`surface_elevation`].
///
/// # Errors
///
/// Returns [`FvcomError::VariableNotFound`] if `var` was not extracted and
/// [`FvcomError::ArrayError`] if it is not two-dimensional.
pub fn surface_elevation_from(
    data: &FvcomData,
    var: &str,
    idx: &[Option<usize>],
) -> Result<Array2<f64>> {
    let z = data
        .get(var)
        .ok_or_else(|| FvcomError::VariableNotFound {
            var: var.to_string(),
        })?
        .view()
        .into_dimensionality::<Ix2>()?;

    surface_elevation(z, idx)
}

/// Converts a float index list, with NaN as the missing marker, into node
/// indices.
///
/// Values are truncated toward zero; negative or infinite values are treated
/// as invalid and rejected.
pub fn indices_from_f64(idx: &[f64]) -> Result<Vec<Option<usize>>> {
    idx.iter()
        .map(|&i| {
            if i.is_nan() {
                Ok(None)
            } else if i.is_finite() && i >= 0.0 {
                Ok(Some(i as usize))
            } else {
                Err(FvcomError::InvalidSlice {
                    message: format!("{} is not a valid node index", i),
                })
            }
        })
        .collect()
}
