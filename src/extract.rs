//! Variable extraction from FVCOM NetCDF output
//!
//! [`read_fvcom`] opens a file, resolves a selection for every dimension
//! (full extent unless clipped), and reads each requested variable with the
//! selections of its own dimensions, in the order that variable declares
//! them.
//!
//! Slices become strided reads, with reversed slices flipped in memory
//! afterwards. Index lists are read one run of consecutive indices at a
//! time, so scattered nodes across a large mesh cost only the nodes asked
//! for. A single index is read as a one-point slab and its axis dropped.

use crate::clip::ClipSpec;
use crate::errors::Result;
use ndarray::ArrayD;
use std::collections::HashMap;
use std::path::Path;

/// Extracted arrays keyed by variable name
pub type FvcomData = HashMap<String, ArrayD<f64>>;

/// Applied ranges longer than this are logged as "given indices"
#[cfg(feature = "netcdf")]
const MAX_LOGGED_SELECTION: usize = 60;

/// Reads `var_list` from the FVCOM output at `path`.
///
/// `clip_dims` restricts dimensions by name; keys that are not dimensions of
/// the file are ignored. Variables not present in the file are skipped, so
/// the result holds exactly the requested variables the file declares.
///
/// The file handle is closed before this returns. Use [`read_fvcom_from`] to
/// keep control of the handle.
///
/// # Errors
///
/// Fails if the file cannot be opened or read, if an explicit index lies
/// outside its dimension, or with [`MissingCapability`] when the crate was
/// built without the `netcdf` feature.
///
/// [`MissingCapability`]: crate::errors::FvcomError::MissingCapability
///
/// # Examples
///
/// ```rust,no_run
/// use fvcom_extract::clip::parse_clip_spec;
/// use fvcom_extract::extract::read_fvcom;
///
/// let clip = parse_clip_spec(&["time=0:100"]).unwrap();
/// let data = read_fvcom("casename_0001.nc", &["zeta", "time"], Some(&clip), false).unwrap();
/// println!("zeta shape: {:?}", data["zeta"].shape());
/// ```
#[cfg(feature = "netcdf")]
pub fn read_fvcom<P, S>(
    path: P,
    var_list: &[S],
    clip_dims: Option<&ClipSpec>,
    verbose: bool,
) -> Result<FvcomData>
where
    P: AsRef<Path>,
    S: AsRef<str>,
{
    use crate::format::FileFormat;

    let path = path.as_ref();
    let level = diagnostic_level(verbose);

    let file = netcdf::open(path)?;
    if log::log_enabled!(level) {
        log::log!(level, "File format: {}", FileFormat::detect(path)?);
    }

    read_fvcom_from(&file, var_list, clip_dims, verbose)
}

#[cfg(not(feature = "netcdf"))]
pub fn read_fvcom<P, S>(
    _path: P,
    _var_list: &[S],
    _clip_dims: Option<&ClipSpec>,
    _verbose: bool,
) -> Result<FvcomData>
where
    P: AsRef<Path>,
    S: AsRef<str>,
{
    Err(crate::errors::FvcomError::MissingCapability(
        crate::errors::NETCDF_UNAVAILABLE.to_string(),
    ))
}

/// Same as [`read_fvcom`], against a handle the caller keeps open.
#[cfg(feature = "netcdf")]
pub fn read_fvcom_from<S: AsRef<str>>(
    file: &netcdf::File,
    var_list: &[S],
    clip_dims: Option<&ClipSpec>,
    verbose: bool,
) -> Result<FvcomData> {
    use crate::clip::{resolve_selections, DimSelection};
    use std::collections::HashSet;

    let level = diagnostic_level(verbose);

    let dims = resolve_selections(
        file.dimensions().map(|d| (d.name().to_string(), d.len())),
        clip_dims,
    );
    let wanted: HashSet<&str> = var_list.iter().map(AsRef::as_ref).collect();

    let mut fvcom = FvcomData::new();
    for var in file.variables() {
        let name = var.name().to_string();
        if !wanted.contains(name.as_str()) {
            log::log!(level, "Found {}", name);
            continue;
        }

        let mut applied = Vec::new();
        let mut resolved = Vec::new();
        for dim in var.dimensions() {
            let dim_name = dim.name().to_string();
            let selection = dims
                .get(&dim_name)
                .map(|(_, selection)| selection.clone())
                .unwrap_or_else(|| DimSelection::full(dim.len()));
            resolved.push(selection.resolve(&dim_name, dim.len())?);
            applied.push(selection.to_string());
        }

        let data = read_selection(&var, &resolved)?;
        log::log!(level, "Found {} (extracted {})", name, describe(&applied));

        fvcom.insert(name, data);
    }

    Ok(fvcom)
}

/// Reads one variable restricted to `resolved`, one entry per dimension.
#[cfg(feature = "netcdf")]
fn read_selection(
    var: &netcdf::Variable,
    resolved: &[crate::clip::ResolvedSelection],
) -> Result<ArrayD<f64>> {
    use crate::clip::ResolvedSelection;
    use ndarray::{Axis, IxDyn};

    if resolved.is_empty() {
        return Ok(var.get::<f64, _>(..)?);
    }

    if resolved.iter().any(|r| r.is_empty()) {
        let shape: Vec<usize> = resolved
            .iter()
            .filter(|r| r.keeps_axis())
            .map(|r| r.len())
            .collect();
        return Ok(ArrayD::zeros(IxDyn(&shape)));
    }

    let mut data = read_axes(var, resolved, &mut Vec::with_capacity(resolved.len()))?;

    // Highest axis first so earlier axis numbers stay valid
    for (axis, selection) in resolved.iter().enumerate().rev() {
        match selection {
            ResolvedSelection::Strided { reversed: true, .. } => data.invert_axis(Axis(axis)),
            ResolvedSelection::Single(_) => data = data.index_axis_move(Axis(axis), 0),
            _ => {}
        }
    }

    Ok(data)
}

/// Reads the hyperslab for axes `extents.len()..`, with the leading axes
/// already fixed in `extents`.
///
/// Index-list axes fan out into one read per run of consecutive indices;
/// the pieces are joined along that axis and reordered to the caller's
/// order.
#[cfg(feature = "netcdf")]
fn read_axes(
    var: &netcdf::Variable,
    resolved: &[crate::clip::ResolvedSelection],
    extents: &mut Vec<netcdf::Extent>,
) -> Result<ArrayD<f64>> {
    use crate::clip::{PointReads, ResolvedSelection};
    use ndarray::Axis;
    use netcdf::Extent;

    let axis = extents.len();
    let Some(selection) = resolved.get(axis) else {
        return Ok(var.get::<f64, _>(extents.as_slice())?);
    };

    let slab = |start: usize, count: usize, stride: usize| Extent::SliceCount {
        start,
        count,
        stride: stride as isize,
    };

    match selection {
        ResolvedSelection::Strided {
            start,
            count,
            stride,
            ..
        } => {
            extents.push(slab(*start, *count, *stride));
            let data = read_axes(var, resolved, extents);
            extents.pop();
            data
        }
        ResolvedSelection::Single(index) => {
            extents.push(slab(*index, 1, 1));
            let data = read_axes(var, resolved, extents);
            extents.pop();
            data
        }
        ResolvedSelection::Points(indices) => {
            let reads = PointReads::new(indices);
            let mut pieces = Vec::with_capacity(reads.runs.len());
            for run in &reads.runs {
                extents.push(slab(run.start, run.len(), 1));
                let piece = read_axes(var, resolved, extents);
                extents.pop();
                pieces.push(piece?);
            }

            let views: Vec<_> = pieces.iter().map(|p| p.view()).collect();
            let joined = ndarray::concatenate(Axis(axis), &views)?;
            Ok(joined.select(Axis(axis), &reads.positions))
        }
    }
}

/// Text for the "extracted" diagnostic, one entry per dimension
#[cfg(feature = "netcdf")]
fn describe(applied: &[String]) -> String {
    let description = format!("[{}]", applied.join(", "));
    if description.len() < MAX_LOGGED_SELECTION {
        description
    } else {
        "given indices".to_string()
    }
}

#[cfg(feature = "netcdf")]
fn diagnostic_level(verbose: bool) -> log::Level {
    if verbose {
        log::Level::Info
    } else {
        log::Level::Debug
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(feature = "netcdf")]
    #[test]
    fn test_describe_abbreviates_long_selections() {
        let short = vec!["0:100".to_string(), "0:1000".to_string()];
        assert_eq!(describe(&short), "[0:100, 0:1000]");

        let nodes: Vec<String> = (0..20).map(|i| (i * 1000).to_string()).collect();
        let long = vec![format!("[{}]", nodes.join(", "))];
        assert_eq!(describe(&long), "given indices");

        // 59 characters once bracketed is still shown
        let edge = vec!["x".repeat(MAX_LOGGED_SELECTION - 3)];
        assert_eq!(describe(&edge).len(), MAX_LOGGED_SELECTION - 1);
        let over = vec!["x".repeat(MAX_LOGGED_SELECTION - 2)];
        assert_eq!(describe(&over), "given indices");
    }

    #[cfg(not(feature = "netcdf"))]
    #[test]
    fn test_read_without_netcdf_reports_missing_capability() {
        use crate::errors::{FvcomError, NETCDF_UNAVAILABLE};

        let result = read_fvcom("casename_0001.nc", &["zeta"], None, false);
        match result {
            Err(FvcomError::MissingCapability(message)) => {
                assert_eq!(message, NETCDF_UNAVAILABLE);
            }
            other => panic!("Expected MissingCapability, got {:?}", other),
        }
    }
}
