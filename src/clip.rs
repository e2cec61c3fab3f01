//! Per-dimension selections used to subset variables on extraction
//!
//! A [`ClipSpec`] maps dimension names to a [`DimSelection`]: a slice, an
//! explicit list of indices, or a single index. Selections parse from the
//! short textual forms used on the command line, with the same meaning as a
//! Python subscript (negative values count from the end of the dimension):
//!
//! ```
//! use fvcom_extract::clip::DimSelection;
//!
//! let first_hundred: DimSelection = "0:100".parse().unwrap();
//! assert_eq!(first_hundred, DimSelection::slice(Some(0), Some(100), None));
//!
//! let last_ten_hourly: DimSelection = "-10::1".parse().unwrap();
//! assert_eq!(last_ten_hourly, DimSelection::slice(Some(-10), None, Some(1)));
//!
//! let nodes: DimSelection = "[0, 400, 10000]".parse().unwrap();
//! assert_eq!(nodes, DimSelection::Indices(vec![0, 400, 10000]));
//!
//! let one_layer: DimSelection = "-1".parse().unwrap();
//! assert_eq!(one_layer, DimSelection::Index(-1));
//! ```

use crate::errors::{FvcomError, Result};
use std::collections::HashMap;
use std::fmt;
use std::ops::Range;
use std::str::FromStr;

/// Caller-supplied overrides keyed by dimension name
pub type ClipSpec = HashMap<String, DimSelection>;

/// Selection along a single dimension
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DimSelection {
    /// Slice `start:end:step`; omitted bounds default as in Python
    Range {
        start: Option<isize>,
        end: Option<isize>,
        step: Option<isize>,
    },
    /// Explicit indices, kept in the given order
    Indices(Vec<isize>),
    /// A single index; the dimension is dropped from the result
    Index(isize),
}

/// A selection bound to a concrete dimension extent
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedSelection {
    /// `count` points from `start`, `stride` apart in file order. When
    /// `reversed`, the points are returned last to first.
    Strided {
        start: usize,
        count: usize,
        stride: usize,
        reversed: bool,
    },
    /// Explicit indices in the caller's order
    Points(Vec<usize>),
    /// One index; the axis is removed
    Single(usize),
}

impl ResolvedSelection {
    /// Number of points this selection takes along its axis
    pub fn len(&self) -> usize {
        match self {
            ResolvedSelection::Strided { count, .. } => *count,
            ResolvedSelection::Points(indices) => indices.len(),
            ResolvedSelection::Single(_) => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the axis survives in the extracted array
    pub fn keeps_axis(&self) -> bool {
        !matches!(self, ResolvedSelection::Single(_))
    }
}

/// File reads needed for an index list
///
/// `runs` are the maximal runs of consecutive indices, ascending and without
/// duplicates. `positions[i]` is where the i-th requested index sits in the
/// concatenation of those runs. Only the listed indices are ever read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointReads {
    pub runs: Vec<Range<usize>>,
    pub positions: Vec<usize>,
}

impl PointReads {
    pub fn new(indices: &[usize]) -> Self {
        let mut unique = indices.to_vec();
        unique.sort_unstable();
        unique.dedup();

        let mut runs: Vec<Range<usize>> = Vec::new();
        for &i in &unique {
            match runs.last_mut() {
                Some(run) if run.end == i => run.end += 1,
                _ => runs.push(i..i + 1),
            }
        }

        let positions = indices
            .iter()
            .map(|i| unique.binary_search(i).unwrap_or_else(|pos| pos))
            .collect();

        Self { runs, positions }
    }

    /// Total number of points fetched from the file
    pub fn points_read(&self) -> usize {
        self.runs.iter().map(|run| run.len()).sum()
    }
}

impl DimSelection {
    pub fn slice(start: Option<isize>, end: Option<isize>, step: Option<isize>) -> Self {
        DimSelection::Range { start, end, step }
    }

    /// Selection covering the whole dimension
    pub fn full(extent: usize) -> Self {
        DimSelection::slice(Some(0), Some(to_isize(extent)), None)
    }

    /// Binds the selection to a dimension of length `extent`.
    ///
    /// Slices follow Python rules: out-of-range bounds are clipped and may
    /// leave an empty selection. Single indices and index lists must name a
    /// point of the dimension once negative values are counted from the end.
    pub fn resolve(&self, dim_name: &str, extent: usize) -> Result<ResolvedSelection> {
        match self {
            DimSelection::Range { start, end, step } => {
                resolve_slice(dim_name, *start, *end, step.unwrap_or(1), extent)
            }
            DimSelection::Indices(indices) => indices
                .iter()
                .map(|&i| normalize_index(dim_name, i, extent))
                .collect::<Result<Vec<_>>>()
                .map(ResolvedSelection::Points),
            DimSelection::Index(i) => {
                normalize_index(dim_name, *i, extent).map(ResolvedSelection::Single)
            }
        }
    }
}

fn to_isize(n: usize) -> isize {
    isize::try_from(n).unwrap_or(isize::MAX)
}

fn normalize_index(dim_name: &str, index: isize, extent: usize) -> Result<usize> {
    let len = to_isize(extent);
    let i = if index < 0 { index + len } else { index };
    if (0..len).contains(&i) {
        Ok(i as usize)
    } else {
        Err(FvcomError::InvalidSlice {
            message: format!(
                "index {} out of range for dimension '{}' (dimension size: {})",
                index, dim_name, extent
            ),
        })
    }
}

/// Python `slice.indices` followed by conversion to an ascending strided read.
fn resolve_slice(
    dim_name: &str,
    start: Option<isize>,
    end: Option<isize>,
    step: isize,
    extent: usize,
) -> Result<ResolvedSelection> {
    if step == 0 {
        return Err(FvcomError::InvalidSlice {
            message: format!("slice step cannot be zero for dimension '{}'", dim_name),
        });
    }

    let len = to_isize(extent);
    let (lower, upper) = if step > 0 { (0, len) } else { (-1, len - 1) };
    let clip = |bound: isize| {
        if bound < 0 {
            (bound + len).max(lower)
        } else {
            bound.min(upper)
        }
    };

    let start = start.map_or(if step > 0 { lower } else { upper }, clip);
    let end = end.map_or(if step > 0 { upper } else { lower }, clip);

    let count = if step > 0 && end > start {
        (end - start - 1) / step + 1
    } else if step < 0 && start > end {
        (start - end - 1) / -step + 1
    } else {
        0
    };

    let stride = step.unsigned_abs();
    if count == 0 {
        return Ok(ResolvedSelection::Strided {
            start: 0,
            count: 0,
            stride,
            reversed: false,
        });
    }

    let first = if step > 0 {
        start
    } else {
        start + (count - 1) * step
    };

    Ok(ResolvedSelection::Strided {
        start: first as usize,
        count: count as usize,
        stride,
        reversed: step < 0,
    })
}

impl fmt::Display for DimSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bound = |b: &Option<isize>| b.map(|v| v.to_string()).unwrap_or_default();
        match self {
            DimSelection::Range { start, end, step } => {
                write!(f, "{}:{}", bound(start), bound(end))?;
                if let Some(step) = step {
                    write!(f, ":{}", step)?;
                }
                Ok(())
            }
            DimSelection::Indices(indices) => {
                let items: Vec<String> = indices.iter().map(|i| i.to_string()).collect();
                write!(f, "[{}]", items.join(", "))
            }
            DimSelection::Index(i) => write!(f, "{}", i),
        }
    }
}

impl FromStr for DimSelection {
    type Err = FvcomError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = |what: &str| FvcomError::InvalidSlice {
            message: format!("{} in '{}'", what, s),
        };

        let text = s.trim();
        let bracketed = text.starts_with('[') && text.ends_with(']') && text.len() >= 2;
        let body = if bracketed {
            text[1..text.len() - 1].trim()
        } else {
            text
        };

        if body.contains(':') {
            if bracketed {
                return Err(invalid("slices cannot be bracketed"));
            }
            let parts: Vec<&str> = body.split(':').map(str::trim).collect();
            if parts.len() > 3 {
                return Err(invalid("expected 'start:end' or 'start:end:step'"));
            }
            let bounds = parts
                .iter()
                .map(|part| {
                    if part.is_empty() {
                        Ok(None)
                    } else {
                        part.parse::<isize>()
                            .map(Some)
                            .map_err(|_| invalid("invalid slice bound"))
                    }
                })
                .collect::<Result<Vec<_>>>()?;

            let step = bounds.get(2).copied().flatten();
            if step == Some(0) {
                return Err(invalid("slice step cannot be zero"));
            }
            return Ok(DimSelection::slice(bounds[0], bounds[1], step));
        }

        if body.is_empty() {
            return if bracketed {
                Ok(DimSelection::Indices(Vec::new()))
            } else {
                Err(invalid("empty selection"))
            };
        }

        let indices = body
            .split(',')
            .map(|item| item.trim().parse::<isize>())
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|_| invalid("invalid index"))?;

        match indices.as_slice() {
            [single] if !bracketed && !body.contains(',') => Ok(DimSelection::Index(*single)),
            _ => Ok(DimSelection::Indices(indices)),
        }
    }
}

/// Parses a single `dim=selection` pair, e.g. `time=0:100` or `node=[3, 7]`.
pub fn parse_clip_pair(s: &str) -> Result<(String, DimSelection)> {
    let (dim, selection) = s.split_once('=').ok_or_else(|| FvcomError::InvalidSlice {
        message: format!("expected '<dimension>=<selection>', got '{}'", s),
    })?;

    let dim = dim.trim();
    if dim.is_empty() {
        return Err(FvcomError::InvalidSlice {
            message: format!("missing dimension name in '{}'", s),
        });
    }

    Ok((dim.to_string(), selection.parse()?))
}

/// Builds a [`ClipSpec`] from `dim=selection` pairs. Later pairs win.
pub fn parse_clip_spec<S: AsRef<str>>(pairs: &[S]) -> Result<ClipSpec> {
    pairs.iter().map(|p| parse_clip_pair(p.as_ref())).collect()
}

/// Resolves the selection for every declared dimension.
///
/// Each dimension defaults to its full extent. A clip entry replaces the
/// default only when its key names one of `dims`; other clip keys are ignored.
pub fn resolve_selections<I>(
    dims: I,
    clip_dims: Option<&ClipSpec>,
) -> HashMap<String, (usize, DimSelection)>
where
    I: IntoIterator<Item = (String, usize)>,
{
    dims.into_iter()
        .map(|(name, extent)| {
            let selection = clip_dims
                .and_then(|clip| clip.get(&name))
                .cloned()
                .unwrap_or_else(|| DimSelection::full(extent));
            (name, (extent, selection))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> DimSelection {
        s.parse().unwrap()
    }

    fn strided(start: usize, count: usize, stride: usize, reversed: bool) -> ResolvedSelection {
        ResolvedSelection::Strided {
            start,
            count,
            stride,
            reversed,
        }
    }

    #[test]
    fn test_parse_slices() {
        assert_eq!(parse("0:100"), DimSelection::slice(Some(0), Some(100), None));
        assert_eq!(parse(" 10: "), DimSelection::slice(Some(10), None, None));
        assert_eq!(parse(":5"), DimSelection::slice(None, Some(5), None));
        assert_eq!(parse(":"), DimSelection::slice(None, None, None));
        assert_eq!(parse("0:100:2"), DimSelection::slice(Some(0), Some(100), Some(2)));
        assert_eq!(parse("-10:"), DimSelection::slice(Some(-10), None, None));
        assert_eq!(parse(":-1"), DimSelection::slice(None, Some(-1), None));
        assert_eq!(parse("::-1"), DimSelection::slice(None, None, Some(-1)));
    }

    #[test]
    fn test_parse_indices() {
        assert_eq!(parse("[0, 1, 80, 100]"), DimSelection::Indices(vec![0, 1, 80, 100]));
        assert_eq!(parse("0, 400, 10000"), DimSelection::Indices(vec![0, 400, 10000]));
        assert_eq!(parse("[-1, 0]"), DimSelection::Indices(vec![-1, 0]));
        assert_eq!(parse("[7]"), DimSelection::Indices(vec![7]));
        assert_eq!(parse("[]"), DimSelection::Indices(vec![]));
        assert_eq!(parse("7"), DimSelection::Index(7));
        assert_eq!(parse("-1"), DimSelection::Index(-1));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for bad in ["", "0:10:2:1", "a:b", "[1, x]", "[0:4]", "1,,2", "0:10:0"] {
            let err = bad.parse::<DimSelection>().unwrap_err();
            assert!(
                matches!(err, FvcomError::InvalidSlice { .. }),
                "'{}' should be rejected, got {:?}",
                bad,
                err
            );
        }
    }

    #[test]
    fn test_display_matches_parse_forms() {
        for text in ["0:100", "3:", ":-1", "0:100:2", "::-1", "[0, 400, 10000]", "5", "-2"] {
            assert_eq!(parse(text).to_string(), text);
        }
        assert_eq!(DimSelection::full(500).to_string(), "0:500");
    }

    #[test]
    fn test_resolve_slice_clamps_to_extent() {
        assert_eq!(parse("10:900").resolve("time", 500).unwrap(), strided(10, 490, 1, false));
        assert!(parse("600:").resolve("time", 500).unwrap().is_empty());
        assert!(parse("8:3").resolve("time", 500).unwrap().is_empty());
        assert_eq!(parse(":").resolve("time", 500).unwrap(), strided(0, 500, 1, false));
    }

    #[test]
    fn test_resolve_slice_steps_and_negatives() {
        assert_eq!(parse("0:100:2").resolve("time", 500).unwrap(), strided(0, 50, 2, false));
        assert_eq!(parse("1:10:3").resolve("time", 500).unwrap(), strided(1, 3, 3, false));
        assert_eq!(parse("-10:").resolve("time", 500).unwrap(), strided(490, 10, 1, false));
        assert_eq!(parse(":-1").resolve("time", 500).unwrap(), strided(0, 499, 1, false));
        assert_eq!(parse("-900:2").resolve("time", 500).unwrap(), strided(0, 2, 1, false));

        // 10, 7, 4, 1
        assert_eq!(parse("10:0:-3").resolve("time", 500).unwrap(), strided(1, 4, 3, true));
        assert_eq!(parse("::-1").resolve("time", 5).unwrap(), strided(0, 5, 1, true));
        assert!(parse("0:10:-1").resolve("time", 500).unwrap().is_empty());

        let zero_step = DimSelection::slice(None, None, Some(0));
        assert!(zero_step.resolve("time", 500).is_err());
    }

    #[test]
    fn test_resolve_indices_and_single() {
        let resolved = parse("[12, -1, 12, 9]").resolve("node", 20).unwrap();
        assert_eq!(resolved, ResolvedSelection::Points(vec![12, 19, 12, 9]));
        assert_eq!(resolved.len(), 4);

        let single = parse("-2").resolve("siglay", 10).unwrap();
        assert_eq!(single, ResolvedSelection::Single(8));
        assert!(!single.keeps_axis());
    }

    #[test]
    fn test_resolve_indices_out_of_range() {
        for sel in [parse("[0, 20]"), parse("[-21]"), parse("20")] {
            match sel.resolve("node", 20) {
                Err(FvcomError::InvalidSlice { message }) => {
                    assert!(message.contains("node"));
                    assert!(message.contains("20"));
                }
                other => panic!("Expected InvalidSlice, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_point_reads_only_fetch_listed_indices() {
        let far_apart = PointReads::new(&[0, 99_999]);
        assert_eq!(far_apart.runs, vec![0..1, 99_999..100_000]);
        assert_eq!(far_apart.points_read(), 2);
        assert_eq!(far_apart.positions, vec![0, 1]);

        let mixed = PointReads::new(&[12, 5, 6, 7, 12, 9]);
        assert_eq!(mixed.runs, vec![5..8, 9..10, 12..13]);
        assert_eq!(mixed.points_read(), 5);
        assert_eq!(mixed.positions, vec![4, 0, 1, 2, 4, 3]);
    }

    #[test]
    fn test_parse_clip_spec_pairs() {
        let spec = parse_clip_spec(&["time=0:100", "node=[3, 1]"]).unwrap();
        assert_eq!(spec.len(), 2);
        assert_eq!(spec["node"], DimSelection::Indices(vec![3, 1]));

        assert!(parse_clip_pair("time").is_err());
        assert!(parse_clip_pair("=0:1").is_err());
    }

    #[test]
    fn test_resolve_selections_ignores_unknown_keys() {
        let mut clip = ClipSpec::new();
        clip.insert("time".to_string(), parse("0:100"));
        clip.insert("not_a_dim".to_string(), parse("0:1"));

        let dims = vec![("time".to_string(), 500), ("node".to_string(), 1000)];
        let resolved = resolve_selections(dims, Some(&clip));

        assert_eq!(resolved.len(), 2);
        assert!(!resolved.contains_key("not_a_dim"));
        assert_eq!(resolved["time"], (500, parse("0:100")));
        assert_eq!(resolved["node"], (1000, DimSelection::full(1000)));
    }
}
