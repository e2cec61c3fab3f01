//! fvcom_extract: FVCOM NetCDF variable extraction
//!
//! A small Rust library for pulling variables out of FVCOM (Finite Volume
//! Community Ocean Model) NetCDF output into `ndarray` arrays, optionally
//! clipped along any dimension, and for building surface elevation time
//! series at chosen nodes.
//!
//! ## Module Organization
//!
//! - [`extract`]: reading variables with per-dimension clipping
//! - [`clip`]: dimension selections and their textual forms
//! - [`elevation`]: surface elevation time series at selected nodes
//! - [`metadata`]: dimension and variable listing
//! - [`format`]: NetCDF container format detection
//! - [`time`]: FVCOM model time decoding
//! - [`errors`]: Centralized error handling
//!
//! ## Usage
//!
//! ```rust,no_run
//! use fvcom_extract::prelude::*;
//!
//! // First hundred time steps of surface elevation
//! let clip = parse_clip_spec(&["time=0:100"]).unwrap();
//! let data = read_fvcom("casename_0001.nc", &["zeta"], Some(&clip), true).unwrap();
//!
//! // Time series at nodes 5 and 12, with a gap in between
//! let series = surface_elevation_from(&data, "zeta", &[Some(5), None, Some(12)]).unwrap();
//! assert_eq!(series.ncols(), 3);
//! ```

pub mod clip;
pub mod elevation;
pub mod errors;
pub mod extract;
pub mod format;
#[cfg(feature = "netcdf")]
pub mod metadata;
pub mod time;

pub use clip::{parse_clip_spec, ClipSpec, DimSelection};
pub use elevation::{indices_from_f64, surface_elevation, surface_elevation_from};
pub use errors::{FvcomError, Result};
pub use extract::{read_fvcom, FvcomData};
#[cfg(feature = "netcdf")]
pub use extract::read_fvcom_from;
pub use format::FileFormat;
pub use time::decode_fvcom_time;

pub mod prelude {
    //! Commonly used imports for convenience
    pub use crate::clip::{parse_clip_spec, ClipSpec, DimSelection};
    pub use crate::elevation::{surface_elevation, surface_elevation_from};
    pub use crate::errors::{FvcomError, Result};
    pub use crate::extract::{read_fvcom, FvcomData};
    #[cfg(feature = "netcdf")]
    pub use crate::extract::read_fvcom_from;
}
