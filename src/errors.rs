//! Centralized error handling for fvcom_extract
//!
//! Every fallible operation in the crate returns [`Result`], whose error type
//! wraps the failures of the NetCDF binding and `ndarray` alongside the few
//! conditions this crate checks itself.

use std::fmt;

/// Message reported when the crate was built without NetCDF support
pub const NETCDF_UNAVAILABLE: &str = "Failed to load the NetCDF4 library";

/// Main error type for fvcom_extract operations
#[derive(Debug)]
pub enum FvcomError {
    /// NetCDF file operation errors
    #[cfg(feature = "netcdf")]
    NetCDFError(netcdf::Error),

    /// I/O operation errors
    IoError(std::io::Error),

    /// Array shape or dimension error
    ArrayError(ndarray::ShapeError),

    /// Variable not found in a file or result mapping
    VariableNotFound { var: String },

    /// Malformed or out-of-range dimension selection
    InvalidSlice { message: String },

    /// Spatial index past the last column of an elevation array
    IndexOutOfBounds { index: usize, len: usize },

    /// A required backend was not compiled in
    MissingCapability(String),
}

impl fmt::Display for FvcomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            #[cfg(feature = "netcdf")]
            FvcomError::NetCDFError(e) => write!(f, "NetCDF error: {}", e),
            FvcomError::IoError(e) => write!(f, "I/O error: {}", e),
            FvcomError::ArrayError(e) => write!(f, "Array error: {}", e),
            FvcomError::VariableNotFound { var } => write!(f, "Variable '{}' not found", var),
            FvcomError::InvalidSlice { message } => {
                write!(f, "Invalid slice specification: {}", message)
            }
            FvcomError::IndexOutOfBounds { index, len } => write!(
                f,
                "Index {} is out of bounds for axis with {} points",
                index, len
            ),
            FvcomError::MissingCapability(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for FvcomError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            #[cfg(feature = "netcdf")]
            FvcomError::NetCDFError(e) => Some(e),
            FvcomError::IoError(e) => Some(e),
            FvcomError::ArrayError(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(feature = "netcdf")]
impl From<netcdf::Error> for FvcomError {
    fn from(error: netcdf::Error) -> Self {
        FvcomError::NetCDFError(error)
    }
}

impl From<std::io::Error> for FvcomError {
    fn from(error: std::io::Error) -> Self {
        FvcomError::IoError(error)
    }
}

impl From<ndarray::ShapeError> for FvcomError {
    fn from(error: ndarray::ShapeError) -> Self {
        FvcomError::ArrayError(error)
    }
}

/// Result type alias for fvcom_extract operations
pub type Result<T> = std::result::Result<T, FvcomError>;
