//! NetCDF container format detection from the file signature

use crate::errors::Result;
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

const HDF5_SIGNATURE: [u8; 8] = [0x89, b'H', b'D', b'F', b'\r', b'\n', 0x1a, b'\n'];

/// On-disk flavour of a NetCDF file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Classic,
    Offset64,
    Data64,
    Netcdf4,
    Unknown,
}

impl FileFormat {
    /// Classifies a file header (at least the first four bytes).
    pub fn from_magic(header: &[u8]) -> Self {
        if header.starts_with(&HDF5_SIGNATURE) {
            return FileFormat::Netcdf4;
        }
        match header {
            [b'C', b'D', b'F', 1, ..] => FileFormat::Classic,
            [b'C', b'D', b'F', 2, ..] => FileFormat::Offset64,
            [b'C', b'D', b'F', 5, ..] => FileFormat::Data64,
            _ => FileFormat::Unknown,
        }
    }

    /// Reads the signature at the start of `path`.
    pub fn detect<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut header = Vec::with_capacity(HDF5_SIGNATURE.len());
        File::open(path)?
            .take(HDF5_SIGNATURE.len() as u64)
            .read_to_end(&mut header)?;
        Ok(Self::from_magic(&header))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FileFormat::Classic => "NETCDF3_CLASSIC",
            FileFormat::Offset64 => "NETCDF3_64BIT_OFFSET",
            FileFormat::Data64 => "NETCDF3_64BIT_DATA",
            FileFormat::Netcdf4 => "NETCDF4",
            FileFormat::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_from_magic() {
        assert_eq!(FileFormat::from_magic(b"CDF\x01\0\0\0\x0a"), FileFormat::Classic);
        assert_eq!(FileFormat::from_magic(b"CDF\x02"), FileFormat::Offset64);
        assert_eq!(FileFormat::from_magic(b"CDF\x05\0\0"), FileFormat::Data64);
        assert_eq!(FileFormat::from_magic(&HDF5_SIGNATURE), FileFormat::Netcdf4);
        assert_eq!(FileFormat::from_magic(b"CDF"), FileFormat::Unknown);
        assert_eq!(FileFormat::from_magic(b"GRIB"), FileFormat::Unknown);
        assert_eq!(FileFormat::from_magic(&[]), FileFormat::Unknown);
    }

    #[test]
    fn test_detect_reads_header() {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(b"CDF\x02\0\0\0\0rest of the header")
            .expect("Failed to write header");

        assert_eq!(FileFormat::detect(file.path()).unwrap(), FileFormat::Offset64);
        assert_eq!(FileFormat::Offset64.to_string(), "NETCDF3_64BIT_OFFSET");
    }

    #[test]
    fn test_detect_missing_file() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let result = FileFormat::detect(dir.path().join("absent.nc"));
        assert!(matches!(result, Err(crate::errors::FvcomError::IoError(_))));
    }
}
