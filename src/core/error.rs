//! Error types for valhalla-osmdata
//!
//! Allocation failure is not represented: it aborts the process, as there is
//! nothing a producer can do with half an array.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// File could not be opened or created
    #[error("cannot open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The destination failed after part of the array was written
    #[error(
        "partial write to {}: {written} of {expected} bytes written: {source}",
        .path.display()
    )]
    PartialWrite {
        path: PathBuf,
        written: u64,
        expected: u64,
        #[source]
        source: std::io::Error,
    },

    /// File length is not a whole number of records
    #[error(
        "{} is corrupt or truncated: {len} bytes is not a multiple of the {record_size}-byte {record} record",
        .path.display()
    )]
    Corrupt {
        path: PathBuf,
        len: u64,
        record_size: usize,
        record: &'static str,
    },

    #[error("index {index} out of bounds for array of {count} records")]
    IndexOutOfBounds { index: usize, count: usize },

    #[error("coordinate ({lng}, {lat}) is outside the encodable range")]
    CoordinateOutOfRange { lng: f64, lat: f64 },
}

/// Convenience result type for valhalla-osmdata operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn open(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Open {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Read {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Write {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn out_of_bounds(index: usize, count: usize) -> Self {
        Error::IndexOutOfBounds { index, count }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_display_mentions_path() {
        let err = Error::open(
            "/tmp/missing/ways.bin",
            std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        );
        let text = err.to_string();
        assert!(text.contains("/tmp/missing/ways.bin"));
        assert!(text.contains("no such file"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_corrupt_display() {
        let err = Error::Corrupt {
            path: PathBuf::from("way_nodes.bin"),
            len: 57,
            record_size: 56,
            record: "way node",
        };
        assert_eq!(
            err.to_string(),
            "way_nodes.bin is corrupt or truncated: 57 bytes is not a multiple of the 56-byte way node record"
        );
    }

    #[test]
    fn test_partial_write_display() {
        let err = Error::PartialWrite {
            path: PathBuf::from("ways.bin"),
            written: 640,
            expected: 960,
            source: std::io::Error::other("no space left on device"),
        };
        assert_eq!(
            err.to_string(),
            "partial write to ways.bin: 640 of 960 bytes written: no space left on device"
        );
        assert!(err.source().is_some());
    }

    #[test]
    fn test_out_of_bounds_display() {
        assert_eq!(
            Error::out_of_bounds(3, 3).to_string(),
            "index 3 out of bounds for array of 3 records"
        );
    }
}
