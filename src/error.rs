//! Errors from dimension/variable bookkeeping and frame transfer

use std::fmt;

use crate::dimension::Axis;

/// The error type for this crate
#[derive(Debug)]
pub enum Error {
    /// The underlying storage engine rejected the call
    Storage(netcdf::Error),
    /// A named dimension or variable does not exist in the file
    NotFound(String),
    /// In-memory shape disagrees with the declared dimensions, or
    /// paired collections differ in length
    DimensionMismatch {
        /// Fixed axis at fault, `None` for collection/pairing mismatches
        axis: Option<Axis>,
        /// Declared or required size
        expected: usize,
        /// Size actually supplied
        found: usize,
    },
    /// A frame count was requested with no unlimited dimension bound
    NotBound,
    /// Fixed axis index outside the declared set
    Index(usize),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Storage(e) => write!(f, "storage engine error: {e}"),
            Error::NotFound(name) => write!(f, "could not find {name}"),
            Error::DimensionMismatch {
                axis: Some(axis),
                expected,
                found,
            } => write!(
                f,
                "grid extent {found} does not match declared size {expected} along axis {axis:?}"
            ),
            Error::DimensionMismatch {
                axis: None,
                expected,
                found,
            } => write!(f, "expected {expected} elements, found {found}"),
            Error::NotBound => write!(f, "no unlimited dimension has been bound"),
            Error::Index(index) => write!(f, "fixed axis {index} has not been declared"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Storage(e) => Some(e),
            _ => None,
        }
    }
}

impl From<netcdf::Error> for Error {
    fn from(e: netcdf::Error) -> Error {
        Error::Storage(e)
    }
}

/// Convenience alias for operations in this crate
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_axis() {
        let e = Error::DimensionMismatch {
            axis: Some(Axis::Y),
            expected: 3,
            found: 5,
        };
        assert!(e.to_string().contains("axis Y"));
        assert!(e.to_string().contains('3'));
    }

    #[test]
    fn storage_error_is_chained() {
        use std::error::Error as _;
        let e = Error::from(netcdf::Error::from("rejected"));
        assert!(e.source().is_some());
    }
}
