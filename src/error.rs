//! Error types for scale-space construction and keypoint detection.

use thiserror::Error;

/// Errors raised by the scale-space pipeline.
///
/// Every error is detected eagerly at the offending call and returned to the
/// caller unchanged. Nothing in the crate retries or recovers internally.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("invalid argument: {reason}")]
    InvalidArgument { reason: String },

    #[error("missing input: {what} must be provided")]
    MissingInput { what: &'static str },

    #[error("pixel ({row}, {column}) is outside of a {height}x{width} image")]
    OutOfRange {
        row: usize,
        column: usize,
        height: usize,
        width: usize,
    },

    #[error("octave {index} requested but the scale space has {count} octaves")]
    OctaveOutOfRange { index: usize, count: usize },
}

impl Error {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(feature = "python")]
impl From<Error> for pyo3::PyErr {
    fn from(err: Error) -> Self {
        match err {
            Error::OutOfRange { .. } | Error::OctaveOutOfRange { .. } => {
                pyo3::exceptions::PyIndexError::new_err(err.to_string())
            }
            Error::MissingInput { .. } => pyo3::exceptions::PyTypeError::new_err(err.to_string()),
            Error::InvalidArgument { .. } => {
                pyo3::exceptions::PyValueError::new_err(err.to_string())
            }
        }
    }
}
