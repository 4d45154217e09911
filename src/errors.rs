//! Error types for ephemeris access
//!
//! One taxonomy covers the whole crate: failures opening a dataset,
//! failures interpolating within one, and bodies bound to ids their
//! source does not carry. Every failure surfaces to the caller; nothing
//! is logged-and-swallowed, and nothing is retried.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for ephemeris operations
#[derive(Error, Debug)]
pub enum EphemerisError {
    /// The dataset file is missing or unreadable
    #[error("Failed to open ephemeris dataset {path:?}: {source}")]
    DatasetOpen {
        /// The path of the dataset that could not be opened
        path: PathBuf,
        /// The underlying I/O error
        source: std::io::Error,
    },

    /// The dataset header failed validation (corrupt or truncated file)
    #[error("Invalid ephemeris dataset format: {0}")]
    InvalidFormat(String),

    /// The requested epoch lies outside the dataset's covered range
    #[error("Julian date {jd} is outside the ephemeris range ({start_jd}..{end_jd})")]
    OutOfRange {
        /// The Julian date that was requested
        jd: f64,
        /// The first Julian date the dataset covers
        start_jd: f64,
        /// The last Julian date the dataset covers
        end_jd: f64,
    },

    /// The requested body id is not in the DE numbering, or the dataset
    /// does not carry the series needed to evaluate it
    #[error("Body id {id} is not recognized by this dataset")]
    UnknownBody {
        /// The offending body id
        id: i32,
    },

    /// A `CelestialBody` is bound to an ephemeris id its source does not
    /// recognize; detected at first query rather than silently ignored
    #[error("Body {name:?} is bound to ephemeris id {id}, which its source does not recognize")]
    InvariantViolation {
        /// The display name of the misconfigured body
        name: String,
        /// The unrecognized ephemeris id
        id: i32,
    },

    /// A dataset download failed (helper tooling only, never a query path)
    #[error("Download error: {0}")]
    Download(String),
}

/// Result type for ephemeris operations
pub type Result<T> = std::result::Result<T, EphemerisError>;

/// Helper to wrap a `std::io::Error` with the offending path
pub(crate) fn io_err(path: impl Into<PathBuf>, err: std::io::Error) -> EphemerisError {
    EphemerisError::DatasetOpen {
        path: path.into(),
        source: err,
    }
}
