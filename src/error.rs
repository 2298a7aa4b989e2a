//! Engine error taxonomy.
//!
//! Every variant is terminal for the computation that raised it: inputs are
//! deterministic, so nothing here is worth retrying. The engine stops at the
//! first violated precondition and never hands back partial results.
//!
//! | Error | Raised by |
//! |-------|-----------|
//! | [`SpcError::EmptyInput`] | matrix construction |
//! | [`SpcError::InvalidShape`] | matrix construction |
//! | [`SpcError::NonNumeric`] | matrix construction, dataset ingestion |
//! | [`SpcError::UnsupportedSubgroupSize`] | control constant lookup |
//! | [`SpcError::DegenerateProcess`] | capability indices |
//! | [`SpcError::InvalidSpecification`] | specification limits |
//!
//! Reading datasets and configuration from disk adds [`LoadError`], which
//! wraps the engine error when the file parses but its content is invalid.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the SPC engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SpcError {
    /// The matrix has no subgroups.
    #[error("no subgroups supplied")]
    EmptyInput,

    /// A subgroup does not have the width of the first subgroup, or the
    /// common width is below 2.
    #[error("subgroup {subgroup} has {found} measurements, expected {expected}")]
    InvalidShape {
        /// Zero-based subgroup index.
        subgroup: usize,
        /// Required width.
        expected: usize,
        /// Actual width.
        found: usize,
    },

    /// A cell is not a finite number.
    #[error("subgroup {subgroup}, measurement {position} is not a finite number")]
    NonNumeric {
        /// Zero-based subgroup index.
        subgroup: usize,
        /// Zero-based measurement position within the subgroup.
        position: usize,
    },

    /// No tabulated control chart factors exist for this subgroup size.
    #[error("control chart constants are not available for n={0} (supported: 2..=10)")]
    UnsupportedSubgroupSize(usize),

    /// The estimated process sigma is zero (or not a positive finite
    /// number), so Cp and Cpk are undefined.
    #[error("process sigma is {sigma}; capability indices are undefined")]
    DegenerateProcess {
        /// The offending sigma estimate.
        sigma: f64,
    },

    /// A specification target or tolerance is not finite.
    #[error("invalid specification: {0}")]
    InvalidSpecification(&'static str),
}

/// Result alias for engine operations.
pub type Result<T> = std::result::Result<T, SpcError>;

/// Errors raised while loading a dataset or configuration file.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// File that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML for the expected layout.
    #[error("failed to parse {origin}: {source}")]
    Parse {
        /// File path, or `<inline>` for string input.
        origin: String,
        /// Underlying TOML error.
        #[source]
        source: toml::de::Error,
    },

    /// The file parsed but its content is rejected by the engine.
    #[error(transparent)]
    Engine(#[from] SpcError),
}
