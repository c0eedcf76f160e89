//! Error types for projection requests, policy overrides and assumption loading
//!
//! Only request validation errors are expected to reach a top-level caller.
//! Shape mismatches and degenerate arithmetic are absorbed where they occur
//! and reported through `log::warn!` instead.

use thiserror::Error;

/// Rejection of a projection request before any stochastic work starts
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProjectionError {
    /// `years` or `iterations` outside the documented bounds
    #[error("{field} = {value} is outside the allowed range [{min}, {max}]")]
    Range {
        field: &'static str,
        value: u64,
        min: u64,
        max: u64,
    },

    /// Scenario name not in the component's enumerated set
    #[error("unknown {component} scenario '{name}' (expected one of: {expected})")]
    UnknownScenario {
        component: &'static str,
        name: String,
        expected: String,
    },
}

/// A malformed policy-mechanics record
///
/// Assumptions are left untouched whenever one of these is returned.
#[derive(Debug, Error)]
pub enum OverrideError {
    #[error("{field} must be a finite number, got {value}")]
    NonFinite { field: &'static str, value: f64 },

    #[error("{field} = {value} is outside the allowed range [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("target spending share and target year must be supplied together")]
    IncompleteTarget,

    #[error("target year {year} must fall within ({first}, {last}]")]
    TargetYear { year: u32, first: u32, last: u32 },

    #[error("malformed policy mechanics record: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Failure while reading assumption overrides from disk
#[derive(Debug, Error)]
pub enum AssumptionLoadError {
    #[error("failed to read assumptions file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse assumptions CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("unknown assumption parameter '{0}'")]
    UnknownParameter(String),

    #[error("invalid value '{value}' for parameter '{parameter}'")]
    InvalidValue { parameter: String, value: String },
}

/// Failure of a batch or reform comparison run
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error(transparent)]
    Projection(#[from] ProjectionError),

    #[error(transparent)]
    Override(#[from] OverrideError),
}
