//! An error taxonomy for the engine: everything a caller can act upon carries the offending
//! trainset, option or constraint. Timeout and cancellation are deliberately *not* errors,
//! they are terminal run statuses carrying the best-so-far result.

use std::fmt;

/// A single configuration violation with actionable detail.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfigViolation {
    /// An option which failed the validation.
    pub option: String,
    /// A possible violation cause.
    pub cause: String,
    /// An action to take in order to recover.
    pub action: String,
}

impl ConfigViolation {
    /// Creates a new instance of `ConfigViolation`.
    pub fn new(option: &str, cause: String, action: &str) -> Self {
        Self { option: option.to_string(), cause, action: action.to_string() }
    }
}

impl fmt::Display for ConfigViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}': {}, action: '{}'", self.option, self.cause, self.action)
    }
}

/// An engine error.
#[derive(Clone, Debug)]
pub enum EngineError {
    /// A trainset lacks records required to compute the objectives. The run never starts:
    /// defaulting the value silently would bias the balancing objective.
    DataIncomplete {
        /// An affected trainset id (or `fleet` for fleet-wide gaps).
        trainset: String,
        /// What is missing.
        missing: String,
    },
    /// One or more options are out of range. Reported before any search work begins.
    InvalidConfiguration(Vec<ConfigViolation>),
    /// A second run was requested for an identifier which is still in flight.
    DuplicateRun {
        /// An active run identifier.
        run_id: String,
    },
    /// An unexpected fault inside the search worker, e.g. an unrepairable bay collision.
    /// Surfaced as run status `failed` and never retried automatically.
    InternalSearch {
        /// Diagnostic detail.
        detail: String,
    },
}

impl EngineError {
    /// Creates an internal search error from anything printable.
    pub fn internal(detail: impl Into<String>) -> Self {
        Self::InternalSearch { detail: detail.into() }
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DataIncomplete { trainset, missing } => {
                write!(f, "incomplete data for trainset '{trainset}': missing {missing}")
            }
            Self::InvalidConfiguration(violations) => {
                let details = violations.iter().map(|v| v.to_string()).collect::<Vec<_>>().join("; ");
                write!(f, "invalid configuration: {details}")
            }
            Self::DuplicateRun { run_id } => {
                write!(f, "run '{run_id}' is already in flight, cancel it or use another identifier")
            }
            Self::InternalSearch { detail } => write!(f, "internal search error: {detail}"),
        }
    }
}

impl std::error::Error for EngineError {}

/// A type alias for the result type with [`EngineError`].
pub type EngineResult<T> = Result<T, EngineError>;
