//! Error types for the roster solver.

use thiserror::Error;

/// Result type for roster operations.
pub type RosterResult<T> = std::result::Result<T, RosterError>;

/// Errors that can occur while configuring or running a solve.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RosterError {
    /// Configuration is invalid: unknown shift code, out-of-range times,
    /// empty controller list, contradictory per-controller rules, etc.
    #[error("invalid configuration: {0}")]
    ConfigError(String),

    /// A day-of-year referenced by a pre-assignment (or the horizon) falls
    /// outside the target year.
    #[error("day {day} is not valid in year {year}")]
    InvalidDay { year: i32, day: i64 },

    /// The solver proved the model has no feasible solution.
    #[error("no feasible roster exists for this configuration")]
    InfeasibleModel,

    /// The solver's wall-clock budget expired before any feasible solution
    /// was found.
    #[error("solver deadline expired without a feasible solution")]
    DeadlineExpired,

    /// The constraint engine reported a status this driver does not know
    /// how to interpret.
    #[error("internal solver error: {0}")]
    InternalSolverError(String),

    /// A configuration or pre-assignment payload was not valid JSON.
    #[error("invalid JSON: {0}")]
    Json(String),
}

impl From<serde_json::Error> for RosterError {
    fn from(err: serde_json::Error) -> Self {
        RosterError::Json(err.to_string())
    }
}
