//! Error types for growth calculations

use thiserror::Error;

/// Result alias used by every fallible calculation in the crate
pub type GrowthResult<T> = Result<T, GrowthError>;

/// Failures reported by the evaluators, solvers and the schedule simulator.
///
/// Every failure is local to the call that produced it. No partial results
/// are returned alongside an error.
#[derive(Error, Debug)]
pub enum GrowthError {
    /// Malformed scenario or schedule (negative principal, `r <= -1`,
    /// non-positive horizon, fractional period count, zero frequency)
    #[error("Invalid input: {reason}")]
    InvalidInput {
        /// What was wrong with the input
        reason: String,
    },

    /// The requested unknown has no acceptable value for the given inputs
    #[error("Target unreachable: {reason}")]
    Unreachable {
        /// Why no acceptable value exists
        reason: String,
    },

    /// Iterative search exhausted its iteration or bracket budget
    #[error("No convergence after {iterations} iterations (residual: {residual:.2e})")]
    NoConvergence {
        /// Iterations (or bracket doublings) attempted
        iterations: u32,
        /// Distance from the target at the last evaluated point
        residual: f64,
    },

    /// Schedule CSV could not be decoded
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Configuration or scenario JSON could not be decoded
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GrowthError {
    /// Creates an invalid input error
    #[must_use]
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Creates an unreachable-target error
    #[must_use]
    pub fn unreachable(reason: impl Into<String>) -> Self {
        Self::Unreachable {
            reason: reason.into(),
        }
    }

    /// Creates a convergence failure
    #[must_use]
    pub fn no_convergence(iterations: u32, residual: f64) -> Self {
        Self::NoConvergence {
            iterations,
            residual,
        }
    }

    /// True for input validation failures
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput { .. })
    }
}
