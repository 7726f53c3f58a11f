//! Engine and solver configuration
//!
//! Both configs deserialize from JSON with per-field defaults, and can be
//! read from `GROWTH_*` environment variables:
//!   GROWTH_PERIOD_TOLERANCE, GROWTH_SOLVER_TOLERANCE,
//!   GROWTH_SOLVER_MAX_ITERATIONS, GROWTH_SOLVER_MAX_DOUBLINGS,
//!   GROWTH_REJECT_NEGATIVE

use crate::error::GrowthResult;
use log::warn;
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

/// Largest fractional remainder of `n * t` still treated as a whole period count
pub const DEFAULT_PERIOD_TOLERANCE: f64 = 1e-9;

/// Relative amount tolerance for iterative solvers
pub const DEFAULT_SOLVER_TOLERANCE: f64 = 1e-6;

/// Bisection iteration cap
pub const DEFAULT_MAX_ITERATIONS: u32 = 200;

/// Cap on upper-bound doublings while bracketing a root
pub const DEFAULT_MAX_BRACKET_DOUBLINGS: u32 = 60;

fn default_period_tolerance() -> f64 { DEFAULT_PERIOD_TOLERANCE }
fn default_solver_tolerance() -> f64 { DEFAULT_SOLVER_TOLERANCE }
fn default_max_iterations() -> u32 { DEFAULT_MAX_ITERATIONS }
fn default_max_bracket_doublings() -> u32 { DEFAULT_MAX_BRACKET_DOUBLINGS }

/// Configuration for the closed-form evaluators
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Maximum distance between `n * t` and the nearest integer
    #[serde(default = "default_period_tolerance")]
    pub period_tolerance: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            period_tolerance: DEFAULT_PERIOD_TOLERANCE,
        }
    }
}

impl EngineConfig {
    /// Sets the period tolerance
    #[must_use]
    pub fn with_period_tolerance(mut self, period_tolerance: f64) -> Self {
        self.period_tolerance = period_tolerance;
        self
    }

    /// Read overrides from the environment, falling back to defaults
    pub fn from_env() -> Self {
        Self {
            period_tolerance: env_or("GROWTH_PERIOD_TOLERANCE", DEFAULT_PERIOD_TOLERANCE),
        }
    }

    /// Decode from a JSON document; missing fields take their defaults
    pub fn from_json(json: &str) -> GrowthResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Configuration for the inverse solvers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Relative tolerance on the achieved amount: `|f(x) - target| <= tol * max(|target|, 1)`
    #[serde(default = "default_solver_tolerance")]
    pub tolerance: f64,

    /// Maximum bisection iterations before giving up
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,

    /// Maximum number of times the search upper bound may double
    #[serde(default = "default_max_bracket_doublings")]
    pub max_bracket_doublings: u32,

    /// Report negative solved values as `Unreachable` instead of returning them
    #[serde(default)]
    pub reject_negative: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_SOLVER_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            max_bracket_doublings: DEFAULT_MAX_BRACKET_DOUBLINGS,
            reject_negative: false,
        }
    }
}

impl SolverConfig {
    /// Sets the tolerance
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the maximum iterations
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Sets the bracket doubling cap
    #[must_use]
    pub fn with_max_bracket_doublings(mut self, max_bracket_doublings: u32) -> Self {
        self.max_bracket_doublings = max_bracket_doublings;
        self
    }

    /// Reject negative solutions
    #[must_use]
    pub fn rejecting_negative(mut self) -> Self {
        self.reject_negative = true;
        self
    }

    /// Read overrides from the environment, falling back to defaults
    pub fn from_env() -> Self {
        Self {
            tolerance: env_or("GROWTH_SOLVER_TOLERANCE", DEFAULT_SOLVER_TOLERANCE),
            max_iterations: env_or("GROWTH_SOLVER_MAX_ITERATIONS", DEFAULT_MAX_ITERATIONS),
            max_bracket_doublings: env_or(
                "GROWTH_SOLVER_MAX_DOUBLINGS",
                DEFAULT_MAX_BRACKET_DOUBLINGS,
            ),
            reject_negative: env::var("GROWTH_REJECT_NEGATIVE")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
        }
    }

    /// Decode from a JSON document; missing fields take their defaults
    pub fn from_json(json: &str) -> GrowthResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

fn env_or<T: FromStr + Copy>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("Ignoring unparsable {}={:?}, using default", key, raw);
            default
        }),
        Err(_) => default,
    }
}
