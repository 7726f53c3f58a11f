//! Inverse solvers: recover a missing input from a target future value
//!
//! - [`InverseSolver::solve_required_deposit`]: closed form
//! - [`InverseSolver::solve_required_principal`]: closed form
//! - [`InverseSolver::solve_required_time`]: bisection over years
//! - [`InverseSolver::solve_required_rate`]: bisection over the annual rate
//!
//! # Monotonicity
//!
//! The iterative solvers rely on the future value being non-decreasing in
//! the unknown. For the rate this holds whenever `P >= 0` and `PMT >= 0`,
//! which is why negative deposits are rejected there. Under that condition
//! the root is unique and bisection always terminates within
//! `max_bracket_doublings + max_iterations` evaluations.

mod bisection;
mod deposit;
mod rate;
mod time;

use crate::config::SolverConfig;
use crate::error::{GrowthError, GrowthResult};
use crate::formula::{future_value_factor, growth_factor, FormulaEvaluator};
use crate::scenario::AnnuityType;
use serde::{Deserialize, Serialize};

/// Recovered unknown plus the amount it produces
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    /// Solved value (deposit, principal, years, or annual rate)
    pub value: f64,
    /// Future value produced when the solved value is plugged back in
    pub amount: f64,
    /// Compounding periods in the horizon. For time solving, the whole
    /// periods needed to reach the target.
    pub periods: u32,
    /// Bisection iterations used; 0 for closed-form solutions
    pub iterations: u32,
}

/// Inverse solver over the closed-form evaluators
#[derive(Debug, Clone, Copy, Default)]
pub struct InverseSolver {
    evaluator: FormulaEvaluator,
    config: SolverConfig,
}

impl InverseSolver {
    pub fn new(evaluator: FormulaEvaluator, config: SolverConfig) -> Self {
        Self { evaluator, config }
    }

    /// Solver with default evaluator and the given solver config
    pub fn with_config(config: SolverConfig) -> Self {
        Self {
            evaluator: FormulaEvaluator::default(),
            config,
        }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn evaluator(&self) -> &FormulaEvaluator {
        &self.evaluator
    }

    /// Apply `reject_negative` to a solved value
    fn accept(&self, what: &str, value: f64) -> GrowthResult<f64> {
        if self.config.reject_negative && value < 0.0 {
            return Err(GrowthError::unreachable(format!(
                "required {} is negative ({})",
                what, value
            )));
        }
        Ok(value)
    }

    /// Scale for the relative amount tolerance
    fn amount_scale(target: f64) -> f64 {
        target.abs().max(1.0)
    }
}

/// `P*(1+i)^N + PMT*s(i, N)` with a possibly fractional `N`.
///
/// Zero coefficients contribute exactly zero even if the factor overflowed.
pub(crate) fn amount_at(
    principal: f64,
    payment: f64,
    periodic_rate: f64,
    periods: f64,
    timing: AnnuityType,
) -> f64 {
    let lump = if principal == 0.0 {
        0.0
    } else {
        principal * growth_factor(periodic_rate, periods)
    };
    let deposits = if payment == 0.0 {
        0.0
    } else {
        payment * future_value_factor(periodic_rate, periods, timing)
    };
    lump + deposits
}
