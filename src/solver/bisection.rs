//! Bracketed bisection for monotonically increasing functions
//!
//! Both helpers assume `f` is non-decreasing on the searched interval, so the
//! sign of `f(mid)` alone decides which half keeps the root.

use crate::config::SolverConfig;
use crate::error::{GrowthError, GrowthResult};
use log::debug;

/// Root found by bisection
#[derive(Debug, Clone, Copy)]
pub(crate) struct Root {
    pub value: f64,
    pub iterations: u32,
    pub residual: f64,
}

/// Double `initial` until `f(upper) >= 0`.
///
/// Fails with `NoConvergence` once `max_bracket_doublings` is spent.
pub(crate) fn expand_upper<F>(f: &F, initial: f64, config: &SolverConfig) -> GrowthResult<f64>
where
    F: Fn(f64) -> f64,
{
    let mut upper = initial;
    let mut value = f(upper);
    let mut doublings = 0;

    // NaN keeps doubling too
    while !(value >= 0.0) {
        if doublings >= config.max_bracket_doublings {
            return Err(GrowthError::no_convergence(doublings, value.abs()));
        }
        upper *= 2.0;
        value = f(upper);
        doublings += 1;
    }

    debug!("Bracket upper bound {} after {} doublings", upper, doublings);
    Ok(upper)
}

/// Bisect `[lo, hi]` where `f(lo) < 0 <= f(hi)`.
///
/// Converged when `|f(x)| <= tolerance * scale`, or when the interval can no
/// longer be split in floating point.
pub(crate) fn bisect<F>(f: &F, lo: f64, hi: f64, scale: f64, config: &SolverConfig) -> GrowthResult<Root>
where
    F: Fn(f64) -> f64,
{
    let tolerance = config.tolerance * scale;
    let mut lo = lo;
    let mut hi = hi;

    let f_hi = f(hi);
    if f_hi.abs() <= tolerance {
        return Ok(Root { value: hi, iterations: 0, residual: f_hi });
    }
    let f_lo = f(lo);
    if f_lo.abs() <= tolerance {
        return Ok(Root { value: lo, iterations: 0, residual: f_lo });
    }

    let mut residual = f_hi;
    for iteration in 1..=config.max_iterations {
        let mid = lo + (hi - lo) / 2.0;
        let f_mid = f(mid);
        residual = f_mid;

        if f_mid.abs() <= tolerance || mid <= lo || mid >= hi {
            debug!("Bisection converged to {} in {} iterations (residual {:.3e})", mid, iteration, f_mid);
            return Ok(Root { value: mid, iterations: iteration, residual: f_mid });
        }

        if f_mid < 0.0 {
            lo = mid;
        } else {
            hi = mid;
        }
    }

    Err(GrowthError::no_convergence(config.max_iterations, residual.abs()))
}
