//! Level-deposit annuity factors
//!
//! A zero periodic rate takes an explicit branch; the `/ i` form is never
//! evaluated at `i == 0`.

use super::interest::growth_factor_minus_one;
use crate::scenario::AnnuityType;

/// Future value of 1 deposited each period for `periods` periods.
///
/// Ordinary: `((1+i)^N - 1) / i`. Due: the same times `(1+i)`.
/// Zero rate: `N` for either timing.
pub fn future_value_factor(periodic_rate: f64, periods: f64, timing: AnnuityType) -> f64 {
    if periodic_rate == 0.0 {
        return periods;
    }

    let ordinary = growth_factor_minus_one(periodic_rate, periods) / periodic_rate;
    match timing {
        AnnuityType::End => ordinary,
        AnnuityType::Begin => ordinary * (1.0 + periodic_rate),
    }
}

/// Present value of 1 deposited each period for `periods` periods.
///
/// Ordinary: `(1 - (1+i)^-N) / i`. Due: the same times `(1+i)`.
/// Zero rate: `N`.
pub fn present_value_factor(periodic_rate: f64, periods: f64, timing: AnnuityType) -> f64 {
    if periodic_rate == 0.0 {
        return periods;
    }

    let ordinary = -growth_factor_minus_one(periodic_rate, -periods) / periodic_rate;
    match timing {
        AnnuityType::End => ordinary,
        AnnuityType::Begin => ordinary * (1.0 + periodic_rate),
    }
}
