//! Lump-sum growth kernels and the single-period step
//!
//! These operate on already-validated inputs. `FormulaEvaluator` is the
//! checked entry point.

use crate::scenario::AnnuityType;
use serde::{Deserialize, Serialize};

/// `P * (1 + r*t)`
pub fn simple_interest_amount(principal: f64, annual_rate: f64, years: f64) -> f64 {
    principal * (1.0 + annual_rate * years)
}

/// `(1 + i)^N` for a periodic rate `i > -1`. `periods` may be fractional.
pub fn growth_factor(periodic_rate: f64, periods: f64) -> f64 {
    (periods * periodic_rate.ln_1p()).exp()
}

/// `(1 + i)^N - 1`, accurate for periodic rates close to zero
pub fn growth_factor_minus_one(periodic_rate: f64, periods: f64) -> f64 {
    (periods * periodic_rate.ln_1p()).exp_m1()
}

/// `e^(r*t)`
pub fn continuous_growth_factor(annual_rate: f64, years: f64) -> f64 {
    (annual_rate * years).exp()
}

/// Balance movement over one period
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeriodStep {
    /// Interest accrued this period
    pub interest: f64,
    /// Balance after interest and deposit
    pub closing_balance: f64,
}

/// Advance `balance` by one period at `periodic_rate`.
///
/// Begin: deposit joins the balance before interest accrues.
/// End: interest accrues on the opening balance, then the deposit is added.
pub fn apply_period(balance: f64, periodic_rate: f64, deposit: f64, timing: AnnuityType) -> PeriodStep {
    let accruing = match timing {
        AnnuityType::Begin => balance + deposit,
        AnnuityType::End => balance,
    };
    let interest = accruing * periodic_rate;

    PeriodStep {
        interest,
        closing_balance: balance + deposit + interest,
    }
}
