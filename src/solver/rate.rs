//! Rate-to-target solver
//!
//! There is no closed form for the rate once deposits are involved. With
//! `P >= 0` and `PMT >= 0` the future value is non-decreasing in `r`, so the
//! search brackets the root in `(-1, upper]`, doubling `upper` from 1.0, and
//! bisects.

use super::bisection::{bisect, expand_upper};
use super::{amount_at, InverseSolver, Solution};
use crate::error::{GrowthError, GrowthResult};
use crate::scenario::{validate_finite, validate_principal, validate_years, AnnuityType};
use log::debug;

/// Offset above -1 used as the lowest searched rate
const RATE_FLOOR_OFFSET: f64 = 1e-9;

impl InverseSolver {
    /// Nominal annual rate at which `principal` plus deposits reach `target`.
    ///
    /// Requires `payment >= 0`; negative deposits fail with `InvalidInput`
    /// because the future value may then have several roots in `r`.
    pub fn solve_required_rate(
        &self,
        target: f64,
        principal: f64,
        periods_per_year: u32,
        years: f64,
        payment: f64,
        timing: AnnuityType,
    ) -> GrowthResult<Solution> {
        validate_finite("target", target)?;
        validate_principal(principal)?;
        validate_years(years)?;
        validate_finite("deposit amount", payment)?;
        if payment < 0.0 {
            return Err(GrowthError::invalid_input(
                "rate solving requires a non-negative deposit",
            ));
        }
        let periods = self.evaluator.period_count(periods_per_year, years)?;

        if periods == 0 {
            return Err(GrowthError::unreachable("horizon contains no compounding periods"));
        }
        if principal == 0.0 && payment == 0.0 {
            return Err(GrowthError::unreachable(
                "amount is zero at every rate without principal or deposits",
            ));
        }

        let scale = Self::amount_scale(target);
        if principal == 0.0 && periods == 1 && timing == AnnuityType::End {
            // A single end-of-period deposit never earns interest
            if (payment - target).abs() > self.config.tolerance * scale {
                return Err(GrowthError::unreachable(format!(
                    "amount is {:.2} at every rate and never reaches {:.2}",
                    payment, target
                )));
            }
            return Ok(Solution {
                value: 0.0,
                amount: payment,
                periods,
                iterations: 0,
            });
        }

        let n = periods_per_year as f64;
        let amount_for_rate = |rate: f64| amount_at(principal, payment, rate / n, periods as f64, timing);
        let f = |rate: f64| amount_for_rate(rate) - target;

        let lower = -1.0 + RATE_FLOOR_OFFSET;
        let floor_amount = amount_for_rate(lower);
        if floor_amount - target > self.config.tolerance * scale {
            return Err(GrowthError::unreachable(format!(
                "target {:.2} is below {:.2}, the amount as the rate approaches -100%",
                target, floor_amount
            )));
        }

        let upper = expand_upper(&f, 1.0, &self.config)?;
        let root = bisect(&f, lower, upper, scale, &self.config)?;
        debug!("Required rate {} (residual {:.3e})", root.value, root.residual);

        Ok(Solution {
            value: root.value,
            amount: amount_for_rate(root.value),
            periods,
            iterations: root.iterations,
        })
    }
}
