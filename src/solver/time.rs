//! Time-to-target solver
//!
//! With a periodic rate `i` and deposit `PMT`, the balance after `N` periods
//! can be written `L + (P - L)(1+i)^N` where `L = -PMT*(1+i)^[due]/i`. It is
//! monotonic in `N`, so the target is either unreachable or crossed exactly
//! once. The search treats `N = n*t` as continuous.

use super::bisection::{bisect, expand_upper};
use super::{amount_at, InverseSolver, Solution};
use crate::error::{GrowthError, GrowthResult};
use crate::scenario::{validate_finite, validate_principal, validate_rate, AnnuityType};
use log::debug;

impl InverseSolver {
    /// Years needed for `principal` plus deposits of `payment` to reach `target`.
    ///
    /// `Solution::value` is the exact (fractional) number of years;
    /// `Solution::periods` is the whole periods needed to reach the target.
    /// Negative deposits are rejected since they can break monotonicity.
    pub fn solve_required_time(
        &self,
        target: f64,
        principal: f64,
        annual_rate: f64,
        periods_per_year: u32,
        payment: f64,
        timing: AnnuityType,
    ) -> GrowthResult<Solution> {
        validate_finite("target", target)?;
        validate_principal(principal)?;
        validate_rate(annual_rate)?;
        validate_finite("deposit amount", payment)?;
        if periods_per_year == 0 {
            return Err(GrowthError::invalid_input(
                "compounding frequency must be at least 1 period per year",
            ));
        }
        if payment < 0.0 {
            return Err(GrowthError::invalid_input(
                "time solving requires a non-negative deposit",
            ));
        }

        let n = periods_per_year as f64;
        let i = annual_rate / n;
        let amount_for_years = |years: f64| amount_at(principal, payment, i, n * years, timing);

        if principal >= target {
            return Ok(Solution {
                value: 0.0,
                amount: principal,
                periods: 0,
                iterations: 0,
            });
        }

        if payment == 0.0 && (principal == 0.0 || annual_rate <= 0.0) {
            return Err(GrowthError::unreachable(
                "balance never grows without deposits or a positive rate",
            ));
        }
        if i < 0.0 {
            let due = match timing {
                AnnuityType::Begin => 1.0 + i,
                AnnuityType::End => 1.0,
            };
            let limit = payment * due / -i;
            if limit <= target {
                return Err(GrowthError::unreachable(format!(
                    "balance approaches {:.2} at a negative rate and never reaches {:.2}",
                    limit, target
                )));
            }
        }

        let f = |years: f64| amount_for_years(years) - target;
        let upper = expand_upper(&f, 1.0, &self.config)?;
        let root = bisect(&f, 0.0, upper, Self::amount_scale(target), &self.config)?;
        debug!("Required time {} years (residual {:.3e})", root.value, root.residual);

        Ok(Solution {
            value: root.value,
            amount: amount_for_years(root.value),
            periods: self.whole_periods_needed(principal, payment, i, n * root.value, target, timing)?,
            iterations: root.iterations,
        })
    }

    /// Smallest whole period count whose balance reaches `target`, near `exact`
    fn whole_periods_needed(
        &self,
        principal: f64,
        payment: f64,
        periodic_rate: f64,
        exact: f64,
        target: f64,
        timing: AnnuityType,
    ) -> GrowthResult<u32> {
        let floor = exact.floor().max(0.0);
        let reached = amount_at(principal, payment, periodic_rate, floor, timing)
            >= target - self.config.tolerance * Self::amount_scale(target);
        let periods = if reached { floor } else { floor + 1.0 };
        if periods > u32::MAX as f64 {
            return Err(GrowthError::invalid_input(format!(
                "reaching {:.2} takes {} periods, too many to count",
                target, periods
            )));
        }
        Ok(periods as u32)
    }
}
