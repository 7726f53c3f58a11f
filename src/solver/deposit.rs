//! Closed-form solvers for the deposit amount and the starting principal

use super::{amount_at, InverseSolver, Solution};
use crate::error::{GrowthError, GrowthResult};
use crate::formula::{future_value_factor, growth_factor};
use crate::scenario::{validate_finite, validate_principal, AnnuityType, DepositSpec};

impl InverseSolver {
    /// Level deposit per period needed to grow `principal` to `target`.
    ///
    /// `PMT = (target - P*(1+i)^N) / s(i, N)`, where `s` is the annuity
    /// future value factor for `timing`. At zero rate this is
    /// `(target - P) / N`.
    ///
    /// A negative result means withdrawals are needed. It is returned as-is
    /// unless the solver config rejects negative values.
    pub fn solve_required_deposit(
        &self,
        target: f64,
        principal: f64,
        annual_rate: f64,
        periods_per_year: u32,
        years: f64,
        timing: AnnuityType,
    ) -> GrowthResult<Solution> {
        validate_finite("target", target)?;
        validate_principal(principal)?;
        let terms = self.evaluator.discrete_terms(annual_rate, periods_per_year, years)?;

        if terms.periods == 0 {
            return Err(GrowthError::unreachable(
                "horizon contains no deposit periods",
            ));
        }

        let periods = terms.periods as f64;
        let i = terms.periodic_rate;
        let payment = if i == 0.0 {
            (target - principal) / periods
        } else {
            (target - principal * growth_factor(i, periods)) / future_value_factor(i, periods, timing)
        };
        let payment = self.accept("deposit", payment)?;

        Ok(Solution {
            value: payment,
            amount: amount_at(principal, payment, i, periods, timing),
            periods: terms.periods,
            iterations: 0,
        })
    }

    /// Starting principal needed to reach `target`, given an optional deposit stream.
    ///
    /// A negative result means the deposits alone overshoot the target.
    pub fn solve_required_principal(
        &self,
        target: f64,
        annual_rate: f64,
        periods_per_year: u32,
        years: f64,
        deposit: Option<DepositSpec>,
    ) -> GrowthResult<Solution> {
        validate_finite("target", target)?;
        let terms = self.evaluator.discrete_terms(annual_rate, periods_per_year, years)?;

        let periods = terms.periods as f64;
        let i = terms.periodic_rate;
        let (payment, timing) = match deposit {
            Some(d) => {
                validate_finite("deposit amount", d.amount)?;
                (d.amount, d.timing)
            }
            None => (0.0, AnnuityType::End),
        };

        let deposits_fv = payment * future_value_factor(i, periods, timing);
        let principal = (target - deposits_fv) / growth_factor(i, periods);
        let principal = self.accept("principal", principal)?;

        Ok(Solution {
            value: principal,
            amount: principal * growth_factor(i, periods) + deposits_fv,
            periods: terms.periods,
            iterations: 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::config::SolverConfig;
    use crate::error::GrowthError;
    use crate::formula::FormulaEvaluator;
    use crate::scenario::{AnnuityType, DepositSpec, RateSpec, Scenario};
    use crate::solver::InverseSolver;
    use approx::assert_relative_eq;

    #[test]
    fn test_deposit_round_trip() {
        let evaluator = FormulaEvaluator::default();
        let solver = InverseSolver::default();

        for timing in [AnnuityType::End, AnnuityType::Begin] {
            for &(p, r, n, t, pmt) in &[
                (1000.0, 0.05, 12, 3.0, 100.0),
                (0.0, 0.07, 4, 20.0, 250.0),
                (5000.0, 0.0, 12, 10.0, 42.0),
                (2500.0, -0.03, 1, 8.0, 75.0),
            ] {
                let scenario = Scenario::new(p, RateSpec::discrete(r, n), t)
                    .with_deposit(DepositSpec::new(pmt, timing));
                let target = evaluator.total_future_value(&scenario).unwrap().amount;

                let solution = solver.solve_required_deposit(target, p, r, n, t, timing).unwrap();
                assert_relative_eq!(solution.value, pmt, max_relative = 1e-9);
                assert_relative_eq!(solution.amount, target, max_relative = 1e-12);
                assert_eq!(solution.iterations, 0);
            }
        }
    }

    #[test]
    fn test_zero_rate_deposit() {
        let solver = InverseSolver::default();
        let solution = solver
            .solve_required_deposit(4600.0, 1000.0, 0.0, 12, 3.0, AnnuityType::End)
            .unwrap();
        assert_eq!(solution.value, 100.0);
        assert_eq!(solution.periods, 36);
    }

    #[test]
    fn test_negative_deposit_returned_by_default() {
        let solver = InverseSolver::default();
        // Principal alone overshoots the target
        let solution = solver
            .solve_required_deposit(1000.0, 2000.0, 0.05, 12, 1.0, AnnuityType::End)
            .unwrap();
        assert!(solution.value < 0.0);
    }

    #[test]
    fn test_negative_deposit_rejected_when_configured() {
        let solver = InverseSolver::with_config(SolverConfig::default().rejecting_negative());
        let err = solver
            .solve_required_deposit(1000.0, 2000.0, 0.05, 12, 1.0, AnnuityType::End)
            .unwrap_err();
        assert!(matches!(err, GrowthError::Unreachable { .. }));
    }

    #[test]
    fn test_no_periods_is_unreachable() {
        let solver = InverseSolver::default();
        // 1e-12 years of annual compounding rounds to zero periods
        let err = solver
            .solve_required_deposit(2000.0, 1000.0, 0.05, 1, 1e-12, AnnuityType::End)
            .unwrap_err();
        assert!(matches!(err, GrowthError::Unreachable { .. }));
    }

    #[test]
    fn test_invalid_inputs_fail_fast() {
        let solver = InverseSolver::default();
        assert!(solver
            .solve_required_deposit(2000.0, -1.0, 0.05, 12, 1.0, AnnuityType::End)
            .unwrap_err()
            .is_invalid_input());
        assert!(solver
            .solve_required_deposit(2000.0, 1000.0, -1.0, 12, 1.0, AnnuityType::End)
            .unwrap_err()
            .is_invalid_input());
        assert!(solver
            .solve_required_deposit(2000.0, 1000.0, 0.05, 12, 1.05, AnnuityType::End)
            .unwrap_err()
            .is_invalid_input());
    }

    #[test]
    fn test_required_principal() {
        let evaluator = FormulaEvaluator::default();
        let solver = InverseSolver::default();

        let deposit = DepositSpec::begin(100.0);
        let scenario = Scenario::new(1000.0, RateSpec::discrete(0.05, 12), 3.0).with_deposit(deposit);
        let target = evaluator.total_future_value(&scenario).unwrap().amount;

        let solution = solver
            .solve_required_principal(target, 0.05, 12, 3.0, Some(deposit))
            .unwrap();
        assert_relative_eq!(solution.value, 1000.0, max_relative = 1e-9);

        // Lump sum only: matches the present value
        let lump = solver.solve_required_principal(1161.47, 0.05, 12, 3.0, None).unwrap();
        let pv = evaluator.present_value_of_lump_sum(1161.47, 0.05, 12, 3.0).unwrap();
        assert_relative_eq!(lump.value, pv, max_relative = 1e-12);
    }

    #[test]
    fn test_required_principal_negative_rejected_when_configured() {
        let solver = InverseSolver::with_config(SolverConfig::default().rejecting_negative());
        let err = solver
            .solve_required_principal(100.0, 0.05, 12, 3.0, Some(DepositSpec::end(100.0)))
            .unwrap_err();
        assert!(matches!(err, GrowthError::Unreachable { .. }));
    }
}
