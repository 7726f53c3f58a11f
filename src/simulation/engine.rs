//! Period-by-period schedule simulator

use super::ledger::{LedgerRow, SimulationResult};
use super::schedule::{Schedule, ScheduleEntry};
use crate::error::GrowthResult;
use crate::formula::apply_period;
use crate::scenario::validate_principal;
use log::{debug, trace};

/// Lifecycle of a simulator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulationPhase {
    /// Constructed, nothing validated or run yet
    Ready,
    /// Applying the given period (1-indexed)
    Running { period: u32 },
    /// Every period applied; the result is complete
    Done,
}

/// Advances a balance through a schedule, one entry per period.
///
/// The whole schedule is validated before the first period runs, so a
/// simulation either completes or leaves no ledger behind.
#[derive(Debug, Clone)]
pub struct ScheduleSimulator<'a> {
    schedule: &'a Schedule,
    phase: SimulationPhase,
    result: SimulationResult,
}

impl<'a> ScheduleSimulator<'a> {
    pub fn new(initial_balance: f64, schedule: &'a Schedule) -> Self {
        Self {
            schedule,
            phase: SimulationPhase::Ready,
            result: SimulationResult::new(initial_balance),
        }
    }

    pub fn phase(&self) -> SimulationPhase {
        self.phase
    }

    /// Validate and run every period. Calling again after completion
    /// returns the same result without re-running.
    pub fn run(&mut self) -> GrowthResult<&SimulationResult> {
        if self.phase == SimulationPhase::Done {
            return Ok(&self.result);
        }

        validate_principal(self.result.initial_balance)?;
        self.schedule.validate()?;

        let mut balance = self.result.initial_balance;
        for (index, entry) in self.schedule.iter().enumerate() {
            let period = index as u32 + 1;
            self.phase = SimulationPhase::Running { period };

            let row = Self::simulate_period(period, balance, entry);
            trace!(
                "Period {}: {:.2} -> {:.2} (rate {}, deposit {:.2})",
                period, row.opening_balance, row.closing_balance, row.rate, row.deposit
            );
            balance = row.closing_balance;
            self.result.add_row(row);
        }

        self.phase = SimulationPhase::Done;
        debug!(
            "Simulated {} periods, final balance {:.2}",
            self.result.periods(),
            self.result.final_balance
        );
        Ok(&self.result)
    }

    /// The finished result, if the simulator has run
    pub fn into_result(self) -> Option<SimulationResult> {
        match self.phase {
            SimulationPhase::Done => Some(self.result),
            _ => None,
        }
    }

    fn simulate_period(period: u32, opening_balance: f64, entry: &ScheduleEntry) -> LedgerRow {
        let step = apply_period(opening_balance, entry.rate, entry.deposit, entry.timing);
        LedgerRow {
            period,
            opening_balance,
            rate: entry.rate,
            deposit: entry.deposit,
            interest: step.interest,
            closing_balance: step.closing_balance,
        }
    }
}

/// Simulate `schedule` starting from `initial_balance`
pub fn simulate(initial_balance: f64, schedule: &Schedule) -> GrowthResult<SimulationResult> {
    let mut simulator = ScheduleSimulator::new(initial_balance, schedule);
    simulator.run()?;
    Ok(simulator.result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::formula::FormulaEvaluator;
    use crate::scenario::{AnnuityType, DepositSpec, RateSpec, Scenario};
    use approx::assert_relative_eq;

    #[test]
    fn test_constant_schedule_matches_closed_form() {
        let evaluator = FormulaEvaluator::default();

        for timing in [AnnuityType::End, AnnuityType::Begin] {
            for &(p, r, n, t, pmt) in &[
                (1000.0, 0.05, 12, 3.0, 100.0),
                (0.0, 0.08, 4, 25.0, 500.0),
                (10_000.0, -0.02, 1, 10.0, 0.0),
                (250.0, 0.0, 52, 2.0, 5.0),
            ] {
                let scenario = Scenario::new(p, RateSpec::discrete(r, n), t)
                    .with_deposit(DepositSpec::new(pmt, timing));
                let expected = evaluator.total_future_value(&scenario).unwrap();

                let schedule = Schedule::from_scenario(&scenario, &EngineConfig::default()).unwrap();
                let result = simulate(p, &schedule).unwrap();

                assert_eq!(Some(result.periods()), expected.periods);
                assert_relative_eq!(result.final_balance, expected.amount, max_relative = 1e-10);
            }
        }
    }

    #[test]
    fn test_deposit_timing_order() {
        let _ = env_logger::builder().is_test(true).try_init();
        let schedule = Schedule::new(vec![
            ScheduleEntry::new(0.10, 100.0, AnnuityType::Begin),
            ScheduleEntry::new(0.10, 100.0, AnnuityType::End),
        ]);
        let result = simulate(1000.0, &schedule).unwrap();

        // Begin: (1000 + 100) * 1.1 = 1210; End: 1210 * 1.1 + 100 = 1431
        assert_relative_eq!(result.ledger[0].closing_balance, 1210.0, max_relative = 1e-12);
        assert_relative_eq!(result.ledger[0].interest, 110.0, max_relative = 1e-12);
        assert_relative_eq!(result.ledger[1].closing_balance, 1431.0, max_relative = 1e-12);
        assert_relative_eq!(result.final_balance, 1431.0, max_relative = 1e-12);
    }

    #[test]
    fn test_variable_rates() {
        let schedule = Schedule::new(vec![
            ScheduleEntry::new(0.05, 0.0, AnnuityType::End),
            ScheduleEntry::new(-0.10, 0.0, AnnuityType::End),
            ScheduleEntry::new(0.20, 0.0, AnnuityType::End),
        ]);
        let result = simulate(100.0, &schedule).unwrap();
        assert_relative_eq!(result.final_balance, 100.0 * 1.05 * 0.9 * 1.2, max_relative = 1e-12);
    }

    #[test]
    fn test_ledger_is_continuous() {
        let schedule = Schedule::from_annual_rates(&[0.03, 0.07, 0.01], 12, 25.0, AnnuityType::End).unwrap();
        let result = simulate(500.0, &schedule).unwrap();

        assert_eq!(result.periods(), 36);
        assert_eq!(result.ledger[0].opening_balance, 500.0);
        for pair in result.ledger.windows(2) {
            assert_eq!(pair[0].closing_balance, pair[1].opening_balance);
            assert_eq!(pair[1].period, pair[0].period + 1);
        }

        let summary = result.summary();
        assert_eq!(summary.total_deposits, 900.0);
        assert_relative_eq!(
            summary.initial_balance + summary.total_deposits + summary.total_interest,
            summary.final_balance,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_invalid_rate_rejected_before_running() {
        let schedule = Schedule::new(vec![
            ScheduleEntry::new(0.01, 10.0, AnnuityType::End),
            ScheduleEntry::new(0.01, 10.0, AnnuityType::End),
            ScheduleEntry::new(-1.5, 10.0, AnnuityType::End),
        ]);

        let mut simulator = ScheduleSimulator::new(100.0, &schedule);
        let err = simulator.run().unwrap_err();
        assert!(err.is_invalid_input());

        // Nothing ran
        assert_eq!(simulator.phase(), SimulationPhase::Ready);
        assert!(simulator.into_result().is_none());
    }

    #[test]
    fn test_negative_initial_balance_rejected() {
        let schedule = Schedule::constant(2, 0.01, 0.0, AnnuityType::End);
        assert!(simulate(-5.0, &schedule).unwrap_err().is_invalid_input());
    }

    #[test]
    fn test_phases() {
        let schedule = Schedule::constant(3, 0.01, 0.0, AnnuityType::End);
        let mut simulator = ScheduleSimulator::new(100.0, &schedule);
        assert_eq!(simulator.phase(), SimulationPhase::Ready);

        let first = simulator.run().unwrap().final_balance;
        assert_eq!(simulator.phase(), SimulationPhase::Done);

        // Re-running returns the completed result
        let second = simulator.run().unwrap().final_balance;
        assert_eq!(first, second);
        assert_eq!(simulator.into_result().unwrap().periods(), 3);
    }

    #[test]
    fn test_empty_schedule() {
        let result = simulate(42.0, &Schedule::default()).unwrap();
        assert_eq!(result.final_balance, 42.0);
        assert!(result.ledger.is_empty());
    }

    #[test]
    fn test_withdrawals_can_overdraw() {
        let schedule = Schedule::constant(3, 0.0, -50.0, AnnuityType::End);
        let result = simulate(100.0, &schedule).unwrap();
        assert_eq!(result.final_balance, -50.0);
    }
}
