//! Scenario value types and the batch scenario runner
//!
//! A `Scenario` is an immutable description of one growth problem. Each
//! calculation call takes one explicitly; nothing is shared between calls.

use crate::error::{GrowthError, GrowthResult};
use crate::formula::{Evaluation, FormulaEvaluator};
use crate::simulation::{simulate, Schedule, SimulationResult};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// How interest is applied over the horizon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Compounding {
    /// No compounding: `P * (1 + r*t)`
    Simple,
    /// Interest applied `periods_per_year` times a year
    Discrete { periods_per_year: u32 },
    /// Limit of discrete compounding as frequency grows without bound
    Continuous,
}

impl Compounding {
    pub fn annual() -> Self {
        Compounding::Discrete { periods_per_year: 1 }
    }

    pub fn semiannual() -> Self {
        Compounding::Discrete { periods_per_year: 2 }
    }

    pub fn quarterly() -> Self {
        Compounding::Discrete { periods_per_year: 4 }
    }

    pub fn monthly() -> Self {
        Compounding::Discrete { periods_per_year: 12 }
    }

    pub fn daily() -> Self {
        Compounding::Discrete { periods_per_year: 365 }
    }

    /// Periods per year for discrete compounding, None otherwise
    pub fn periods_per_year(&self) -> Option<u32> {
        match self {
            Compounding::Discrete { periods_per_year } => Some(*periods_per_year),
            _ => None,
        }
    }
}

/// Nominal annual rate plus the compounding convention it is quoted under
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateSpec {
    /// Nominal annual rate as a decimal (0.05 = 5%)
    pub annual_rate: f64,
    pub compounding: Compounding,
}

impl RateSpec {
    pub fn new(annual_rate: f64, compounding: Compounding) -> Self {
        Self { annual_rate, compounding }
    }

    /// Discrete compounding `periods_per_year` times a year
    pub fn discrete(annual_rate: f64, periods_per_year: u32) -> Self {
        Self::new(annual_rate, Compounding::Discrete { periods_per_year })
    }

    pub fn continuous(annual_rate: f64) -> Self {
        Self::new(annual_rate, Compounding::Continuous)
    }

    pub fn simple(annual_rate: f64) -> Self {
        Self::new(annual_rate, Compounding::Simple)
    }

    /// Check `r > -1` and, for discrete compounding, `n >= 1`
    pub fn validate(&self) -> GrowthResult<()> {
        validate_rate(self.annual_rate)?;
        if let Compounding::Discrete { periods_per_year: 0 } = self.compounding {
            return Err(GrowthError::invalid_input(
                "compounding frequency must be at least 1 period per year",
            ));
        }
        Ok(())
    }
}

/// Deposit timing within a period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnnuityType {
    /// Ordinary annuity: deposit after the period's interest
    #[default]
    End,
    /// Annuity due: deposit before the period's interest
    Begin,
}

impl AnnuityType {
    /// Parse "end"/"begin" (also "ordinary"/"due"), case-insensitive
    pub fn parse(raw: &str) -> GrowthResult<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "end" | "ordinary" => Ok(AnnuityType::End),
            "begin" | "due" => Ok(AnnuityType::Begin),
            other => Err(GrowthError::invalid_input(format!(
                "unknown deposit timing: {}",
                other
            ))),
        }
    }
}

/// Recurring deposit applied once per compounding period
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DepositSpec {
    /// Amount per period; negative amounts are withdrawals
    pub amount: f64,
    #[serde(default)]
    pub timing: AnnuityType,
}

impl DepositSpec {
    pub fn new(amount: f64, timing: AnnuityType) -> Self {
        Self { amount, timing }
    }

    /// Ordinary annuity deposit
    pub fn end(amount: f64) -> Self {
        Self::new(amount, AnnuityType::End)
    }

    /// Annuity-due deposit
    pub fn begin(amount: f64) -> Self {
        Self::new(amount, AnnuityType::Begin)
    }
}

/// One growth problem: principal, rate, horizon and optional deposits
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub principal: f64,
    pub rate: RateSpec,
    /// Horizon in years
    pub years: f64,
    #[serde(default)]
    pub deposit: Option<DepositSpec>,
}

impl Scenario {
    /// Lump-sum scenario without deposits
    pub fn new(principal: f64, rate: RateSpec, years: f64) -> Self {
        Self {
            principal,
            rate,
            years,
            deposit: None,
        }
    }

    /// Copy of this scenario with a deposit stream attached
    #[must_use]
    pub fn with_deposit(mut self, deposit: DepositSpec) -> Self {
        self.deposit = Some(deposit);
        self
    }

    /// Decode a scenario from JSON
    pub fn from_json(json: &str) -> GrowthResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Validate principal, rate and horizon. Period integrality is checked
    /// by the evaluator since it depends on the configured tolerance.
    pub fn validate(&self) -> GrowthResult<()> {
        validate_principal(self.principal)?;
        self.rate.validate()?;
        validate_years(self.years)?;
        if let Some(deposit) = &self.deposit {
            validate_finite("deposit amount", deposit.amount)?;
        }
        Ok(())
    }

    /// Deposit amount per period (0 when there are no deposits)
    pub fn deposit_amount(&self) -> f64 {
        self.deposit.map(|d| d.amount).unwrap_or(0.0)
    }
}

pub(crate) fn validate_finite(name: &str, value: f64) -> GrowthResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(GrowthError::invalid_input(format!("{} must be finite, got {}", name, value)))
    }
}

pub(crate) fn validate_principal(principal: f64) -> GrowthResult<()> {
    validate_finite("principal", principal)?;
    if principal < 0.0 {
        return Err(GrowthError::invalid_input(format!(
            "principal must be non-negative, got {}",
            principal
        )));
    }
    Ok(())
}

pub(crate) fn validate_rate(rate: f64) -> GrowthResult<()> {
    validate_finite("rate", rate)?;
    if rate <= -1.0 {
        return Err(GrowthError::invalid_input(format!(
            "rate must be greater than -1, got {}",
            rate
        )));
    }
    Ok(())
}

pub(crate) fn validate_years(years: f64) -> GrowthResult<()> {
    validate_finite("years", years)?;
    if years <= 0.0 {
        return Err(GrowthError::invalid_input(format!(
            "time horizon must be positive, got {}",
            years
        )));
    }
    Ok(())
}

/// Batch runner evaluating many independent scenarios
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::new();
/// let scenarios: Vec<Scenario> = [0.03, 0.04, 0.05]
///     .iter()
///     .map(|&r| Scenario::new(1000.0, RateSpec::discrete(r, 12), 10.0))
///     .collect();
/// let results = runner.evaluate_batch(&scenarios);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScenarioRunner {
    evaluator: FormulaEvaluator,
}

impl ScenarioRunner {
    /// Runner with the default engine configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Runner with a specific evaluator
    pub fn with_evaluator(evaluator: FormulaEvaluator) -> Self {
        Self { evaluator }
    }

    /// Evaluate one scenario
    pub fn evaluate(&self, scenario: &Scenario) -> GrowthResult<Evaluation> {
        self.evaluator.total_future_value(scenario)
    }

    /// Evaluate scenarios in parallel; results keep the input order
    pub fn evaluate_batch(&self, scenarios: &[Scenario]) -> Vec<GrowthResult<Evaluation>> {
        scenarios
            .par_iter()
            .map(|scenario| self.evaluator.total_future_value(scenario))
            .collect()
    }

    /// Simulate several schedules from the same starting balance in parallel
    pub fn simulate_batch(
        &self,
        initial_balance: f64,
        schedules: &[Schedule],
    ) -> Vec<GrowthResult<SimulationResult>> {
        schedules
            .par_iter()
            .map(|schedule| simulate(initial_balance, schedule))
            .collect()
    }

    pub fn evaluator(&self) -> &FormulaEvaluator {
        &self.evaluator
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_bad_inputs() {
        let ok = Scenario::new(1000.0, RateSpec::discrete(0.05, 12), 3.0);
        assert!(ok.validate().is_ok());

        let negative_principal = Scenario { principal: -1.0, ..ok };
        assert!(negative_principal.validate().unwrap_err().is_invalid_input());

        let bad_rate = Scenario { rate: RateSpec::discrete(-1.0, 12), ..ok };
        assert!(bad_rate.validate().unwrap_err().is_invalid_input());

        let zero_freq = Scenario { rate: RateSpec::discrete(0.05, 0), ..ok };
        assert!(zero_freq.validate().unwrap_err().is_invalid_input());

        let zero_years = Scenario { years: 0.0, ..ok };
        assert!(zero_years.validate().unwrap_err().is_invalid_input());

        let nan_deposit = ok.with_deposit(DepositSpec::end(f64::NAN));
        assert!(nan_deposit.validate().unwrap_err().is_invalid_input());
    }

    #[test]
    fn test_negative_rate_above_minus_one_is_valid() {
        let scenario = Scenario::new(1000.0, RateSpec::discrete(-0.5, 1), 1.0);
        assert!(scenario.validate().is_ok());
    }

    #[test]
    fn test_annuity_type_parse() {
        assert_eq!(AnnuityType::parse("END").unwrap(), AnnuityType::End);
        assert_eq!(AnnuityType::parse(" begin ").unwrap(), AnnuityType::Begin);
        assert_eq!(AnnuityType::parse("due").unwrap(), AnnuityType::Begin);
        assert!(AnnuityType::parse("middle").is_err());
    }

    #[test]
    fn test_scenario_from_json() {
        let json = r#"{
            "principal": 1000.0,
            "rate": { "annual_rate": 0.05, "compounding": { "discrete": { "periods_per_year": 12 } } },
            "years": 3.0,
            "deposit": { "amount": 100.0, "timing": "begin" }
        }"#;
        let scenario = Scenario::from_json(json).unwrap();
        assert_eq!(scenario.rate.compounding, Compounding::monthly());
        assert_eq!(scenario.deposit, Some(DepositSpec::begin(100.0)));

        let lump = r#"{"principal": 5.0, "rate": {"annual_rate": 0.1, "compounding": "continuous"}, "years": 1.0}"#;
        let scenario = Scenario::from_json(lump).unwrap();
        assert!(scenario.deposit.is_none());
        assert_eq!(scenario.rate.compounding, Compounding::Continuous);
    }

    #[test]
    fn test_scenario_runner_batch() {
        let runner = ScenarioRunner::new();

        let scenarios: Vec<_> = [0.03, 0.04, 0.05]
            .iter()
            .map(|&rate| {
                Scenario::new(1000.0, RateSpec::discrete(rate, 12), 10.0)
                    .with_deposit(DepositSpec::end(50.0))
            })
            .collect();

        let results = runner.evaluate_batch(&scenarios);
        assert_eq!(results.len(), 3);

        let amounts: Vec<f64> = results.into_iter().map(|r| r.unwrap().amount).collect();
        // Higher rate should result in higher final amount
        assert!(amounts[2] > amounts[1]);
        assert!(amounts[1] > amounts[0]);
    }

    #[test]
    fn test_batch_keeps_failures_local() {
        let runner = ScenarioRunner::new();
        let scenarios = vec![
            Scenario::new(1000.0, RateSpec::discrete(0.05, 12), 1.0),
            Scenario::new(1000.0, RateSpec::discrete(-2.0, 12), 1.0),
        ];
        let results = runner.evaluate_batch(&scenarios);
        assert!(results[0].is_ok());
        assert!(results[1].as_ref().unwrap_err().is_invalid_input());
    }

    #[test]
    fn test_simulate_batch() {
        let runner = ScenarioRunner::new();
        let schedules = vec![
            Schedule::constant(12, 0.01, 0.0, AnnuityType::End),
            Schedule::constant(12, 0.02, 0.0, AnnuityType::End),
        ];
        let results = runner.simulate_batch(100.0, &schedules);
        let low = results[0].as_ref().unwrap().final_balance;
        let high = results[1].as_ref().unwrap().final_balance;
        assert!(high > low);
    }
}
