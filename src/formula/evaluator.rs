//! Checked closed-form evaluators
//!
//! Every entry point validates its inputs before computing. Discrete modes
//! additionally require `n * t` to land on a whole number of periods.

use super::annuity::{future_value_factor, present_value_factor};
use super::interest::{continuous_growth_factor, growth_factor, simple_interest_amount};
use super::periods::whole_periods;
use crate::config::EngineConfig;
use crate::error::{GrowthError, GrowthResult};
use crate::scenario::{
    validate_finite, validate_principal, validate_rate, validate_years, AnnuityType, Compounding,
    RateSpec, Scenario,
};
use serde::{Deserialize, Serialize};

/// Amount produced by an evaluation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub amount: f64,
    /// Whole compounding periods used; None for simple and continuous modes
    pub periods: Option<u32>,
}

/// Where a final amount came from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GrowthBreakdown {
    pub principal: f64,
    /// Sum of all deposits (negative for net withdrawals)
    pub total_deposits: f64,
    /// Final amount less principal and deposits
    pub interest_earned: f64,
    pub final_amount: f64,
    pub periods: Option<u32>,
}

/// Discrete-mode inputs after validation
#[derive(Debug, Clone, Copy)]
pub(crate) struct DiscreteTerms {
    pub periodic_rate: f64,
    pub periods: u32,
}

/// Stateless evaluator for the closed-form growth formulas
#[derive(Debug, Clone, Copy, Default)]
pub struct FormulaEvaluator {
    config: EngineConfig,
}

impl FormulaEvaluator {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Whole periods in `years` at `periods_per_year`
    pub fn period_count(&self, periods_per_year: u32, years: f64) -> GrowthResult<u32> {
        whole_periods(periods_per_year, years, self.config.period_tolerance)
    }

    pub(crate) fn discrete_terms(
        &self,
        annual_rate: f64,
        periods_per_year: u32,
        years: f64,
    ) -> GrowthResult<DiscreteTerms> {
        validate_rate(annual_rate)?;
        validate_years(years)?;
        let periods = self.period_count(periods_per_year, years)?;
        Ok(DiscreteTerms {
            periodic_rate: annual_rate / periods_per_year as f64,
            periods,
        })
    }

    /// `P * (1 + r*t)`. Defined for any rate and horizon.
    pub fn simple_interest_amount(&self, principal: f64, annual_rate: f64, years: f64) -> f64 {
        simple_interest_amount(principal, annual_rate, years)
    }

    /// `P * (1 + r/n)^(n*t)`
    pub fn discrete_compound_amount(
        &self,
        principal: f64,
        annual_rate: f64,
        periods_per_year: u32,
        years: f64,
    ) -> GrowthResult<f64> {
        validate_principal(principal)?;
        let terms = self.discrete_terms(annual_rate, periods_per_year, years)?;
        Ok(principal * growth_factor(terms.periodic_rate, terms.periods as f64))
    }

    /// `P * e^(r*t)`
    pub fn continuous_compound_amount(
        &self,
        principal: f64,
        annual_rate: f64,
        years: f64,
    ) -> GrowthResult<f64> {
        validate_principal(principal)?;
        validate_rate(annual_rate)?;
        validate_years(years)?;
        Ok(principal * continuous_growth_factor(annual_rate, years))
    }

    /// Future value of a level deposit stream.
    ///
    /// Zero periodic rate returns `PMT * periods` exactly for either timing.
    pub fn annuity_future_value(
        &self,
        payment: f64,
        annual_rate: f64,
        periods_per_year: u32,
        years: f64,
        timing: AnnuityType,
    ) -> GrowthResult<f64> {
        validate_finite("deposit amount", payment)?;
        let terms = self.discrete_terms(annual_rate, periods_per_year, years)?;
        Ok(payment * future_value_factor(terms.periodic_rate, terms.periods as f64, timing))
    }

    /// Final amount of a scenario: the lump-sum term plus the deposit stream.
    ///
    /// Deposits are defined per compounding period, so they are only
    /// accepted with discrete compounding.
    pub fn total_future_value(&self, scenario: &Scenario) -> GrowthResult<Evaluation> {
        scenario.validate()?;

        let rate = scenario.rate.annual_rate;
        match scenario.rate.compounding {
            Compounding::Discrete { periods_per_year } => {
                let terms = self.discrete_terms(rate, periods_per_year, scenario.years)?;
                let lump = scenario.principal * growth_factor(terms.periodic_rate, terms.periods as f64);
                let deposits = match scenario.deposit {
                    Some(deposit) => {
                        deposit.amount
                            * future_value_factor(terms.periodic_rate, terms.periods as f64, deposit.timing)
                    }
                    None => 0.0,
                };
                Ok(Evaluation {
                    amount: lump + deposits,
                    periods: Some(terms.periods),
                })
            }
            Compounding::Simple | Compounding::Continuous if scenario.deposit_amount() != 0.0 => {
                Err(GrowthError::invalid_input(
                    "periodic deposits require discrete compounding",
                ))
            }
            Compounding::Simple => Ok(Evaluation {
                amount: simple_interest_amount(scenario.principal, rate, scenario.years),
                periods: None,
            }),
            Compounding::Continuous => Ok(Evaluation {
                amount: scenario.principal * continuous_growth_factor(rate, scenario.years),
                periods: None,
            }),
        }
    }

    /// Principal, deposits and interest making up a scenario's final amount
    pub fn growth_breakdown(&self, scenario: &Scenario) -> GrowthResult<GrowthBreakdown> {
        let evaluation = self.total_future_value(scenario)?;
        let total_deposits = scenario.deposit_amount() * evaluation.periods.unwrap_or(0) as f64;

        Ok(GrowthBreakdown {
            principal: scenario.principal,
            total_deposits,
            interest_earned: evaluation.amount - scenario.principal - total_deposits,
            final_amount: evaluation.amount,
            periods: evaluation.periods,
        })
    }

    /// `A / (1 + r/n)^(n*t)`
    pub fn present_value_of_lump_sum(
        &self,
        amount: f64,
        annual_rate: f64,
        periods_per_year: u32,
        years: f64,
    ) -> GrowthResult<f64> {
        validate_finite("amount", amount)?;
        let terms = self.discrete_terms(annual_rate, periods_per_year, years)?;
        Ok(amount / growth_factor(terms.periodic_rate, terms.periods as f64))
    }

    /// Present value of an ordinary annuity: `PMT * (1 - (1+i)^-N) / i`
    pub fn present_value_of_annuity(
        &self,
        payment: f64,
        annual_rate: f64,
        periods_per_year: u32,
        years: f64,
    ) -> GrowthResult<f64> {
        self.present_value_of_annuity_with_timing(
            payment,
            annual_rate,
            periods_per_year,
            years,
            AnnuityType::End,
        )
    }

    /// Present value of a level deposit stream with explicit timing
    pub fn present_value_of_annuity_with_timing(
        &self,
        payment: f64,
        annual_rate: f64,
        periods_per_year: u32,
        years: f64,
        timing: AnnuityType,
    ) -> GrowthResult<f64> {
        validate_finite("deposit amount", payment)?;
        let terms = self.discrete_terms(annual_rate, periods_per_year, years)?;
        Ok(payment * present_value_factor(terms.periodic_rate, terms.periods as f64, timing))
    }

    /// Effective annual rate (APY) implied by a nominal rate and its compounding
    pub fn effective_annual_rate(&self, rate: &RateSpec) -> GrowthResult<f64> {
        rate.validate()?;
        let r = rate.annual_rate;
        Ok(match rate.compounding {
            Compounding::Simple => r,
            Compounding::Discrete { periods_per_year } => {
                growth_factor(r / periods_per_year as f64, periods_per_year as f64) - 1.0
            }
            Compounding::Continuous => r.exp_m1(),
        })
    }
}
