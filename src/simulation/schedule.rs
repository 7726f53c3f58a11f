//! Per-period rate/deposit schedules

use crate::config::EngineConfig;
use crate::error::{GrowthError, GrowthResult};
use crate::formula::whole_periods;
use crate::scenario::{validate_rate, AnnuityType, Compounding, Scenario};
use serde::{Deserialize, Serialize};
use std::io::Read;

/// One simulated period
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    /// Rate applied for this period (not annualized)
    pub rate: f64,
    /// Amount added this period; negative for a withdrawal
    pub deposit: f64,
    /// Whether the deposit is applied before or after this period's interest
    pub timing: AnnuityType,
}

impl ScheduleEntry {
    pub fn new(rate: f64, deposit: f64, timing: AnnuityType) -> Self {
        Self { rate, deposit, timing }
    }

    /// Check `rate > -1` and a finite deposit
    pub fn validate(&self) -> GrowthResult<()> {
        validate_rate(self.rate)?;
        if !self.deposit.is_finite() {
            return Err(GrowthError::invalid_input(format!(
                "deposit must be finite, got {}",
                self.deposit
            )));
        }
        Ok(())
    }
}

/// Ordered sequence of periods; one entry per simulated period
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    entries: Vec<ScheduleEntry>,
}

/// Raw CSV row: `rate,deposit,timing`
#[derive(Debug, Deserialize)]
struct CsvRow {
    rate: f64,
    #[serde(default)]
    deposit: Option<f64>,
    #[serde(default)]
    timing: Option<String>,
}

impl CsvRow {
    fn to_entry(self) -> GrowthResult<ScheduleEntry> {
        let timing = match self.timing.as_deref() {
            Some(raw) if !raw.trim().is_empty() => AnnuityType::parse(raw)?,
            _ => AnnuityType::End,
        };
        Ok(ScheduleEntry::new(self.rate, self.deposit.unwrap_or(0.0), timing))
    }
}

impl Schedule {
    pub fn new(entries: Vec<ScheduleEntry>) -> Self {
        Self { entries }
    }

    /// `periods` identical entries
    pub fn constant(periods: u32, rate: f64, deposit: f64, timing: AnnuityType) -> Self {
        Self {
            entries: vec![ScheduleEntry::new(rate, deposit, timing); periods as usize],
        }
    }

    /// Uniform schedule equivalent to a discrete-compounding scenario.
    ///
    /// Each entry carries the periodic rate `r/n` and the scenario's deposit.
    pub fn from_scenario(scenario: &Scenario, config: &EngineConfig) -> GrowthResult<Self> {
        scenario.validate()?;
        let periods_per_year = match scenario.rate.compounding {
            Compounding::Discrete { periods_per_year } => periods_per_year,
            _ => {
                return Err(GrowthError::invalid_input(
                    "only discrete compounding can be expressed as a schedule",
                ))
            }
        };

        let periods = whole_periods(periods_per_year, scenario.years, config.period_tolerance)?;
        let (deposit, timing) = scenario
            .deposit
            .map(|d| (d.amount, d.timing))
            .unwrap_or((0.0, AnnuityType::End));

        Ok(Self::constant(
            periods,
            scenario.rate.annual_rate / periods_per_year as f64,
            deposit,
            timing,
        ))
    }

    /// Expand a path of nominal annual rates into `periods_per_year` entries per year
    pub fn from_annual_rates(
        annual_rates: &[f64],
        periods_per_year: u32,
        deposit: f64,
        timing: AnnuityType,
    ) -> GrowthResult<Self> {
        if periods_per_year == 0 {
            return Err(GrowthError::invalid_input(
                "compounding frequency must be at least 1 period per year",
            ));
        }

        let n = periods_per_year as f64;
        let entries = annual_rates
            .iter()
            .flat_map(|&annual| {
                std::iter::repeat(ScheduleEntry::new(annual / n, deposit, timing))
                    .take(periods_per_year as usize)
            })
            .collect();

        Ok(Self { entries })
    }

    /// Decode a schedule from CSV with a `rate,deposit,timing` header.
    ///
    /// `deposit` defaults to 0 and `timing` to end-of-period when blank.
    pub fn from_csv_reader<R: Read>(reader: R) -> GrowthResult<Self> {
        let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let mut entries = Vec::new();
        for row in reader.deserialize::<CsvRow>() {
            entries.push(row?.to_entry()?);
        }
        Ok(Self { entries })
    }

    pub fn push(&mut self, entry: ScheduleEntry) {
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[ScheduleEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScheduleEntry> {
        self.entries.iter()
    }

    /// Validate every entry; reports the first offending period (1-indexed)
    pub fn validate(&self) -> GrowthResult<()> {
        for (index, entry) in self.entries.iter().enumerate() {
            entry.validate().map_err(|err| match err {
                GrowthError::InvalidInput { reason } => {
                    GrowthError::invalid_input(format!("period {}: {}", index + 1, reason))
                }
                other => other,
            })?;
        }
        Ok(())
    }
}

impl FromIterator<ScheduleEntry> for Schedule {
    fn from_iter<I: IntoIterator<Item = ScheduleEntry>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
