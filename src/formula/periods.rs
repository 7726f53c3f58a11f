//! Conversion of (frequency, years) into a whole number of compounding periods

use crate::error::{GrowthError, GrowthResult};

/// Number of whole periods in `years` at `periods_per_year`.
///
/// `n * t` is rounded to the nearest integer; if the remainder exceeds
/// `tolerance` the horizon does not land on a period boundary and the call
/// fails instead of truncating.
pub fn whole_periods(periods_per_year: u32, years: f64, tolerance: f64) -> GrowthResult<u32> {
    if periods_per_year == 0 {
        return Err(GrowthError::invalid_input(
            "compounding frequency must be at least 1 period per year",
        ));
    }

    let exact = periods_per_year as f64 * years;
    if !exact.is_finite() || exact < 0.0 {
        return Err(GrowthError::invalid_input(format!(
            "period count must be a non-negative number, got {}",
            exact
        )));
    }

    let rounded = exact.round();
    if (exact - rounded).abs() > tolerance {
        return Err(GrowthError::invalid_input(format!(
            "{} years at {} periods/year is {} periods, not a whole number",
            years, periods_per_year, exact
        )));
    }
    if rounded > u32::MAX as f64 {
        return Err(GrowthError::invalid_input(format!(
            "period count {} is too large",
            rounded
        )));
    }

    Ok(rounded as u32)
}
