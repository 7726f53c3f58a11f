//! Closed-form growth formulas
//!
//! - Lump sums under simple, discrete and continuous compounding
//! - Level deposit streams (ordinary annuity and annuity due)
//! - Present values of lump sums and deposit streams
//!
//! All functions are pure and keep no state between calls.

mod annuity;
mod evaluator;
mod interest;
mod periods;

pub use annuity::{future_value_factor, present_value_factor};
pub use evaluator::{Evaluation, FormulaEvaluator, GrowthBreakdown};
pub use interest::{
    apply_period, continuous_growth_factor, growth_factor, growth_factor_minus_one,
    simple_interest_amount, PeriodStep,
};
pub use periods::whole_periods;
