//! Growth Engine - Deterministic compound-growth calculations
//!
//! This library provides:
//! - Closed-form future and present values (simple, discrete, continuous)
//! - Level deposit streams as ordinary annuities or annuities due
//! - Inverse solvers for the required deposit, principal, rate and time
//! - Period-by-period simulation over variable rate/deposit schedules
//! - Batch evaluation of independent scenarios
//!
//! Every calculation is a pure function of its inputs. Amounts are plain
//! `f64`; rounding for display is left to the caller.

pub mod config;
pub mod error;
pub mod formula;
pub mod scenario;
pub mod simulation;
pub mod solver;

// Re-export commonly used types
pub use config::{EngineConfig, SolverConfig};
pub use error::{GrowthError, GrowthResult};
pub use formula::{Evaluation, FormulaEvaluator, GrowthBreakdown};
pub use scenario::{AnnuityType, Compounding, DepositSpec, RateSpec, Scenario, ScenarioRunner};
pub use simulation::{simulate, LedgerRow, Schedule, ScheduleEntry, ScheduleSimulator, SimulationResult};
pub use solver::{InverseSolver, Solution};
