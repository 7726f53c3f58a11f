//! Variable-schedule simulation
//!
//! Closed-form annuity formulas only hold for a constant rate and deposit.
//! When either varies, the balance is advanced one period at a time and
//! every period is recorded in a ledger.

mod engine;
mod ledger;
mod schedule;

pub use engine::{simulate, ScheduleSimulator, SimulationPhase};
pub use ledger::{LedgerRow, SimulationResult, SimulationSummary};
pub use schedule::{Schedule, ScheduleEntry};
