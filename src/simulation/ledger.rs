//! Ledger output structures for schedule simulations

use serde::{Deserialize, Serialize};

/// A single row of the simulation ledger for one period
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LedgerRow {
    /// Period number (1-indexed)
    pub period: u32,

    pub opening_balance: f64,
    pub rate: f64,
    pub deposit: f64,
    pub interest: f64,
    pub closing_balance: f64,
}

/// Complete simulation result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub initial_balance: f64,

    /// Balance after the last period (the initial balance for an empty schedule)
    pub final_balance: f64,

    /// Per-period rows in schedule order
    pub ledger: Vec<LedgerRow>,
}

impl SimulationResult {
    pub fn new(initial_balance: f64) -> Self {
        Self {
            initial_balance,
            final_balance: initial_balance,
            ledger: Vec::new(),
        }
    }

    /// Add a ledger row and move the final balance to its closing balance
    pub fn add_row(&mut self, row: LedgerRow) {
        self.final_balance = row.closing_balance;
        self.ledger.push(row);
    }

    /// Number of periods simulated
    pub fn periods(&self) -> u32 {
        self.ledger.len() as u32
    }

    /// Get summary statistics
    pub fn summary(&self) -> SimulationSummary {
        let total_deposits: f64 = self.ledger.iter().map(|r| r.deposit).sum();
        let total_interest: f64 = self.ledger.iter().map(|r| r.interest).sum();

        SimulationSummary {
            total_periods: self.periods(),
            initial_balance: self.initial_balance,
            total_deposits,
            total_interest,
            final_balance: self.final_balance,
        }
    }
}

/// Summary statistics for a simulation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationSummary {
    pub total_periods: u32,
    pub initial_balance: f64,
    pub total_deposits: f64,
    pub total_interest: f64,
    pub final_balance: f64,
}
