//! Simulation configuration

use serde::{Deserialize, Serialize};

use crate::runner::{SimError, SimResult};

/// What to simulate and how
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Total spins across all workers
    pub spins: u64,
    /// Master seed. `None` draws one from the OS.
    pub seed: Option<u64>,
    /// Worker threads, 0 = one per CPU
    pub threads: usize,
    pub line_bet: u64,
    /// Lines played, `None` = every line of the payline set
    pub total_lines: Option<u64>,
    pub strip_set: String,
    pub paytable_set: String,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            spins: 1_000_000,
            seed: None,
            threads: 0,
            line_bet: 1,
            total_lines: None,
            strip_set: String::new(),
            paytable_set: String::new(),
        }
    }
}

impl SimConfig {
    pub fn new(strip_set: impl Into<String>, paytable_set: impl Into<String>) -> Self {
        Self {
            strip_set: strip_set.into(),
            paytable_set: paytable_set.into(),
            ..Default::default()
        }
    }

    pub fn with_spins(mut self, spins: u64) -> Self {
        self.spins = spins;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    pub fn with_bet(mut self, line_bet: u64, total_lines: Option<u64>) -> Self {
        self.line_bet = line_bet;
        self.total_lines = total_lines;
        self
    }

    /// Resolved worker count, never more workers than spins
    pub fn worker_count(&self) -> usize {
        let threads = if self.threads == 0 {
            num_cpus::get()
        } else {
            self.threads
        };
        let spins = usize::try_from(self.spins).unwrap_or(usize::MAX);
        threads.min(spins).max(1)
    }

    pub fn validate(&self) -> SimResult<()> {
        if self.spins == 0 {
            return Err(SimError::InvalidConfig("spins must be > 0".into()));
        }
        if self.line_bet == 0 {
            return Err(SimError::InvalidConfig("line bet must be > 0".into()));
        }
        if self.total_lines == Some(0) {
            return Err(SimError::InvalidConfig("total lines must be > 0".into()));
        }
        if self.strip_set.is_empty() || self.paytable_set.is_empty() {
            return Err(SimError::InvalidConfig("strip set and paytable set are required".into()));
        }
        Ok(())
    }
}
