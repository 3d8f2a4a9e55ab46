//! Bet manager
//!
//! Tracks credits and the wager for the next play. The evaluation core only
//! ever reads bets through [`BetSource`].

use serde::{Deserialize, Serialize};

/// Read-only bet multipliers consumed at evaluation time
pub trait BetSource {
    /// Multiplier for payline pays
    fn line_bet(&self) -> u64;

    /// Multiplier for scatter pays
    fn total_bet(&self) -> u64;
}

/// Credits plus line bet and number of played lines
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BetManager {
    line_bet: u64,
    total_lines: u64,
    credits: u64,
}

impl Default for BetManager {
    fn default() -> Self {
        Self {
            line_bet: 1,
            total_lines: 1,
            credits: 0,
        }
    }
}

impl BetManager {
    pub fn new(line_bet: u64, total_lines: u64, credits: u64) -> Self {
        Self {
            line_bet,
            total_lines,
            credits,
        }
    }

    pub fn set_line_bet(&mut self, line_bet: u64) {
        self.line_bet = line_bet;
    }

    pub fn set_total_lines(&mut self, total_lines: u64) {
        self.total_lines = total_lines;
    }

    pub fn total_lines(&self) -> u64 {
        self.total_lines
    }

    pub fn set_credits(&mut self, credits: u64) {
        self.credits = credits;
    }

    pub fn credits(&self) -> u64 {
        self.credits
    }

    /// Enough credits for one play at the current bet?
    pub fn allow_play(&self) -> bool {
        self.credits > 0 && self.credits >= self.total_bet()
    }

    /// Take the total bet from the credits. Returns `false` (and deducts
    /// nothing) when play is not allowed.
    pub fn deduct_bet(&mut self) -> bool {
        if !self.allow_play() {
            return false;
        }
        self.credits -= self.total_bet();
        true
    }

    /// Credit an award
    pub fn add_award(&mut self, award: u64) {
        self.credits = self.credits.saturating_add(award);
    }
}

impl BetSource for BetManager {
    fn line_bet(&self) -> u64 {
        self.line_bet
    }

    fn total_bet(&self) -> u64 {
        self.line_bet.saturating_mul(self.total_lines)
    }
}

/// Fixed bet, handy for simulation and tests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedBet {
    pub line_bet: u64,
    pub total_lines: u64,
}

impl BetSource for FixedBet {
    fn line_bet(&self) -> u64 {
        self.line_bet
    }

    fn total_bet(&self) -> u64 {
        self.line_bet.saturating_mul(self.total_lines)
    }
}
