//! Simulation statistics

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use rf_slot_math::{PayType, PlayResult};

/// Totals over a batch of spins. Worker reports merge into one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimReport {
    pub spins: u64,
    pub total_bet: u64,
    pub total_win: u64,
    pub winning_spins: u64,
    pub max_win: u64,
    /// Hits per combo, keyed `SYMBOL xCOUNT (kind)`
    pub combo_hits: BTreeMap<String, u64>,
}

impl SimReport {
    /// Add one evaluated spin
    pub fn record(&mut self, result: &PlayResult, bet: u64) {
        self.spins += 1;
        self.total_bet = self.total_bet.saturating_add(bet);

        let win = result.total_win();
        self.total_win = self.total_win.saturating_add(win);
        self.max_win = self.max_win.max(win);
        if result.is_win() {
            self.winning_spins += 1;
        }

        for pay in result.pays() {
            *self
                .combo_hits
                .entry(combo_key(pay.symbol(), pay.combo().count(), pay.pay_type()))
                .or_default() += 1;
        }
    }

    pub fn merge(&mut self, other: &SimReport) {
        self.spins += other.spins;
        self.total_bet = self.total_bet.saturating_add(other.total_bet);
        self.total_win = self.total_win.saturating_add(other.total_win);
        self.winning_spins += other.winning_spins;
        self.max_win = self.max_win.max(other.max_win);
        for (key, hits) in &other.combo_hits {
            *self.combo_hits.entry(key.clone()).or_default() += hits;
        }
    }

    /// Return to player, percent
    pub fn rtp(&self) -> f64 {
        if self.total_bet > 0 {
            (self.total_win as f64 / self.total_bet as f64) * 100.0
        } else {
            0.0
        }
    }

    /// Share of winning spins, percent
    pub fn hit_rate(&self) -> f64 {
        if self.spins > 0 {
            (self.winning_spins as f64 / self.spins as f64) * 100.0
        } else {
            0.0
        }
    }

    /// Report plus derived rates, for machine-readable output
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "spins": self.spins,
            "total_bet": self.total_bet,
            "total_win": self.total_win,
            "winning_spins": self.winning_spins,
            "max_win": self.max_win,
            "rtp": self.rtp(),
            "hit_rate": self.hit_rate(),
            "combo_hits": self.combo_hits,
        })
    }
}

pub fn combo_key(symbol: &str, count: u32, kind: PayType) -> String {
    format!("{symbol} x{count} ({kind})")
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rf_slot_math::{PayCombo, SymbPos};

    fn winning_result(award: u32) -> PlayResult {
        let mut result = PlayResult::new();
        result.add_pay(
            PayType::Payline,
            &PayCombo::new("BAR", 3, award),
            1,
            Some(0),
            vec![SymbPos::new(0, 0), SymbPos::new(1, 0), SymbPos::new(2, 0)],
        );
        result
    }

    #[test]
    fn test_record_and_rates() {
        let mut report = SimReport::default();
        report.record(&winning_result(30), 10);
        report.record(&PlayResult::new(), 10);
        report.record(&PlayResult::new(), 10);
        report.record(&winning_result(5), 10);

        assert_eq!(report.spins, 4);
        assert_eq!(report.max_win, 30);
        assert_relative_eq!(report.rtp(), 87.5);
        assert_relative_eq!(report.hit_rate(), 50.0);
        assert_eq!(report.combo_hits[&combo_key("BAR", 3, PayType::Payline)], 2);
    }

    #[test]
    fn test_merge() {
        let mut a = SimReport::default();
        a.record(&winning_result(30), 10);
        let mut b = SimReport::default();
        b.record(&winning_result(50), 10);
        b.record(&PlayResult::new(), 10);

        a.merge(&b);
        assert_eq!(a.spins, 3);
        assert_eq!(a.total_win, 80);
        assert_eq!(a.max_win, 50);
        assert_eq!(a.winning_spins, 2);
        assert_eq!(a.combo_hits.values().sum::<u64>(), 2);
    }

    #[test]
    fn test_totals_saturate() {
        let mut report = SimReport::default();
        report.record(&PlayResult::new(), u64::MAX);
        report.record(&PlayResult::new(), u64::MAX);
        assert_eq!(report.total_bet, u64::MAX);

        let mut other = SimReport::default();
        other.record(&PlayResult::new(), 1);
        report.merge(&other);
        assert_eq!(report.total_bet, u64::MAX);
        assert_eq!(report.spins, 3);
    }

    #[test]
    fn test_empty_report_rates() {
        let report = SimReport::default();
        assert_eq!(report.rtp(), 0.0);
        assert_eq!(report.hit_rate(), 0.0);
        assert_eq!(report.to_json()["spins"], 0);
    }
}
