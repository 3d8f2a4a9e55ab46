//! Play results: pays awarded by one evaluation

use serde::Serialize;

use crate::paytable::{PayCombo, PayType};

/// A visible symbol position: strip index and evaluation-window index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SymbPos {
    pub strip: usize,
    pub pos: usize,
}

impl SymbPos {
    pub fn new(strip: usize, pos: usize) -> Self {
        Self { strip, pos }
    }
}

/// One awarded pay
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pay {
    pay_type: PayType,
    combo: PayCombo,
    multiplier: u64,
    /// Winning payline, `None` for scatter pays
    payline: Option<usize>,
    positions: Vec<SymbPos>,
}

impl Pay {
    pub fn new(
        pay_type: PayType,
        combo: PayCombo,
        multiplier: u64,
        payline: Option<usize>,
        positions: Vec<SymbPos>,
    ) -> Self {
        Self {
            pay_type,
            combo,
            multiplier,
            payline,
            positions,
        }
    }

    pub fn pay_type(&self) -> PayType {
        self.pay_type
    }

    pub fn combo(&self) -> &PayCombo {
        &self.combo
    }

    /// Paytable symbol name
    pub fn symbol(&self) -> &str {
        self.combo.symbol()
    }

    pub fn bonus_code(&self) -> i32 {
        self.combo.bonus_code()
    }

    /// Bet multiplier (line bet or total bet)
    pub fn multiplier(&self) -> u64 {
        self.multiplier
    }

    pub fn payline(&self) -> Option<usize> {
        self.payline
    }

    /// Positions to highlight for this pay
    pub fn positions(&self) -> &[SymbPos] {
        &self.positions
    }

    /// Award from the paytable
    pub fn base_award(&self) -> u64 {
        u64::from(self.combo.award())
    }

    /// Award times bet multiplier
    pub fn final_award(&self) -> u64 {
        self.base_award().saturating_mul(self.multiplier)
    }
}

/// Pays for one play cycle plus their running total
///
/// The model only appends; the caller clears before the next play.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PlayResult {
    pays: Vec<Pay>,
    total_win: u64,
}

impl PlayResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a pay and add it to the total
    pub fn add_pay(
        &mut self,
        pay_type: PayType,
        combo: &PayCombo,
        multiplier: u64,
        payline: Option<usize>,
        positions: Vec<SymbPos>,
    ) {
        let pay = Pay::new(pay_type, combo.clone(), multiplier, payline, positions);
        self.total_win = self.total_win.saturating_add(pay.final_award());
        self.pays.push(pay);
    }

    pub fn pay(&self, index: usize) -> Option<&Pay> {
        self.pays.get(index)
    }

    pub fn pay_count(&self) -> usize {
        self.pays.len()
    }

    pub fn pays(&self) -> &[Pay] {
        &self.pays
    }

    /// Order pays by base award, highest first. Equal awards keep their
    /// evaluation order.
    pub fn sort_pays(&mut self) {
        self.pays.sort_by(|a, b| b.base_award().cmp(&a.base_award()));
    }

    /// Recompute the total from the pays
    pub fn add_up_win(&mut self) -> u64 {
        self.total_win = self
            .pays
            .iter()
            .fold(0u64, |acc, p| acc.saturating_add(p.final_award()));
        self.total_win
    }

    pub fn total_win(&self) -> u64 {
        self.total_win
    }

    pub fn is_win(&self) -> bool {
        !self.pays.is_empty()
    }

    pub fn clear(&mut self) {
        self.pays.clear();
        self.total_win = 0;
    }
}

/// One play result per slot group of a game
#[derive(Debug, Clone, Default, Serialize)]
pub struct SlotResults {
    results: Vec<PlayResult>,
}

impl SlotResults {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an empty play result and return its index
    pub fn create(&mut self) -> usize {
        self.results.push(PlayResult::new());
        self.results.len() - 1
    }

    pub fn get(&self, index: usize) -> Option<&PlayResult> {
        self.results.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut PlayResult> {
        self.results.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlayResult> {
        self.results.iter()
    }

    pub fn clear(&mut self) {
        self.results.iter_mut().for_each(PlayResult::clear);
    }

    pub fn sort_pays(&mut self) {
        self.results.iter_mut().for_each(PlayResult::sort_pays);
    }

    /// Recompute every total and return the sum
    pub fn add_up_win(&mut self) -> u64 {
        self.results
            .iter_mut()
            .fold(0u64, |acc, r| acc.saturating_add(r.add_up_win()))
    }

    pub fn total_win(&self) -> u64 {
        self.results
            .iter()
            .fold(0u64, |acc, r| acc.saturating_add(r.total_win()))
    }

    pub fn is_win(&self) -> bool {
        self.results.iter().any(PlayResult::is_win)
    }
}
