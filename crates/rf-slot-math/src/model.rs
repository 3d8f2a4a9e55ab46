//! Slot Group Model: stop generation and win evaluation
//!
//! A group is one set of strips (reels or wheels) evaluated together against
//! one paytable set. Each spin:
//!
//! 1. [`SlotGroupModel::generate_stops`] draws a stop per strip.
//! 2. [`SlotGroupModel::evaluate`] captures the evaluation window, then walks
//!    the paytable set in order, dispatching payline and scatter paytables.
//!
//! ## Payline rules
//!
//! - Combos are tried in definition order; the first combo that reaches its
//!   count on a payline claims it. Later combos skip claimed paylines.
//! - Matches run left to right from strip 0 and stop at the first miss.
//!
//! ## Scatter rules
//!
//! - Only positions allowed by the payline set's scatter mask are scanned.
//! - A combo is awarded when the number of matching positions equals its
//!   count exactly.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::bet::BetSource;
use crate::error::{SlotError, SlotResult};
use crate::math::SlotMath;
use crate::paytable::{PayCombo, PayType, PaylineSet};
use crate::result::{PlayResult, SymbPos};
use crate::strip::SlotStripModel;
use crate::symbols::MathSymbol;

/// Evaluation model for one slot group
#[derive(Debug)]
pub struct SlotGroupModel {
    math: Arc<SlotMath>,
    paylines: Arc<PaylineSet>,
    strip_set_id: String,
    paytable_set_id: String,
    strips: Vec<SlotStripModel>,
    /// `eval_symbols[strip][i]` is the wrapped strip index of the symbol
    /// visible at evaluation offset `i`
    eval_symbols: Vec<Vec<usize>>,
    rng: StdRng,
    stops_generated: bool,
}

impl SlotGroupModel {
    /// Bind a model to a strip set and paytable set, seeding the RNG once
    /// from the clock
    pub fn create(
        math: Arc<SlotMath>,
        paylines: Arc<PaylineSet>,
        strip_set_id: &str,
        paytable_set_id: &str,
    ) -> SlotResult<Self> {
        Self::create_seeded(math, paylines, strip_set_id, paytable_set_id, time_seed())
    }

    /// Same as [`create`](Self::create) with an explicit seed
    pub fn create_seeded(
        math: Arc<SlotMath>,
        paylines: Arc<PaylineSet>,
        strip_set_id: &str,
        paytable_set_id: &str,
        seed: u64,
    ) -> SlotResult<Self> {
        let entries = math.strip_set(strip_set_id)?;
        if entries.is_empty() {
            return Err(SlotError::InvalidConfig(format!("Strip set {strip_set_id} has no strips")));
        }

        let strips = entries
            .iter()
            .map(|entry| -> SlotResult<SlotStripModel> {
                let strip = math.strip(entry.strip_id())?;
                Ok(SlotStripModel::new(Arc::clone(strip), entry.eval_indexes().to_vec()))
            })
            .collect::<SlotResult<Vec<_>>>()?;

        validate_group(&math, &paylines, &strips, paytable_set_id)?;

        let eval_symbols = strips.iter().map(|s| vec![0; s.eval_indexes().len()]).collect();

        let mut model = Self {
            math,
            paylines,
            strip_set_id: strip_set_id.to_string(),
            paytable_set_id: paytable_set_id.to_string(),
            strips,
            eval_symbols,
            rng: StdRng::seed_from_u64(seed),
            stops_generated: false,
        };
        model.generate_eval_symbs();

        log::debug!(
            "Created slot group {}/{} ({} strips, {} paylines)",
            model.strip_set_id,
            model.paytable_set_id,
            model.strips.len(),
            model.paylines.line_count()
        );

        Ok(model)
    }

    /// Draw a new stop for every strip, in strip order
    pub fn generate_stops(&mut self) {
        for strip in &mut self.strips {
            strip.generate_stop(&mut self.rng);
        }
        self.stops_generated = true;
    }

    /// Force every stop. Nothing changes if any stop is invalid.
    pub fn set_stops(&mut self, stops: &[usize]) -> SlotResult<()> {
        if stops.len() != self.strips.len() {
            return Err(SlotError::InvalidConfig(format!(
                "Expected {} stops, got {}",
                self.strips.len(),
                stops.len()
            )));
        }

        if let Some((i, &stop)) = stops.iter().enumerate().find(|&(i, &stop)| stop >= self.strips[i].len()) {
            return Err(SlotError::InvalidConfig(format!(
                "Stop {} out of range for strip {} (len {})",
                stop,
                i,
                self.strips[i].len()
            )));
        }

        for (strip, &stop) in self.strips.iter_mut().zip(stops) {
            strip.set_stop(stop)?;
        }
        self.stops_generated = true;
        Ok(())
    }

    /// Evaluate the current stops, appending every pay to `result`
    ///
    /// `result` is never cleared here. Evaluating the same stops again
    /// appends the same pays.
    pub fn evaluate(&mut self, result: &mut PlayResult, bets: &impl BetSource) -> SlotResult<()> {
        if !self.stops_generated {
            return Err(SlotError::StopsNotGenerated);
        }

        self.generate_eval_symbs();

        let pays_before = result.pay_count();
        let paytables = self.math.paytable_set(&self.paytable_set_id)?;
        for paytable in paytables {
            let combos = self.math.combo_set(paytable.combo_set())?;
            match paytable.kind() {
                PayType::Payline => self.evaluate_line_pays(combos, bets.line_bet(), result),
                PayType::Scatter => self.evaluate_scatters(combos, bets.total_bet(), result),
            }
        }

        log::debug!(
            "Evaluated stops {:?}: {} pays",
            self.stops(),
            result.pay_count() - pays_before
        );

        Ok(())
    }

    /// Capture the visible window of every strip
    fn generate_eval_symbs(&mut self) {
        for (strip, window) in self.strips.iter().zip(self.eval_symbols.iter_mut()) {
            let stop = strip.stop() as i64;
            for (slot, &offset) in window.iter_mut().zip(strip.eval_indexes()) {
                *slot = strip.symbol_index(stop + i64::from(offset));
            }
        }
    }

    /// Symbol captured at `(strip, pos)`; positions are validated at creation
    #[inline]
    fn window_symbol(&self, strip: usize, pos: usize) -> &MathSymbol {
        self.strips[strip].symbol_at(self.eval_symbols[strip][pos])
    }

    fn evaluate_line_pays(&self, combos: &[PayCombo], line_bet: u64, result: &mut PlayResult) {
        let lines = self.paylines.line_data();
        let mut awarded = vec![false; lines.len()];

        for combo in combos {
            let count = combo.count() as usize;

            for (payline, line) in lines.iter().enumerate() {
                if awarded[payline] {
                    continue;
                }

                let matched = line
                    .iter()
                    .take(count)
                    .enumerate()
                    .take_while(|&(strip, &pos)| self.window_symbol(strip, pos as usize).is_match(combo.symbol()))
                    .count();

                if matched == count {
                    awarded[payline] = true;
                    let positions = line[..count]
                        .iter()
                        .enumerate()
                        .map(|(strip, &pos)| SymbPos::new(strip, pos as usize))
                        .collect();
                    result.add_pay(PayType::Payline, combo, line_bet, Some(payline), positions);
                }
            }
        }
    }

    fn evaluate_scatters(&self, combos: &[PayCombo], total_bet: u64, result: &mut PlayResult) {
        // Distinct names in order of first appearance
        let mut names: Vec<&str> = Vec::new();
        for combo in combos {
            if !names.contains(&combo.symbol()) {
                names.push(combo.symbol());
            }
        }

        let mut found: Vec<Vec<SymbPos>> = vec![Vec::new(); names.len()];
        for (strip, window) in self.eval_symbols.iter().enumerate() {
            for pos in 0..window.len() {
                if !self.paylines.is_scatter_position(strip, pos) {
                    continue;
                }
                let symbol = self.window_symbol(strip, pos);
                for (name, positions) in names.iter().zip(found.iter_mut()) {
                    if symbol.is_match(name) {
                        positions.push(SymbPos::new(strip, pos));
                    }
                }
            }
        }

        for combo in combos {
            let positions = names
                .iter()
                .position(|&name| name == combo.symbol())
                .map(|i| &found[i]);
            if let Some(positions) = positions {
                if positions.len() == combo.count() as usize {
                    result.add_pay(PayType::Scatter, combo, total_bet, None, positions.clone());
                }
            }
        }
    }

    /// Strip model by index
    pub fn strip(&self, index: usize) -> Option<&SlotStripModel> {
        self.strips.get(index)
    }

    pub fn strips(&self) -> &[SlotStripModel] {
        &self.strips
    }

    /// Number of strips
    pub fn count(&self) -> usize {
        self.strips.len()
    }

    /// Current stop of every strip
    pub fn stops(&self) -> Vec<usize> {
        self.strips.iter().map(SlotStripModel::stop).collect()
    }

    /// Symbol captured at window index `pos` of `strip` by the last evaluation
    pub fn eval_symbol(&self, strip: usize, pos: usize) -> Option<&MathSymbol> {
        let index = *self.eval_symbols.get(strip)?.get(pos)?;
        Some(self.strips[strip].symbol_at(index))
    }

    /// All captured symbols of one strip, in window order
    pub fn visible_symbols(&self, strip: usize) -> Option<Vec<&MathSymbol>> {
        let window = self.eval_symbols.get(strip)?;
        Some(window.iter().map(|&i| self.strips[strip].symbol_at(i)).collect())
    }

    pub fn math(&self) -> &Arc<SlotMath> {
        &self.math
    }

    pub fn payline_set(&self) -> &Arc<PaylineSet> {
        &self.paylines
    }

    pub fn strip_set_id(&self) -> &str {
        &self.strip_set_id
    }

    pub fn paytable_set_id(&self) -> &str {
        &self.paytable_set_id
    }
}

fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default()
}

/// Reject payline and scatter data the group cannot evaluate
fn validate_group(
    math: &SlotMath,
    paylines: &PaylineSet,
    strips: &[SlotStripModel],
    paytable_set_id: &str,
) -> SlotResult<()> {
    let paytables = math.paytable_set(paytable_set_id)?;

    let mut has_paylines = false;
    let mut has_scatters = false;
    for paytable in paytables {
        let combos = math.combo_set(paytable.combo_set())?;
        match paytable.kind() {
            PayType::Payline => {
                has_paylines = true;
                let widest = paylines.line_data().iter().map(Vec::len).max().unwrap_or(0);
                for combo in combos.iter().filter(|c| c.count() as usize > widest) {
                    log::warn!(
                        "Combo {}x{} in {} can never pay on payline set {}",
                        combo.symbol(),
                        combo.count(),
                        paytable.combo_set(),
                        paylines.id()
                    );
                }
            }
            PayType::Scatter => has_scatters = true,
        }
    }

    if has_paylines {
        for (payline, line) in paylines.line_data().iter().enumerate() {
            if line.len() > strips.len() {
                return Err(SlotError::InvalidConfig(format!(
                    "Payline {} of {} spans {} strips, group has {}",
                    payline,
                    paylines.id(),
                    line.len(),
                    strips.len()
                )));
            }
            for (strip, &pos) in line.iter().enumerate() {
                if pos as usize >= strips[strip].eval_indexes().len() {
                    return Err(SlotError::InvalidConfig(format!(
                        "Payline {} of {} uses window index {} on strip {}",
                        payline,
                        paylines.id(),
                        pos,
                        strip
                    )));
                }
            }
        }
    }

    if has_scatters {
        let masks = paylines.scatter_data();
        if masks.len() < strips.len() {
            return Err(SlotError::InvalidConfig(format!(
                "Scatter data of {} covers {} strips, group has {}",
                paylines.id(),
                masks.len(),
                strips.len()
            )));
        }
        for (strip, mask) in masks.iter().take(strips.len()).enumerate() {
            if let Some(pos) = mask.iter().find(|&&p| p as usize >= strips[strip].eval_indexes().len()) {
                return Err(SlotError::InvalidConfig(format!(
                    "Scatter data of {} uses window index {} on strip {}",
                    paylines.id(),
                    pos,
                    strip
                )));
            }
        }
    }

    Ok(())
}
