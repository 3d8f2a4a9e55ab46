//! Strip data and the per-spin strip model

use std::sync::Arc;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{SlotError, SlotResult};
use crate::symbols::MathSymbol;

/// One position on a strip
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StripStop {
    symbol: MathSymbol,
    weight: u32,
}

impl StripStop {
    /// Create a stop with weight 1
    pub fn new(symbol: MathSymbol) -> Self {
        Self { symbol, weight: 1 }
    }

    /// Create a weighted stop
    pub fn weighted(symbol: MathSymbol, weight: u32) -> Self {
        Self { symbol, weight }
    }

    pub fn symbol(&self) -> &MathSymbol {
        &self.symbol
    }

    pub fn weight(&self) -> u32 {
        self.weight
    }
}

/// A reel or wheel strip: a circular sequence of symbols
#[derive(Debug, Clone)]
pub struct MathStrip {
    id: String,
    stops: Vec<StripStop>,
    total_weight: u64,
}

impl MathStrip {
    /// Create a strip. Empty strips and strips without weight can never
    /// produce a stop and are rejected.
    pub fn new(id: impl Into<String>, stops: Vec<StripStop>) -> SlotResult<Self> {
        let id = id.into();
        if stops.is_empty() {
            return Err(SlotError::InvalidConfig(format!("Strip has no stops ({id})")));
        }

        let total_weight: u64 = stops.iter().map(|s| s.weight as u64).sum();
        if total_weight == 0 {
            return Err(SlotError::InvalidConfig(format!("Strip has zero total weight ({id})")));
        }

        Ok(Self { id, stops, total_weight })
    }

    /// Create an unweighted strip from symbols
    pub fn from_symbols(id: impl Into<String>, symbols: impl IntoIterator<Item = MathSymbol>) -> SlotResult<Self> {
        Self::new(id, symbols.into_iter().map(StripStop::new).collect())
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn stops(&self) -> &[StripStop] {
        &self.stops
    }

    /// Number of stops on the strip
    pub fn len(&self) -> usize {
        self.stops.len()
    }

    /// Always false for a constructed strip
    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    pub fn total_weight(&self) -> u64 {
        self.total_weight
    }
}

/// A strip inside a strip set plus the offsets that are visible for evaluation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StripSetEntry {
    strip_id: String,
    eval_indexes: Vec<i8>,
}

impl StripSetEntry {
    pub fn new(strip_id: impl Into<String>, eval_indexes: Vec<i8>) -> Self {
        Self {
            strip_id: strip_id.into(),
            eval_indexes,
        }
    }

    pub fn strip_id(&self) -> &str {
        &self.strip_id
    }

    /// Offsets relative to the stop (reels are usually consecutive, wheels
    /// can be spread out or negative)
    pub fn eval_indexes(&self) -> &[i8] {
        &self.eval_indexes
    }
}

/// Per-group model of one strip: current stop plus visible offsets
#[derive(Debug, Clone)]
pub struct SlotStripModel {
    strip: Arc<MathStrip>,
    eval_indexes: Vec<i8>,
    last_stop: usize,
    stop: usize,
}

impl SlotStripModel {
    pub fn new(strip: Arc<MathStrip>, eval_indexes: Vec<i8>) -> Self {
        Self {
            strip,
            eval_indexes,
            last_stop: 0,
            stop: 0,
        }
    }

    /// Draw a new stop. Each stop is picked with probability
    /// `weight / total_weight`, which is uniform when all weights are 1.
    pub fn generate_stop<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.last_stop = self.stop;

        let awarded = rng.random_range(0..self.strip.total_weight());
        let mut weight_count = 0u64;
        let mut stop = self.strip.len() - 1;
        for (i, s) in self.strip.stops().iter().enumerate() {
            weight_count += s.weight() as u64;
            if awarded < weight_count {
                stop = i;
                break;
            }
        }

        self.stop = stop;
    }

    /// Force the stop
    pub fn set_stop(&mut self, stop: usize) -> SlotResult<()> {
        if stop >= self.strip.len() {
            return Err(SlotError::InvalidConfig(format!(
                "Stop {} out of range for strip {} (len {})",
                stop,
                self.strip.id(),
                self.strip.len()
            )));
        }
        self.last_stop = self.stop;
        self.stop = stop;
        Ok(())
    }

    /// Current stop
    pub fn stop(&self) -> usize {
        self.stop
    }

    /// Stop before the most recent draw
    pub fn last_stop(&self) -> usize {
        self.last_stop
    }

    /// Wrap any index (including negative ones) onto the strip
    #[inline]
    pub fn symbol_index(&self, index: i64) -> usize {
        index.rem_euclid(self.strip.len() as i64) as usize
    }

    /// Symbol at `index`, wrapping around the strip
    #[inline]
    pub fn symbol(&self, index: i64) -> &MathSymbol {
        self.symbol_at(self.symbol_index(index))
    }

    /// Symbol at an already wrapped index
    #[inline]
    pub(crate) fn symbol_at(&self, index: usize) -> &MathSymbol {
        self.strip.stops()[index].symbol()
    }

    /// Visible offsets relative to the stop
    pub fn eval_indexes(&self) -> &[i8] {
        &self.eval_indexes
    }

    /// The underlying strip data
    pub fn strip(&self) -> &MathStrip {
        &self.strip
    }

    /// Strip length
    pub fn len(&self) -> usize {
        self.strip.len()
    }

    /// Always false for a constructed strip
    pub fn is_empty(&self) -> bool {
        self.strip.is_empty()
    }
}
