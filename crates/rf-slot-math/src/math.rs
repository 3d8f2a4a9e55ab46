//! SlotMath: one loaded math document

use std::collections::HashMap;
use std::sync::Arc;

use rand::Rng;

use crate::error::{SlotError, SlotResult};
use crate::paytable::{PayCombo, Paytable};
use crate::strip::{MathStrip, StripSetEntry};
use crate::symbols::SymbolSet;

/// Weighted lookup table (e.g., bonus multipliers, free spin counts)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeightedTable {
    total_weight: u64,
    weights: Vec<u32>,
    values: Vec<i32>,
}

impl WeightedTable {
    /// Create from parallel weight and value vectors
    pub fn new(weights: Vec<u32>, values: Vec<i32>) -> SlotResult<Self> {
        if weights.len() != values.len() {
            return Err(SlotError::InvalidConfig(format!(
                "Weighted table has {} weights but {} values",
                weights.len(),
                values.len()
            )));
        }

        let total_weight = weights
            .iter()
            .try_fold(0u64, |acc, &w| acc.checked_add(u64::from(w)))
            .ok_or_else(|| SlotError::InvalidConfig("Weighted table total weight overflows".into()))?;
        if total_weight == 0 {
            return Err(SlotError::InvalidConfig("Weighted table has zero total weight".into()));
        }

        Ok(Self {
            total_weight,
            weights,
            values,
        })
    }

    /// Value for a draw in `1..=total_weight`: the first entry whose
    /// cumulative weight reaches the draw
    pub fn weighted_value(&self, rng_value: u64) -> Option<i32> {
        let mut weight_count = 0u64;
        let index = self
            .weights
            .iter()
            .position(|w| {
                weight_count += u64::from(*w);
                rng_value <= weight_count
            })?;
        self.values.get(index).copied()
    }

    /// Draw a value with probability proportional to its weight
    pub fn random_value<R: Rng + ?Sized>(&self, rng: &mut R) -> i32 {
        let draw = rng.random_range(1..=self.total_weight);
        // Every draw in range lands on an entry
        self.weighted_value(draw).unwrap_or_default()
    }

    pub fn total_weight(&self) -> u64 {
        self.total_weight
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Plain indexed value table
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValueTable {
    values: Vec<i32>,
}

impl ValueTable {
    pub fn new(values: Vec<i32>) -> Self {
        Self { values }
    }

    pub fn value(&self, index: usize) -> Option<i32> {
        self.values.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// All math data for one game: symbols, strips, strip sets, pay combos,
/// paytable sets and auxiliary tables
///
/// Built once by [`MathParser`](crate::parser::MathParser) and read-only
/// afterwards. Lookups name the group so configuration errors point at the
/// offending document.
#[derive(Debug, Clone, Default)]
pub struct SlotMath {
    pub(crate) id: String,
    pub(crate) group: String,
    pub(crate) payline_set_id: String,
    pub(crate) percentage: f64,
    pub(crate) symbol_sets: HashMap<String, SymbolSet>,
    pub(crate) strips: HashMap<String, Arc<MathStrip>>,
    pub(crate) strip_sets: HashMap<String, Vec<StripSetEntry>>,
    pub(crate) combo_sets: HashMap<String, Vec<PayCombo>>,
    pub(crate) paytable_sets: HashMap<String, Vec<Paytable>>,
    pub(crate) weighted_tables: HashMap<String, WeightedTable>,
    pub(crate) value_tables: HashMap<String, ValueTable>,
}

impl SlotMath {
    /// Math ID
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Group this math was loaded into
    pub fn group(&self) -> &str {
        &self.group
    }

    /// ID of the payline set this math is designed for
    pub fn payline_set_id(&self) -> &str {
        &self.payline_set_id
    }

    /// Theoretical return percentage declared by the document
    pub fn percentage(&self) -> f64 {
        self.percentage
    }

    pub fn symbol_set(&self, id: &str) -> SlotResult<&SymbolSet> {
        self.symbol_sets
            .get(id)
            .ok_or_else(|| SlotError::not_found("Math symbol set", id, &self.group))
    }

    pub fn strip(&self, id: &str) -> SlotResult<&Arc<MathStrip>> {
        self.strips
            .get(id)
            .ok_or_else(|| SlotError::not_found("Math strip", id, &self.group))
    }

    pub fn strip_set(&self, id: &str) -> SlotResult<&[StripSetEntry]> {
        self.strip_sets
            .get(id)
            .map(Vec::as_slice)
            .ok_or_else(|| SlotError::not_found("Strip set", id, &self.group))
    }

    pub fn combo_set(&self, id: &str) -> SlotResult<&[PayCombo]> {
        self.combo_sets
            .get(id)
            .map(Vec::as_slice)
            .ok_or_else(|| SlotError::not_found("Pay combo set", id, &self.group))
    }

    pub fn paytable_set(&self, id: &str) -> SlotResult<&[Paytable]> {
        self.paytable_sets
            .get(id)
            .map(Vec::as_slice)
            .ok_or_else(|| SlotError::not_found("Paytable set", id, &self.group))
    }

    pub fn weighted_table(&self, id: &str) -> SlotResult<&WeightedTable> {
        self.weighted_tables
            .get(id)
            .ok_or_else(|| SlotError::not_found("Weighted table", id, &self.group))
    }

    pub fn value_table(&self, id: &str) -> SlotResult<&ValueTable> {
        self.value_tables
            .get(id)
            .ok_or_else(|| SlotError::not_found("Value table", id, &self.group))
    }
}
