//! Serde shapes of math and payline documents

use serde::{Deserialize, Serialize};

use crate::paytable::{PayCombo, PaylineSet, Paytable};

/// Top-level math document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MathDocument {
    /// Math ID, unique within a group
    pub id: String,
    /// Payline set this math is designed for
    #[serde(default)]
    pub payline_set_id: String,
    /// Declared theoretical return (informational)
    #[serde(default)]
    pub percentage: f64,
    #[serde(default)]
    pub symbol_sets: Vec<SymbolSetDoc>,
    #[serde(default)]
    pub strips: Vec<StripDoc>,
    #[serde(default)]
    pub strip_sets: Vec<StripSetDoc>,
    #[serde(default)]
    pub combo_sets: Vec<ComboSetDoc>,
    #[serde(default)]
    pub paytable_sets: Vec<PaytableSetDoc>,
    #[serde(default)]
    pub weighted_tables: Vec<WeightedTableDoc>,
    #[serde(default)]
    pub value_tables: Vec<ValueTableDoc>,
}

/// Symbol set with optional wild defines
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymbolSetDoc {
    pub id: String,
    pub symbols: Vec<String>,
    #[serde(default)]
    pub wilds: Vec<WildDoc>,
}

/// Marks a symbol of the set as wild for the listed names
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WildDoc {
    pub id: String,
    pub matches: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StripDoc {
    pub id: String,
    pub symbol_set: String,
    pub stops: Vec<StopDoc>,
}

/// A strip stop: either a bare symbol ID or a symbol with a weight
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StopDoc {
    Symbol(String),
    Weighted {
        symbol: String,
        #[serde(default = "default_weight")]
        weight: u32,
    },
}

fn default_weight() -> u32 {
    1
}

impl StopDoc {
    pub fn symbol(&self) -> &str {
        match self {
            Self::Symbol(symbol) | Self::Weighted { symbol, .. } => symbol,
        }
    }

    pub fn weight(&self) -> u32 {
        match self {
            Self::Symbol(_) => 1,
            Self::Weighted { weight, .. } => *weight,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StripSetDoc {
    pub id: String,
    pub strips: Vec<StripSetStripDoc>,
}

/// Strip reference inside a strip set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StripSetStripDoc {
    pub strip: String,
    /// Visible offsets relative to the stop
    pub eval: Vec<i8>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComboSetDoc {
    pub id: String,
    /// Definition order is evaluation order
    pub combos: Vec<PayCombo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaytableSetDoc {
    pub id: String,
    pub paytables: Vec<Paytable>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeightedTableDoc {
    pub id: String,
    pub entries: Vec<WeightedEntryDoc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WeightedEntryDoc {
    pub weight: u32,
    pub value: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValueTableDoc {
    pub id: String,
    pub values: Vec<i32>,
}

/// Payline document: a list of payline sets
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaylineDocument {
    pub payline_sets: Vec<PaylineSet>,
}
