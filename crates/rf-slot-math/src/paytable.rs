//! Pay combos, paytables and payline sets

use serde::{Deserialize, Serialize};

/// How a paytable is evaluated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayType {
    /// Left-to-right on a payline, paid against the line bet
    Payline,
    /// Anywhere in the scatter positions, paid against the total bet
    Scatter,
}

impl std::fmt::Display for PayType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Payline => write!(f, "payline"),
            Self::Scatter => write!(f, "scatter"),
        }
    }
}

/// A winning combination: `count` of `symbol` awards `award`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayCombo {
    symbol: String,
    count: u32,
    award: u32,
    #[serde(default)]
    bonus_code: i32,
}

impl PayCombo {
    pub fn new(symbol: impl Into<String>, count: u32, award: u32) -> Self {
        Self {
            symbol: symbol.into(),
            count,
            award,
            bonus_code: 0,
        }
    }

    /// Attach a bonus code
    pub fn with_bonus_code(mut self, bonus_code: i32) -> Self {
        self.bonus_code = bonus_code;
        self
    }

    /// Paytable symbol name
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Number of symbols involved in this pay
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Base award (multiplied by the bet at pay time)
    pub fn award(&self) -> u32 {
        self.award
    }

    pub fn bonus_code(&self) -> i32 {
        self.bonus_code
    }
}

/// One entry of a paytable set: a combo set plus how to evaluate it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paytable {
    kind: PayType,
    combo_set: String,
}

impl Paytable {
    pub fn new(kind: PayType, combo_set: impl Into<String>) -> Self {
        Self {
            kind,
            combo_set: combo_set.into(),
        }
    }

    pub fn kind(&self) -> PayType {
        self.kind
    }

    /// ID of the combo set evaluated by this paytable
    pub fn combo_set(&self) -> &str {
        &self.combo_set
    }
}

/// Payline layouts and scatter-eligible positions
///
/// `lines[payline][strip]` is an index into that strip's evaluation window.
/// `scatter[strip]` lists the evaluation-window indexes that may count
/// towards scatter pays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaylineSet {
    id: String,
    lines: Vec<Vec<u8>>,
    #[serde(default)]
    scatter: Vec<Vec<u8>>,
}

impl PaylineSet {
    pub fn new(id: impl Into<String>, lines: Vec<Vec<u8>>, scatter: Vec<Vec<u8>>) -> Self {
        Self {
            id: id.into(),
            lines,
            scatter,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Per-payline, per-strip window indexes
    pub fn line_data(&self) -> &[Vec<u8>] {
        &self.lines
    }

    /// Number of paylines
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Per-strip scatter masks
    pub fn scatter_data(&self) -> &[Vec<u8>] {
        &self.scatter
    }

    /// Is window index `index` on `strip` allowed for scatter evaluation?
    pub fn is_scatter_position(&self, strip: usize, index: usize) -> bool {
        self.scatter
            .get(strip)
            .is_some_and(|mask| mask.iter().any(|&i| i as usize == index))
    }

    /// Standard 20 paylines for a 5×3 window, every position scatter-eligible
    pub fn standard_5x3(id: impl Into<String>) -> Self {
        let lines = vec![
            // Straight lines
            vec![1, 1, 1, 1, 1],
            vec![0, 0, 0, 0, 0],
            vec![2, 2, 2, 2, 2],
            // V shapes
            vec![0, 1, 2, 1, 0],
            vec![2, 1, 0, 1, 2],
            // Zigzag
            vec![0, 0, 1, 2, 2],
            vec![2, 2, 1, 0, 0],
            vec![1, 0, 0, 0, 1],
            vec![1, 2, 2, 2, 1],
            // W shapes
            vec![0, 1, 0, 1, 0],
            vec![2, 1, 2, 1, 2],
            vec![0, 1, 1, 1, 0],
            vec![2, 1, 1, 1, 2],
            // Steps
            vec![1, 1, 0, 1, 1],
            vec![1, 1, 2, 1, 1],
            vec![0, 2, 0, 2, 0],
            vec![2, 0, 2, 0, 2],
            vec![1, 0, 1, 0, 1],
            vec![1, 2, 1, 2, 1],
            vec![0, 0, 2, 0, 0],
        ];

        Self::new(id, lines, vec![vec![0, 1, 2]; 5])
    }
}
