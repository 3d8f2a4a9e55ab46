//! Math symbols and symbol sets

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A symbol as the math sees it
///
/// A symbol matches a paytable symbol name when the ids are equal, or when it
/// is a wild that substitutes for that name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MathSymbol {
    /// Symbol ID (e.g., "CHERRY", "BAR", "WILD")
    id: String,
    /// Symbol names this wild substitutes for (empty for regular symbols)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    wild_matches: Vec<String>,
}

impl MathSymbol {
    /// Create a regular symbol
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            wild_matches: Vec::new(),
        }
    }

    /// Create a wild symbol that substitutes for the given symbol names
    pub fn wild(id: impl Into<String>, matches: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            id: id.into(),
            wild_matches: matches.into_iter().map(Into::into).collect(),
        }
    }

    /// Get the symbol ID
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Names this symbol substitutes for
    pub fn wild_matches(&self) -> &[String] {
        &self.wild_matches
    }

    /// Is this a wild symbol?
    pub fn is_wild(&self) -> bool {
        !self.wild_matches.is_empty()
    }

    /// Is this symbol wild for the given name?
    pub fn is_wild_for(&self, symbol_id: &str) -> bool {
        self.wild_matches.iter().any(|m| m == symbol_id)
    }

    /// Does this symbol count as `symbol_id` for evaluation?
    #[inline]
    pub fn is_match(&self, symbol_id: &str) -> bool {
        self.id == symbol_id || self.is_wild_for(symbol_id)
    }
}

impl PartialEq<str> for MathSymbol {
    fn eq(&self, other: &str) -> bool {
        self.id == other
    }
}

impl std::fmt::Display for MathSymbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id)
    }
}

/// A named set of symbols that strips draw from
#[derive(Debug, Clone, Default)]
pub struct SymbolSet {
    id: String,
    symbols: BTreeMap<String, MathSymbol>,
}

impl SymbolSet {
    /// Create an empty symbol set
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            symbols: BTreeMap::new(),
        }
    }

    /// Symbol set ID
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Add a symbol. Returns `false` if a symbol with that ID already exists.
    pub fn insert(&mut self, symbol: MathSymbol) -> bool {
        if self.symbols.contains_key(symbol.id()) {
            return false;
        }
        self.symbols.insert(symbol.id().to_string(), symbol);
        true
    }

    /// Get symbol by ID
    pub fn get(&self, id: &str) -> Option<&MathSymbol> {
        self.symbols.get(id)
    }

    /// Check if a symbol exists
    pub fn contains(&self, id: &str) -> bool {
        self.symbols.contains_key(id)
    }

    /// Number of symbols
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Iterate symbols in ID order
    pub fn iter(&self) -> impl Iterator<Item = &MathSymbol> {
        self.symbols.values()
    }

    /// All wild symbols in the set
    pub fn wilds(&self) -> impl Iterator<Item = &MathSymbol> {
        self.symbols.values().filter(|s| s.is_wild())
    }
}
