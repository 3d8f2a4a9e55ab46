//! Math Parser: Parse math and payline documents into SlotMath / PaylineSet
//!
//! Math data is authored as JSON or YAML. Every cross-reference (strip to
//! symbol set, strip set to strip, paytable to combo set) is resolved here so
//! that configuration errors surface at load time and never mid-spin.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let parser = MathParser::new();
//! let math = parser.parse_file("data/classic.json", "base_game")?;
//! let paylines = parser.parse_payline_file("data/paylines.json")?;
//! ```

mod document;

pub use document::*;

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::path::Path;
use std::sync::Arc;

use crate::error::{SlotError, SlotResult};
use crate::math::{SlotMath, ValueTable, WeightedTable};
use crate::paytable::PaylineSet;
use crate::strip::{MathStrip, StripSetEntry, StripStop};
use crate::symbols::{MathSymbol, SymbolSet};

/// Document encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocFormat {
    Json,
    Yaml,
}

impl DocFormat {
    /// Pick the format from a file extension
    pub fn from_path(path: &Path) -> SlotResult<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(Self::Json),
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => Ok(Self::Yaml),
            _ => Err(SlotError::Parse(format!(
                "Unknown document format: {}",
                path.display()
            ))),
        }
    }
}

/// Math document parser
pub struct MathParser {
    /// Validation limits
    pub limits: MathLimits,
}

/// Parsing limits for untrusted documents
#[derive(Debug, Clone)]
pub struct MathLimits {
    pub max_id_length: usize,
    pub max_symbols: usize,
    pub max_strips: usize,
    pub max_strip_length: usize,
    pub max_eval_indexes: usize,
    pub max_combos: usize,
    pub max_paylines: usize,
}

impl Default for MathLimits {
    fn default() -> Self {
        Self {
            max_id_length: 256,
            max_symbols: 256,
            max_strips: 64,
            max_strip_length: 10_000,
            max_eval_indexes: 32,
            max_combos: 1_024,
            max_paylines: 1_024,
        }
    }
}

impl MathParser {
    /// Create a new parser
    pub fn new() -> Self {
        Self {
            limits: MathLimits::default(),
        }
    }

    /// Create parser with custom limits
    pub fn with_limits(limits: MathLimits) -> Self {
        Self { limits }
    }

    /// Parse a JSON math document into `group`
    pub fn parse_json(&self, json: &str, group: &str) -> SlotResult<SlotMath> {
        self.parse_str(json, DocFormat::Json, group)
    }

    /// Parse a YAML math document into `group`
    pub fn parse_yaml(&self, yaml: &str, group: &str) -> SlotResult<SlotMath> {
        self.parse_str(yaml, DocFormat::Yaml, group)
    }

    /// Parse a math document in the given format
    pub fn parse_str(&self, text: &str, format: DocFormat, group: &str) -> SlotResult<SlotMath> {
        let doc: MathDocument = decode(text, format)?;
        self.validate(&doc)?;
        self.to_slot_math(doc, group)
    }

    /// Read and parse a math document, format taken from the extension
    pub fn parse_file(&self, path: impl AsRef<Path>, group: &str) -> SlotResult<SlotMath> {
        let path = path.as_ref();
        let format = DocFormat::from_path(path)?;
        let text = std::fs::read_to_string(path)?;
        self.parse_str(&text, format, group)
    }

    /// Parse a payline document
    pub fn parse_paylines(&self, text: &str, format: DocFormat) -> SlotResult<Vec<PaylineSet>> {
        let doc: PaylineDocument = decode(text, format)?;
        for set in &doc.payline_sets {
            self.validate_payline_set(set)?;
        }
        Ok(doc.payline_sets)
    }

    /// Read and parse a payline document
    pub fn parse_payline_file(&self, path: impl AsRef<Path>) -> SlotResult<Vec<PaylineSet>> {
        let path = path.as_ref();
        let format = DocFormat::from_path(path)?;
        let text = std::fs::read_to_string(path)?;
        self.parse_paylines(&text, format)
    }

    /// Check document sizes against the limits
    pub fn validate(&self, doc: &MathDocument) -> SlotResult<()> {
        self.check_id(&doc.id)?;

        for set in &doc.symbol_sets {
            self.check_id(&set.id)?;
            if set.symbols.len() > self.limits.max_symbols {
                return Err(SlotError::InvalidConfig(format!(
                    "Too many symbols in {}: {} > {}",
                    set.id,
                    set.symbols.len(),
                    self.limits.max_symbols
                )));
            }
        }

        for strip in &doc.strips {
            self.check_id(&strip.id)?;
            if strip.stops.len() > self.limits.max_strip_length {
                return Err(SlotError::InvalidConfig(format!(
                    "Strip too long: {} has {} stops > {}",
                    strip.id,
                    strip.stops.len(),
                    self.limits.max_strip_length
                )));
            }
        }

        for set in &doc.strip_sets {
            self.check_id(&set.id)?;
            if set.strips.len() > self.limits.max_strips {
                return Err(SlotError::InvalidConfig(format!(
                    "Too many strips in {}: {} > {}",
                    set.id,
                    set.strips.len(),
                    self.limits.max_strips
                )));
            }
            if let Some(entry) = set.strips.iter().find(|s| s.eval.len() > self.limits.max_eval_indexes) {
                return Err(SlotError::InvalidConfig(format!(
                    "Too many eval indexes for {} in {}: {} > {}",
                    entry.strip,
                    set.id,
                    entry.eval.len(),
                    self.limits.max_eval_indexes
                )));
            }
        }

        for set in &doc.combo_sets {
            self.check_id(&set.id)?;
            if set.combos.len() > self.limits.max_combos {
                return Err(SlotError::InvalidConfig(format!(
                    "Too many combos in {}: {} > {}",
                    set.id,
                    set.combos.len(),
                    self.limits.max_combos
                )));
            }
        }

        Ok(())
    }

    fn validate_payline_set(&self, set: &PaylineSet) -> SlotResult<()> {
        self.check_id(set.id())?;

        if set.line_count() > self.limits.max_paylines {
            return Err(SlotError::InvalidConfig(format!(
                "Too many paylines in {}: {} > {}",
                set.id(),
                set.line_count(),
                self.limits.max_paylines
            )));
        }

        let too_wide = set
            .line_data()
            .iter()
            .chain(set.scatter_data())
            .any(|row| row.len() > self.limits.max_strips);
        if too_wide || set.scatter_data().len() > self.limits.max_strips {
            return Err(SlotError::InvalidConfig(format!(
                "Payline set {} spans more than {} strips",
                set.id(),
                self.limits.max_strips
            )));
        }

        Ok(())
    }

    fn check_id(&self, id: &str) -> SlotResult<()> {
        if id.is_empty() {
            return Err(SlotError::InvalidConfig("Empty ID".into()));
        }
        if id.len() > self.limits.max_id_length {
            return Err(SlotError::InvalidConfig(format!(
                "ID too long: {} > {}",
                id.len(),
                self.limits.max_id_length
            )));
        }
        Ok(())
    }

    /// Resolve a document into a SlotMath
    ///
    /// Fails on duplicate IDs of any kind and on every dangling reference.
    pub fn to_slot_math(&self, doc: MathDocument, group: &str) -> SlotResult<SlotMath> {
        let mut math = SlotMath {
            id: doc.id,
            group: group.to_string(),
            payline_set_id: doc.payline_set_id,
            percentage: doc.percentage,
            ..Default::default()
        };

        for set_doc in doc.symbol_sets {
            let set = build_symbol_set(set_doc, group)?;
            let id = set.id().to_string();
            insert_unique(&mut math.symbol_sets, id, set, "Math symbol set", group)?;
        }

        for strip_doc in doc.strips {
            let symbols = math.symbol_set(&strip_doc.symbol_set)?;
            let stops = strip_doc
                .stops
                .iter()
                .map(|stop| {
                    symbols
                        .get(stop.symbol())
                        .map(|s| StripStop::weighted(s.clone(), stop.weight()))
                        .ok_or_else(|| SlotError::not_found("Math symbol", stop.symbol(), group))
                })
                .collect::<SlotResult<Vec<_>>>()?;
            let strip = MathStrip::new(strip_doc.id.clone(), stops)?;
            insert_unique(&mut math.strips, strip_doc.id, Arc::new(strip), "Math strip", group)?;
        }

        for set_doc in doc.strip_sets {
            if set_doc.strips.is_empty() {
                return Err(SlotError::InvalidConfig(format!("Strip set {} has no strips", set_doc.id)));
            }
            let mut entries = Vec::with_capacity(set_doc.strips.len());
            for entry in set_doc.strips {
                math.strip(&entry.strip)?;
                entries.push(StripSetEntry::new(entry.strip, entry.eval));
            }
            insert_unique(&mut math.strip_sets, set_doc.id, entries, "Strip set", group)?;
        }

        for set_doc in doc.combo_sets {
            if let Some(combo) = set_doc.combos.iter().find(|c| c.count() == 0) {
                return Err(SlotError::InvalidConfig(format!(
                    "Pay combo {} in {} has a count of zero",
                    combo.symbol(),
                    set_doc.id
                )));
            }
            insert_unique(&mut math.combo_sets, set_doc.id, set_doc.combos, "Pay combo set", group)?;
        }

        for set_doc in doc.paytable_sets {
            for table in &set_doc.paytables {
                math.combo_set(table.combo_set())?;
            }
            insert_unique(&mut math.paytable_sets, set_doc.id, set_doc.paytables, "Paytable set", group)?;
        }

        for table_doc in doc.weighted_tables {
            let (weights, values): (Vec<u32>, Vec<i32>) = table_doc.entries.iter().map(|e| (e.weight, e.value)).unzip();
            let table = WeightedTable::new(weights, values)?;
            insert_unique(&mut math.weighted_tables, table_doc.id, table, "Weighted table", group)?;
        }

        for table_doc in doc.value_tables {
            let table = ValueTable::new(table_doc.values);
            insert_unique(&mut math.value_tables, table_doc.id, table, "Value table", group)?;
        }

        Ok(math)
    }
}

impl Default for MathParser {
    fn default() -> Self {
        Self::new()
    }
}

fn decode<T: serde::de::DeserializeOwned>(text: &str, format: DocFormat) -> SlotResult<T> {
    match format {
        DocFormat::Json => serde_json::from_str(text).map_err(|e| SlotError::Parse(e.to_string())),
        DocFormat::Yaml => serde_yml::from_str(text).map_err(|e| SlotError::Parse(e.to_string())),
    }
}

fn insert_unique<V>(
    map: &mut HashMap<String, V>,
    id: String,
    value: V,
    kind: &'static str,
    group: &str,
) -> SlotResult<()> {
    match map.entry(id) {
        Entry::Occupied(e) => Err(SlotError::duplicate(kind, e.key(), group)),
        Entry::Vacant(e) => {
            e.insert(value);
            Ok(())
        }
    }
}

fn build_symbol_set(doc: SymbolSetDoc, group: &str) -> SlotResult<SymbolSet> {
    let mut wilds: HashMap<&str, &[String]> = HashMap::new();
    for wild in &doc.wilds {
        if !doc.symbols.contains(&wild.id) {
            return Err(SlotError::not_found("Wild symbol", &wild.id, group));
        }
        if let Some(name) = wild.matches.iter().find(|name| !doc.symbols.contains(name)) {
            return Err(SlotError::not_found("Wild match", name, group));
        }
        if wilds.insert(wild.id.as_str(), wild.matches.as_slice()).is_some() {
            return Err(SlotError::duplicate("Wild define", &wild.id, group));
        }
    }

    let mut set = SymbolSet::new(doc.id.as_str());
    for id in &doc.symbols {
        let symbol = match wilds.get(id.as_str()) {
            Some(matches) => MathSymbol::wild(id.as_str(), matches.iter().cloned()),
            None => MathSymbol::new(id.as_str()),
        };
        if !set.insert(symbol) {
            return Err(SlotError::duplicate("Math symbol", id, group));
        }
    }

    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paytable::PayType;
    use serde_json::json;

    fn classic_doc() -> serde_json::Value {
        json!({
            "id": "classic",
            "payline_set_id": "lines3",
            "percentage": 95.5,
            "symbol_sets": [{
                "id": "base",
                "symbols": ["CHERRY", "BAR", "BELL", "WILD"],
                "wilds": [{ "id": "WILD", "matches": ["CHERRY", "BAR"] }]
            }],
            "strips": [
                { "id": "r1", "symbol_set": "base", "stops": ["CHERRY", "BAR", {"symbol": "WILD", "weight": 2}] }
            ],
            "strip_sets": [
                { "id": "main", "strips": [{ "strip": "r1", "eval": [0, 1, 2] }] }
            ],
            "combo_sets": [
                { "id": "lines", "combos": [{ "symbol": "CHERRY", "count": 3, "award": 50 }] }
            ],
            "paytable_sets": [
                { "id": "base_pt", "paytables": [{ "kind": "payline", "combo_set": "lines" }] }
            ],
            "weighted_tables": [
                { "id": "mult", "entries": [{ "weight": 1, "value": 2 }, { "weight": 3, "value": 5 }] }
            ],
            "value_tables": [{ "id": "spins", "values": [5, 10, 15] }]
        })
    }

    fn parse(doc: serde_json::Value) -> SlotResult<SlotMath> {
        MathParser::new().parse_json(&doc.to_string(), "g")
    }

    #[test]
    fn test_parse_classic() {
        let math = parse(classic_doc()).unwrap();
        assert_eq!(math.id(), "classic");
        assert_eq!(math.group(), "g");
        assert_eq!(math.payline_set_id(), "lines3");

        let strip = math.strip("r1").unwrap();
        assert_eq!(strip.len(), 3);
        assert_eq!(strip.total_weight(), 4);
        assert!(strip.stops()[2].symbol().is_match("CHERRY"));

        assert_eq!(math.strip_set("main").unwrap()[0].eval_indexes(), &[0, 1, 2]);
        assert_eq!(math.paytable_set("base_pt").unwrap()[0].kind(), PayType::Payline);
        assert_eq!(math.weighted_table("mult").unwrap().weighted_value(2), Some(5));
        assert_eq!(math.value_table("spins").unwrap().value(1), Some(10));
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = r#"
id: yaml_math
symbol_sets:
  - id: base
    symbols: [A, B]
strips:
  - id: r1
    symbol_set: base
    stops: [A, B, { symbol: A, weight: 3 }]
"#;
        let math = MathParser::new().parse_yaml(yaml, "g").unwrap();
        assert_eq!(math.strip("r1").unwrap().total_weight(), 5);
    }

    #[test]
    fn test_unknown_strip_symbol() {
        let mut doc = classic_doc();
        doc["strips"][0]["stops"] = json!(["CHERRY", "PLUM"]);
        let err = parse(doc).unwrap_err();
        assert!(matches!(err, SlotError::NotFound { kind: "Math symbol", .. }));
    }

    #[test]
    fn test_duplicate_ids() {
        let mut doc = classic_doc();
        doc["symbol_sets"][0]["symbols"] = json!(["CHERRY", "CHERRY"]);
        doc["symbol_sets"][0]["wilds"] = json!([]);
        assert!(matches!(parse(doc).unwrap_err(), SlotError::Duplicate { .. }));

        let mut doc = classic_doc();
        let strip = doc["strips"][0].clone();
        doc["strips"] = json!([strip.clone(), strip]);
        assert!(matches!(parse(doc).unwrap_err(), SlotError::Duplicate { kind: "Math strip", .. }));
    }

    #[test]
    fn test_dangling_wild_define() {
        let mut doc = classic_doc();
        doc["symbol_sets"][0]["wilds"] = json!([{ "id": "JOKER", "matches": ["BAR"] }]);
        assert!(matches!(parse(doc).unwrap_err(), SlotError::NotFound { kind: "Wild symbol", .. }));
    }

    #[test]
    fn test_missing_references() {
        let mut doc = classic_doc();
        doc["strip_sets"][0]["strips"][0]["strip"] = json!("r9");
        assert!(matches!(parse(doc).unwrap_err(), SlotError::NotFound { kind: "Math strip", .. }));

        let mut doc = classic_doc();
        doc["paytable_sets"][0]["paytables"][0]["combo_set"] = json!("nope");
        assert!(matches!(parse(doc).unwrap_err(), SlotError::NotFound { kind: "Pay combo set", .. }));
    }

    #[test]
    fn test_invalid_data() {
        let mut doc = classic_doc();
        doc["strips"][0]["stops"] = json!([]);
        assert!(matches!(parse(doc).unwrap_err(), SlotError::InvalidConfig(_)));

        let mut doc = classic_doc();
        doc["combo_sets"][0]["combos"][0]["count"] = json!(0);
        assert!(matches!(parse(doc).unwrap_err(), SlotError::InvalidConfig(_)));

        let mut doc = classic_doc();
        doc["strip_sets"][0]["strips"] = json!([]);
        assert!(matches!(parse(doc).unwrap_err(), SlotError::InvalidConfig(_)));
    }

    #[test]
    fn test_validation_limits() {
        let parser = MathParser::with_limits(MathLimits {
            max_strip_length: 2,
            ..Default::default()
        });
        let result = parser.parse_json(&classic_doc().to_string(), "g");
        assert!(matches!(result, Err(SlotError::InvalidConfig(_))));
    }

    #[test]
    fn test_malformed_json() {
        let result = MathParser::new().parse_json("{ not json", "g");
        assert!(matches!(result, Err(SlotError::Parse(_))));
    }

    #[test]
    fn test_wild_match_must_name_a_symbol() {
        let mut doc = classic_doc();
        doc["symbol_sets"][0]["wilds"] = json!([{ "id": "WILD", "matches": ["CHERY"] }]);
        let err = parse(doc).unwrap_err();
        assert!(matches!(err, SlotError::NotFound { kind: "Wild match", ref id, .. } if id == "CHERY"));
    }

    #[test]
    fn test_weights_beyond_u32_load() {
        let mut doc = classic_doc();
        doc["weighted_tables"] = json!([{ "id": "big", "entries": [
            { "weight": 3_000_000_000u64, "value": 1 },
            { "weight": 3_000_000_000u64, "value": 2 }
        ]}]);
        let math = parse(doc).unwrap();
        assert_eq!(math.weighted_table("big").unwrap().total_weight(), 6_000_000_000);
    }

    #[test]
    fn test_parse_paylines() {
        let text = json!({
            "payline_sets": [
                { "id": "lines3", "lines": [[0, 0, 0], [1, 1, 1]], "scatter": [[0, 1, 2], [0, 1, 2], [0, 1, 2]] }
            ]
        })
        .to_string();
        let sets = MathParser::new().parse_paylines(&text, DocFormat::Json).unwrap();
        assert_eq!(sets.len(), 1);
        assert_eq!(sets[0].line_count(), 2);
        assert!(sets[0].is_scatter_position(2, 2));
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(DocFormat::from_path(Path::new("a.json")).unwrap(), DocFormat::Json);
        assert_eq!(DocFormat::from_path(Path::new("a.YML")).unwrap(), DocFormat::Yaml);
        assert!(DocFormat::from_path(Path::new("a.xml")).is_err());
    }
}
