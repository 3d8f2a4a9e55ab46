//! Slot Math Manager: registry of loaded math groups and payline sets

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use crate::error::{SlotError, SlotResult};
use crate::math::SlotMath;
use crate::model::SlotGroupModel;
use crate::parser::{DocFormat, MathParser};
use crate::paytable::PaylineSet;

const PAYLINE_GROUP: &str = "paylines";

/// Registry of loaded math data
///
/// Math is loaded per group (e.g. "base_game", "free_spins") so a group can be
/// freed as a unit. Everything handed out is an `Arc`, so models on other
/// threads keep their data alive after a group is freed.
///
/// ## Usage
///
/// ```rust,ignore
/// let mut manager = SlotMathManager::new();
/// manager.load_payline_sets("data/paylines.json")?;
/// manager.load_group("base_game", &["data/classic.json"])?;
///
/// let model = manager.create_group_model("base_game", "classic", "main", "base")?;
/// ```
#[derive(Default)]
pub struct SlotMathManager {
    parser: MathParser,
    /// group → math ID → math
    groups: HashMap<String, HashMap<String, Arc<SlotMath>>>,
    payline_sets: HashMap<String, Arc<PaylineSet>>,
}

impl SlotMathManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Manager with a custom parser (e.g. different limits)
    pub fn with_parser(parser: MathParser) -> Self {
        Self {
            parser,
            ..Default::default()
        }
    }

    /// Load math documents into a new group. Nothing is registered if any
    /// document fails.
    pub fn load_group<P: AsRef<Path>>(&mut self, group: &str, paths: &[P]) -> SlotResult<()> {
        let maths = paths
            .iter()
            .map(|p| self.parser.parse_file(p, group))
            .collect::<SlotResult<Vec<_>>>()?;
        self.register_group(group, maths)
    }

    /// Load one in-memory math document into a new group
    pub fn load_group_from_str(&mut self, group: &str, text: &str, format: DocFormat) -> SlotResult<()> {
        let math = self.parser.parse_str(text, format, group)?;
        self.register_group(group, vec![math])
    }

    fn register_group(&mut self, group: &str, maths: Vec<SlotMath>) -> SlotResult<()> {
        if self.groups.contains_key(group) {
            return Err(SlotError::duplicate("Math group", group, group));
        }

        let mut loaded = HashMap::with_capacity(maths.len());
        for math in maths {
            let id = math.id().to_string();
            if loaded.contains_key(&id) {
                return Err(SlotError::duplicate("Slot math", &id, group));
            }
            loaded.insert(id, Arc::new(math));
        }

        log::info!("Loaded math group {} ({} documents)", group, loaded.len());
        self.groups.insert(group.to_string(), loaded);
        Ok(())
    }

    pub fn has_group(&self, group: &str) -> bool {
        self.groups.contains_key(group)
    }

    /// Get math by group and ID
    pub fn get_slot_math(&self, group: &str, id: &str) -> SlotResult<Arc<SlotMath>> {
        self.groups
            .get(group)
            .and_then(|maths| maths.get(id))
            .cloned()
            .ok_or_else(|| SlotError::not_found("Slot math", id, group))
    }

    /// Load payline sets from a file
    pub fn load_payline_sets(&mut self, path: impl AsRef<Path>) -> SlotResult<()> {
        let sets = self.parser.parse_payline_file(path)?;
        self.register_payline_sets(sets)
    }

    /// Load payline sets from an in-memory document
    pub fn load_payline_sets_from_str(&mut self, text: &str, format: DocFormat) -> SlotResult<()> {
        let sets = self.parser.parse_paylines(text, format)?;
        self.register_payline_sets(sets)
    }

    fn register_payline_sets(&mut self, sets: Vec<PaylineSet>) -> SlotResult<()> {
        for (i, set) in sets.iter().enumerate() {
            let repeated = sets[..i].iter().any(|s| s.id() == set.id());
            if repeated || self.payline_sets.contains_key(set.id()) {
                return Err(SlotError::duplicate("Payline set", set.id(), PAYLINE_GROUP));
            }
        }

        log::info!("Loaded {} payline sets", sets.len());
        for set in sets {
            self.payline_sets.insert(set.id().to_string(), Arc::new(set));
        }
        Ok(())
    }

    pub fn get_payline_set(&self, id: &str) -> SlotResult<Arc<PaylineSet>> {
        self.payline_sets
            .get(id)
            .cloned()
            .ok_or_else(|| SlotError::not_found("Payline set", id, PAYLINE_GROUP))
    }

    /// Create a group model on the math's own payline set
    pub fn create_group_model(
        &self,
        group: &str,
        math_id: &str,
        strip_set_id: &str,
        paytable_set_id: &str,
    ) -> SlotResult<SlotGroupModel> {
        let math = self.get_slot_math(group, math_id)?;
        let paylines = self.get_payline_set(math.payline_set_id())?;
        SlotGroupModel::create(math, paylines, strip_set_id, paytable_set_id)
    }

    /// Same as [`create_group_model`](Self::create_group_model) with an explicit seed
    pub fn create_group_model_seeded(
        &self,
        group: &str,
        math_id: &str,
        strip_set_id: &str,
        paytable_set_id: &str,
        seed: u64,
    ) -> SlotResult<SlotGroupModel> {
        let math = self.get_slot_math(group, math_id)?;
        let paylines = self.get_payline_set(math.payline_set_id())?;
        SlotGroupModel::create_seeded(math, paylines, strip_set_id, paytable_set_id, seed)
    }

    /// Drop a group. Returns `false` if it was not loaded.
    pub fn free_group(&mut self, group: &str) -> bool {
        let freed = self.groups.remove(group).is_some();
        if freed {
            log::info!("Freed math group {}", group);
        }
        freed
    }

    pub fn free_payline_sets(&mut self) {
        self.payline_sets.clear();
    }

    /// Drop everything
    pub fn clear(&mut self) {
        self.groups.clear();
        self.payline_sets.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn math_doc(id: &str) -> String {
        json!({
            "id": id,
            "payline_set_id": "lines1",
            "symbol_sets": [{ "id": "base", "symbols": ["A", "B"] }],
            "strips": [{ "id": "r", "symbol_set": "base", "stops": ["A", "B", "A"] }],
            "strip_sets": [{ "id": "main", "strips": [
                { "strip": "r", "eval": [0] },
                { "strip": "r", "eval": [0] }
            ]}],
            "combo_sets": [{ "id": "c", "combos": [{ "symbol": "A", "count": 2, "award": 4 }] }],
            "paytable_sets": [{ "id": "pt", "paytables": [{ "kind": "payline", "combo_set": "c" }] }]
        })
        .to_string()
    }

    fn paylines_doc() -> String {
        json!({ "payline_sets": [{ "id": "lines1", "lines": [[0, 0]] }] }).to_string()
    }

    #[test]
    fn test_load_and_create() {
        let mut manager = SlotMathManager::new();
        manager.load_payline_sets_from_str(&paylines_doc(), DocFormat::Json).unwrap();
        manager.load_group_from_str("base", &math_doc("m1"), DocFormat::Json).unwrap();

        assert!(manager.has_group("base"));
        assert_eq!(manager.get_slot_math("base", "m1").unwrap().id(), "m1");

        let model = manager.create_group_model_seeded("base", "m1", "main", "pt", 5).unwrap();
        assert_eq!(model.count(), 2);
    }

    #[test]
    fn test_group_loaded_twice() {
        let mut manager = SlotMathManager::new();
        manager.load_group_from_str("base", &math_doc("m1"), DocFormat::Json).unwrap();
        let err = manager.load_group_from_str("base", &math_doc("m2"), DocFormat::Json).unwrap_err();
        assert!(matches!(err, SlotError::Duplicate { kind: "Math group", .. }));
    }

    #[test]
    fn test_duplicate_payline_sets() {
        let mut manager = SlotMathManager::new();
        manager.load_payline_sets_from_str(&paylines_doc(), DocFormat::Json).unwrap();
        assert!(manager.load_payline_sets_from_str(&paylines_doc(), DocFormat::Json).is_err());

        manager.free_payline_sets();
        assert!(manager.get_payline_set("lines1").is_err());
        manager.load_payline_sets_from_str(&paylines_doc(), DocFormat::Json).unwrap();
    }

    #[test]
    fn test_missing_payline_set() {
        let mut manager = SlotMathManager::new();
        manager.load_group_from_str("base", &math_doc("m1"), DocFormat::Json).unwrap();
        let err = manager.create_group_model("base", "m1", "main", "pt").unwrap_err();
        assert!(matches!(err, SlotError::NotFound { kind: "Payline set", .. }));
    }

    #[test]
    fn test_free_group_keeps_shared_math() {
        let mut manager = SlotMathManager::new();
        manager.load_group_from_str("base", &math_doc("m1"), DocFormat::Json).unwrap();
        let math = manager.get_slot_math("base", "m1").unwrap();

        assert!(manager.free_group("base"));
        assert!(!manager.free_group("base"));
        assert!(manager.get_slot_math("base", "m1").is_err());
        assert_eq!(math.id(), "m1");

        manager.load_group_from_str("base", &math_doc("m1"), DocFormat::Json).unwrap();
        manager.clear();
        assert!(!manager.has_group("base"));
    }
}
