//! Loading Test Suite
//!
//! Math and payline documents through the manager:
//! - JSON and YAML files
//! - Group lifecycle
//! - Configuration errors surface at load or create time

use std::path::PathBuf;

use rf_slot_math::{DocFormat, FixedBet, PlayResult, SlotError, SlotMathManager};
use serde_json::json;
use tempfile::TempDir;

// ═══════════════════════════════════════════════════════════════════════════════
// TEST FIXTURES
// ═══════════════════════════════════════════════════════════════════════════════

const MATH_YAML: &str = r#"
id: wheel
payline_set_id: wheel_lines
percentage: 92.0
symbol_sets:
  - id: wheel_symbols
    symbols: [GOLD, SILVER, BLANK]
strips:
  - id: wheel
    symbol_set: wheel_symbols
    stops:
      - GOLD
      - { symbol: SILVER, weight: 3 }
      - { symbol: BLANK, weight: 6 }
strip_sets:
  - id: wheel_set
    strips:
      - { strip: wheel, eval: [-1, 0, 1] }
combo_sets:
  - id: wheel_pays
    combos:
      - { symbol: GOLD, count: 1, award: 100, bonus_code: 7 }
      - { symbol: SILVER, count: 1, award: 10 }
paytable_sets:
  - id: wheel_table
    paytables:
      - { kind: payline, combo_set: wheel_pays }
"#;

const PAYLINES_YAML: &str = r#"
payline_sets:
  - id: wheel_lines
    lines:
      - [1]
"#;

fn reel_math(id: &str) -> String {
    json!({
        "id": id,
        "payline_set_id": "three",
        "symbol_sets": [{ "id": "base", "symbols": ["SEVEN", "BAR", "BLANK"] }],
        "strips": [{ "id": "reel", "symbol_set": "base", "stops": ["SEVEN", "BAR", "BLANK", "BAR"] }],
        "strip_sets": [{ "id": "reels", "strips": [
            { "strip": "reel", "eval": [0, 1, 2] },
            { "strip": "reel", "eval": [0, 1, 2] },
            { "strip": "reel", "eval": [0, 1, 2] }
        ]}],
        "combo_sets": [{ "id": "lines", "combos": [{ "symbol": "BAR", "count": 3, "award": 25 }] }],
        "paytable_sets": [{ "id": "base", "paytables": [{ "kind": "payline", "combo_set": "lines" }] }]
    })
    .to_string()
}

fn three_lines() -> String {
    json!({ "payline_sets": [{ "id": "three", "lines": [[0, 0, 0], [1, 1, 1], [2, 2, 2]] }] }).to_string()
}

fn temp_file(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

// ═══════════════════════════════════════════════════════════════════════════════
// FILE LOADING
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_yaml_wheel_round() {
    let dir = tempfile::tempdir().unwrap();
    let math_path = temp_file(&dir, "wheel.yaml", MATH_YAML);
    let lines_path = temp_file(&dir, "wheel_lines.yml", PAYLINES_YAML);

    let mut manager = SlotMathManager::new();
    manager.load_payline_sets(&lines_path).unwrap();
    manager.load_group("wheel_game", &[&math_path]).unwrap();

    let math = manager.get_slot_math("wheel_game", "wheel").unwrap();
    assert_eq!(math.strip("wheel").unwrap().total_weight(), 10);

    let mut model = manager
        .create_group_model_seeded("wheel_game", "wheel", "wheel_set", "wheel_table", 3)
        .unwrap();
    let bet = FixedBet {
        line_bet: 2,
        total_lines: 1,
    };

    // Pointer sits at window index 1, i.e. the stop itself
    model.set_stops(&[0]).unwrap();
    let mut result = PlayResult::new();
    model.evaluate(&mut result, &bet).unwrap();
    assert_eq!(result.pay_count(), 1);
    assert_eq!(result.pay(0).unwrap().bonus_code(), 7);
    assert_eq!(result.total_win(), 200);

    model.set_stops(&[2]).unwrap();
    let mut result = PlayResult::new();
    model.evaluate(&mut result, &bet).unwrap();
    assert!(!result.is_win());
    assert_eq!(model.eval_symbol(0, 0).unwrap().id(), "SILVER");
}

#[test]
fn test_group_from_several_files() {
    let dir = tempfile::tempdir().unwrap();
    let a = temp_file(&dir, "math_a.json", &reel_math("a"));
    let b = temp_file(&dir, "math_b.json", &reel_math("b"));

    let mut manager = SlotMathManager::new();
    manager.load_group("base_game", &[&a, &b]).unwrap();
    assert!(manager.get_slot_math("base_game", "a").is_ok());
    assert!(manager.get_slot_math("base_game", "b").is_ok());

    let err = manager.load_group("free_game", &[&a, &a]).unwrap_err();
    assert!(matches!(err, SlotError::Duplicate { kind: "Slot math", .. }));
    assert!(!manager.has_group("free_game"));
}

#[test]
fn test_missing_file() {
    let mut manager = SlotMathManager::new();
    let err = manager
        .load_group("g", &[tempfile::tempdir().unwrap().path().join("no-such-math.json")])
        .unwrap_err();
    assert!(matches!(err, SlotError::Io(_)));
}

#[test]
fn test_unknown_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = temp_file(&dir, "math.xml", "<math/>");
    let mut manager = SlotMathManager::new();
    assert!(matches!(manager.load_group("g", &[path]), Err(SlotError::Parse(_))));
}

// ═══════════════════════════════════════════════════════════════════════════════
// GROUP LIFECYCLE & ERRORS
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_model_outlives_freed_group() {
    let mut manager = SlotMathManager::new();
    manager.load_payline_sets_from_str(&three_lines(), DocFormat::Json).unwrap();
    manager.load_group_from_str("base_game", &reel_math("classic"), DocFormat::Json).unwrap();

    let mut model = manager
        .create_group_model_seeded("base_game", "classic", "reels", "base", 11)
        .unwrap();
    manager.clear();

    // BAR BLANK BAR on every reel: lines 0 and 2 show BAR
    model.set_stops(&[1, 1, 1]).unwrap();
    let mut result = PlayResult::new();
    model
        .evaluate(
            &mut result,
            &FixedBet {
                line_bet: 1,
                total_lines: 3,
            },
        )
        .unwrap();
    assert_eq!(result.pay_count(), 2);
    let lines: Vec<_> = result.pays().iter().filter_map(|p| p.payline()).collect();
    assert_eq!(lines, [0, 2]);
}

#[test]
fn test_create_errors_name_the_missing_piece() {
    let mut manager = SlotMathManager::new();
    manager.load_payline_sets_from_str(&three_lines(), DocFormat::Json).unwrap();
    manager.load_group_from_str("base_game", &reel_math("classic"), DocFormat::Json).unwrap();

    let err = manager
        .create_group_model("base_game", "classic", "nope", "base")
        .unwrap_err();
    assert_eq!(err.to_string(), "Strip set not found (nope - base_game)");

    let err = manager
        .create_group_model("base_game", "missing", "reels", "base")
        .unwrap_err();
    assert!(matches!(err, SlotError::NotFound { kind: "Slot math", .. }));

    let err = manager
        .create_group_model("other", "classic", "reels", "base")
        .unwrap_err();
    assert!(err.is_config_error());
}

#[test]
fn test_evaluate_without_stops_is_an_error() {
    let mut manager = SlotMathManager::new();
    manager.load_payline_sets_from_str(&three_lines(), DocFormat::Json).unwrap();
    manager.load_group_from_str("base_game", &reel_math("classic"), DocFormat::Json).unwrap();
    let mut model = manager.create_group_model("base_game", "classic", "reels", "base").unwrap();

    let bet = FixedBet {
        line_bet: 1,
        total_lines: 3,
    };
    let mut result = PlayResult::new();
    assert!(matches!(model.evaluate(&mut result, &bet), Err(SlotError::StopsNotGenerated)));

    model.generate_stops();
    assert!(model.evaluate(&mut result, &bet).is_ok());
}
