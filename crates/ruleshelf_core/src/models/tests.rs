//! Model trait and serde-shape tests.

use super::*;

#[test]
fn toc_rule_new_starts_unsaved_with_unassigned_serial() {
    let rule = TocRule::new("chapters", "^第.{1,9}章");
    assert_eq!(rule.id, 0);
    assert!(rule.is_unsaved());
    assert_eq!(rule.serial_number, UNASSIGNED_SERIAL);
    assert!(rule.enable);
}

#[test]
fn toc_rule_assign_fresh_id_produces_nonzero_id() {
    let mut rule = TocRule::new("chapters", "^Chapter");
    rule.assign_fresh_id();
    assert!(rule.id > 0);
    assert!(!rule.is_unsaved());
}

#[test]
fn toc_rule_fresh_ids_are_unique_within_a_millisecond() {
    let ids: Vec<i64> = (0..50)
        .map(|_| {
            let mut rule = TocRule::new("r", "p");
            rule.assign_fresh_id();
            rule.id
        })
        .collect();
    let unique: std::collections::HashSet<i64> = ids.iter().copied().collect();
    assert_eq!(unique.len(), ids.len());
}

#[test]
fn toc_rule_exchange_fields_are_camel_case() {
    let mut rule = TocRule::new("chapters", "^Chapter \\d+");
    rule.id = 42;
    rule.serial_number = 3;
    let json = serde_json::to_string(&rule).expect("serialize");
    assert!(json.contains("\"serialNumber\":3"), "json: {}", json);
    assert!(json.contains("\"enable\":true"), "json: {}", json);
    // an absent example is an explicit null, never a skipped field
    assert!(json.contains("\"example\":null"), "json: {}", json);
}

#[test]
fn toc_rule_storage_encoding_round_trips_without_example() {
    let mut rule = TocRule::new("chapters", "^Chapter \\d+");
    rule.id = 7;
    rule.serial_number = 1;

    let encoded = bincode::serialize(&rule).expect("encode");
    let decoded: TocRule = bincode::deserialize(&encoded).expect("decode");
    assert_eq!(decoded, rule);
    assert_eq!(decoded.example, None);
}

#[test]
fn dict_rule_exchange_fields_are_camel_case() {
    let rule = DictRule::new("wiktionary", "https://en.wiktionary.org/wiki/{word}");
    let json = serde_json::to_string(&rule).expect("serialize");
    assert!(json.contains("\"urlRule\""), "json: {}", json);
    assert!(json.contains("\"showRule\""), "json: {}", json);
    assert!(json.contains("\"sortNumber\""), "json: {}", json);
}

#[test]
fn dict_rule_deserialize_applies_defaults() {
    let rule: DictRule = serde_json::from_str(r#"{"name":"x","urlRule":"y"}"#).expect("parse");
    assert_eq!(rule.name, "x");
    assert_eq!(rule.url_rule, "y");
    assert!(rule.enabled);
    assert_eq!(rule.sort_number, UNASSIGNED_SERIAL);
}

#[test]
fn identity_matches_by_name_for_both_rule_types() {
    let mut a = TocRule::new("same", "p1");
    a.id = 1;
    let mut b = TocRule::new("same", "p2");
    b.id = 2;
    assert!(a.identity_matches(&b));

    let c = DictRule::new("left", "u");
    let d = DictRule::new("right", "u");
    assert!(!c.identity_matches(&d));
}

#[test]
fn content_differs_tracks_name_pattern_and_enabled() {
    let base = TocRule::new("n", "r");
    let same = base.clone();
    assert!(!base.content_differs(&same));

    let mut pattern_changed = base.clone();
    pattern_changed.rule = "other".to_string();
    assert!(base.content_differs(&pattern_changed));

    let mut disabled = base.clone();
    disabled.enable = false;
    assert!(base.content_differs(&disabled));

    let mut example_changed = base.clone();
    example_changed.example = Some("sample".to_string());
    // auxiliary metadata does not count as a content change
    assert!(!base.content_differs(&example_changed));
}

#[test]
fn dict_rule_id_is_its_name() {
    let rule = DictRule::new("youdao", "https://dict.youdao.com/result?word={word}");
    assert_eq!(rule.id(), "youdao");
    assert_eq!(rule.id_key(), "youdao");
}
