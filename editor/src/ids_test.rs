use std::collections::HashSet;

use super::*;

#[test]
fn id_has_prefix_counter_and_suffix() {
    let mut ids = IdGenerator::new();
    let id = ids.next("rect");
    let parts: Vec<&str> = id.as_str().split('_').collect();
    assert_eq!(parts.len(), 3);
    assert_eq!(parts[0], "rect");
    assert_eq!(parts[1], "001");
    assert_eq!(parts[2].len(), 4);
    assert!(parts[2].bytes().all(|b| SUFFIX_ALPHABET.contains(&b)));
}

#[test]
fn counter_is_monotonic_across_prefixes() {
    let mut ids = IdGenerator::new();
    ids.next("rect");
    ids.next("circle");
    let third = ids.next("spring");
    assert!(third.as_str().starts_with("spring_003_"));
}

#[test]
fn ids_are_unique() {
    let mut ids = IdGenerator::new();
    let set: HashSet<EntityId> = (0..500).map(|_| ids.next("circle")).collect();
    assert_eq!(set.len(), 500);
}

#[test]
fn reset_restarts_counter() {
    let mut ids = IdGenerator::new();
    ids.next("rect");
    ids.next("rect");
    ids.reset();
    assert!(ids.next("ground").as_str().starts_with("ground_001_"));
}

#[test]
fn generators_are_independent() {
    let mut a = IdGenerator::new();
    let mut b = IdGenerator::new();
    a.next("rect");
    a.next("rect");
    assert!(b.next("rect").as_str().starts_with("rect_001_"));
}

#[test]
fn display_and_serde_are_plain_strings() {
    let id = EntityId::from("weld_007_zz9a");
    assert_eq!(id.to_string(), "weld_007_zz9a");
    assert_eq!(serde_json::to_string(&id).unwrap(), "\"weld_007_zz9a\"");
}

#[test]
fn observe_skips_past_foreign_counters() {
    let mut ids = IdGenerator::new();
    ids.observe(&EntityId::from("rect_012_ab12"));
    ids.observe(&EntityId::from("circle_004_zz00"));
    ids.observe(&EntityId::from("not-an-id"));
    assert!(ids.next("rect").as_str().starts_with("rect_013_"));
}
