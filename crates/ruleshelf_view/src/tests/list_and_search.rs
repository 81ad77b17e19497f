//! View composition, search filtering, and selection invariants.

use super::{seeded_controller, setup_db, toc, visible_names};
use crate::controller::filter_rules;
use crate::RuleListController;
use ruleshelf_core::RuleRecord;
use std::collections::HashSet;

#[test]
fn controller_starts_loading_until_first_feed_intake() {
    let (db, _temp) = setup_db();
    let mut controller = RuleListController::new(db.toc.clone());
    assert!(controller.state().interaction.loading);

    controller.refresh();
    assert!(!controller.state().interaction.loading);
}

#[test]
fn empty_search_key_yields_full_serial_sorted_view() {
    let (db, _temp) = setup_db();
    let controller = seeded_controller(&db, &["Chapter", "Volume", "Episode"]);

    assert_eq!(visible_names(&controller), vec!["Chapter", "Volume", "Episode"]);
}

#[test]
fn search_matches_name_substring_case_insensitively() {
    let (db, _temp) = setup_db();
    let mut controller = seeded_controller(&db, &["Chapter", "Volume", "chap-extra"]);

    controller.set_search_mode(true);
    controller.set_search_key("CHAP");
    assert_eq!(visible_names(&controller), vec!["Chapter", "chap-extra"]);
    assert!(controller.state().interaction.search_mode);

    // leaving search mode clears the key
    controller.set_search_mode(false);
    assert_eq!(controller.state().items.len(), 3);
    assert_eq!(controller.state().search_key, "");
}

#[test]
fn filter_rules_sorts_matches_by_ascending_serial() {
    let mut first = toc("b-rule", "p");
    first.id = 1;
    first.serial_number = 2;
    let mut second = toc("a-rule", "p");
    second.id = 2;
    second.serial_number = 1;

    let filtered = filter_rules(&[first, second], "rule");
    let serials: Vec<i64> = filtered.iter().map(|r| r.serial_number).collect();
    assert_eq!(serials, vec![1, 2]);
}

#[test]
fn selection_is_always_a_subset_of_visible_identifiers() {
    let (db, _temp) = setup_db();
    let mut controller = seeded_controller(&db, &["Chapter", "Volume"]);

    controller.select_all();
    assert_eq!(controller.state().selected_ids.len(), 2);

    // narrowing the view prunes selection entries that fell out of it
    controller.set_search_key("Volume");
    let state = controller.state();
    assert_eq!(state.items.len(), 1);
    let visible: HashSet<i64> = state.visible_ids().into_iter().collect();
    assert!(state.selected_ids.is_subset(&visible));
    assert_eq!(state.selected_ids.len(), 1);
}

#[test]
fn toggling_an_invisible_identifier_is_ignored() {
    let (db, _temp) = setup_db();
    let mut controller = seeded_controller(&db, &["Chapter"]);

    controller.toggle_selection(987_654);
    assert!(controller.state().selected_ids.is_empty());
}

#[test]
fn set_selection_drops_unknown_identifiers() {
    let (db, _temp) = setup_db();
    let mut controller = seeded_controller(&db, &["Chapter"]);
    let known = controller.state().items[0].id;

    let requested: HashSet<i64> = [known, 42].into_iter().collect();
    controller.set_selection(requested);
    let selected = controller.state().selected_ids;
    assert_eq!(selected.len(), 1);
    assert!(selected.contains(&known));
}

#[test]
fn invert_selection_flips_within_the_view() {
    let (db, _temp) = setup_db();
    let mut controller = seeded_controller(&db, &["Chapter", "Volume"]);
    let first = controller.state().items[0].id;
    let second = controller.state().items[1].id;

    controller.toggle_selection(first);
    controller.invert_selection();
    let selected = controller.state().selected_ids;
    assert!(!selected.contains(&first));
    assert!(selected.contains(&second));
}

#[test]
fn deleted_rules_disappear_from_selection_on_feed_intake() {
    let (db, _temp) = setup_db();
    let mut controller = seeded_controller(&db, &["Chapter", "Volume"]);
    controller.select_all();

    let doomed = controller.state().items[0].id;
    let ids: HashSet<i64> = [doomed].into_iter().collect();
    controller.delete_by_ids(&ids).expect("delete");

    let state = controller.state();
    assert_eq!(state.items.len(), 1);
    assert!(!state.selected_ids.contains(&doomed));
}

#[test]
fn write_errors_propagate_without_engaging_notices() {
    let (db, _temp) = setup_db();
    let mut controller = seeded_controller(&db, &["Chapter"]);
    let mut notices = controller.take_notices().expect("notices");

    let existing = controller.state().items[0].rule.clone();
    let mut duplicate = toc("dup", "p");
    duplicate.id = existing.id();
    let err = controller.insert(vec![duplicate]).expect_err("duplicate id");
    assert!(err.to_string().contains("already exists"));
    assert!(notices.try_recv().is_err(), "store errors are not notices");
}
