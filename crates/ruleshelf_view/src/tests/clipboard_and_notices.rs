//! Clipboard copy/paste and transient-notice behavior.

use super::{seeded_controller, setup_db};
use crate::{Clipboard, MemoryClipboard, RuleListController};
use ruleshelf_core::{DictRule, TocRule};
use tokio::sync::mpsc::error::TryRecvError;

#[test]
fn copy_then_paste_roundtrips_a_rule() {
    let (db, _temp) = setup_db();
    let mut controller = seeded_controller(&db, &["Chapter"]);
    let rule = controller.state().items[0].rule.clone();

    let mut clipboard = MemoryClipboard::new();
    controller.copy_rule(&rule, &mut clipboard).expect("copy");
    assert!(clipboard
        .read_text()
        .expect("clipboard text")
        .contains("\"serialNumber\""));

    let pasted: TocRule = controller.paste_rule(&mut clipboard).expect("paste");
    assert_eq!(pasted, rule);
}

#[test]
fn paste_with_empty_clipboard_notices_once_and_leaves_store_alone() {
    let (db, _temp) = setup_db();
    let mut controller = seeded_controller(&db, &["Chapter"]);
    let mut notices = controller.take_notices().expect("notices");

    let mut clipboard = MemoryClipboard::new();
    assert!(controller.paste_rule(&mut clipboard).is_none());

    let notice = notices.try_recv().expect("one notice");
    assert_eq!(notice.message, "Clipboard is empty");
    assert!(matches!(notices.try_recv(), Err(TryRecvError::Empty)));

    assert_eq!(db.toc.list().expect("list").len(), 1);
}

#[test]
fn paste_with_unparseable_text_notices_and_yields_no_rule() {
    let (db, _temp) = setup_db();
    let mut controller = RuleListController::<DictRule>::new(db.dict.clone());
    controller.refresh();
    let mut notices = controller.take_notices().expect("notices");

    let mut clipboard = MemoryClipboard::with_text("definitely not a rule");
    assert!(controller.paste_rule(&mut clipboard).is_none());

    let notice = notices.try_recv().expect("one notice");
    assert_eq!(notice.message, "Clipboard content is not a valid rule");
    assert!(db.dict.list().expect("list").is_empty());
}

#[test]
fn notice_receiver_can_be_taken_exactly_once() {
    let (db, _temp) = setup_db();
    let mut controller = seeded_controller(&db, &["Chapter"]);

    assert!(controller.take_notices().is_some());
    assert!(controller.take_notices().is_none());
}

#[tokio::test]
async fn feed_changed_wakes_after_a_store_write() {
    let (db, _temp) = setup_db();
    let mut controller = seeded_controller(&db, &["Chapter"]);

    db.toc
        .insert(TocRule::new("Volume", "p"))
        .expect("concurrent insert");
    assert!(controller.feed_changed().await);
    assert_eq!(controller.state().items.len(), 2);
}
