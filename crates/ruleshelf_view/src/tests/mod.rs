//! Controller behavior tests over a real temporary store.

mod clipboard_and_notices;
mod list_and_search;

use crate::RuleListController;
use ruleshelf_core::{RuleDb, TocRule};
use tempfile::TempDir;

fn setup_db() -> (RuleDb, TempDir) {
    let temp_dir = TempDir::new().expect("temp dir");
    let db_path = temp_dir.path().join("test.redb");
    let db = RuleDb::open(db_path.to_str().expect("db path")).expect("db");
    (db, temp_dir)
}

fn toc(name: &str, pattern: &str) -> TocRule {
    TocRule::new(name, pattern)
}

/// Seed the named TOC rules (serials 1..=n) and return a ready controller.
fn seeded_controller(db: &RuleDb, names: &[&str]) -> RuleListController<TocRule> {
    for name in names {
        db.toc.insert(toc(name, "pattern")).expect("seed rule");
    }
    let mut controller = RuleListController::new(db.toc.clone());
    controller.refresh();
    controller
}

fn visible_names(controller: &RuleListController<TocRule>) -> Vec<String> {
    controller
        .state()
        .items
        .iter()
        .map(|item| item.name.clone())
        .collect()
}
