//! Shared test-only helpers for ruleshelf_core.

use crate::RuleDb;
use tempfile::TempDir;

/// Creates an isolated temporary database and returns it with the temp dir.
///
/// Keep the [`TempDir`] alive for the full test to preserve the backing file.
///
/// # Returns
/// A ready-to-use [`RuleDb`] and its owning [`TempDir`].
///
/// # Panics
/// Panics if temp-dir creation, path conversion, or database initialization
/// fails in the test environment.
pub(crate) fn setup_temp_db() -> (RuleDb, TempDir) {
    let temp_dir = TempDir::new().expect("temp dir");
    let db_path = temp_dir.path().join("test.redb");
    let db = RuleDb::open(db_path.to_str().expect("db path")).expect("db");
    (db, temp_dir)
}
