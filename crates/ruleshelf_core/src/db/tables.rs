//! redb table helpers shared by storage modules.

use crate::models::RuleRecord;
use redb::TableDefinition;

/// File name for the redb database within the configured DB directory.
pub const REDB_FILE_NAME: &str = "data.redb";

/// Table definition for a rule type: rows keyed by the stringified rule id,
/// bincode-encoded values.
pub fn rule_table<R: RuleRecord>() -> TableDefinition<'static, &'static str, &'static [u8]> {
    TableDefinition::new(R::TABLE_NAME)
}
