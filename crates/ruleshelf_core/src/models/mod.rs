//! Rule records and the shared strategy trait over them.

mod dict_rule;
mod toc_rule;

pub use dict_rule::DictRule;
pub use toc_rule::TocRule;

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Display;
use std::hash::Hash;

/// Sentinel value for an ordering key that has not been assigned yet.
/// The store replaces it with `max + 1` on insert.
pub const UNASSIGNED_SERIAL: i64 = -1;

/// Behavior every persisted rule type supplies to the generic store and
/// list-controller layers.
///
/// Concrete types provide these as plain accessors rather than through any
/// base-type inheritance; the store and controller never need to know which
/// rule type they are operating on.
pub trait RuleRecord:
    Clone + Send + Sync + Serialize + DeserializeOwned + PartialEq + 'static
{
    /// Stable identifier type. Numeric for TOC rules, the rule name for
    /// dictionary rules.
    type Id: Clone + Eq + Ord + Hash + Display + Send + Sync + 'static;

    /// redb table this rule type is persisted in.
    const TABLE_NAME: &'static str;

    /// Human-readable label used in logs and CLI output.
    const KIND: &'static str;

    fn id(&self) -> Self::Id;

    fn name(&self) -> &str;

    fn enabled(&self) -> bool;

    fn set_enabled(&mut self, enabled: bool);

    /// Explicit ordering key persisted with the record.
    fn serial_number(&self) -> i64;

    fn set_serial_number(&mut self, serial: i64);

    /// One-line derived display field for list rows (primary pattern).
    fn summary(&self) -> String;

    /// `true` when the record has never been persisted and needs a fresh
    /// identifier on insert.
    fn is_unsaved(&self) -> bool {
        false
    }

    /// Assign a fresh identifier to an unsaved record. No-op for types whose
    /// identity comes from user input (dictionary rules are keyed by name).
    fn assign_fresh_id(&mut self) {}

    /// Import-diff identity: does `candidate` refer to the same logical rule
    /// as `self`? Matched by name for both built-in rule types.
    fn identity_matches(&self, candidate: &Self) -> bool {
        self.name() == candidate.name()
    }

    /// Import-diff content comparison: name, primary pattern fields, and the
    /// enabled flag.
    fn content_differs(&self, other: &Self) -> bool;

    /// Carry over storage identity from the matched existing record so a
    /// confirmed import replaces it in place instead of duplicating it.
    fn adopt_identity(&mut self, existing: &Self) {
        self.set_serial_number(existing.serial_number());
    }

    /// Storage key derived from the identifier.
    fn id_key(&self) -> String {
        self.id().to_string()
    }
}

#[cfg(test)]
mod tests;
