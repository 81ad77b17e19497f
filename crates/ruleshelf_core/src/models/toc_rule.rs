//! Table-of-contents parsing rules.

use super::{RuleRecord, UNASSIGNED_SERIAL};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicI64, Ordering};

/// A user-defined rule describing how chapter headings are located in plain
/// text. Exchange payloads use the stable camelCase field names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TocRule {
    /// Millis-based numeric id, stable across edits. `0` marks a record that
    /// has not been persisted yet.
    #[serde(default)]
    pub id: i64,
    pub name: String,
    /// Chapter-heading pattern.
    #[serde(default)]
    pub rule: String,
    /// Optional sample text the pattern is meant to match. Serialized as
    /// `null` when absent: rows are bincode-encoded, and bincode cannot
    /// round-trip a skipped field.
    #[serde(default)]
    pub example: Option<String>,
    #[serde(default = "default_serial")]
    pub serial_number: i64,
    #[serde(default = "default_enable")]
    pub enable: bool,
}

fn default_serial() -> i64 {
    UNASSIGNED_SERIAL
}

fn default_enable() -> bool {
    true
}

/// Millisecond timestamp, bumped past the last handed-out value so ids stay
/// unique even when several rules are created within the same millisecond.
fn fresh_id() -> i64 {
    static LAST: AtomicI64 = AtomicI64::new(0);
    let now = Utc::now().timestamp_millis();
    let mut last = LAST.load(Ordering::Relaxed);
    loop {
        let next = if now > last { now } else { last + 1 };
        match LAST.compare_exchange(last, next, Ordering::SeqCst, Ordering::Relaxed) {
            Ok(_) => return next,
            Err(seen) => last = seen,
        }
    }
}

impl TocRule {
    /// Create an unsaved rule (id `0`, unassigned serial) with defaults applied.
    pub fn new(name: impl Into<String>, rule: impl Into<String>) -> Self {
        Self {
            id: 0,
            name: name.into(),
            rule: rule.into(),
            example: None,
            serial_number: UNASSIGNED_SERIAL,
            enable: true,
        }
    }
}

impl RuleRecord for TocRule {
    type Id = i64;

    const TABLE_NAME: &'static str = "toc_rules";
    const KIND: &'static str = "toc";

    fn id(&self) -> i64 {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn enabled(&self) -> bool {
        self.enable
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enable = enabled;
    }

    fn serial_number(&self) -> i64 {
        self.serial_number
    }

    fn set_serial_number(&mut self, serial: i64) {
        self.serial_number = serial;
    }

    fn summary(&self) -> String {
        self.rule.lines().next().unwrap_or_default().to_string()
    }

    fn is_unsaved(&self) -> bool {
        self.id == 0
    }

    fn assign_fresh_id(&mut self) {
        self.id = fresh_id();
    }

    fn content_differs(&self, other: &Self) -> bool {
        self.name != other.name || self.rule != other.rule || self.enable != other.enable
    }

    fn adopt_identity(&mut self, existing: &Self) {
        self.id = existing.id;
        self.serial_number = existing.serial_number;
    }
}
