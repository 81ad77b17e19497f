//! Dictionary lookup rules.

use super::{RuleRecord, UNASSIGNED_SERIAL};
use serde::{Deserialize, Serialize};

/// A user-defined rule describing a dictionary lookup source. The name is
/// the primary key; saving a rule with an existing name replaces it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DictRule {
    pub name: String,
    /// Lookup URL pattern.
    #[serde(default)]
    pub url_rule: String,
    /// Result display/parsing pattern.
    #[serde(default)]
    pub show_rule: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_sort")]
    pub sort_number: i64,
}

fn default_enabled() -> bool {
    true
}

fn default_sort() -> i64 {
    UNASSIGNED_SERIAL
}

impl DictRule {
    /// Create a rule with defaults applied.
    pub fn new(name: impl Into<String>, url_rule: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url_rule: url_rule.into(),
            show_rule: String::new(),
            enabled: true,
            sort_number: UNASSIGNED_SERIAL,
        }
    }
}

impl RuleRecord for DictRule {
    type Id = String;

    const TABLE_NAME: &'static str = "dict_rules";
    const KIND: &'static str = "dict";

    fn id(&self) -> String {
        self.name.clone()
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn enabled(&self) -> bool {
        self.enabled
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn serial_number(&self) -> i64 {
        self.sort_number
    }

    fn set_serial_number(&mut self, serial: i64) {
        self.sort_number = serial;
    }

    fn summary(&self) -> String {
        self.url_rule.clone()
    }

    fn content_differs(&self, other: &Self) -> bool {
        self.name != other.name
            || self.url_rule != other.url_rule
            || self.show_rule != other.show_rule
            || self.enabled != other.enabled
    }
}
