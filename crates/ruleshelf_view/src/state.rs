//! Presentation-ready projections of the rule collection.

use ruleshelf_core::RuleRecord;
use std::collections::HashSet;

/// List-row payload: the rule plus derived display fields.
#[derive(Debug, Clone)]
pub struct RuleItem<R: RuleRecord> {
    pub id: R::Id,
    pub name: String,
    pub enabled: bool,
    /// One-line derived display field (primary pattern).
    pub summary: String,
    pub selected: bool,
    pub rule: R,
}

impl<R: RuleRecord> RuleItem<R> {
    pub(crate) fn from_rule(rule: &R, selected: bool) -> Self {
        Self {
            id: rule.id(),
            name: rule.name().to_string(),
            enabled: rule.enabled(),
            summary: rule.summary(),
            selected,
            rule: rule.clone(),
        }
    }
}

/// Orthogonal interaction flags alongside the base
/// `Loading -> Ready <-> Searching` states.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InteractionState {
    pub loading: bool,
    pub search_mode: bool,
    pub uploading: bool,
    /// A drag-reorder stage is active; the staged order is authoritative
    /// until committed.
    pub reordering: bool,
}

/// Fully recomputed view snapshot; never persisted independently.
#[derive(Debug, Clone)]
pub struct RuleListState<R: RuleRecord> {
    pub items: Vec<RuleItem<R>>,
    /// Always a subset of the identifiers in `items`.
    pub selected_ids: HashSet<R::Id>,
    pub search_key: String,
    pub interaction: InteractionState,
}

impl<R: RuleRecord> RuleListState<R> {
    /// Identifiers currently displayed, in view order.
    pub fn visible_ids(&self) -> Vec<R::Id> {
        self.items.iter().map(|item| item.id.clone()).collect()
    }
}
