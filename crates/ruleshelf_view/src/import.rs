//! Import staging: candidate diffing and the transient review set.

use ruleshelf_core::RuleRecord;

/// One parsed rule awaiting user confirmation, with its diff against the
/// live collection.
#[derive(Debug, Clone)]
pub struct ImportCandidate<R: RuleRecord> {
    pub rule: R,
    /// Provisional selection flag toggled during review.
    pub selected: bool,
    /// Matched existing rule, when the candidate's identity is already
    /// present in the store.
    pub existing: Option<R>,
}

impl<R: RuleRecord> ImportCandidate<R> {
    /// No existing rule shares this candidate's identity.
    pub fn is_new(&self) -> bool {
        self.existing.is_none()
    }

    /// New, or differing from the matched rule in name, primary pattern
    /// fields, or enabled flag.
    pub fn is_changed(&self) -> bool {
        match &self.existing {
            Some(existing) => existing.content_differs(&self.rule),
            None => true,
        }
    }
}

/// Diff parsed candidates against the live collection and pre-select the
/// new-or-changed ones for review.
pub(crate) fn stage_candidates<R: RuleRecord>(
    parsed: Vec<R>,
    existing: &[R],
) -> Vec<ImportCandidate<R>> {
    parsed
        .into_iter()
        .map(|rule| {
            let matched = existing
                .iter()
                .find(|old| old.identity_matches(&rule))
                .cloned();
            let mut candidate = ImportCandidate {
                rule,
                selected: false,
                existing: matched,
            };
            candidate.selected = candidate.is_changed();
            candidate
        })
        .collect()
}
