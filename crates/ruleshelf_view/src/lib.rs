//! Rule-list controller layer for RuleShelf.
//!
//! One [`RuleListController`] per screen session: it consumes the store's
//! snapshot feed, derives a filterable/selectable view, stages drag-reorders
//! and import reviews, and translates user intents into store writes.

/// Clipboard seam (trait plus in-memory implementation).
pub mod clipboard;
/// The generic rule-list controller.
pub mod controller;
/// Transient user notices (single-consumer channel).
pub mod events;
/// Import staging and candidate diffing.
pub mod import;
/// Presentation-ready view-state types.
pub mod state;

pub use clipboard::{Clipboard, MemoryClipboard};
pub use controller::RuleListController;
pub use events::{Notice, NoticeReceiver};
pub use import::ImportCandidate;
pub use state::{InteractionState, RuleItem, RuleListState};

#[cfg(test)]
mod tests;
