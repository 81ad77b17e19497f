//! Root crate facade for the RuleShelf core and controller layers.

pub use ruleshelf_core::{
    config, db, error, exchange, models, AppError, Config, DictRule, RuleDb, RuleRecord, RuleTable,
    TocRule,
};
pub use ruleshelf_view::{
    clipboard, controller, events, import, state, Clipboard, ImportCandidate, InteractionState,
    MemoryClipboard, Notice, NoticeReceiver, RuleItem, RuleListController,
    RuleListState,
};
