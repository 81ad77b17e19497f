//! Generic rule-list controller.

use crate::clipboard::Clipboard;
use crate::events::{Notice, NoticeReceiver, NoticeSender};
use crate::import::{stage_candidates, ImportCandidate};
use crate::state::{InteractionState, RuleItem, RuleListState};
use ruleshelf_core::config::DEFAULT_MAX_IMPORT_SIZE;
use ruleshelf_core::db::RuleTable;
use ruleshelf_core::{exchange, AppError, RuleRecord};
use std::collections::HashSet;
use std::io::{Read, Write};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, warn};

/// Filter a collection by case-insensitive substring match on the name and
/// return it sorted by ascending serial number. An empty key keeps the full
/// set in the same order.
pub fn filter_rules<R: RuleRecord>(data: &[R], key: &str) -> Vec<R> {
    let key_lower = key.to_lowercase();
    let mut filtered: Vec<R> = data
        .iter()
        .filter(|rule| key_lower.is_empty() || rule.name().to_lowercase().contains(&key_lower))
        .cloned()
        .collect();
    filtered.sort_by_key(RuleRecord::serial_number);
    filtered
}

/// Derived, filterable, selectable view over one rule type's store feed,
/// mediating all mutating user intents.
///
/// One instance per screen session. Store writes pass straight through and
/// their errors propagate unretried; parse/paste problems are converted to
/// transient notices instead.
pub struct RuleListController<R: RuleRecord> {
    store: Arc<RuleTable<R>>,
    feed: watch::Receiver<Vec<R>>,
    /// Last feed snapshot, serial-ordered.
    snapshot: Vec<R>,
    search_key: String,
    search_mode: bool,
    selected: HashSet<R::Id>,
    /// Staged reorder copy. While `Some`, it is the authoritative view
    /// source and feed emissions only refresh `snapshot` in the background.
    staged: Option<Vec<R>>,
    import: Option<Vec<ImportCandidate<R>>>,
    loading: bool,
    uploading: bool,
    max_import_size: usize,
    notices: NoticeSender,
    notice_rx: Option<NoticeReceiver>,
}

impl<R: RuleRecord> RuleListController<R> {
    /// Build a controller over a store handle. The view starts in the
    /// loading state until the first feed intake ([`Self::refresh`]).
    pub fn new(store: Arc<RuleTable<R>>) -> Self {
        let feed = store.subscribe();
        let (notices, notice_rx) = NoticeSender::channel();
        Self {
            store,
            feed,
            snapshot: Vec::new(),
            search_key: String::new(),
            search_mode: false,
            selected: HashSet::new(),
            staged: None,
            import: None,
            loading: true,
            uploading: false,
            max_import_size: DEFAULT_MAX_IMPORT_SIZE,
            notices,
            notice_rx: Some(notice_rx),
        }
    }

    /// Take the notice receiver. Yields `Some` exactly once.
    pub fn take_notices(&mut self) -> Option<NoticeReceiver> {
        self.notice_rx.take()
    }

    /// Override the import payload size cap.
    pub fn set_max_import_size(&mut self, max_bytes: usize) {
        self.max_import_size = max_bytes;
    }

    // ---- feed intake -----------------------------------------------------

    /// Pull the current feed value and recompute the derived view.
    pub fn refresh(&mut self) {
        let rules = self.feed.borrow_and_update().clone();
        self.apply_feed(rules);
    }

    /// Await the next feed emission, then recompute. Returns `false` when
    /// the store side has gone away.
    pub async fn feed_changed(&mut self) -> bool {
        if self.feed.changed().await.is_err() {
            return false;
        }
        self.refresh();
        true
    }

    /// Intake one feed snapshot.
    ///
    /// Safe to interleave with write intents: while a reorder stage is
    /// active the staged copy stays authoritative and only the background
    /// snapshot is replaced.
    pub fn apply_feed(&mut self, rules: Vec<R>) {
        self.snapshot = rules;
        self.loading = false;
        if self.staged.is_none() {
            self.prune_selection();
        }
    }

    // ---- view composition ------------------------------------------------

    fn visible_rules(&self) -> Vec<R> {
        match &self.staged {
            Some(staged) => staged.clone(),
            None => filter_rules(&self.snapshot, &self.search_key),
        }
    }

    fn prune_selection(&mut self) {
        let visible: HashSet<R::Id> = self
            .visible_rules()
            .iter()
            .map(RuleRecord::id)
            .collect();
        self.selected.retain(|id| visible.contains(id));
    }

    /// Recompute the presentation snapshot from the current feed data plus
    /// ephemeral controller state.
    pub fn state(&self) -> RuleListState<R> {
        let rules = self.visible_rules();
        let items: Vec<RuleItem<R>> = rules
            .iter()
            .map(|rule| RuleItem::from_rule(rule, self.selected.contains(&rule.id())))
            .collect();
        let visible_ids: HashSet<R::Id> = items.iter().map(|item| item.id.clone()).collect();
        let selected_ids: HashSet<R::Id> = self
            .selected
            .iter()
            .filter(|id| visible_ids.contains(*id))
            .cloned()
            .collect();
        RuleListState {
            items,
            selected_ids,
            search_key: self.search_key.clone(),
            interaction: InteractionState {
                loading: self.loading,
                search_mode: self.search_mode,
                uploading: self.uploading,
                reordering: self.staged.is_some(),
            },
        }
    }

    // ---- search ----------------------------------------------------------

    pub fn set_search_key(&mut self, key: impl Into<String>) {
        self.search_key = key.into();
        self.prune_selection();
    }

    /// Enter or leave search mode; leaving clears the key.
    pub fn set_search_mode(&mut self, active: bool) {
        self.search_mode = active;
        if !active {
            self.set_search_key("");
        }
    }

    pub fn set_uploading(&mut self, uploading: bool) {
        self.uploading = uploading;
    }

    // ---- selection -------------------------------------------------------

    /// Toggle one identifier. Ignored when the id is not currently visible.
    pub fn toggle_selection(&mut self, id: R::Id) {
        let visible = self.visible_rules();
        if !visible.iter().any(|rule| rule.id() == id) {
            return;
        }
        if !self.selected.remove(&id) {
            self.selected.insert(id);
        }
    }

    /// Replace the selection; entries not present in the current view are
    /// dropped.
    pub fn set_selection(&mut self, ids: HashSet<R::Id>) {
        self.selected = ids;
        self.prune_selection();
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    pub fn select_all(&mut self) {
        self.selected = self.visible_rules().iter().map(RuleRecord::id).collect();
    }

    pub fn invert_selection(&mut self) {
        let all: HashSet<R::Id> = self.visible_rules().iter().map(RuleRecord::id).collect();
        self.selected = all.difference(&self.selected).cloned().collect();
    }

    // ---- reorder staging -------------------------------------------------

    /// Move a row within the current view, staging a local copy so drag
    /// interaction stays jank-free. No store write happens until
    /// [`Self::commit_reorder`].
    ///
    /// Refused while a search filter is active: committing a filtered
    /// subset would renumber it 1..n and collide with the serials of the
    /// hidden rows.
    ///
    /// # Returns
    /// `false` when the view is filtered or either index is out of the
    /// current view bounds.
    pub fn move_item(&mut self, from: usize, to: usize) -> bool {
        if self.staged.is_none() {
            if !self.search_key.is_empty() {
                warn!(kind = R::KIND, "reorder refused while a search filter is active");
                return false;
            }
            self.staged = Some(self.visible_rules());
        }
        let Some(staged) = self.staged.as_mut() else {
            return false;
        };
        if from >= staged.len() || to >= staged.len() {
            warn!(
                kind = R::KIND,
                from,
                to,
                len = staged.len(),
                "reorder indices out of bounds"
            );
            return false;
        }
        let rule = staged.remove(from);
        staged.insert(to, rule);
        true
    }

    /// Persist the staged order's serial numbers and return view authority
    /// to the feed. No-op when nothing is staged.
    ///
    /// # Errors
    /// Store errors propagate; the stage is cleared either way so the feed
    /// resumes authority.
    pub fn commit_reorder(&mut self) -> Result<(), AppError> {
        let Some(staged) = self.staged.take() else {
            return Ok(());
        };
        self.store.save_order(&staged)?;
        self.refresh();
        Ok(())
    }

    // ---- write-through intents -------------------------------------------

    /// Insert a new rule or replace the edited one.
    ///
    /// # Errors
    /// Store errors propagate unretried.
    pub fn save(&mut self, rule: R) -> Result<(), AppError> {
        if rule.is_unsaved() {
            self.store.insert(rule)?;
        } else if !self.store.update(&rule)? {
            // edited a rule whose row vanished underneath us; re-insert
            self.store.insert(rule)?;
        }
        self.refresh();
        Ok(())
    }

    /// Pass-through batch insert.
    ///
    /// # Errors
    /// Store errors propagate unretried.
    pub fn insert(&mut self, rules: Vec<R>) -> Result<(), AppError> {
        self.store.insert_many(rules)?;
        self.refresh();
        Ok(())
    }

    /// Pass-through batch update.
    ///
    /// # Errors
    /// Store errors propagate unretried.
    pub fn update(&mut self, rules: &[R]) -> Result<(), AppError> {
        self.store.update_many(rules)?;
        self.refresh();
        Ok(())
    }

    /// Delete by identifier set.
    ///
    /// # Errors
    /// Store errors propagate unretried.
    pub fn delete_by_ids(&mut self, ids: &HashSet<R::Id>) -> Result<usize, AppError> {
        let deleted = self.store.delete_by_ids(ids)?;
        self.refresh();
        Ok(deleted)
    }

    /// Batch enable by identifier set.
    ///
    /// # Errors
    /// Store errors propagate unretried.
    pub fn enable_by_ids(&mut self, ids: &HashSet<R::Id>) -> Result<usize, AppError> {
        let updated = self.store.set_enabled_by_ids(ids, true)?;
        self.refresh();
        Ok(updated)
    }

    /// Batch disable by identifier set.
    ///
    /// # Errors
    /// Store errors propagate unretried.
    pub fn disable_by_ids(&mut self, ids: &HashSet<R::Id>) -> Result<usize, AppError> {
        let updated = self.store.set_enabled_by_ids(ids, false)?;
        self.refresh();
        Ok(updated)
    }

    // ---- export ----------------------------------------------------------

    /// Serialize the selection-filtered view to the exchange format. With
    /// nothing selected the full current view is exported.
    ///
    /// # Errors
    /// [`AppError::Format`] when serialization fails.
    pub fn export_payload(&self, pretty: bool) -> Result<String, AppError> {
        let rules = self.visible_rules();
        let subset: Vec<R> = if self.selected.is_empty() {
            rules
        } else {
            rules
                .into_iter()
                .filter(|rule| self.selected.contains(&rule.id()))
                .collect()
        };
        exchange::export_json(&subset, pretty)
    }

    /// Stream the export payload into a document writer.
    ///
    /// # Errors
    /// Serialization and I/O errors propagate.
    pub fn export_to_writer<W: Write>(&self, writer: &mut W, pretty: bool) -> Result<(), AppError> {
        let payload = self.export_payload(pretty)?;
        writer.write_all(payload.as_bytes())?;
        Ok(())
    }

    // ---- import ----------------------------------------------------------

    /// Parse an import payload and stage its candidates for review, with
    /// new-or-changed candidates pre-selected.
    ///
    /// # Returns
    /// `true` when staging succeeded. Format problems become a transient
    /// notice and leave the previous staging untouched.
    pub fn stage_import(&mut self, text: &str) -> bool {
        match exchange::parse_rules::<R>(text, self.max_import_size) {
            Ok(parsed) => {
                debug!(kind = R::KIND, count = parsed.len(), "staged import");
                self.import = Some(stage_candidates(parsed, &self.snapshot));
                true
            }
            Err(err) => {
                debug!(kind = R::KIND, error = %err, "import payload rejected");
                self.notices.push(Notice::text(err.to_string()));
                false
            }
        }
    }

    /// Read an import payload from a document reader and stage it.
    ///
    /// # Returns
    /// `true` when staging succeeded; read failures become a notice.
    pub fn stage_import_from_reader<Rd: Read>(&mut self, reader: &mut Rd) -> bool {
        let mut text = String::new();
        // cap the read at the payload limit plus room for surrounding whitespace
        let limit = self.max_import_size.saturating_add(1024) as u64;
        if let Err(err) = reader.take(limit).read_to_string(&mut text) {
            self.notices
                .push(Notice::text(format!("Import failed: {}", err)));
            return false;
        }
        self.stage_import(&text)
    }

    /// Currently staged candidates, if an import review is open.
    pub fn import_candidates(&self) -> Option<&[ImportCandidate<R>]> {
        self.import.as_deref()
    }

    pub fn toggle_import_selection(&mut self, index: usize) {
        if let Some(candidates) = self.import.as_mut() {
            if let Some(candidate) = candidates.get_mut(index) {
                candidate.selected = !candidate.selected;
            }
        }
    }

    pub fn set_all_import_selected(&mut self, selected: bool) {
        if let Some(candidates) = self.import.as_mut() {
            for candidate in candidates.iter_mut() {
                candidate.selected = selected;
            }
        }
    }

    pub fn cancel_import(&mut self) {
        self.import = None;
    }

    /// Write the still-selected candidates through in one batch and clear
    /// staging. Candidates matched to an existing rule replace it in place.
    ///
    /// # Returns
    /// Number of rules written.
    ///
    /// # Errors
    /// Store errors propagate; staging is kept so the user can retry, and
    /// no partial commit is visible either way.
    pub fn commit_import(&mut self) -> Result<usize, AppError> {
        let Some(candidates) = &self.import else {
            return Ok(0);
        };
        let selected: Vec<R> = candidates
            .iter()
            .filter(|candidate| candidate.selected)
            .map(|candidate| {
                let mut rule = candidate.rule.clone();
                if let Some(existing) = &candidate.existing {
                    rule.adopt_identity(existing);
                }
                rule
            })
            .collect();
        let written = self.store.upsert_many(selected)?;
        self.import = None;
        self.refresh();
        Ok(written)
    }

    // ---- clipboard -------------------------------------------------------

    /// Place one rule on the clipboard in the exchange format.
    ///
    /// # Errors
    /// [`AppError::Format`] when serialization fails.
    pub fn copy_rule(&self, rule: &R, clipboard: &mut dyn Clipboard) -> Result<(), AppError> {
        let json = exchange::rule_to_json(rule)?;
        clipboard.write_text(&json);
        Ok(())
    }

    /// Read a single rule from the clipboard.
    ///
    /// # Returns
    /// The parsed rule, or `None` with exactly one transient notice when the
    /// clipboard is blank or unparseable. Never mutates the store.
    pub fn paste_rule(&mut self, clipboard: &mut dyn Clipboard) -> Option<R> {
        let text = clipboard.read_text().unwrap_or_default();
        if text.trim().is_empty() {
            self.notices.push(Notice::text("Clipboard is empty"));
            return None;
        }
        match exchange::parse_rule::<R>(&text) {
            Ok(rule) => Some(rule),
            Err(err) => {
                debug!(kind = R::KIND, error = %err, "clipboard payload rejected");
                self.notices
                    .push(Notice::text("Clipboard content is not a valid rule"));
                None
            }
        }
    }
}
