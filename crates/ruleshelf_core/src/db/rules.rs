//! Generic rule storage operations backed by redb.

use crate::db::tables::rule_table;
use crate::error::AppError;
use crate::models::RuleRecord;
use redb::{ReadableDatabase, ReadableTable, TableDefinition};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

fn deserialize_rule<R: RuleRecord>(bytes: &[u8]) -> Result<R, AppError> {
    Ok(bincode::deserialize(bytes)?)
}

/// Accessor for one rule type's redb table, plus its snapshot feed.
///
/// Every committed write re-emits the full serial-ordered collection on the
/// watch channel obtained via [`RuleTable::subscribe`].
pub struct RuleTable<R: RuleRecord> {
    db: Arc<redb::Database>,
    feed: watch::Sender<Vec<R>>,
}

impl<R: RuleRecord> RuleTable<R> {
    fn def() -> TableDefinition<'static, &'static str, &'static [u8]> {
        rule_table::<R>()
    }

    /// Initialize the rule table if it does not exist yet and prime the
    /// snapshot feed with the current contents.
    ///
    /// # Errors
    /// Returns an error when redb transaction/table initialization fails.
    pub fn new(db: Arc<redb::Database>) -> Result<Self, AppError> {
        let write_txn = db.begin_write()?;
        write_txn.open_table(Self::def())?;
        write_txn.commit()?;

        let snapshot = Self::load_all(&db)?;
        let (feed, _) = watch::channel(snapshot);
        Ok(Self { db, feed })
    }

    fn load_all(db: &redb::Database) -> Result<Vec<R>, AppError> {
        let read_txn = db.begin_read()?;
        let table = read_txn.open_table(Self::def())?;
        let mut rules = Vec::new();
        for item in table.iter()? {
            let (_, value) = item?;
            rules.push(deserialize_rule::<R>(value.value())?);
        }
        rules.sort_by_key(RuleRecord::serial_number);
        Ok(rules)
    }

    fn emit_snapshot(&self) -> Result<(), AppError> {
        let snapshot = Self::load_all(&self.db)?;
        self.feed.send_replace(snapshot);
        Ok(())
    }

    /// Subscribe to the snapshot feed. The receiver starts out holding the
    /// current serial-ordered collection.
    pub fn subscribe(&self) -> watch::Receiver<Vec<R>> {
        self.feed.subscribe()
    }

    /// Fetch a rule by id.
    ///
    /// # Returns
    /// `Ok(Some(rule))` when found, `Ok(None)` when missing.
    ///
    /// # Errors
    /// Returns an error when storage access or deserialization fails.
    pub fn get(&self, id: &R::Id) -> Result<Option<R>, AppError> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(Self::def())?;
        match table.get(id.to_string().as_str())? {
            Some(value) => Ok(Some(deserialize_rule(value.value())?)),
            None => Ok(None),
        }
    }

    /// List all rules sorted by ascending serial number.
    ///
    /// # Errors
    /// Returns an error when storage access or deserialization fails.
    pub fn list(&self) -> Result<Vec<R>, AppError> {
        Self::load_all(&self.db)
    }

    /// Insert a new rule, assigning a fresh id and a `max + 1` serial number
    /// where the record does not carry them yet.
    ///
    /// # Returns
    /// The persisted record with identifiers assigned.
    ///
    /// # Errors
    /// Returns an error when the id already exists or storage fails.
    pub fn insert(&self, rule: R) -> Result<R, AppError> {
        let mut inserted = self.insert_many(vec![rule])?;
        Ok(inserted.remove(0))
    }

    /// Insert a batch of new rules in one transaction.
    ///
    /// # Errors
    /// Returns an error when any id already exists or storage fails; no row
    /// is written in that case.
    pub fn insert_many(&self, rules: Vec<R>) -> Result<Vec<R>, AppError> {
        if rules.is_empty() {
            return Ok(rules);
        }

        let mut persisted = Vec::with_capacity(rules.len());
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(Self::def())?;
            let mut next_serial = Self::next_serial(&table)?;

            for mut rule in rules {
                if rule.is_unsaved() {
                    rule.assign_fresh_id();
                }
                if rule.serial_number() < 0 {
                    rule.set_serial_number(next_serial);
                    next_serial += 1;
                }
                let key = rule.id_key();
                if table.get(key.as_str())?.is_some() {
                    return Err(AppError::StorageMessage(format!(
                        "{} rule id '{}' already exists",
                        R::KIND,
                        key
                    )));
                }
                let encoded = bincode::serialize(&rule)?;
                table.insert(key.as_str(), encoded.as_slice())?;
                persisted.push(rule);
            }
        }
        write_txn.commit()?;

        debug!(kind = R::KIND, count = persisted.len(), "inserted rules");
        self.emit_snapshot()?;
        Ok(persisted)
    }

    /// Insert-or-replace a batch of rules in one transaction.
    ///
    /// Replaced rows keep their stored serial number when the incoming
    /// record does not carry one; fresh rows are assigned `max + 1`.
    ///
    /// # Returns
    /// Number of rows written.
    ///
    /// # Errors
    /// Returns an error when storage fails; no row is written in that case.
    pub fn upsert_many(&self, rules: Vec<R>) -> Result<usize, AppError> {
        if rules.is_empty() {
            return Ok(0);
        }

        let mut written = 0usize;
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(Self::def())?;
            let mut next_serial = Self::next_serial(&table)?;

            for mut rule in rules {
                if rule.is_unsaved() {
                    rule.assign_fresh_id();
                }
                let key = rule.id_key();
                if rule.serial_number() < 0 {
                    let stored_serial = match table.get(key.as_str())? {
                        Some(existing) => {
                            Some(deserialize_rule::<R>(existing.value())?.serial_number())
                        }
                        None => None,
                    };
                    match stored_serial {
                        Some(serial) => rule.set_serial_number(serial),
                        None => {
                            rule.set_serial_number(next_serial);
                            next_serial += 1;
                        }
                    }
                }
                let encoded = bincode::serialize(&rule)?;
                table.insert(key.as_str(), encoded.as_slice())?;
                written += 1;
            }
        }
        write_txn.commit()?;

        debug!(kind = R::KIND, count = written, "upserted rules");
        self.emit_snapshot()?;
        Ok(written)
    }

    /// Replace an existing rule row.
    ///
    /// # Returns
    /// `Ok(true)` when a row was replaced, `Ok(false)` when the id is
    /// missing (nothing is written).
    ///
    /// # Errors
    /// Returns an error when storage access or serialization fails.
    pub fn update(&self, rule: &R) -> Result<bool, AppError> {
        Ok(self.update_many(std::slice::from_ref(rule))? == 1)
    }

    /// Replace a batch of existing rule rows in one transaction. Rows whose
    /// id is missing are skipped.
    ///
    /// # Returns
    /// Number of rows replaced.
    ///
    /// # Errors
    /// Returns an error when storage access or serialization fails.
    pub fn update_many(&self, rules: &[R]) -> Result<usize, AppError> {
        if rules.is_empty() {
            return Ok(0);
        }

        let mut replaced = 0usize;
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(Self::def())?;
            for rule in rules {
                let key = rule.id_key();
                if table.get(key.as_str())?.is_none() {
                    continue;
                }
                let encoded = bincode::serialize(rule)?;
                table.insert(key.as_str(), encoded.as_slice())?;
                replaced += 1;
            }
        }
        write_txn.commit()?;

        debug!(kind = R::KIND, count = replaced, "updated rules");
        self.emit_snapshot()?;
        Ok(replaced)
    }

    /// Delete rules by identifier set in one transaction.
    ///
    /// # Returns
    /// Number of rows deleted.
    ///
    /// # Errors
    /// Returns an error when storage access fails.
    pub fn delete_by_ids(&self, ids: &HashSet<R::Id>) -> Result<usize, AppError> {
        if ids.is_empty() {
            return Ok(0);
        }

        let mut deleted = 0usize;
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(Self::def())?;
            for id in ids {
                if table.remove(id.to_string().as_str())?.is_some() {
                    deleted += 1;
                }
            }
        }
        write_txn.commit()?;

        debug!(kind = R::KIND, count = deleted, "deleted rules");
        self.emit_snapshot()?;
        Ok(deleted)
    }

    /// Set the enabled flag for every rule in the identifier set, in one
    /// transaction. Missing ids are skipped.
    ///
    /// # Returns
    /// Number of rows updated.
    ///
    /// # Errors
    /// Returns an error when storage access or serialization fails.
    pub fn set_enabled_by_ids(
        &self,
        ids: &HashSet<R::Id>,
        enabled: bool,
    ) -> Result<usize, AppError> {
        if ids.is_empty() {
            return Ok(0);
        }

        let mut updated = 0usize;
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(Self::def())?;
            for id in ids {
                let key = id.to_string();
                let Some(existing) = table.get(key.as_str())? else {
                    continue;
                };
                let mut rule = deserialize_rule::<R>(existing.value())?;
                drop(existing);
                rule.set_enabled(enabled);
                let encoded = bincode::serialize(&rule)?;
                table.insert(key.as_str(), encoded.as_slice())?;
                updated += 1;
            }
        }
        write_txn.commit()?;

        debug!(kind = R::KIND, count = updated, enabled, "toggled rules");
        self.emit_snapshot()?;
        Ok(updated)
    }

    /// Persist an explicit ordering: every record in `rules` is written back
    /// with its serial number set to its position (starting at 1), in one
    /// transaction. Records not present in `rules` keep their serials.
    ///
    /// # Errors
    /// Returns an error when storage access or serialization fails.
    pub fn save_order(&self, rules: &[R]) -> Result<(), AppError> {
        if rules.is_empty() {
            return Ok(());
        }

        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(Self::def())?;
            for (position, rule) in rules.iter().enumerate() {
                let mut ordered = rule.clone();
                ordered.set_serial_number(position as i64 + 1);
                let encoded = bincode::serialize(&ordered)?;
                table.insert(ordered.id_key().as_str(), encoded.as_slice())?;
            }
        }
        write_txn.commit()?;

        debug!(kind = R::KIND, count = rules.len(), "persisted rule order");
        self.emit_snapshot()?;
        Ok(())
    }

    fn next_serial(
        table: &impl ReadableTable<&'static str, &'static [u8]>,
    ) -> Result<i64, AppError> {
        let mut max = 0i64;
        for item in table.iter()? {
            let (_, value) = item?;
            let rule = deserialize_rule::<R>(value.value())?;
            max = max.max(rule.serial_number());
        }
        Ok(max + 1)
    }
}
