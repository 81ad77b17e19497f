//! Rule storage layer backed by redb.
//!
//! Each rule type lives in its own table and gets a [`RuleTable`] handle
//! carrying a snapshot feed: after every committed write the handle re-emits
//! the full serial-ordered collection on a watch channel, so list consumers
//! always see whole snapshots and never deltas.

/// Per-rule-type storage operations and the snapshot feed.
pub mod rules;
/// redb table helpers.
pub mod tables;

use crate::error::AppError;
use crate::models::{DictRule, TocRule};
use std::path::Path;
use std::sync::Arc;

pub use rules::RuleTable;

/// Database handle with one typed table per rule type.
pub struct RuleDb {
    pub db: Arc<redb::Database>,
    pub toc: Arc<RuleTable<TocRule>>,
    pub dict: Arc<RuleTable<DictRule>>,
}

impl RuleDb {
    /// Open the database file and initialize rule tables.
    ///
    /// # Returns
    /// A fully initialized [`RuleDb`].
    ///
    /// # Errors
    /// Returns an error if redb cannot open the database or tables.
    pub fn open(path: &str) -> Result<Self, AppError> {
        // Ensure the data directory exists
        if let Some(parent) = Path::new(path).parent() {
            std::fs::create_dir_all(parent).ok();
        }

        let db = Arc::new(
            redb::Database::create(path)
                .map_err(|e| AppError::StorageMessage(e.to_string()))?,
        );
        Self::from_shared(db)
    }

    /// Build a handle from an existing shared redb instance.
    ///
    /// # Returns
    /// A new [`RuleDb`] wrapper that shares the underlying redb instance.
    ///
    /// # Errors
    /// Returns an error if the required tables cannot be opened.
    pub fn from_shared(db: Arc<redb::Database>) -> Result<Self, AppError> {
        Ok(Self {
            toc: Arc::new(RuleTable::new(db.clone())?),
            dict: Arc::new(RuleTable::new(db.clone())?),
            db,
        })
    }
}
