//! Core domain library for RuleShelf (config, storage, models, exchange).

/// Configuration loading and defaults.
pub mod config;
/// Rule storage layer and the snapshot feed.
pub mod db;
/// Application error types (storage/domain).
pub mod error;
/// Import/export exchange-format codec.
pub mod exchange;
/// Rule records and the shared rule-record trait.
pub mod models;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::Config;
pub use db::{RuleDb, RuleTable};
pub use error::AppError;
pub use models::{DictRule, RuleRecord, TocRule};
