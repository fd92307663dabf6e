//! Daily review record: one checklist per security per calendar day.
//!
//! Records are created with compliant defaults on first access, mutated by
//! explicit actions, and written back after every mutation. A new date means
//! a new key, so yesterday's record is simply never read again.

use crate::domain::error::TplanError;
use crate::ports::review_port::ReviewStore;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ReviewKey {
    pub code: String,
    pub date: NaiveDate,
}

impl ReviewKey {
    pub fn new(code: &str, date: NaiveDate) -> Self {
        Self {
            code: code.trim().to_uppercase(),
            date,
        }
    }

    pub fn today(code: &str) -> Self {
        Self::new(code, chrono::Local::now().date_naive())
    }
}

impl fmt::Display for ReviewKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "review:{}:{}", self.code, self.date.format("%Y-%m-%d"))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRecord {
    pub date: NaiveDate,
    pub traded_only_when_bias: bool,
    pub respected_range: bool,
    pub avoided_neutral: bool,
    pub t_count: u32,
    pub pnl: f64,
    pub note: String,
}

impl ReviewRecord {
    /// Default-compliant record for a fresh day.
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            traded_only_when_bias: true,
            respected_range: true,
            avoided_neutral: true,
            t_count: 0,
            pnl: 0.0,
            note: String::new(),
        }
    }
}

/// Partial update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReviewPatch {
    pub traded_only_when_bias: Option<bool>,
    pub respected_range: Option<bool>,
    pub avoided_neutral: Option<bool>,
    pub t_count: Option<u32>,
    pub pnl: Option<f64>,
    pub note: Option<String>,
}

impl ReviewPatch {
    pub fn is_empty(&self) -> bool {
        *self == ReviewPatch::default()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReviewAction {
    /// One completed T-trade.
    RecordTrade,
    /// Undo a mistaken increment, never below zero.
    UndoTrade,
    Patch(ReviewPatch),
}

impl ReviewRecord {
    pub fn apply(&mut self, action: ReviewAction) {
        match action {
            ReviewAction::RecordTrade => self.t_count = self.t_count.saturating_add(1),
            ReviewAction::UndoTrade => self.t_count = self.t_count.saturating_sub(1),
            ReviewAction::Patch(patch) => {
                if let Some(v) = patch.traded_only_when_bias {
                    self.traded_only_when_bias = v;
                }
                if let Some(v) = patch.respected_range {
                    self.respected_range = v;
                }
                if let Some(v) = patch.avoided_neutral {
                    self.avoided_neutral = v;
                }
                if let Some(v) = patch.t_count {
                    self.t_count = v;
                }
                if let Some(v) = patch.pnl {
                    // Non-numeric pnl input is stored as zero.
                    self.pnl = if v.is_finite() { v } else { 0.0 };
                }
                if let Some(v) = patch.note {
                    self.note = v;
                }
            }
        }
    }
}

/// Stored record for `key`, or a fresh default one. The default is not
/// written until the first mutation.
pub fn load_or_default(store: &dyn ReviewStore, key: &ReviewKey) -> Result<ReviewRecord, TplanError> {
    match store.get(key)? {
        Some(record) => Ok(record),
        None => {
            tracing::debug!(%key, "no review record yet, starting from defaults");
            Ok(ReviewRecord::new(key.date))
        }
    }
}

/// Read-modify-write one action and return the stored result.
pub fn apply(
    store: &dyn ReviewStore,
    key: &ReviewKey,
    action: ReviewAction,
) -> Result<ReviewRecord, TplanError> {
    let mut record = load_or_default(store, key)?;
    record.apply(action);
    store.put(key, &record)?;
    tracing::debug!(%key, t_count = record.t_count, "review record updated");
    Ok(record)
}
