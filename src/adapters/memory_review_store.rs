//! In-process review store. Nothing survives a restart.

use crate::domain::error::TplanError;
use crate::domain::review::{ReviewKey, ReviewRecord};
use crate::ports::review_port::ReviewStore;
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Default)]
pub struct MemoryReviewStore {
    records: Mutex<HashMap<ReviewKey, ReviewRecord>>,
}

impl MemoryReviewStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.lock().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned() -> TplanError {
    TplanError::Database {
        reason: "review store lock poisoned".into(),
    }
}

impl ReviewStore for MemoryReviewStore {
    fn get(&self, key: &ReviewKey) -> Result<Option<ReviewRecord>, TplanError> {
        let records = self.records.lock().map_err(|_| poisoned())?;
        Ok(records.get(key).cloned())
    }

    fn put(&self, key: &ReviewKey, record: &ReviewRecord) -> Result<(), TplanError> {
        let mut records = self.records.lock().map_err(|_| poisoned())?;
        records.insert(key.clone(), record.clone());
        Ok(())
    }
}
