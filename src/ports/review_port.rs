//! Review record persistence port.

use crate::domain::error::TplanError;
use crate::domain::review::{ReviewKey, ReviewRecord};

/// Key-value storage for one review record per `(code, date)`.
///
/// Implementations only move records in and out; default values and merge
/// logic live in [`crate::domain::review`].
pub trait ReviewStore {
    fn get(&self, key: &ReviewKey) -> Result<Option<ReviewRecord>, TplanError>;

    fn put(&self, key: &ReviewKey, record: &ReviewRecord) -> Result<(), TplanError>;
}
