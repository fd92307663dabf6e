//! Daily bar ingestion port trait.

use crate::domain::error::TplanError;
use crate::domain::price_bar::PriceBar;

pub trait DataPort {
    /// Most recent daily bar for `code`.
    fn latest_bar(&self, code: &str) -> Result<PriceBar, TplanError>;

    fn list_codes(&self) -> Result<Vec<String>, TplanError>;
}
