//! Pivot and range derived from the most recent daily bar.

use crate::domain::error::TplanError;
use crate::domain::price_bar::PriceBar;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Round to 3 decimal places, the display precision for every derived price.
pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceLevels {
    pub last_date: NaiveDate,
    pub close: f64,
    pub pivot: f64,
    pub range: f64,
}

impl PriceLevels {
    /// Derive levels from a bar.
    ///
    /// Fails with [`TplanError::InvalidPriceData`] when high, low or close is
    /// not finite, when a price is negative, or when `high < low`. No partial
    /// levels are ever produced.
    pub fn from_bar(bar: &PriceBar) -> Result<Self, TplanError> {
        for (name, value) in [("high", bar.high), ("low", bar.low), ("close", bar.close)] {
            if !value.is_finite() {
                return Err(TplanError::invalid_price(format!(
                    "{name} is not a finite number"
                )));
            }
            if value < 0.0 {
                return Err(TplanError::invalid_price(format!("{name} is negative")));
            }
        }
        if bar.high < bar.low {
            return Err(TplanError::invalid_price(format!(
                "high {} is below low {}",
                bar.high, bar.low
            )));
        }

        Ok(Self {
            last_date: bar.date,
            close: bar.close,
            pivot: round3(bar.typical_price()),
            range: round3(bar.spread()),
        })
    }
}
