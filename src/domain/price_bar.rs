//! Daily price bar representation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One trading day's OHLC bar. Only `date`, `high`, `low` and `close` feed
/// the level calculation; `open` and `volume` are carried when the source
/// provides them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: Option<f64>,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: Option<f64>,
}

impl PriceBar {
    pub fn new(date: NaiveDate, high: f64, low: f64, close: f64) -> Self {
        Self {
            date,
            open: None,
            high,
            low,
            close,
            volume: None,
        }
    }

    /// (high + low + close) / 3
    pub fn typical_price(&self) -> f64 {
        (self.high + self.low + self.close) / 3.0
    }

    /// high - low
    pub fn spread(&self) -> f64 {
        self.high - self.low
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_bar() -> PriceBar {
        PriceBar {
            date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            open: Some(100.0),
            high: 110.0,
            low: 90.0,
            close: 105.0,
            volume: Some(50_000.0),
        }
    }

    #[test]
    fn typical_price() {
        let bar = sample_bar();
        // (110 + 90 + 105) / 3 = 101.666...
        let expected = (110.0 + 90.0 + 105.0) / 3.0;
        assert!((bar.typical_price() - expected).abs() < f64::EPSILON);
    }

    #[test]
    fn spread_is_high_minus_low() {
        assert!((sample_bar().spread() - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn new_leaves_optional_fields_empty() {
        let bar = PriceBar::new(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(), 12.0, 10.0, 11.0);
        assert_eq!(bar.open, None);
        assert_eq!(bar.volume, None);
    }
}
