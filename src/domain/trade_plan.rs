//! Pivot-anchored buy/sell zones for intraday T-trades.
//!
//! Strong mode trades pullback-buy then sell, with a symmetric half-`good`
//! zone on each side of the pivot. Weak mode trades bounce-sell then buy back,
//! with zones narrowed to 0.35·`good` for a higher hit rate. Both sets are
//! always built, whatever the current bias.

use crate::domain::levels::{PriceLevels, round3};
use crate::domain::threshold::ThresholdSet;
use serde::{Deserialize, Serialize};

pub const STRONG_ZONE_RATIO: f64 = 0.5;
pub const WEAK_ZONE_RATIO: f64 = 0.35;
/// Weak-mode round trip covers both narrowed zones.
pub const WEAK_SPREAD_RATIO: f64 = 0.7;

/// Closed price interval `[low, high]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub low: f64,
    pub high: f64,
}

impl Zone {
    pub fn new(low: f64, high: f64) -> Self {
        Self {
            low: round3(low),
            high: round3(high),
        }
    }

    pub fn contains(&self, price: f64) -> bool {
        price >= self.low && price <= self.high
    }

    pub fn width(&self) -> f64 {
        round3(self.high - self.low)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradePlan {
    pub pivot: f64,
    pub buffer: f64,
    pub good: f64,
    pub max: f64,
    pub strong_trigger: f64,
    pub strong_buy: Zone,
    pub strong_sell: Zone,
    pub weak_trigger: f64,
    pub weak_sell: Zone,
    pub weak_buy: Zone,
    pub neutral: Zone,
}

impl TradePlan {
    /// `buffer` comes from the bias state so the plan's neutral band matches
    /// the band the classifier used.
    pub fn build(levels: &PriceLevels, thresholds: &ThresholdSet, buffer: f64) -> Self {
        let pivot = levels.pivot;
        let good = thresholds.good;
        let strong_half = STRONG_ZONE_RATIO * good;
        let weak_half = WEAK_ZONE_RATIO * good;

        Self {
            pivot: round3(pivot),
            buffer,
            good,
            max: thresholds.max,
            strong_trigger: round3(pivot + buffer),
            strong_buy: Zone::new(pivot - strong_half, pivot),
            strong_sell: Zone::new(pivot, pivot + strong_half),
            weak_trigger: round3(pivot - buffer),
            weak_sell: Zone::new(pivot, pivot + weak_half),
            weak_buy: Zone::new(pivot - weak_half, pivot),
            neutral: Zone::new(pivot - buffer, pivot + buffer),
        }
    }

    /// Target spread for a strong-mode round trip.
    pub fn strong_target_spread(&self) -> f64 {
        self.good
    }

    /// Target spread for a weak-mode round trip.
    pub fn weak_target_spread(&self) -> f64 {
        round3(WEAK_SPREAD_RATIO * self.good)
    }

    /// All zones collapse onto the pivot when the prior range was zero.
    pub fn is_zero_width(&self) -> bool {
        self.strong_buy.width() == 0.0 && self.weak_sell.width() == 0.0
    }
}
