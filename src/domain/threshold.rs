//! Adaptive trade-size thresholds scaled from the prior session's range.
//!
//! `min`, `good` and `max` are the minimum viable, target and maximum
//! tolerable excursion for one T-trade. `buffer` is the noise band around the
//! pivot that price must clear before a directional bias is confirmed.

use crate::domain::levels::round3;
use serde::{Deserialize, Serialize};

pub const MIN_RATIO: f64 = 0.25;
pub const GOOD_RATIO: f64 = 0.40;
pub const MAX_RATIO: f64 = 0.60;
/// Buffer as a fraction of `min` (0.0625 of range).
pub const BUFFER_RATIO: f64 = 0.25;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdSet {
    pub min: f64,
    pub good: f64,
    pub max: f64,
    pub buffer: f64,
}

impl ThresholdSet {
    /// A zero range is legal and yields all-zero thresholds.
    pub fn from_range(range: f64) -> Self {
        let min = round3(range * MIN_RATIO);
        Self {
            min,
            good: round3(range * GOOD_RATIO),
            max: round3(range * MAX_RATIO),
            buffer: round3(min * BUFFER_RATIO),
        }
    }

    /// True when every threshold collapsed to zero, i.e. the plan has no width
    /// and nothing should be executed against it.
    pub fn is_degenerate(&self) -> bool {
        self.max == 0.0
    }
}
