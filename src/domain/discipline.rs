//! End-of-day discipline score.
//!
//! Measures rule adherence only, never profit: 34 + 33 + 33 points for the
//! three checklist items, minus 5 per trade beyond the allowance, clamped to
//! `[0, 100]`.

use crate::domain::review::ReviewRecord;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const BIAS_POINTS: i64 = 34;
pub const RANGE_POINTS: i64 = 33;
pub const NEUTRAL_POINTS: i64 = 33;
pub const OVERTRADE_PENALTY: i64 = 5;

pub fn score(record: &ReviewRecord, max_trades: u32) -> u8 {
    let mut s = 0i64;
    if record.traded_only_when_bias {
        s += BIAS_POINTS;
    }
    if record.respected_range {
        s += RANGE_POINTS;
    }
    if record.avoided_neutral {
        s += NEUTRAL_POINTS;
    }

    let over = (i64::from(record.t_count) - i64::from(max_trades)).max(0);
    s -= over * OVERTRADE_PENALTY;

    s.clamp(0, 100) as u8
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreLabel {
    Excellent,
    Acceptable,
    Deviated,
}

impl ScoreLabel {
    pub fn for_score(score: u8) -> Self {
        if score >= 85 {
            ScoreLabel::Excellent
        } else if score >= 70 {
            ScoreLabel::Acceptable
        } else {
            ScoreLabel::Deviated
        }
    }
}

impl fmt::Display for ScoreLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ScoreLabel::Excellent => "excellent/repeatable",
            ScoreLabel::Acceptable => "acceptable/keep converging",
            ScoreLabel::Deviated => "deviated/needs fewer, less impulsive trades",
        };
        f.write_str(s)
    }
}
