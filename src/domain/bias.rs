//! Bias classification of the current price against pivot ± buffer.
//!
//! Priority order:
//!
//! 1. No finite price: `None`
//! 2. `price >= pivot + buffer`: `Strong`
//! 3. `price <= pivot - buffer`: `Weak`
//! 4. Otherwise: `Neutral`
//!
//! A price exactly on `pivot ± buffer` resolves to the directional mode, never
//! to neutral.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BiasMode {
    None,
    Strong,
    Weak,
    Neutral,
}

impl BiasMode {
    pub fn status(&self) -> &'static str {
        match self {
            BiasMode::None => "no current price",
            BiasMode::Strong => "strong (holding above)",
            BiasMode::Weak => "weak (broken below)",
            BiasMode::Neutral => "neutral (chop)",
        }
    }
}

impl fmt::Display for BiasMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BiasMode::None => "none",
            BiasMode::Strong => "strong",
            BiasMode::Weak => "weak",
            BiasMode::Neutral => "neutral",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BiasState {
    pub mode: BiasMode,
    pub pivot: f64,
    pub buffer: f64,
}

impl BiasState {
    pub fn status(&self) -> &'static str {
        self.mode.status()
    }
}

pub fn classify(pivot: f64, buffer: f64, current_price: Option<f64>) -> BiasState {
    let mode = match current_price {
        Some(price) if price.is_finite() => {
            if price >= pivot + buffer {
                BiasMode::Strong
            } else if price <= pivot - buffer {
                BiasMode::Weak
            } else {
                BiasMode::Neutral
            }
        }
        _ => BiasMode::None,
    };
    BiasState { mode, pivot, buffer }
}
