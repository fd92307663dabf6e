//! Red/yellow/green executability signal.
//!
//! The signal is a pure classification of the current snapshot. [`RULES`] is
//! evaluated top to bottom and the first rule whose guard holds produces the
//! signal:
//!
//! | # | rule                  | light  |
//! |---|-----------------------|--------|
//! | 1 | no price              | grey   |
//! | 2 | allowance exhausted   | red    |
//! | 3 | overextended          | red    |
//! | 4 | neutral band          | red    |
//! | 5 | strong pullback buy   | green  |
//! | 6 | strong, waiting       | yellow |
//! | 7 | weak bounce sell      | green  |
//! | 8 | weak, waiting         | yellow |
//!
//! If nothing matches (bias not computed from the same price) the result is a
//! blank grey signal.

use crate::domain::bias::{BiasMode, BiasState};
use crate::domain::trade_plan::TradePlan;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Light {
    Grey,
    Red,
    Yellow,
    Green,
}

impl fmt::Display for Light {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Light::Grey => "grey",
            Light::Red => "red",
            Light::Yellow => "yellow",
            Light::Green => "green",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub light: Light,
    pub title: String,
    pub message: String,
    pub reasons: Vec<String>,
}

impl Signal {
    fn new(light: Light, title: &str, message: String, reasons: &[&str]) -> Self {
        Self {
            light,
            title: title.to_string(),
            message,
            reasons: reasons.iter().map(|r| r.to_string()).collect(),
        }
    }

    fn blank() -> Self {
        Self::new(Light::Grey, "-", String::new(), &[])
    }

    /// Red signal for a plan whose zones collapsed onto the pivot.
    pub fn zero_range(pivot: f64) -> Self {
        Self::new(
            Light::Red,
            "Stop: zero-range plan, execution disabled",
            format!("Prior range was zero, every zone sits on the pivot {pivot}. Show the plan, do not trade it."),
            &["zero-range plan"],
        )
    }

    pub fn is_executable(&self) -> bool {
        self.light == Light::Green
    }
}

/// Everything one evaluation looks at.
#[derive(Debug, Clone, Copy)]
pub struct SignalInput<'a> {
    pub price: Option<f64>,
    pub plan: &'a TradePlan,
    pub bias: &'a BiasState,
    pub trade_count: u32,
    pub max_trades: u32,
}

impl SignalInput<'_> {
    fn price(&self) -> Option<f64> {
        self.price.filter(|p| p.is_finite())
    }

    // Outcomes only run after a guard that required a price.
    fn px(&self) -> f64 {
        self.price().unwrap_or(f64::NAN)
    }
}

/// One guard/outcome pair in the priority list.
pub struct SignalRule {
    pub name: &'static str,
    pub guard: fn(&SignalInput<'_>) -> bool,
    pub outcome: fn(&SignalInput<'_>) -> Signal,
}

pub static RULES: [SignalRule; 8] = [
    SignalRule {
        name: "no_price",
        guard: |i| i.price().is_none(),
        outcome: |_| {
            Signal::new(
                Light::Grey,
                "Enter the current price",
                "Enter a price to get go / wait / stop.".to_string(),
                &[],
            )
        },
    },
    SignalRule {
        name: "allowance_exhausted",
        guard: |i| i.trade_count >= i.max_trades,
        outcome: |i| {
            Signal::new(
                Light::Red,
                "Stop: today's trade allowance exhausted",
                format!(
                    "{} T-trades done >= limit of {}. No more trades today, avoid emotional trading.",
                    i.trade_count, i.max_trades
                ),
                &["today's T-trade allowance is used up"],
            )
        },
    },
    SignalRule {
        name: "overextended",
        guard: |i| (i.px() - i.plan.pivot).abs() > i.plan.max,
        outcome: |i| {
            let dist = (i.px() - i.plan.pivot).abs();
            Signal::new(
                Light::Red,
                "Stop: overextended move",
                format!(
                    "|price - pivot| = {:.3} > max={}. This is usually the late part of the move and the hit rate drops, stop.",
                    dist, i.plan.max
                ),
                &["beyond max excursion (overextended)"],
            )
        },
    },
    SignalRule {
        name: "neutral_band",
        guard: |i| i.bias.mode == BiasMode::Neutral,
        outcome: |i| {
            let p = i.plan;
            Signal::new(
                Light::Red,
                "Stop: inside neutral band, wait for trigger",
                format!(
                    "Price is inside pivot ± buffer ({} - {}), the easiest place to get chopped. Wait for a break >= {} or a drop <= {}.",
                    p.neutral.low, p.neutral.high, p.strong_trigger, p.weak_trigger
                ),
                &["neutral band (noise around pivot)"],
            )
        },
    },
    SignalRule {
        name: "strong_pullback_buy",
        guard: |i| i.bias.mode == BiasMode::Strong && i.plan.strong_buy.contains(i.px()),
        outcome: |i| {
            let p = i.plan;
            Signal::new(
                Light::Green,
                "Go: strong, pullback buy zone",
                format!(
                    "Pullback buy zone {} - {}; target sell zone {} - {} (target spread ~{}).",
                    p.strong_buy.low,
                    p.strong_buy.high,
                    p.strong_sell.low,
                    p.strong_sell.high,
                    p.strong_target_spread()
                ),
                &["strong confirmed + pulled back into buy zone"],
            )
        },
    },
    SignalRule {
        name: "strong_waiting",
        guard: |i| i.bias.mode == BiasMode::Strong,
        outcome: |i| {
            let p = i.plan;
            Signal::new(
                Light::Yellow,
                "Wait: strong but not at the buy zone",
                format!(
                    "Strong confirmed (>= {}), wait for a pullback into {} - {} before acting, do not chase.",
                    p.strong_trigger, p.strong_buy.low, p.strong_buy.high
                ),
                &["strong confirmed but price has not pulled back into the buy zone yet"],
            )
        },
    },
    SignalRule {
        name: "weak_bounce_sell",
        guard: |i| i.bias.mode == BiasMode::Weak && i.plan.weak_sell.contains(i.px()),
        outcome: |i| {
            let p = i.plan;
            Signal::new(
                Light::Green,
                "Go: weak, bounce sell zone",
                format!(
                    "Bounce sell zone {} - {}; target buy-back zone {} - {} (target spread ~{}).",
                    p.weak_sell.low,
                    p.weak_sell.high,
                    p.weak_buy.low,
                    p.weak_buy.high,
                    p.weak_target_spread()
                ),
                &["weak confirmed + bounced into sell zone"],
            )
        },
    },
    SignalRule {
        name: "weak_waiting",
        guard: |i| i.bias.mode == BiasMode::Weak,
        outcome: |i| {
            let p = i.plan;
            Signal::new(
                Light::Yellow,
                "Wait: weak but not at the sell zone",
                format!(
                    "Weak confirmed (<= {}), wait for a bounce into {} - {} before selling, do not dump at the lows.",
                    p.weak_trigger, p.weak_sell.low, p.weak_sell.high
                ),
                &["weak confirmed but price has not bounced into the sell zone yet"],
            )
        },
    },
];

/// First rule whose guard holds, if any.
pub fn matching_rule(input: &SignalInput<'_>) -> Option<&'static SignalRule> {
    RULES.iter().find(|rule| (rule.guard)(input))
}

pub fn evaluate(input: &SignalInput<'_>) -> Signal {
    match matching_rule(input) {
        Some(rule) => (rule.outcome)(input),
        None => Signal::blank(),
    }
}
