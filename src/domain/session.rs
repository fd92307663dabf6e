//! Setter-driven trading session for one security.
//!
//! Holds the fixed inputs (levels, thresholds) and the mutable ones (current
//! price, trade allowance, trades taken). Every getter recomputes from those
//! inputs, cheap enough to run on each keystroke of a price field.
//!
//! With `hold_bias` enabled the session remembers the last confirmed
//! direction: a pullback from strong (or bounce from weak) into the neutral
//! band keeps the directional bias, which is what lets a price inside the
//! buy/sell zones turn green. A fresh opposite confirmation replaces it and
//! clearing the price forgets it.

use crate::domain::bias::{BiasMode, BiasState, classify};
use crate::domain::levels::PriceLevels;
use crate::domain::signal::{Signal, SignalInput, evaluate};
use crate::domain::threshold::ThresholdSet;
use crate::domain::trade_plan::TradePlan;
use serde::Serialize;

pub const DEFAULT_MAX_TRADES: u32 = 2;

/// Raw price input: empty or non-numeric text is "no price".
pub fn parse_price(input: &str) -> Option<f64> {
    input
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|p| p.is_finite())
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    pub code: String,
    pub levels: PriceLevels,
    pub thresholds: ThresholdSet,
    pub bias: BiasState,
    pub status: &'static str,
    pub plan: TradePlan,
    pub signal: Signal,
    pub trade_count: u32,
    pub max_trades: u32,
}

#[derive(Debug, Clone)]
pub struct TradingSession {
    code: String,
    levels: PriceLevels,
    thresholds: ThresholdSet,
    current_price: Option<f64>,
    max_trades: u32,
    trade_count: u32,
    hold_bias: bool,
    confirmed: Option<BiasMode>,
}

impl TradingSession {
    pub fn new(code: &str, levels: PriceLevels, max_trades: u32) -> Self {
        let thresholds = ThresholdSet::from_range(levels.range);
        Self {
            code: code.trim().to_uppercase(),
            levels,
            thresholds,
            current_price: None,
            max_trades,
            trade_count: 0,
            hold_bias: false,
            confirmed: None,
        }
    }

    pub fn with_hold_bias(mut self, hold_bias: bool) -> Self {
        self.hold_bias = hold_bias;
        self
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn levels(&self) -> &PriceLevels {
        &self.levels
    }

    pub fn thresholds(&self) -> &ThresholdSet {
        &self.thresholds
    }

    pub fn current_price(&self) -> Option<f64> {
        self.current_price
    }

    pub fn max_trades(&self) -> u32 {
        self.max_trades
    }

    pub fn trade_count(&self) -> u32 {
        self.trade_count
    }

    pub fn set_current_price(&mut self, price: Option<f64>) {
        self.current_price = price.filter(|p| p.is_finite());
        match self.current_price {
            None => self.confirmed = None,
            Some(_) => {
                let fresh = self.fresh_bias().mode;
                if matches!(fresh, BiasMode::Strong | BiasMode::Weak) {
                    self.confirmed = Some(fresh);
                }
            }
        }
    }

    pub fn set_price_input(&mut self, input: &str) {
        self.set_current_price(parse_price(input));
    }

    pub fn clear_price(&mut self) {
        self.set_current_price(None);
    }

    pub fn set_max_trades(&mut self, max_trades: u32) {
        self.max_trades = max_trades;
    }

    pub fn set_trade_count(&mut self, trade_count: u32) {
        self.trade_count = trade_count;
    }

    fn fresh_bias(&self) -> BiasState {
        classify(self.levels.pivot, self.thresholds.buffer, self.current_price)
    }

    pub fn bias(&self) -> BiasState {
        let fresh = self.fresh_bias();
        match (self.hold_bias, fresh.mode, self.confirmed) {
            (true, BiasMode::Neutral, Some(held)) => BiasState { mode: held, ..fresh },
            _ => fresh,
        }
    }

    pub fn plan(&self) -> TradePlan {
        TradePlan::build(&self.levels, &self.thresholds, self.thresholds.buffer)
    }

    // A priced zero-width plan is never executable.
    fn evaluate_signal(&self, plan: &TradePlan, bias: &BiasState) -> Signal {
        if self.current_price.is_some() && self.thresholds.is_degenerate() {
            return Signal::zero_range(plan.pivot);
        }
        evaluate(&SignalInput {
            price: self.current_price,
            plan,
            bias,
            trade_count: self.trade_count,
            max_trades: self.max_trades,
        })
    }

    pub fn signal(&self) -> Signal {
        self.evaluate_signal(&self.plan(), &self.bias())
    }

    pub fn analysis(&self) -> Analysis {
        let plan = self.plan();
        let bias = self.bias();
        let signal = self.evaluate_signal(&plan, &bias);
        Analysis {
            code: self.code.clone(),
            levels: self.levels.clone(),
            thresholds: self.thresholds,
            status: bias.status(),
            bias,
            plan,
            signal,
            trade_count: self.trade_count,
            max_trades: self.max_trades,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::signal::Light;
    use chrono::NaiveDate;

    fn session() -> TradingSession {
        let levels = PriceLevels {
            last_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            close: 11.0,
            pivot: 11.0,
            range: 2.0,
        };
        TradingSession::new("abc", levels, DEFAULT_MAX_TRADES)
    }

    #[test]
    fn parse_price_inputs() {
        assert_eq!(parse_price(" 10.52 "), Some(10.52));
        assert_eq!(parse_price(""), None);
        assert_eq!(parse_price("abc"), None);
        assert_eq!(parse_price("NaN"), None);
        assert_eq!(parse_price("inf"), None);
    }

    #[test]
    fn no_price_is_grey() {
        let s = session();
        assert_eq!(s.bias().mode, BiasMode::None);
        assert_eq!(s.signal().light, Light::Grey);
    }

    #[test]
    fn setters_trigger_recomputation() {
        let mut s = session();
        s.set_price_input("11.2");
        assert_eq!(s.bias().mode, BiasMode::Strong);
        assert_eq!(s.signal().light, Light::Yellow);

        s.set_trade_count(2);
        assert_eq!(s.signal().light, Light::Red);

        s.set_max_trades(3);
        assert_eq!(s.signal().light, Light::Yellow);
    }

    #[test]
    fn fresh_pullback_is_neutral() {
        let mut s = session();
        s.set_current_price(Some(11.2));
        s.set_current_price(Some(10.9));
        assert_eq!(s.bias().mode, BiasMode::Neutral);
        assert_eq!(s.signal().light, Light::Red);
    }

    #[test]
    fn held_bias_turns_pullback_green() {
        let mut s = session().with_hold_bias(true);
        s.set_current_price(Some(11.2));
        s.set_current_price(Some(10.9));
        assert_eq!(s.bias().mode, BiasMode::Strong);
        let signal = s.signal();
        assert_eq!(signal.light, Light::Green);
        assert!(signal.title.contains("pullback"));
    }

    #[test]
    fn held_bias_needs_a_confirmation_first() {
        let mut s = session().with_hold_bias(true);
        s.set_current_price(Some(11.05));
        assert_eq!(s.bias().mode, BiasMode::Neutral);
        assert_eq!(s.signal().light, Light::Red);
    }

    #[test]
    fn held_bias_flips_on_opposite_confirmation() {
        let mut s = session().with_hold_bias(true);
        s.set_current_price(Some(11.2));
        s.set_current_price(Some(10.5));
        s.set_current_price(Some(11.1));
        assert_eq!(s.bias().mode, BiasMode::Weak);
        assert_eq!(s.signal().light, Light::Green);
    }

    #[test]
    fn clearing_price_forgets_held_bias() {
        let mut s = session().with_hold_bias(true);
        s.set_current_price(Some(11.2));
        s.clear_price();
        s.set_current_price(Some(10.9));
        assert_eq!(s.bias().mode, BiasMode::Neutral);
    }

    #[test]
    fn zero_range_plan_is_never_green() {
        let levels = PriceLevels {
            last_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            close: 5.0,
            pivot: 5.0,
            range: 0.0,
        };
        let mut s = TradingSession::new("flat", levels, DEFAULT_MAX_TRADES);
        assert_eq!(s.signal().light, Light::Grey);

        s.set_price_input("5");
        assert_eq!(s.bias().mode, BiasMode::Strong);
        let signal = s.signal();
        assert_eq!(signal.light, Light::Red);
        assert!(signal.title.contains("zero-range"));
        assert!(!s.analysis().signal.is_executable());
    }

    #[test]
    fn analysis_snapshot() {
        let mut s = session();
        s.set_current_price(Some(11.05));
        let a = s.analysis();
        assert_eq!(a.code, "ABC");
        assert_eq!(a.status, "neutral (chop)");
        assert_eq!(a.signal.light, Light::Red);
        assert_eq!(a.plan.neutral.low, 10.875);
        assert_eq!(a.max_trades, 2);
    }

    #[test]
    fn analysis_serializes() {
        let mut s = session();
        s.set_current_price(Some(11.2));
        let json = serde_json::to_value(s.analysis()).unwrap();
        assert_eq!(json["signal"]["light"], "yellow");
        assert_eq!(json["bias"]["mode"], "strong");
        assert_eq!(json["levels"]["lastDate"], "2024-03-01");
        assert_eq!(json["plan"]["strongBuy"]["low"], 10.6);
    }
}
