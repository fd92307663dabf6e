//! Pre-market plan card: a plain-text summary meant to be copied out and
//! kept next to the quote screen.

use crate::domain::levels::PriceLevels;
use crate::domain::trade_plan::TradePlan;

pub struct PlanCard<'a> {
    pub code: &'a str,
    pub name: Option<&'a str>,
    pub levels: &'a PriceLevels,
    pub plan: &'a TradePlan,
    pub max_trades: u32,
}

impl PlanCard<'_> {
    pub fn render(&self) -> String {
        let p = self.plan;
        let l = self.levels;
        let mut out = String::new();

        out.push_str("[T-trade plan card | pre-market]\n");
        out.push_str(&format!(
            "Security: {} {}\n",
            self.code,
            self.name.unwrap_or("").trim()
        ));
        out.push_str(&format!("Last trading day: {}\n", l.last_date.format("%Y-%m-%d")));
        out.push_str(&format!(
            "Key: close={} | pivot={} | range={}\n",
            l.close, p.pivot, l.range
        ));
        out.push_str(&format!(
            "Thresholds: good={} | max={} | buffer={}\n",
            p.good, p.max, p.buffer
        ));
        out.push_str(&format!(
            "Max T-trades today: {} (few and precise)\n\n",
            self.max_trades
        ));

        out.push_str(&format!("[Strong mode] trigger: price >= {}\n", p.strong_trigger));
        out.push_str("- Only: pullback buy -> rebound sell\n");
        out.push_str(&format!(
            "- Pullback buy zone: {} - {}\n",
            p.strong_buy.low, p.strong_buy.high
        ));
        out.push_str(&format!(
            "- Target sell zone: {} - {}\n",
            p.strong_sell.low, p.strong_sell.high
        ));
        out.push_str(&format!("- Target spread ~{}\n\n", p.strong_target_spread()));

        out.push_str(&format!("[Weak mode] trigger: price <= {}\n", p.weak_trigger));
        out.push_str("- Only: bounce sell -> pullback buy back\n");
        out.push_str(&format!(
            "- Bounce sell zone: {} - {}\n",
            p.weak_sell.low, p.weak_sell.high
        ));
        out.push_str(&format!(
            "- Target buy-back zone: {} - {}\n",
            p.weak_buy.low, p.weak_buy.high
        ));
        out.push_str(&format!("- Target spread ~{}\n\n", p.weak_target_spread()));

        out.push_str(&format!(
            "[Do not force] neutral band: {} - {}\n",
            p.neutral.low, p.neutral.high
        ));
        out.push_str("- No trades inside neutral, wait for strong/weak to trigger\n\n");

        out.push_str(&format!(
            "Discipline: aim for good={}; if fills keep needing more than max={} today, treat it as overextended/emotional trading and stop.",
            p.good, p.max
        ));
        if p.is_zero_width() {
            out.push_str("\nRange was zero: every zone collapses onto the pivot, do not execute.");
        }
        out
    }
}
