//! Core domain types and logic.

pub mod bias;
pub mod config_validation;
pub mod discipline;
pub mod error;
pub mod levels;
pub mod plan_card;
pub mod price_bar;
pub mod review;
pub mod session;
pub mod signal;
pub mod threshold;
pub mod trade_plan;
pub mod watchlist;
