//! Configuration validation.
//!
//! Checks every section a command may read before anything is loaded.

use crate::domain::error::TplanError;
use crate::domain::watchlist::Watchlist;
use crate::ports::config_port::ConfigPort;
use std::net::SocketAddr;

pub const MAX_TRADES_LIMIT: i64 = 10;
pub const DEFAULT_LISTEN: &str = "127.0.0.1:8787";

pub fn validate_config(config: &dyn ConfigPort) -> Result<(), TplanError> {
    validate_max_trades(config)?;
    validate_review_backend(config)?;
    validate_listen(config)?;
    validate_watchlist(config)?;
    Ok(())
}

fn validate_max_trades(config: &dyn ConfigPort) -> Result<(), TplanError> {
    let Some(raw) = config.get_string("plan", "max_trades") else {
        return Ok(());
    };
    match raw.trim().parse::<i64>() {
        Ok(v) if (0..=MAX_TRADES_LIMIT).contains(&v) => Ok(()),
        _ => Err(TplanError::ConfigInvalid {
            section: "plan".to_string(),
            key: "max_trades".to_string(),
            reason: format!("max_trades must be an integer between 0 and {MAX_TRADES_LIMIT}"),
        }),
    }
}

fn validate_review_backend(config: &dyn ConfigPort) -> Result<(), TplanError> {
    match review_backend(config).as_str() {
        "memory" => Ok(()),
        "sqlite" => match config.get_string("sqlite", "path") {
            Some(s) if !s.trim().is_empty() => Ok(()),
            _ => Err(TplanError::ConfigMissing {
                section: "sqlite".to_string(),
                key: "path".to_string(),
            }),
        },
        other => Err(TplanError::ConfigInvalid {
            section: "review".to_string(),
            key: "backend".to_string(),
            reason: format!("unknown backend '{other}', expected sqlite or memory"),
        }),
    }
}

fn validate_listen(config: &dyn ConfigPort) -> Result<(), TplanError> {
    let listen = config
        .get_string("web", "listen")
        .unwrap_or_else(|| DEFAULT_LISTEN.to_string());
    listen
        .trim()
        .parse::<SocketAddr>()
        .map(|_| ())
        .map_err(|_| TplanError::ConfigInvalid {
            section: "web".to_string(),
            key: "listen".to_string(),
            reason: format!("'{listen}' is not a socket address"),
        })
}

fn validate_watchlist(config: &dyn ConfigPort) -> Result<(), TplanError> {
    if let Some(codes) = config.get_string("watchlist", "codes") {
        Watchlist::parse(&codes)?;
    }
    Ok(())
}

/// `[review] backend`, lowercased. Defaults to `sqlite` when `[sqlite] path`
/// is set, `memory` otherwise.
pub fn review_backend(config: &dyn ConfigPort) -> String {
    match config.get_string("review", "backend") {
        Some(b) => b.trim().to_lowercase(),
        None if config.get_string("sqlite", "path").is_some() => "sqlite".to_string(),
        None => "memory".to_string(),
    }
}

/// `[plan] max_trades`, defaulting to 2.
pub fn max_trades(config: &dyn ConfigPort) -> u32 {
    config
        .get_int("plan", "max_trades", 2)
        .clamp(0, MAX_TRADES_LIMIT) as u32
}

pub fn watchlist(config: &dyn ConfigPort) -> Result<Watchlist, TplanError> {
    match config.get_string("watchlist", "codes") {
        Some(codes) => Ok(Watchlist::parse(&codes)?),
        None => Ok(Watchlist::default()),
    }
}
