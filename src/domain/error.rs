//! Domain error types.

use crate::domain::watchlist::WatchlistError;

/// Top-level error type for tplan.
#[derive(Debug, thiserror::Error)]
pub enum TplanError {
    #[error("invalid price data: {reason}")]
    InvalidPriceData { reason: String },

    #[error("empty csv")]
    EmptyCsv,

    #[error("CSV error: {reason}")]
    Csv { reason: String },

    #[error("no data for {code}")]
    NoData { code: String },

    #[error("database error: {reason}")]
    Database { reason: String },

    #[error("database query error: {reason}")]
    DatabaseQuery { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    Watchlist(#[from] WatchlistError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl TplanError {
    pub fn invalid_price(reason: impl Into<String>) -> Self {
        TplanError::InvalidPriceData {
            reason: reason.into(),
        }
    }
}

impl From<&TplanError> for std::process::ExitCode {
    fn from(err: &TplanError) -> Self {
        let code: u8 = match err {
            TplanError::Io(_) => 1,
            TplanError::ConfigParse { .. }
            | TplanError::ConfigMissing { .. }
            | TplanError::ConfigInvalid { .. }
            | TplanError::Watchlist(_) => 2,
            TplanError::Database { .. } | TplanError::DatabaseQuery { .. } => 3,
            TplanError::InvalidPriceData { .. } | TplanError::EmptyCsv | TplanError::Csv { .. } => {
                4
            }
            TplanError::NoData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
