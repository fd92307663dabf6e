//! SQLite review store.

use crate::domain::error::TplanError;
use crate::domain::review::{ReviewKey, ReviewRecord};
use crate::ports::config_port::ConfigPort;
use crate::ports::review_port::ReviewStore;
use chrono::NaiveDate;
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{OptionalExtension, params};

pub struct SqliteAdapter {
    pool: Pool<SqliteConnectionManager>,
}

impl SqliteAdapter {
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, TplanError> {
        let db_path =
            config
                .get_string("sqlite", "path")
                .ok_or_else(|| TplanError::ConfigMissing {
                    section: "sqlite".into(),
                    key: "path".into(),
                })?;

        let pool_size = config.get_int("sqlite", "pool_size", 4).clamp(1, 64) as u32;

        let manager = SqliteConnectionManager::file(&db_path);
        let pool =
            Pool::builder()
                .max_size(pool_size)
                .build(manager)
                .map_err(|e: r2d2::Error| TplanError::Database {
                    reason: e.to_string(),
                })?;

        tracing::info!(path = %db_path, pool_size, "opened sqlite review store");
        Ok(Self { pool })
    }

    pub fn in_memory() -> Result<Self, TplanError> {
        let manager = SqliteConnectionManager::memory();
        let pool = Pool::builder()
            .max_size(1)
            .build(manager)
            .map_err(|e: r2d2::Error| TplanError::Database {
                reason: e.to_string(),
            })?;

        Ok(Self { pool })
    }

    fn conn(&self) -> Result<PooledConnection<SqliteConnectionManager>, TplanError> {
        self.pool.get().map_err(|e: r2d2::Error| TplanError::Database {
            reason: e.to_string(),
        })
    }

    pub fn initialize_schema(&self) -> Result<(), TplanError> {
        self.conn()?
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS review (
                    code TEXT NOT NULL,
                    date TEXT NOT NULL,
                    traded_only_when_bias INTEGER NOT NULL,
                    respected_range INTEGER NOT NULL,
                    avoided_neutral INTEGER NOT NULL,
                    t_count INTEGER NOT NULL,
                    pnl REAL NOT NULL,
                    note TEXT NOT NULL,
                    PRIMARY KEY (code, date)
                );",
            )
            .map_err(|e: rusqlite::Error| TplanError::DatabaseQuery {
                reason: e.to_string(),
            })?;

        Ok(())
    }
}

impl ReviewStore for SqliteAdapter {
    fn get(&self, key: &ReviewKey) -> Result<Option<ReviewRecord>, TplanError> {
        let conn = self.conn()?;
        let date_str = key.date.format("%Y-%m-%d").to_string();

        conn.query_row(
            "SELECT date, traded_only_when_bias, respected_range, avoided_neutral, t_count, pnl, note
             FROM review
             WHERE code = ?1 AND date = ?2",
            params![key.code, date_str],
            |row| {
                let date_str: String = row.get(0)?;
                let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d").map_err(|e| {
                    rusqlite::Error::FromSqlConversionFailure(
                        date_str.len(),
                        rusqlite::types::Type::Text,
                        Box::new(e),
                    )
                })?;
                Ok(ReviewRecord {
                    date,
                    traded_only_when_bias: row.get(1)?,
                    respected_range: row.get(2)?,
                    avoided_neutral: row.get(3)?,
                    t_count: row.get(4)?,
                    pnl: row.get(5)?,
                    note: row.get(6)?,
                })
            },
        )
        .optional()
        .map_err(|e: rusqlite::Error| TplanError::DatabaseQuery {
            reason: e.to_string(),
        })
    }

    fn put(&self, key: &ReviewKey, record: &ReviewRecord) -> Result<(), TplanError> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT OR REPLACE INTO review
                (code, date, traded_only_when_bias, respected_range, avoided_neutral, t_count, pnl, note)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                key.code,
                key.date.format("%Y-%m-%d").to_string(),
                record.traded_only_when_bias,
                record.respected_range,
                record.avoided_neutral,
                record.t_count,
                record.pnl,
                record.note,
            ],
        )
        .map_err(|e: rusqlite::Error| TplanError::DatabaseQuery {
            reason: e.to_string(),
        })?;

        Ok(())
    }
}
