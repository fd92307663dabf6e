//! CSV daily bar adapter.
//!
//! Expects a header row naming `date, open, high, low, close, volume` in any
//! order. Only the last data row is taken as the most recent trading day.

use crate::domain::error::TplanError;
use crate::domain::price_bar::PriceBar;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%Y%m%d"];

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, code: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", code.trim().to_uppercase()))
    }
}

impl DataPort for CsvAdapter {
    fn latest_bar(&self, code: &str) -> Result<PriceBar, TplanError> {
        let path = self.csv_path(code);
        if !path.exists() {
            return Err(TplanError::NoData {
                code: code.to_string(),
            });
        }
        let content = fs::read_to_string(&path)?;
        tracing::debug!(path = %path.display(), "reading daily bars");
        parse_latest_bar(&content)
    }

    fn list_codes(&self) -> Result<Vec<String>, TplanError> {
        let entries = fs::read_dir(&self.base_path)?;

        let mut codes = Vec::new();
        for entry in entries {
            let name = entry?.file_name();
            let name_str = name.to_string_lossy();
            if let Some(code) = name_str.strip_suffix(".csv") {
                codes.push(code.to_uppercase());
            }
        }

        codes.sort();
        Ok(codes)
    }
}

struct Columns {
    date: usize,
    open: Option<usize>,
    high: usize,
    low: usize,
    close: usize,
    volume: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self, TplanError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().trim_start_matches('\u{feff}').eq_ignore_ascii_case(name))
        };
        let require = |name: &str| {
            find(name).ok_or_else(|| TplanError::Csv {
                reason: format!("missing {name} column"),
            })
        };
        Ok(Self {
            date: require("date")?,
            open: find("open"),
            high: require("high")?,
            low: require("low")?,
            close: require("close")?,
            volume: find("volume"),
        })
    }
}

fn parse_date(value: &str) -> Result<NaiveDate, TplanError> {
    let value = value.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
        .ok_or_else(|| TplanError::Csv {
            reason: format!("invalid date '{value}'"),
        })
}

fn parse_price(record: &csv::StringRecord, idx: usize, name: &str) -> Result<f64, TplanError> {
    let raw = record.get(idx).unwrap_or("").trim();
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(TplanError::invalid_price(format!("{name} '{raw}' is not a finite number"))),
    }
}

fn parse_optional(record: &csv::StringRecord, idx: Option<usize>) -> Option<f64> {
    idx.and_then(|i| record.get(i))
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

/// Parse CSV text and return its last row as a bar.
///
/// Earlier rows are not validated; only the most recent day feeds the plan.
pub fn parse_latest_bar(content: &str) -> Result<PriceBar, TplanError> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers = rdr
        .headers()
        .map_err(|e| TplanError::Csv {
            reason: format!("CSV header error: {e}"),
        })?
        .clone();

    let mut last = None;
    for result in rdr.records() {
        let record = result.map_err(|e| TplanError::Csv {
            reason: format!("CSV parse error: {e}"),
        })?;
        if record.iter().all(|f| f.is_empty()) {
            continue;
        }
        last = Some(record);
    }
    let record = last.ok_or(TplanError::EmptyCsv)?;
    let columns = Columns::from_headers(&headers)?;

    let date = parse_date(record.get(columns.date).unwrap_or(""))?;
    Ok(PriceBar {
        date,
        open: parse_optional(&record, columns.open),
        high: parse_price(&record, columns.high, "high")?,
        low: parse_price(&record, columns.low, "low")?,
        close: parse_price(&record, columns.close, "close")?,
        volume: parse_optional(&record, columns.volume),
    })
}
