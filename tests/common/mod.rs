#![allow(dead_code)]

use chrono::NaiveDate;
use std::collections::HashMap;
use std::io::Write;
use tplan::domain::error::TplanError;
use tplan::domain::levels::PriceLevels;
use tplan::domain::price_bar::PriceBar;
use tplan::ports::config_port::ConfigPort;
use tplan::ports::data_port::DataPort;

pub struct MockDataPort {
    pub bars: HashMap<String, PriceBar>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            bars: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bar(mut self, code: &str, bar: PriceBar) -> Self {
        self.bars.insert(code.to_string(), bar);
        self
    }

    pub fn with_error(mut self, code: &str, reason: &str) -> Self {
        self.errors.insert(code.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn latest_bar(&self, code: &str) -> Result<PriceBar, TplanError> {
        if let Some(reason) = self.errors.get(code) {
            return Err(TplanError::Csv {
                reason: reason.clone(),
            });
        }
        self.bars.get(code).cloned().ok_or_else(|| TplanError::NoData {
            code: code.to_string(),
        })
    }

    fn list_codes(&self) -> Result<Vec<String>, TplanError> {
        let mut codes: Vec<_> = self.bars.keys().cloned().collect();
        codes.sort();
        Ok(codes)
    }
}

pub struct MockConfigPort {
    pub values: HashMap<(String, String), String>,
}

impl MockConfigPort {
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
        }
    }

    pub fn with(mut self, section: &str, key: &str, value: &str) -> Self {
        self.values
            .insert((section.to_string(), key.to_string()), value.to_string());
        self
    }
}

impl ConfigPort for MockConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.values
            .get(&(section.to_string(), key.to_string()))
            .cloned()
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        self.get_string(section, key)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(default)
    }

    fn get_double(&self, section: &str, key: &str, default: f64) -> f64 {
        self.get_string(section, key)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(default)
    }

    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
        match self.get_string(section, key).as_deref() {
            Some("true") | Some("1") | Some("yes") => true,
            Some("false") | Some("0") | Some("no") => false,
            _ => default,
        }
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// The worked example used throughout: H=12, L=10, C=11 gives pivot 11,
/// range 2.
pub fn reference_bar() -> PriceBar {
    PriceBar::new(date(2024, 3, 1), 12.0, 10.0, 11.0)
}

pub fn reference_levels() -> PriceLevels {
    PriceLevels::from_bar(&reference_bar()).unwrap()
}

pub const REFERENCE_CSV: &str = "date,open,high,low,close,volume\n\
    2024-02-29,10.5,11.5,10.2,10.8,120000\n\
    2024-03-01,10.8,12,10,11,150000\n";

pub fn write_temp_file(content: &str, suffix: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}
