//! Watchlist parsed from configuration: `CODE:Name,CODE:Name`.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchlistEntry {
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WatchlistError {
    #[error("empty token in watchlist")]
    EmptyToken,

    #[error("duplicate code in watchlist: {0}")]
    DuplicateCode(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Watchlist {
    pub entries: Vec<WatchlistEntry>,
}

impl Watchlist {
    pub fn parse(input: &str) -> Result<Self, WatchlistError> {
        let mut entries = Vec::new();
        let mut seen = HashSet::new();

        if input.trim().is_empty() {
            return Ok(Self { entries });
        }

        for token in input.split(',') {
            let trimmed = token.trim();
            if trimmed.is_empty() {
                return Err(WatchlistError::EmptyToken);
            }
            let (code, name) = match trimmed.split_once(':') {
                Some((code, name)) => (code.trim(), name.trim()),
                None => (trimmed, ""),
            };
            if code.is_empty() {
                return Err(WatchlistError::EmptyToken);
            }
            let code = code.to_uppercase();
            if !seen.insert(code.clone()) {
                return Err(WatchlistError::DuplicateCode(code));
            }
            entries.push(WatchlistEntry {
                code,
                name: name.to_string(),
            });
        }

        Ok(Self { entries })
    }

    /// Display name for `code`, if listed with one.
    pub fn lookup(&self, code: &str) -> Option<&str> {
        let code = code.trim().to_uppercase();
        self.entries
            .iter()
            .find(|e| e.code == code)
            .map(|e| e.name.as_str())
            .filter(|n| !n.is_empty())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_basic() {
        let list = Watchlist::parse("600519:Kweichow Moutai, 000001:Ping An Bank").unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list.entries[0].code, "600519");
        assert_eq!(list.entries[1].name, "Ping An Bank");
    }

    #[test]
    fn name_is_optional() {
        let list = Watchlist::parse("bhp").unwrap();
        assert_eq!(list.entries[0].code, "BHP");
        assert_eq!(list.lookup("BHP"), None);
    }

    #[test]
    fn empty_input_is_empty_list() {
        assert!(Watchlist::parse("  ").unwrap().is_empty());
    }

    #[test]
    fn empty_token() {
        assert_eq!(Watchlist::parse("A,,B"), Err(WatchlistError::EmptyToken));
        assert_eq!(Watchlist::parse(":Name"), Err(WatchlistError::EmptyToken));
    }

    #[test]
    fn duplicate_code() {
        assert_eq!(
            Watchlist::parse("cba:One,CBA:Two"),
            Err(WatchlistError::DuplicateCode("CBA".into()))
        );
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let list = Watchlist::parse("abc:Alpha").unwrap();
        assert_eq!(list.lookup(" abc "), Some("Alpha"));
        assert_eq!(list.lookup("XYZ"), None);
    }
}
