//! Filer lookup over a downloaded `company_tickers.json` table.

use crate::domain::error::FilingscopeError;
use crate::domain::filing::FilerId;
use crate::ports::identifier_lookup::IdentifierLookup;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TickerEntry {
    pub cik_str: u64,
    pub ticker: String,
    pub title: String,
}

pub struct TickerTableAdapter {
    entries: Vec<TickerEntry>,
}

impl TickerTableAdapter {
    pub fn from_file(path: &Path) -> Result<Self, FilingscopeError> {
        let content = fs::read_to_string(path).map_err(|e| FilingscopeError::LookupTable {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_json(&content).map_err(|e| match e {
            FilingscopeError::LookupTable { reason, .. } => FilingscopeError::LookupTable {
                path: path.display().to_string(),
                reason,
            },
            other => other,
        })
    }

    /// Parses the `{"0": {...}, "1": {...}}` shape. Entries are kept in
    /// numeric key order.
    pub fn from_json(content: &str) -> Result<Self, FilingscopeError> {
        let table: HashMap<String, TickerEntry> =
            serde_json::from_str(content).map_err(|e| FilingscopeError::LookupTable {
                path: "<inline>".into(),
                reason: e.to_string(),
            })?;

        let mut keyed: Vec<(u64, TickerEntry)> = Vec::with_capacity(table.len());
        for (key, entry) in table {
            let index = key.parse::<u64>().map_err(|_| FilingscopeError::LookupTable {
                path: "<inline>".into(),
                reason: format!("non-numeric key {:?}", key),
            })?;
            keyed.push((index, entry));
        }
        keyed.sort_by_key(|(index, _)| *index);

        Ok(Self {
            entries: keyed.into_iter().map(|(_, entry)| entry).collect(),
        })
    }

    pub fn entries(&self) -> &[TickerEntry] {
        &self.entries
    }

    pub fn find(&self, query: &str) -> Option<&TickerEntry> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }
        self.entries
            .iter()
            .find(|e| e.ticker.eq_ignore_ascii_case(query) || e.title.trim() == query)
    }
}

impl IdentifierLookup for TickerTableAdapter {
    fn lookup(&self, query: &str) -> Result<FilerId, FilingscopeError> {
        let entry = self
            .find(query)
            .ok_or_else(|| FilingscopeError::LookupNotFound {
                query: query.trim().to_string(),
            })?;
        log::debug!("resolved {:?} to {} ({})", query, entry.cik_str, entry.title);
        FilerId::from_number(entry.cik_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    const TABLE: &str = r#"{
        "2": {"cik_str": 1067983, "ticker": "BRK-B", "title": "BERKSHIRE HATHAWAY INC"},
        "0": {"cik_str": 320193, "ticker": "AAPL", "title": "Apple Inc."},
        "1": {"cik_str": 1067983, "ticker": "BRK-A", "title": "BERKSHIRE HATHAWAY INC"},
        "10": {"cik_str": 999, "ticker": "APPL", "title": "Apple Inc."}
    }"#;

    fn adapter() -> TickerTableAdapter {
        TickerTableAdapter::from_json(TABLE).unwrap()
    }

    #[test]
    fn entries_are_in_numeric_key_order() {
        let binding = adapter();
        let tickers: Vec<&str> = binding.entries().iter().map(|e| e.ticker.as_str()).collect();
        assert_eq!(tickers, vec!["AAPL", "BRK-A", "BRK-B", "APPL"]);
    }

    #[test]
    fn ticker_match_ignores_case_and_padding() {
        let id = adapter().lookup("  aapl ").unwrap();
        assert_eq!(id.as_str(), "0000320193");
    }

    #[test]
    fn title_match_is_exact() {
        assert_eq!(
            adapter().lookup("BERKSHIRE HATHAWAY INC").unwrap().as_str(),
            "0001067983"
        );
        assert!(matches!(
            adapter().lookup("Berkshire Hathaway Inc"),
            Err(FilingscopeError::LookupNotFound { .. })
        ));
    }

    #[test]
    fn first_entry_wins_on_duplicate_title() {
        assert_eq!(adapter().lookup("Apple Inc.").unwrap().as_str(), "0000320193");
    }

    #[test]
    fn empty_query_is_not_found() {
        let err = adapter().lookup("   ").unwrap_err();
        assert_eq!(err.exit_status(), 5);
    }

    #[test]
    fn bad_json_is_table_error() {
        assert!(matches!(
            TickerTableAdapter::from_json("[1, 2"),
            Err(FilingscopeError::LookupTable { .. })
        ));
        assert!(matches!(
            TickerTableAdapter::from_json(r#"{"x": {"cik_str": 1, "ticker": "A", "title": "A"}}"#),
            Err(FilingscopeError::LookupTable { .. })
        ));
    }

    #[test]
    fn from_file_reports_path() {
        let file = NamedTempFile::new().unwrap();
        fs::write(file.path(), "not json").unwrap();
        match TickerTableAdapter::from_file(file.path()) {
            Err(FilingscopeError::LookupTable { path, .. }) => {
                assert_eq!(path, file.path().display().to_string())
            }
            other => panic!("expected LookupTable, got {:?}", other.map(|a| a.entries.len())),
        }

        fs::write(file.path(), TABLE).unwrap();
        let loaded = TickerTableAdapter::from_file(file.path()).unwrap();
        assert_eq!(loaded.entries().len(), 4);
    }
}
