//! Per-filer holdings aggregation.
//!
//! Records are grouped by exact issuer name (no case folding, no suffix
//! normalisation), value and shares summed, and the table sorted by total value
//! descending. The sort is stable, so equal totals keep first-seen order.

use crate::domain::filing::{FilerId, FilingDate};
use crate::domain::holding::HoldingRecord;
use crate::domain::magnitude::format_magnitude;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateHolding {
    pub issuer: String,
    pub total_value: u64,
    pub total_shares: u64,
    pub filing_date: FilingDate,
}

/// Display form of an [`AggregateHolding`]; numbers abbreviated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayHolding {
    pub issuer: String,
    pub total_value: String,
    pub total_shares: String,
    pub filing_date: String,
}

impl From<&AggregateHolding> for DisplayHolding {
    fn from(row: &AggregateHolding) -> Self {
        Self {
            issuer: row.issuer.clone(),
            total_value: format_magnitude(row.total_value),
            total_shares: format_magnitude(row.total_shares),
            filing_date: row.filing_date.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoldingsTable {
    pub filer: FilerId,
    pub rows: Vec<AggregateHolding>,
}

impl HoldingsTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Issuer names in table order.
    pub fn issuers(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|r| r.issuer.as_str())
    }

    pub fn get(&self, issuer: &str) -> Option<&AggregateHolding> {
        self.rows.iter().find(|r| r.issuer == issuer)
    }

    pub fn total_value(&self) -> u64 {
        self.rows.iter().fold(0u64, |acc, r| acc.saturating_add(r.total_value))
    }

    pub fn total_shares(&self) -> u64 {
        self.rows.iter().fold(0u64, |acc, r| acc.saturating_add(r.total_shares))
    }

    /// The `n` largest rows; `n == 0` means all of them.
    pub fn top(&self, n: usize) -> &[AggregateHolding] {
        if n == 0 || n >= self.rows.len() {
            &self.rows
        } else {
            &self.rows[..n]
        }
    }

    pub fn display_rows(&self, n: usize) -> Vec<DisplayHolding> {
        self.top(n).iter().map(DisplayHolding::from).collect()
    }
}

pub fn aggregate_holdings(filer: FilerId, records: &[HoldingRecord]) -> HoldingsTable {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut rows: Vec<AggregateHolding> = Vec::new();

    for record in records {
        match index.get(record.issuer.as_str()) {
            Some(&i) => {
                let row = &mut rows[i];
                row.total_value = row.total_value.saturating_add(record.value);
                row.total_shares = row.total_shares.saturating_add(record.shares);
            }
            None => {
                index.insert(record.issuer.as_str(), rows.len());
                rows.push(AggregateHolding {
                    issuer: record.issuer.clone(),
                    total_value: record.value,
                    total_shares: record.shares,
                    filing_date: record.filing_date.clone(),
                });
            }
        }
    }

    rows.sort_by(|a, b| b.total_value.cmp(&a.total_value));

    HoldingsTable { filer, rows }
}
