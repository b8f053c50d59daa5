//! Holding records parsed from 13F information tables.

use crate::domain::filing::FilingDate;

/// One reported position, as printed in the filing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoldingRecord {
    pub issuer: String,
    pub value: u64,
    pub shares: u64,
    pub filing_date: FilingDate,
}

impl HoldingRecord {
    pub fn new(issuer: impl Into<String>, value: u64, shares: u64, filing_date: FilingDate) -> Self {
        Self {
            issuer: issuer.into(),
            value,
            shares,
            filing_date,
        }
    }
}
