//! Per-filer retrieval → parse → aggregate/classify runs.
//!
//! Filers are processed one after another. A failure for one filer (or one
//! document) is logged and recorded, and the run moves on to the next.

use crate::domain::aggregator::{aggregate_holdings, HoldingsTable};
use crate::domain::document::{parse_holdings, parse_transactions};
use crate::domain::error::FilingscopeError;
use crate::domain::filing::{DateRange, DocumentKind, FilerId, FilingReference};
use crate::domain::intersect::{intersect, CommonHoldings, FilerOutcome};
use crate::domain::transaction::TransactionRecord;
use crate::ports::filing_locator::FilingLocator;

pub const DEFAULT_TRANSACTION_LIMIT: usize = 5;

/// Builds the holdings table for one filer from its most recent 13F filing
/// (or the one filed on `range`, when given).
pub fn holdings_for_filer(
    locator: &dyn FilingLocator,
    filer: &FilerId,
    range: &DateRange,
) -> Result<HoldingsTable, FilingscopeError> {
    let references = locator.locate(filer, DocumentKind::Holdings, range)?;
    let reference = references
        .first()
        .ok_or_else(|| FilingscopeError::Retrieval {
            filer: filer.to_string(),
            reason: format!("no {} filing found ({})", DocumentKind::Holdings, range),
        })?;

    log::info!("{}: using {} filed {}", filer, reference.url, reference.filing_date);
    let text = locator.retrieve(reference)?;
    let records = parse_holdings(&text, reference)?;
    Ok(aggregate_holdings(filer.clone(), &records))
}

pub fn collect_holdings(
    locator: &dyn FilingLocator,
    filers: &[FilerId],
    range: &DateRange,
) -> Vec<FilerOutcome> {
    filers
        .iter()
        .map(|filer| match holdings_for_filer(locator, filer, range) {
            Ok(table) => FilerOutcome::Retrieved(table),
            Err(e) => {
                log::warn!("skipping filer {} ({})", filer, e);
                FilerOutcome::Failed {
                    filer: filer.clone(),
                    reason: e.to_string(),
                }
            }
        })
        .collect()
}

pub fn common_holdings(
    locator: &dyn FilingLocator,
    filers: &[FilerId],
    range: &DateRange,
) -> CommonHoldings {
    intersect(&collect_holdings(locator, filers, range))
}

/// A filer or single document that could not be processed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFiling {
    pub filer: FilerId,
    pub url: Option<String>,
    pub reason: String,
}

#[derive(Debug, Clone, Default)]
pub struct TransactionBatch {
    pub records: Vec<TransactionRecord>,
    pub skipped: Vec<SkippedFiling>,
}

/// Classified Form 4 transactions for each filer. With an open `range` only
/// the `limit` most recent filings per filer are read.
pub fn collect_transactions(
    locator: &dyn FilingLocator,
    filers: &[FilerId],
    range: &DateRange,
    limit: usize,
) -> TransactionBatch {
    let mut batch = TransactionBatch::default();

    for filer in filers {
        let mut references = match locator.locate(filer, DocumentKind::Ownership, range) {
            Ok(refs) => refs,
            Err(e) => {
                log::warn!("skipping filer {} ({})", filer, e);
                batch.skipped.push(SkippedFiling {
                    filer: filer.clone(),
                    url: None,
                    reason: e.to_string(),
                });
                continue;
            }
        };

        if range.is_open() {
            references.truncate(limit);
        }
        log::info!("{}: {} {} filing(s) found", filer, references.len(), DocumentKind::Ownership);

        for reference in &references {
            match transactions_for_filing(locator, reference) {
                Ok(records) => batch.records.extend(records),
                Err(e) => {
                    log::warn!("skipping {} for filer {} ({})", reference.url, filer, e);
                    batch.skipped.push(SkippedFiling {
                        filer: filer.clone(),
                        url: Some(reference.url.clone()),
                        reason: e.to_string(),
                    });
                    // Retrieval failures end this filer; parse failures only this document.
                    if !e.is_document_error() {
                        break;
                    }
                }
            }
        }
    }

    batch
}

fn transactions_for_filing(
    locator: &dyn FilingLocator,
    reference: &FilingReference,
) -> Result<Vec<TransactionRecord>, FilingscopeError> {
    let text = locator.retrieve(reference)?;
    parse_transactions(&text, reference)
}
