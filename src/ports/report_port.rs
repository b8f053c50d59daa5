//! Report export port trait.

use crate::domain::aggregator::HoldingsTable;
use crate::domain::error::FilingscopeError;
use crate::domain::filing::DateRange;
use crate::domain::intersect::CommonHoldings;
use crate::domain::transaction::TransactionRecord;
use std::path::Path;

/// Port for writing result files. Every file starts with the
/// `"<start> to <end>"` header line of `range`.
pub trait ReportPort {
    fn write_holdings(
        &self,
        tables: &[HoldingsTable],
        range: &DateRange,
        output_path: &Path,
    ) -> Result<(), FilingscopeError>;

    fn write_common(
        &self,
        common: &CommonHoldings,
        range: &DateRange,
        output_path: &Path,
    ) -> Result<(), FilingscopeError>;

    fn write_transactions(
        &self,
        records: &[TransactionRecord],
        range: &DateRange,
        output_path: &Path,
    ) -> Result<(), FilingscopeError>;
}
