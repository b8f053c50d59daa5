//! CSV export adapter implementing ReportPort.
//!
//! Each file starts with a plain `"<start> to <end>"` line, followed by a CSV
//! header row and the data rows. Numbers are written as raw integers.

use crate::domain::aggregator::HoldingsTable;
use crate::domain::error::FilingscopeError;
use crate::domain::filing::DateRange;
use crate::domain::intersect::CommonHoldings;
use crate::domain::transaction::TransactionRecord;
use crate::ports::report_port::ReportPort;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

const HOLDINGS_HEADER: [&str; 5] = ["filer", "issuer", "total_value", "total_shares", "filing_date"];
const COMMON_HEADER: [&str; 1] = ["issuer"];
const TRANSACTIONS_HEADER: [&str; 12] = [
    "issuer_cik",
    "issuer_name",
    "owner_cik",
    "owner_name",
    "owner_title",
    "filing_date",
    "security_title",
    "option_type",
    "transaction_code",
    "acquired_disposed",
    "action",
    "category",
];

pub struct CsvReportAdapter;

impl CsvReportAdapter {
    pub fn new() -> Self {
        Self
    }

    fn export_err(path: &Path, reason: impl ToString) -> FilingscopeError {
        FilingscopeError::Export {
            path: path.display().to_string(),
            reason: reason.to_string(),
        }
    }

    /// Creates the file, writes the range line, and hands back a CSV writer.
    fn open(
        range: &DateRange,
        output_path: &Path,
    ) -> Result<csv::Writer<BufWriter<File>>, FilingscopeError> {
        if let Some(parent) = output_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| Self::export_err(output_path, e))?;
            }
        }
        let file = File::create(output_path).map_err(|e| Self::export_err(output_path, e))?;
        let mut out = BufWriter::new(file);
        writeln!(out, "{}", range).map_err(|e| Self::export_err(output_path, e))?;
        Ok(csv::Writer::from_writer(out))
    }

    fn finish(
        mut writer: csv::Writer<BufWriter<File>>,
        output_path: &Path,
    ) -> Result<(), FilingscopeError> {
        writer.flush().map_err(|e| Self::export_err(output_path, e))?;
        log::info!("report written to {}", output_path.display());
        Ok(())
    }
}

impl Default for CsvReportAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportPort for CsvReportAdapter {
    fn write_holdings(
        &self,
        tables: &[HoldingsTable],
        range: &DateRange,
        output_path: &Path,
    ) -> Result<(), FilingscopeError> {
        let mut writer = Self::open(range, output_path)?;
        writer
            .write_record(HOLDINGS_HEADER)
            .map_err(|e| Self::export_err(output_path, e))?;

        for table in tables {
            for row in &table.rows {
                writer
                    .write_record([
                        table.filer.to_string(),
                        row.issuer.clone(),
                        row.total_value.to_string(),
                        row.total_shares.to_string(),
                        row.filing_date.to_string(),
                    ])
                    .map_err(|e| Self::export_err(output_path, e))?;
            }
        }

        Self::finish(writer, output_path)
    }

    fn write_common(
        &self,
        common: &CommonHoldings,
        range: &DateRange,
        output_path: &Path,
    ) -> Result<(), FilingscopeError> {
        let mut writer = Self::open(range, output_path)?;
        writer
            .write_record(COMMON_HEADER)
            .map_err(|e| Self::export_err(output_path, e))?;
        for issuer in &common.issuers {
            writer
                .write_record([issuer])
                .map_err(|e| Self::export_err(output_path, e))?;
        }
        Self::finish(writer, output_path)
    }

    fn write_transactions(
        &self,
        records: &[TransactionRecord],
        range: &DateRange,
        output_path: &Path,
    ) -> Result<(), FilingscopeError> {
        let mut writer = Self::open(range, output_path)?;
        writer
            .write_record(TRANSACTIONS_HEADER)
            .map_err(|e| Self::export_err(output_path, e))?;

        for record in records {
            let id = &record.identity;
            let mut row = vec![
                id.issuer_cik.clone(),
                id.issuer_name.clone(),
                id.owner_cik.clone(),
                id.owner_name.clone(),
                id.owner_title.clone(),
                record.filing_date.to_string(),
            ];
            match &record.detail {
                Some(detail) => row.extend([
                    detail.security_title.clone(),
                    detail.option_kind.to_string(),
                    detail.code.clone(),
                    detail.acquired_disposed.clone(),
                    detail.action.to_string(),
                    detail.category.to_string(),
                ]),
                // placeholder: filing had no derivative transactions
                None => row.extend(std::iter::repeat_n(String::new(), 6)),
            }
            writer
                .write_record(&row)
                .map_err(|e| Self::export_err(output_path, e))?;
        }

        Self::finish(writer, output_path)
    }
}
