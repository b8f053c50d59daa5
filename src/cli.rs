//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::caching_locator::{CachingLocator, DEFAULT_CACHE_CAPACITY};
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::directory_locator::DirectoryLocator;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::ticker_table_adapter::TickerTableAdapter;
use crate::domain::aggregator::HoldingsTable;
use crate::domain::classifier::TradeCategory;
use crate::domain::config_validation::{validate_report_config, validate_source_config};
use crate::domain::error::FilingscopeError;
use crate::domain::filing::{DateRange, DocumentKind, FilerId};
use crate::domain::intersect::FilerOutcome;
use crate::domain::pipeline::{
    collect_holdings, collect_transactions, common_holdings, TransactionBatch,
    DEFAULT_TRANSACTION_LIMIT,
};
use crate::domain::transaction::TransactionRecord;
use crate::ports::config_port::ConfigPort;
use crate::ports::identifier_lookup::IdentifierLookup;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(
    name = "filingscope",
    about = "Holdings and insider-trade reports from 13F-HR and Form 4 filings"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Where filings and the ticker table come from.
#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Overrides [source] data_dir
    #[arg(long)]
    pub data_dir: Option<PathBuf>,
    /// Overrides [lookup] tickers_path
    #[arg(long)]
    pub tickers: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Aggregated 13F holdings per filer
    Holdings {
        /// Filer id, ticker or exact company name
        #[arg(long = "filer", required = true, num_args = 1..)]
        filers: Vec<String>,
        /// Use the filing made on this date instead of the latest
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Rows per table, 0 for all
        #[arg(long)]
        top: Option<usize>,
        #[arg(long)]
        export: Option<PathBuf>,
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Issuers held by every filer
    Common {
        #[arg(long = "filer", required = true, num_args = 1..)]
        filers: Vec<String>,
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long)]
        export: Option<PathBuf>,
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Classified Form 4 derivative transactions
    Transactions {
        #[arg(long = "filer", required = true, num_args = 1..)]
        filers: Vec<String>,
        #[arg(long)]
        from: Option<NaiveDate>,
        #[arg(long)]
        to: Option<NaiveDate>,
        /// Filings per filer when no date range is given
        #[arg(long)]
        limit: Option<usize>,
        #[arg(long)]
        export: Option<PathBuf>,
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Resolve a ticker or company name to a filer id
    Lookup {
        #[arg(required = true)]
        query: Vec<String>,
        #[command(flatten)]
        source: SourceArgs,
    },
}

/// Settings resolved from the config file and command-line overrides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub data_dir: Option<PathBuf>,
    pub tickers_path: Option<PathBuf>,
    pub cache_size: usize,
    pub top: usize,
    pub transaction_limit: usize,
}

impl RunConfig {
    pub fn require_data_dir(&self) -> Result<&Path, FilingscopeError> {
        self.data_dir
            .as_deref()
            .ok_or_else(|| FilingscopeError::ConfigMissing {
                section: "source".into(),
                key: "data_dir".into(),
            })
    }
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Holdings {
            filers,
            date,
            top,
            export,
            source,
        } => run_holdings(&filers, date, top, export.as_deref(), &source),
        Command::Common {
            filers,
            date,
            export,
            source,
        } => run_common(&filers, date, export.as_deref(), &source),
        Command::Transactions {
            filers,
            from,
            to,
            limit,
            export,
            source,
        } => run_transactions(&filers, from, to, limit, export.as_deref(), &source),
        Command::Lookup { query, source } => run_lookup(&query.join(" "), &source),
    }
}

fn fail(err: FilingscopeError) -> ExitCode {
    eprintln!("error: {err}");
    (&err).into()
}

pub fn load_config(path: Option<&Path>) -> Result<FileConfigAdapter, FilingscopeError> {
    match path {
        Some(path) => {
            eprintln!("Loading config from {}", path.display());
            FileConfigAdapter::from_file(path)
        }
        None => Ok(FileConfigAdapter::empty()),
    }
}

pub fn build_run_config(
    config: &dyn ConfigPort,
    source: &SourceArgs,
) -> Result<RunConfig, FilingscopeError> {
    validate_source_config(config)?;
    validate_report_config(config)?;

    Ok(RunConfig {
        data_dir: source
            .data_dir
            .clone()
            .or_else(|| config.get_string("source", "data_dir").map(PathBuf::from)),
        tickers_path: source
            .tickers
            .clone()
            .or_else(|| config.get_string("lookup", "tickers_path").map(PathBuf::from)),
        cache_size: config.get_int("source", "cache_size", DEFAULT_CACHE_CAPACITY as i64) as usize,
        top: config.get_int("report", "top", 0) as usize,
        transaction_limit: config.get_int(
            "report",
            "transaction_limit",
            DEFAULT_TRANSACTION_LIMIT as i64,
        ) as usize,
    })
}

fn prepare(source: &SourceArgs) -> Result<RunConfig, FilingscopeError> {
    let config = load_config(source.config.as_deref())?;
    build_run_config(&config, source)
}

pub fn load_ticker_table(path: Option<&Path>) -> Result<TickerTableAdapter, FilingscopeError> {
    let path = path.ok_or_else(|| FilingscopeError::ConfigMissing {
        section: "lookup".into(),
        key: "tickers_path".into(),
    })?;
    TickerTableAdapter::from_file(path)
}

fn is_numeric_id(input: &str) -> bool {
    let trimmed = input.trim();
    !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_digit())
}

/// Turns command-line filer arguments into ids. The ticker table is only
/// loaded when some argument is not numeric.
pub fn resolve_filers(
    inputs: &[String],
    tickers_path: Option<&Path>,
) -> Result<Vec<FilerId>, FilingscopeError> {
    let table = if inputs.iter().any(|i| !is_numeric_id(i)) {
        Some(load_ticker_table(tickers_path)?)
    } else {
        None
    };

    let mut filers: Vec<FilerId> = Vec::with_capacity(inputs.len());
    for input in inputs {
        let id = match &table {
            Some(t) if !is_numeric_id(input) => {
                let id = t.lookup(input)?;
                log::info!("{:?} resolved to {}", input, id);
                id
            }
            _ => FilerId::parse(input)?,
        };
        if !filers.contains(&id) {
            filers.push(id);
        }
    }
    Ok(filers)
}

pub fn build_locator(run_config: &RunConfig) -> Result<CachingLocator<DirectoryLocator>, FilingscopeError> {
    let data_dir = run_config.require_data_dir()?;
    Ok(CachingLocator::new(
        DirectoryLocator::new(data_dir.to_path_buf()),
        run_config.cache_size,
    ))
}

/// Prepared inputs shared by the filing commands.
struct FilingRun {
    run_config: RunConfig,
    filers: Vec<FilerId>,
    locator: CachingLocator<DirectoryLocator>,
}

fn prepare_filing_run(inputs: &[String], source: &SourceArgs) -> Result<FilingRun, FilingscopeError> {
    let run_config = prepare(source)?;
    let filers = resolve_filers(inputs, run_config.tickers_path.as_deref())?;
    let locator = build_locator(&run_config)?;
    Ok(FilingRun {
        run_config,
        filers,
        locator,
    })
}

fn run_holdings(
    inputs: &[String],
    date: Option<NaiveDate>,
    top: Option<usize>,
    export: Option<&Path>,
    source: &SourceArgs,
) -> ExitCode {
    let run = match prepare_filing_run(inputs, source) {
        Ok(r) => r,
        Err(e) => return fail(e),
    };
    let range = date.map(DateRange::on).unwrap_or_default();
    let top = top.unwrap_or(run.run_config.top);

    eprintln!(
        "Reading {} filings for {} filer(s), {}",
        DocumentKind::Holdings,
        run.filers.len(),
        range
    );
    let outcomes = collect_holdings(&run.locator, &run.filers, &range);

    let mut tables: Vec<HoldingsTable> = Vec::new();
    let mut skipped = 0;
    for outcome in outcomes {
        match outcome {
            FilerOutcome::Retrieved(table) => {
                print_holdings(&table, top);
                tables.push(table);
            }
            FilerOutcome::Failed { .. } => skipped += 1,
        }
    }
    if skipped > 0 {
        eprintln!("{} of {} filer(s) skipped", skipped, run.filers.len());
    }

    match export {
        Some(path) => finish_export(
            CsvReportAdapter::new().write_holdings(&tables, &range, path),
            path,
        ),
        None => ExitCode::SUCCESS,
    }
}

fn print_holdings(table: &HoldingsTable, top: usize) {
    let filed = table
        .rows
        .first()
        .map(|r| r.filing_date.to_string())
        .unwrap_or_else(|| "-".to_string());
    println!("\n=== {} (filed {}, {} issuers) ===", table.filer, filed, table.len());
    println!("{:<40} {:>12} {:>12}", "Issuer", "Value", "Shares");
    for row in table.display_rows(top) {
        println!("{:<40} {:>12} {:>12}", row.issuer, row.total_value, row.total_shares);
    }
}

fn run_common(
    inputs: &[String],
    date: Option<NaiveDate>,
    export: Option<&Path>,
    source: &SourceArgs,
) -> ExitCode {
    let run = match prepare_filing_run(inputs, source) {
        Ok(r) => r,
        Err(e) => return fail(e),
    };
    let range = date.map(DateRange::on).unwrap_or_default();

    let common = common_holdings(&run.locator, &run.filers, &range);
    for excluded in &common.excluded {
        eprintln!("excluded {}: {}", excluded.filer, excluded.reason);
    }
    eprintln!(
        "{} issuer(s) held by all {} included filer(s)",
        common.issuers.len(),
        common.included.len()
    );
    for issuer in &common.issuers {
        println!("{}", issuer);
    }

    match export {
        Some(path) => finish_export(
            CsvReportAdapter::new().write_common(&common, &range, path),
            path,
        ),
        None => ExitCode::SUCCESS,
    }
}

fn run_transactions(
    inputs: &[String],
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    limit: Option<usize>,
    export: Option<&Path>,
    source: &SourceArgs,
) -> ExitCode {
    if let (Some(f), Some(t)) = (from, to) {
        if f > t {
            eprintln!("error: --from {} is after --to {}", f, t);
            return ExitCode::from(2);
        }
    }

    let run = match prepare_filing_run(inputs, source) {
        Ok(r) => r,
        Err(e) => return fail(e),
    };
    let range = DateRange::new(from, to);
    let limit = limit.unwrap_or(run.run_config.transaction_limit);

    eprintln!(
        "Reading {} filings for {} filer(s), {}",
        DocumentKind::Ownership,
        run.filers.len(),
        range
    );
    let batch = collect_transactions(&run.locator, &run.filers, &range, limit);
    print_transactions(&batch);

    match export {
        Some(path) => finish_export(
            CsvReportAdapter::new().write_transactions(&batch.records, &range, path),
            path,
        ),
        None => ExitCode::SUCCESS,
    }
}

fn print_transactions(batch: &TransactionBatch) {
    println!(
        "{:<10}  {:<28}  {:<24}  {:<5}  {:<4}  {:<9}  Category",
        "Filed", "Issuer", "Owner", "Type", "Code", "Action"
    );
    for record in &batch.records {
        println!("{}", transaction_line(record));
    }

    eprintln!("\n=== Summary ===");
    for category in TradeCategory::ALL {
        let count = batch
            .records
            .iter()
            .filter(|r| r.category() == Some(category))
            .count();
        if count > 0 {
            eprintln!("  {:<30} {}", category.label(), count);
        }
    }
    for skipped in &batch.skipped {
        match &skipped.url {
            Some(url) => eprintln!("  skipped {} ({}): {}", url, skipped.filer, skipped.reason),
            None => eprintln!("  skipped filer {}: {}", skipped.filer, skipped.reason),
        }
    }
}

pub fn transaction_line(record: &TransactionRecord) -> String {
    let id = &record.identity;
    match &record.detail {
        Some(d) => format!(
            "{:<10}  {:<28}  {:<24}  {:<5}  {:<4}  {:<9}  {}",
            record.filing_date.to_string(),
            id.issuer_name,
            id.owner_name,
            d.option_kind.to_string(),
            d.code,
            d.action.to_string(),
            d.category
        ),
        None => format!(
            "{:<10}  {:<28}  {:<24}  (no derivative transactions)",
            record.filing_date.to_string(),
            id.issuer_name,
            id.owner_name
        ),
    }
}

fn run_lookup(query: &str, source: &SourceArgs) -> ExitCode {
    let result = prepare(source)
        .and_then(|run_config| load_ticker_table(run_config.tickers_path.as_deref()))
        .and_then(|table| table.lookup(query));
    match result {
        Ok(id) => {
            println!("{}", id);
            ExitCode::SUCCESS
        }
        Err(e) => fail(e),
    }
}

/// Results are already printed; a failed export only changes the exit status.
fn finish_export(result: Result<(), FilingscopeError>, path: &Path) -> ExitCode {
    match result {
        Ok(()) => {
            eprintln!("\nReport written to: {}", path.display());
            ExitCode::SUCCESS
        }
        Err(e) => fail(e),
    }
}
