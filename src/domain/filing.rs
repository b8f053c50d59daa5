//! Filing identity types: filer ids, filing dates and document references.

use crate::domain::error::FilingscopeError;
use chrono::NaiveDate;
use std::fmt;

pub const FILER_ID_WIDTH: usize = 10;

/// A filer identifier in fixed-width, zero-padded form (e.g. `0001350694`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FilerId(String);

impl FilerId {
    pub fn parse(input: &str) -> Result<Self, FilingscopeError> {
        let trimmed = input.trim();
        if trimmed.is_empty()
            || trimmed.len() > FILER_ID_WIDTH
            || !trimmed.chars().all(|c| c.is_ascii_digit())
        {
            return Err(FilingscopeError::InvalidFilerId {
                input: input.to_string(),
            });
        }
        Ok(FilerId(format!("{:0>width$}", trimmed, width = FILER_ID_WIDTH)))
    }

    pub fn from_number(cik: u64) -> Result<Self, FilingscopeError> {
        Self::parse(&cik.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FilerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Date a filing was made: a calendar date, or the header text verbatim when
/// it does not parse as `YYYY-MM-DD`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FilingDate {
    Date(NaiveDate),
    Label(String),
}

impl FilingDate {
    pub fn parse(text: &str) -> Self {
        let trimmed = text.trim();
        match NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
            Ok(date) => FilingDate::Date(date),
            Err(_) => FilingDate::Label(trimmed.to_string()),
        }
    }

    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            FilingDate::Date(d) => Some(*d),
            FilingDate::Label(_) => None,
        }
    }
}

impl fmt::Display for FilingDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilingDate::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            FilingDate::Label(s) => f.write_str(s),
        }
    }
}

/// Which structured sub-document a filing carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    /// 13F-HR information table.
    Holdings,
    /// Form 4 statement of changes in beneficial ownership.
    Ownership,
}

impl DocumentKind {
    pub fn dir_name(&self) -> &'static str {
        match self {
            DocumentKind::Holdings => "13f",
            DocumentKind::Ownership => "form4",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentKind::Holdings => write!(f, "13F-HR"),
            DocumentKind::Ownership => write!(f, "Form 4"),
        }
    }
}

/// One located filing document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FilingReference {
    pub filer: FilerId,
    pub filing_date: FilingDate,
    pub url: String,
    pub kind: DocumentKind,
}

impl FilingReference {
    pub fn new(filer: FilerId, filing_date: FilingDate, url: impl Into<String>, kind: DocumentKind) -> Self {
        Self {
            filer,
            filing_date,
            url: url.into(),
            kind,
        }
    }
}

/// Inclusive filing-date window. Either bound may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    pub fn on(date: NaiveDate) -> Self {
        Self {
            start: Some(date),
            end: Some(date),
        }
    }

    pub fn is_open(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// Labelled filings have no comparable date and only match an open range.
    pub fn contains(&self, date: &FilingDate) -> bool {
        match date.date() {
            Some(d) => {
                self.start.is_none_or(|s| d >= s) && self.end.is_none_or(|e| d <= e)
            }
            None => self.is_open(),
        }
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.start {
            Some(s) => write!(f, "{}", s.format("%Y-%m-%d"))?,
            None => write!(f, "beginning")?,
        }
        write!(f, " to ")?;
        match self.end {
            Some(e) => write!(f, "{}", e.format("%Y-%m-%d")),
            None => write!(f, "present"),
        }
    }
}
