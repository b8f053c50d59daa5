//! Filesystem-backed filing locator.
//!
//! Reads sub-documents that were retrieved earlier and saved as
//! `<base>/<filer_id>/<kind>/<label>.xml`, where `kind` is `13f` or `form4`
//! and `label` starts with the filing date (`2024-11-14.xml`,
//! `2024-11-14_infotable.xml`).

use crate::domain::error::FilingscopeError;
use crate::domain::filing::{DateRange, DocumentKind, FilerId, FilingDate, FilingReference};
use crate::ports::filing_locator::FilingLocator;
use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};

pub struct DirectoryLocator {
    base_path: PathBuf,
}

impl DirectoryLocator {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn kind_dir(&self, filer: &FilerId, kind: DocumentKind) -> PathBuf {
        self.base_path.join(filer.as_str()).join(kind.dir_name())
    }

    fn filing_date_from_stem(stem: &str) -> FilingDate {
        match stem.get(..10) {
            Some(prefix) => match FilingDate::parse(prefix) {
                FilingDate::Date(d) => FilingDate::Date(d),
                FilingDate::Label(_) => FilingDate::Label(stem.to_string()),
            },
            None => FilingDate::Label(stem.to_string()),
        }
    }

    fn newest_first(a: &FilingReference, b: &FilingReference) -> Ordering {
        match (a.filing_date.date(), b.filing_date.date()) {
            (Some(x), Some(y)) => y.cmp(&x).then_with(|| a.url.cmp(&b.url)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => a.url.cmp(&b.url),
        }
    }
}

impl FilingLocator for DirectoryLocator {
    fn locate(
        &self,
        filer: &FilerId,
        kind: DocumentKind,
        range: &DateRange,
    ) -> Result<Vec<FilingReference>, FilingscopeError> {
        let dir = self.kind_dir(filer, kind);
        if !dir.is_dir() {
            log::debug!("{} does not exist, no {} filings for {}", dir.display(), kind, filer);
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&dir).map_err(|e| FilingscopeError::Retrieval {
            filer: filer.to_string(),
            reason: format!("failed to read directory {}: {}", dir.display(), e),
        })?;

        let mut references = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| FilingscopeError::Retrieval {
                filer: filer.to_string(),
                reason: format!("directory entry error: {}", e),
            })?;

            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("xml") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };

            let filing_date = Self::filing_date_from_stem(stem);
            if !range.contains(&filing_date) {
                continue;
            }

            references.push(FilingReference::new(
                filer.clone(),
                filing_date,
                path.display().to_string(),
                kind,
            ));
        }

        references.sort_by(Self::newest_first);
        Ok(references)
    }

    fn retrieve(&self, reference: &FilingReference) -> Result<String, FilingscopeError> {
        fs::read_to_string(Path::new(&reference.url)).map_err(|e| FilingscopeError::Retrieval {
            filer: reference.filer.to_string(),
            reason: format!("failed to read {}: {}", reference.url, e),
        })
    }
}
