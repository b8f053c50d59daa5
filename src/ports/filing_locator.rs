//! Filing location and retrieval port trait.

use crate::domain::error::FilingscopeError;
use crate::domain::filing::{DateRange, DocumentKind, FilerId, FilingReference};

/// Finds a filer's filings and fetches their structured sub-documents.
///
/// Implementations own all I/O, rate limiting and retries. Both calls may
/// fail with [`FilingscopeError::Retrieval`]; the core treats that as terminal
/// for the filer concerned.
pub trait FilingLocator {
    /// Filings of `kind` whose filing date falls in `range`, newest first.
    fn locate(
        &self,
        filer: &FilerId,
        kind: DocumentKind,
        range: &DateRange,
    ) -> Result<Vec<FilingReference>, FilingscopeError>;

    /// Raw text of the structured sub-document behind `reference`.
    fn retrieve(&self, reference: &FilingReference) -> Result<String, FilingscopeError>;
}
