//! Filer identifier lookup port trait.

use crate::domain::error::FilingscopeError;
use crate::domain::filing::FilerId;

pub trait IdentifierLookup {
    /// Resolves a display name or ticker symbol to a filer id. No match is
    /// [`FilingscopeError::LookupNotFound`], never a default.
    fn lookup(&self, query: &str) -> Result<FilerId, FilingscopeError>;
}
