//! Domain error types.

/// Top-level error type for filingscope.
#[derive(Debug, thiserror::Error)]
pub enum FilingscopeError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("invalid filer id {input:?}: expected 1 to 10 digits")]
    InvalidFilerId { input: String },

    #[error("no recognized entries in {document}: <{container}> not found")]
    StructureNotFound { document: String, container: String },

    #[error("malformed markup in {document}: {reason}")]
    MalformedDocument { document: String, reason: String },

    #[error("entry {entry} in {document} is missing required field {field}")]
    MissingRequiredField {
        document: String,
        entry: usize,
        field: String,
    },

    #[error("retrieval failed for filer {filer}: {reason}")]
    Retrieval { filer: String, reason: String },

    #[error("no filer found for {query:?}")]
    LookupNotFound { query: String },

    #[error("failed to load lookup table {path}: {reason}")]
    LookupTable { path: String, reason: String },

    #[error("failed to export report to {path}: {reason}")]
    Export { path: String, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl FilingscopeError {
    /// True for failures confined to a single retrieved document.
    pub fn is_document_error(&self) -> bool {
        matches!(
            self,
            FilingscopeError::StructureNotFound { .. }
                | FilingscopeError::MalformedDocument { .. }
                | FilingscopeError::MissingRequiredField { .. }
        )
    }
}

impl FilingscopeError {
    /// Process exit status for this error family.
    pub fn exit_status(&self) -> u8 {
        match self {
            FilingscopeError::Io(_) => 1,
            FilingscopeError::ConfigParse { .. }
            | FilingscopeError::ConfigMissing { .. }
            | FilingscopeError::ConfigInvalid { .. }
            | FilingscopeError::InvalidFilerId { .. } => 2,
            FilingscopeError::StructureNotFound { .. }
            | FilingscopeError::MalformedDocument { .. }
            | FilingscopeError::MissingRequiredField { .. } => 3,
            FilingscopeError::Retrieval { .. } => 4,
            FilingscopeError::LookupNotFound { .. } | FilingscopeError::LookupTable { .. } => 5,
            FilingscopeError::Export { .. } => 6,
        }
    }
}

impl From<&FilingscopeError> for std::process::ExitCode {
    fn from(err: &FilingscopeError) -> Self {
        std::process::ExitCode::from(err.exit_status())
    }
}
