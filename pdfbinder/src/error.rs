//! Error types for pdfbinder.
//!
//! Errors are plain values: range parsing, planning and assembly each have
//! their own type so callers can tell a typo in a range expression apart from
//! an unreadable file.
//!
//! # Error Categories
//!
//! - **Range Errors**: a single token of a range expression is invalid
//! - **Plan Errors**: one or more documents failed to resolve (aggregated)
//! - **Codec Errors**: a PDF payload could not be read or assembled
//! - **Session Errors**: invalid edits to the merge list
//! - **Application Errors**: files, configuration and output handling

use std::io;
use std::path::PathBuf;

use crate::document::DocumentId;

/// Result type alias for pdfbinder operations.
pub type Result<T> = std::result::Result<T, PdfBinderError>;

/// Describe the valid page interval for a document with `page_count` pages.
fn valid_pages(page_count: &usize) -> String {
    match page_count {
        0 => "document has no pages".to_string(),
        1 => "valid page is 1".to_string(),
        n => format!("valid pages are 1-{n}"),
    }
}

/// A single token of a range expression could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RangeError {
    /// The token is neither `n` nor `a-b` with integer literals.
    #[error("Invalid page token '{token}' (use a page like 5 or a range like 2-7)")]
    MalformedToken {
        /// The offending token, trimmed.
        token: String,
    },

    /// A page named by the token lies outside the document.
    #[error("Page token '{token}' is out of bounds ({})", valid_pages(.page_count))]
    OutOfBounds {
        /// The offending token, trimmed.
        token: String,
        /// Number of pages in the document.
        page_count: usize,
    },

    /// A range token has its start after its end.
    #[error("Invalid range '{token}': start page {start} comes after end page {end}")]
    DescendingRange {
        /// The offending token, trimmed.
        token: String,
        /// Start of the range as written.
        start: usize,
        /// End of the range as written.
        end: usize,
    },
}

impl RangeError {
    /// The token this error refers to.
    pub fn token(&self) -> &str {
        match self {
            Self::MalformedToken { token }
            | Self::OutOfBounds { token, .. }
            | Self::DescendingRange { token, .. } => token,
        }
    }
}

/// The codec could not read a source document or produce the output.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    /// The payload is not a readable PDF.
    #[error("Could not read document '{document}': {reason}")]
    Unreadable {
        /// Document that failed.
        document: DocumentId,
        /// Reason reported by the PDF library.
        reason: String,
    },

    /// The payload is encrypted.
    #[error(
        "Document '{document}' is encrypted and cannot be merged\n  \
         Hint: Decrypt the PDF first using 'qpdf --decrypt' or similar tools"
    )]
    Encrypted {
        /// Document that failed.
        document: DocumentId,
    },

    /// A page referenced by the plan does not exist in the payload.
    #[error("Document '{document}' has no page {page}")]
    MissingPage {
        /// Document that failed.
        document: DocumentId,
        /// 1-based page number that was requested.
        page: usize,
    },

    /// Building or serializing the output failed.
    #[error("Failed to assemble merged document: {reason}")]
    Assembly {
        /// Description of what went wrong.
        reason: String,
    },
}

impl CodecError {
    /// Create an Unreadable error.
    pub fn unreadable(document: DocumentId, reason: impl Into<String>) -> Self {
        Self::Unreadable {
            document,
            reason: reason.into(),
        }
    }

    /// Create an Assembly error.
    pub fn assembly(reason: impl Into<String>) -> Self {
        Self::Assembly {
            reason: reason.into(),
        }
    }

    /// The document this error is tied to, if any.
    pub fn document(&self) -> Option<&DocumentId> {
        match self {
            Self::Unreadable { document, .. }
            | Self::Encrypted { document }
            | Self::MissingPage { document, .. } => Some(document),
            Self::Assembly { .. } => None,
        }
    }
}

/// Why one document in a plan could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DocumentError {
    /// Its range expression is invalid.
    #[error(transparent)]
    Range(#[from] RangeError),

    /// Its page count could not be read.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// An explicit range is required but the expression was empty.
    #[error("A page range is required (e.g. 1-3,5)")]
    MissingRange,
}

/// A per-document entry of a [`PlanError`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{name}: {error}")]
pub struct DocumentFailure {
    /// Identifier of the failing document.
    pub document: DocumentId,
    /// Display name of the failing document.
    pub name: String,
    /// What went wrong.
    pub error: DocumentError,
}

/// Aggregate planning failure: every document that failed, in plan order.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{} document(s) have problems that must be fixed before merging", .failures.len())]
pub struct PlanError {
    failures: Vec<DocumentFailure>,
}

impl PlanError {
    /// Create a plan error from collected failures.
    pub fn new(failures: Vec<DocumentFailure>) -> Self {
        Self { failures }
    }

    /// All per-document failures.
    pub fn failures(&self) -> &[DocumentFailure] {
        &self.failures
    }

    /// Number of failing documents.
    pub fn len(&self) -> usize {
        self.failures.len()
    }

    /// True if no document failed.
    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    /// Failure recorded for a specific document.
    pub fn failure_for(&self, document: &DocumentId) -> Option<&DocumentFailure> {
        self.failures.iter().find(|f| &f.document == document)
    }
}

/// Invalid edit of a merge list.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// A document with the same identifier is already in the list.
    #[error("Document '{0}' is already in the merge list")]
    DuplicateDocument(DocumentId),

    /// No document with this identifier is in the list.
    #[error("Document '{0}' is not in the merge list")]
    UnknownDocument(DocumentId),

    /// A new order is not a permutation of the current documents.
    #[error("Invalid document order: {0}")]
    InvalidOrder(String),
}

/// Main error type for pdfbinder operations.
#[derive(Debug, thiserror::Error)]
pub enum PdfBinderError {
    /// Input file was not found.
    #[error("File not found: {}", .path.display())]
    FileNotFound {
        /// Path to the file that was not found.
        path: PathBuf,
    },

    /// Input path exists but is not a file.
    #[error("Not a file: {}", .path.display())]
    NotAFile {
        /// Path that is not a file.
        path: PathBuf,
    },

    /// Input file could not be read.
    #[error("Failed to read file: {}\n  Reason: {source}", .path.display())]
    FailedToRead {
        /// Path to the file.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// One or more documents failed to resolve.
    #[error(transparent)]
    Plan(#[from] PlanError),

    /// The codec failed.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// The merge list was edited incorrectly.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// The plan resolved but selects no pages at all.
    #[error("No pages selected for merging")]
    NothingToMerge,

    /// Output file already exists and overwrite is not allowed.
    #[error(
        "Output file already exists: {}\n  \
         Use --force to overwrite or choose a different output path",
        .path.display()
    )]
    OutputExists {
        /// Path to the existing output file.
        path: PathBuf,
    },

    /// Failed to create output file.
    #[error("Failed to create output file: {}\n  Reason: {source}", .path.display())]
    FailedToCreateOutput {
        /// Path where output should be created.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Failed to write to output file.
    #[error("Failed to write to output file: {}\n  Reason: {source}", .path.display())]
    FailedToWrite {
        /// Path being written to.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of what's wrong with the configuration.
        message: String,
    },

    /// Manifest file could not be parsed.
    #[error("Invalid manifest: {}\n  Details: {details}", .path.display())]
    InvalidManifest {
        /// Path to the manifest.
        path: PathBuf,
        /// Details about what's invalid.
        details: String,
    },

    /// User cancelled the operation.
    #[error("Operation cancelled by user")]
    Cancelled,

    /// Generic I/O error.
    #[error("I/O error: {source}")]
    Io {
        /// Underlying I/O error.
        #[from]
        source: io::Error,
    },

    /// Generic error with a custom message.
    #[error("{message}")]
    Other {
        /// Error message.
        message: String,
    },
}

impl PdfBinderError {
    /// Create a FileNotFound error.
    pub fn file_not_found(path: PathBuf) -> Self {
        Self::FileNotFound { path }
    }

    /// Create a NotAFile error.
    pub fn not_a_file(path: PathBuf) -> Self {
        Self::NotAFile { path }
    }

    /// Create an OutputExists error.
    pub fn output_exists(path: PathBuf) -> Self {
        Self::OutputExists { path }
    }

    /// Create an InvalidConfig error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create an InvalidManifest error.
    pub fn invalid_manifest(path: PathBuf, details: impl Into<String>) -> Self {
        Self::InvalidManifest {
            path,
            details: details.into(),
        }
    }

    /// Create an Other error with a custom message.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Check if this error was caused by user input the user can fix and retry.
    ///
    /// Environment failures (disk, permissions) and cancellation return false.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::Plan(_)
                | Self::Session(_)
                | Self::NothingToMerge
                | Self::InvalidConfig { .. }
                | Self::InvalidManifest { .. }
                | Self::OutputExists { .. }
        )
    }

    /// Get the exit code for this error.
    ///
    /// Returns the appropriate process exit code based on error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::FileNotFound { .. } => 2,
            Self::NotAFile { .. } => 2,
            Self::FailedToRead { .. } => 2,
            Self::Plan(_) => 1,
            Self::Codec(_) => 3,
            Self::Session(_) => 1,
            Self::NothingToMerge => 1,
            Self::OutputExists { .. } => 4,
            Self::FailedToCreateOutput { .. } => 5,
            Self::FailedToWrite { .. } => 5,
            Self::InvalidConfig { .. } => 1,
            Self::InvalidManifest { .. } => 1,
            Self::Cancelled => 130, // Standard exit code for SIGINT
            Self::Io { .. } => 5,
            Self::Other { .. } => 1,
        }
    }
}
