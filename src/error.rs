//! Error types for paperfront.
//!
//! The extraction core never returns these: a page that cannot be understood
//! still yields a (possibly empty) record. Errors come from the edges, such as
//! opening a PDF, reading a word dump or writing batch output.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for paperfront operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised outside the extraction core.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input is neither a PDF nor a word dump.
    #[error("Unknown input format: expected a PDF or a JSON word dump")]
    UnknownFormat,

    /// The PDF header carries a version string we cannot read.
    #[error("Unsupported PDF version: {0}")]
    UnsupportedVersion(String),

    /// Error parsing PDF structure or content streams.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// The PDF document is encrypted.
    #[error("Document is encrypted")]
    Encrypted,

    /// Page number is out of range.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(u32, u32),

    /// The document has no pages at all.
    #[error("Document has no pages")]
    EmptyDocument,

    /// A JSON word dump could not be decoded.
    #[error("Invalid word dump: {0}")]
    WordDump(#[from] serde_json::Error),

    /// Error while rendering a record.
    #[error("Rendering error: {0}")]
    Render(String),

    /// The prior stage's error log does not exist.
    #[error("Error log not found: {}", .0.display())]
    MissingErrorLog(PathBuf),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::PdfParse(err.to_string()),
        }
    }
}
