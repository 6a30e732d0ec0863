//! Input format detection.
//!
//! The CLI accepts either a PDF or a pdfplumber-style JSON word dump for the
//! same commands, so inputs are sniffed from their first bytes rather than
//! trusted by extension.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// PDF magic bytes: %PDF-
const PDF_MAGIC: &[u8] = b"%PDF-";
const VERSION_LEN: usize = 3; // e.g., "1.7"

/// Kind of input handed to the extractor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputKind {
    /// A PDF file with its header version (e.g., "1.7").
    Pdf { version: String },
    /// A JSON word dump (object or array at the top level).
    WordDump,
}

impl std::fmt::Display for InputKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputKind::Pdf { version } => write!(f, "PDF {}", version),
            InputKind::WordDump => write!(f, "word dump"),
        }
    }
}

/// Detect the input kind from a file path.
pub fn detect_input_from_path<P: AsRef<Path>>(path: P) -> Result<InputKind> {
    let mut file = File::open(path)?;
    let mut header = Vec::with_capacity(64);
    file.by_ref().take(64).read_to_end(&mut header)?;
    detect_input_from_bytes(&header)
}

/// Detect the input kind from the leading bytes of a file.
pub fn detect_input_from_bytes(data: &[u8]) -> Result<InputKind> {
    if data.starts_with(PDF_MAGIC) {
        return pdf_version(data).map(|version| InputKind::Pdf { version });
    }

    // Skip a UTF-8 BOM and leading whitespace before looking for JSON.
    let data = data.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(data);
    match data.iter().find(|b| !b.is_ascii_whitespace()) {
        Some(b'{') | Some(b'[') => Ok(InputKind::WordDump),
        _ => Err(Error::UnknownFormat),
    }
}

/// Check if bytes start with a valid PDF header.
pub fn is_pdf_bytes(data: &[u8]) -> bool {
    matches!(detect_input_from_bytes(data), Ok(InputKind::Pdf { .. }))
}

fn pdf_version(data: &[u8]) -> Result<String> {
    let start = PDF_MAGIC.len();
    let version_bytes = data
        .get(start..start + VERSION_LEN)
        .ok_or(Error::UnknownFormat)?;
    let version = String::from_utf8_lossy(version_bytes).to_string();

    if !is_valid_version(&version) {
        return Err(Error::UnsupportedVersion(version));
    }
    Ok(version)
}

fn is_valid_version(version: &str) -> bool {
    let bytes = version.as_bytes();
    bytes.len() == 3 && bytes[0].is_ascii_digit() && bytes[1] == b'.' && bytes[2].is_ascii_digit()
}
