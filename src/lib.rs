//! # paperfront
//!
//! Layout-based fallback extraction of academic-paper front matter.
//!
//! Given the positioned words of a paper's first page, paperfront rebuilds
//! text lines, partitions them into zones (title, authors, affiliations,
//! keywords, abstract) and returns a best-effort record. It is meant for the
//! PDFs a primary metadata extractor gave up on, so every stage has a default
//! and the result says which stages fell back to it.
//!
//! ## Quick Start
//!
//! ```no_run
//! use paperfront::{extract_file, render, JsonFormat};
//!
//! fn main() -> paperfront::Result<()> {
//!     let extraction = extract_file("paper.pdf")?;
//!     for degradation in &extraction.degradations {
//!         eprintln!("fallback: {}", degradation);
//!     }
//!
//!     let record = extraction.to_record("paper.pdf");
//!     println!("{}", render::to_json(&record, JsonFormat::Pretty)?);
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Line clustering**: words grouped by vertical position into lines
//! - **Zone location**: banners, title by font size, author/affiliation split
//! - **Author resolution**: superscript-marker and unmarked layouts
//! - **Section anchors**: keywords and abstract bounded by their headers
//! - **Word sources**: lopdf content-stream reader or JSON word dumps
//! - **Batch runs**: parallel processing with a per-document timeout

pub mod batch;
pub mod detect;
pub mod error;
pub mod model;
pub mod parser;
pub mod render;
pub mod source;

// Re-export commonly used types
pub use batch::{
    load_timeout_queue, BatchOptions, BatchOutcome, BatchReport, BatchRunner, BatchSummary, StageLog,
};
pub use detect::{detect_input_from_bytes, detect_input_from_path, is_pdf_bytes, InputKind};
pub use error::{Error, Result};
pub use model::{
    AffiliationMap, Author, Degradation, Extraction, Field, FrontMatter, FrontMatterRecord, Line,
    PageWords, Word, Zone, ZoneKind,
};
pub use parser::{
    AuthorLayout, AuthorZoneParser, ExtractOptions, FrontMatterExtractor, LineClusterer, PageLayout,
    PatternTable,
};
pub use render::JsonFormat;
pub use source::{load_first_page, PdfWordSource, WordSource};

use std::io::Read;
use std::path::Path;

/// Extract front matter from a PDF or a JSON word dump.
///
/// The input kind is sniffed from the file's first bytes.
///
/// # Example
///
/// ```no_run
/// use paperfront::extract_file;
///
/// let extraction = extract_file("paper.pdf").unwrap();
/// println!("{}", extraction.front_matter.title);
/// ```
pub fn extract_file<P: AsRef<Path>>(path: P) -> Result<Extraction> {
    extract_file_with_options(path, ExtractOptions::default())
}

/// Extract front matter from a file with custom options.
///
/// # Example
///
/// ```no_run
/// use paperfront::{extract_file_with_options, ExtractOptions};
///
/// let options = ExtractOptions::new().with_journal("Journal of Field Robotics");
/// let extraction = extract_file_with_options("paper.pdf", options).unwrap();
/// ```
pub fn extract_file_with_options<P: AsRef<Path>>(path: P, options: ExtractOptions) -> Result<Extraction> {
    let page = load_first_page(path)?;
    Ok(FrontMatterExtractor::with_options(options).extract(&page))
}

/// Extract front matter from PDF bytes.
///
/// # Example
///
/// ```no_run
/// use paperfront::extract_bytes;
///
/// let data = std::fs::read("paper.pdf").unwrap();
/// let extraction = extract_bytes(&data).unwrap();
/// ```
pub fn extract_bytes(data: &[u8]) -> Result<Extraction> {
    let page = PdfWordSource::from_bytes(data)?.first_page_words()?;
    Ok(FrontMatterExtractor::new().extract(&page))
}

/// Extract front matter from a PDF reader.
pub fn extract_reader<R: Read>(reader: R) -> Result<Extraction> {
    let page = PdfWordSource::from_reader(reader)?.first_page_words()?;
    Ok(FrontMatterExtractor::new().extract(&page))
}

/// Extract the flat record for a file, named after the file.
///
/// # Example
///
/// ```no_run
/// use paperfront::extract_record;
///
/// let record = extract_record("pdfs/paper.pdf").unwrap();
/// assert_eq!(record.filename, "paper.pdf");
/// ```
pub fn extract_record<P: AsRef<Path>>(path: P) -> Result<FrontMatterRecord> {
    let path = path.as_ref();
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(extract_file(path)?.to_record(filename))
}

/// Extract a file's record as JSON.
///
/// # Example
///
/// ```no_run
/// use paperfront::{to_json, JsonFormat};
///
/// let json = to_json("paper.pdf", JsonFormat::Pretty).unwrap();
/// std::fs::write("paper.json", json).unwrap();
/// ```
pub fn to_json<P: AsRef<Path>>(path: P, format: JsonFormat) -> Result<String> {
    let record = extract_record(path)?;
    render::to_json(&record, format)
}
