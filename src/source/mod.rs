//! Word sources: where a page's positioned words come from.
//!
//! The extraction core only sees [`PageWords`]; sources isolate the PDF
//! library and the dump format from it.

mod content;
mod pdf;

use std::path::Path;

use crate::detect::{detect_input_from_path, InputKind};
use crate::error::{Error, Result};
use crate::model::PageWords;

pub use content::PageBox;
pub use pdf::PdfWordSource;

/// Something that can produce the positioned words of a page.
pub trait WordSource {
    /// Words of a 1-based page.
    fn page_words(&self, page_num: u32) -> Result<PageWords>;

    /// Words of the first page.
    fn first_page_words(&self) -> Result<PageWords> {
        self.page_words(1)
    }
}

/// A word dump holds exactly one page.
impl WordSource for PageWords {
    fn page_words(&self, page_num: u32) -> Result<PageWords> {
        match page_num {
            1 => Ok(self.clone()),
            n => Err(Error::PageOutOfRange(n, 1)),
        }
    }
}

/// Load first-page words from a PDF or a JSON word dump, sniffing the format.
pub fn load_first_page<P: AsRef<Path>>(path: P) -> Result<PageWords> {
    let path = path.as_ref();
    match detect_input_from_path(path)? {
        InputKind::Pdf { .. } => PdfWordSource::open(path)?.first_page_words(),
        InputKind::WordDump => PageWords::from_json_file(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Word;

    #[test]
    fn test_word_dump_is_single_page() {
        let page = PageWords::new(792.0, vec![Word::new("x", 1.0, 2.0, 3.0, 4.0)]);
        assert_eq!(page.first_page_words().unwrap(), page);
        assert!(matches!(page.page_words(2), Err(Error::PageOutOfRange(2, 1))));
    }

    #[test]
    fn test_load_first_page_from_dump() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.json");
        std::fs::write(
            &path,
            r#"{"height": 800, "words": [{"text": "Hi", "x0": 1, "x1": 9, "top": 20, "size": 10}]}"#,
        )
        .unwrap();

        let page = load_first_page(&path).unwrap();
        assert_eq!(page.height, 800.0);
        assert_eq!(page.words[0].text, "Hi");
    }
}
