//! First-page word extraction from PDF files using lopdf.

use std::io::Read;
use std::path::Path;

use lopdf::{Dictionary, Document as LopdfDocument, Object, ObjectId};

use crate::detect::{detect_input_from_path, is_pdf_bytes, InputKind};
use crate::error::{Error, Result};
use crate::model::PageWords;

use super::content::{get_number, ContentInterpreter, PageBox};
use super::WordSource;

/// Maximum `Parent` hops followed when looking up inherited attributes.
const MAX_INHERITANCE_DEPTH: usize = 32;

/// Reads positioned words from the pages of a PDF.
pub struct PdfWordSource {
    doc: LopdfDocument,
}

impl PdfWordSource {
    /// Open a PDF file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        // Verify it's a PDF
        match detect_input_from_path(path)? {
            InputKind::Pdf { .. } => {}
            InputKind::WordDump => return Err(Error::UnknownFormat),
        }

        let doc = LopdfDocument::load(path)?;
        Ok(Self { doc })
    }

    /// Load a PDF from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if !is_pdf_bytes(data) {
            return Err(Error::UnknownFormat);
        }
        let doc = LopdfDocument::load_mem(data)?;
        Ok(Self { doc })
    }

    /// Load a PDF from a reader.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes(&data)
    }

    /// Number of pages.
    pub fn page_count(&self) -> u32 {
        self.doc.get_pages().len() as u32
    }

    fn page_id(&self, page_num: u32) -> Result<ObjectId> {
        let pages = self.doc.get_pages();
        if pages.is_empty() {
            return Err(Error::EmptyDocument);
        }
        pages
            .get(&page_num)
            .copied()
            .ok_or(Error::PageOutOfRange(page_num, pages.len() as u32))
    }

    /// Page area from `MediaBox`, inherited through `Parent`; Letter when absent.
    fn page_box(&self, page_id: ObjectId) -> PageBox {
        let mut current = self.doc.get_dictionary(page_id).ok();

        for _ in 0..MAX_INHERITANCE_DEPTH {
            let Some(dict) = current else { break };
            if let Some(page_box) = self.media_box(dict) {
                return page_box;
            }
            current = dict
                .get(b"Parent")
                .and_then(Object::as_reference)
                .ok()
                .and_then(|id| self.doc.get_dictionary(id).ok());
        }

        PageBox::LETTER
    }

    fn media_box(&self, dict: &Dictionary) -> Option<PageBox> {
        let object = match dict.get(b"MediaBox").ok()? {
            Object::Reference(id) => self.doc.get_object(*id).ok()?,
            other => other,
        };
        let values: Vec<f32> = object.as_array().ok()?.iter().filter_map(get_number).collect();
        if values.len() < 4 {
            return None;
        }

        let page_box = PageBox {
            x0: values[0].min(values[2]),
            y0: values[1].min(values[3]),
            x1: values[0].max(values[2]),
            y1: values[1].max(values[3]),
        };
        (page_box.width() > 0.0 && page_box.height() > 0.0).then_some(page_box)
    }

    /// Get page content stream; a page without `Contents` is empty.
    fn page_content(&self, page_id: ObjectId) -> Result<Vec<u8>> {
        let page_dict = self.doc.get_dictionary(page_id)?;

        let Ok(contents) = page_dict.get(b"Contents") else {
            return Ok(Vec::new());
        };

        match contents {
            Object::Reference(r) => match self.doc.get_object(*r)? {
                Object::Stream(s) => s
                    .decompressed_content()
                    .map_err(|e| Error::PdfParse(e.to_string())),
                Object::Array(arr) => Ok(self.concat_streams(arr)),
                _ => Err(Error::PdfParse("Invalid content stream".to_string())),
            },
            Object::Array(arr) => Ok(self.concat_streams(arr)),
            _ => Err(Error::PdfParse("Invalid content stream".to_string())),
        }
    }

    fn concat_streams(&self, refs: &[Object]) -> Vec<u8> {
        let mut content = Vec::new();
        for obj in refs {
            if let Object::Reference(r) = obj {
                if let Ok(Object::Stream(s)) = self.doc.get_object(*r) {
                    match s.decompressed_content() {
                        Ok(data) => {
                            content.extend_from_slice(&data);
                            content.push(b' ');
                        }
                        Err(e) => log::warn!("Skipping undecodable content stream {:?}: {}", r, e),
                    }
                }
            }
        }
        content
    }
}

impl WordSource for PdfWordSource {
    fn page_words(&self, page_num: u32) -> Result<PageWords> {
        let page_id = self.page_id(page_num)?;
        let fonts = self
            .doc
            .get_page_fonts(page_id)
            .map_err(|e| Error::PdfParse(e.to_string()))?;
        let page_box = self.page_box(page_id);
        let content = self.page_content(page_id)?;

        let words = ContentInterpreter::new(&self.doc, fonts, page_box).words(&content)?;
        log::debug!(
            "page {}: {} words, {:.0}x{:.0}",
            page_num,
            words.len(),
            page_box.width(),
            page_box.height()
        );

        Ok(PageWords::new(page_box.height(), words).with_width(page_box.width()))
    }
}
