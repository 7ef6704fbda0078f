//! Concrete [`PageSource`] backed by `lopdf::Document`.

use std::path::Path;

use log::warn;
use lopdf::{Document as LopdfDocument, ObjectId};

use crate::error::{Error, Result};
use crate::parser::layout::extract_page_layout;
use crate::parser::source::{LayoutLine, PageSource};

/// PDF page access via lopdf.
pub struct LopdfSource {
    doc: LopdfDocument,
    /// Page object ids in page order
    pages: Vec<(u32, ObjectId)>,
}

impl LopdfSource {
    /// Open a PDF file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let doc = LopdfDocument::load(path).map_err(map_load_error)?;
        Ok(Self::from_document(doc))
    }

    /// Open a PDF from an in-memory byte slice.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if !data.starts_with(b"%PDF-") {
            return Err(Error::UnknownFormat);
        }
        let doc = LopdfDocument::load_mem(data).map_err(map_load_error)?;
        Ok(Self::from_document(doc))
    }

    fn from_document(doc: LopdfDocument) -> Self {
        let pages = doc.get_pages().into_iter().collect();
        Self { doc, pages }
    }

    fn page_id(&self, index: usize) -> Result<(u32, ObjectId)> {
        self.pages
            .get(index)
            .copied()
            .ok_or(Error::PageOutOfRange(index, self.pages.len()))
    }
}

fn map_load_error(err: lopdf::Error) -> Error {
    match err {
        lopdf::Error::Decryption(_) => Error::Encrypted,
        other => Error::from(other),
    }
}

impl PageSource for LopdfSource {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_text(&self, index: usize) -> Result<String> {
        let (page_num, _) = self.page_id(index)?;
        // A page that fails text extraction contributes nothing; that is
        // a degenerate-but-valid result, not an ingest failure.
        match self.doc.extract_text(&[page_num]) {
            Ok(text) => Ok(text),
            Err(e) => {
                warn!("text extraction failed on page {}: {}", page_num, e);
                Ok(String::new())
            }
        }
    }

    fn page_layout(&self, index: usize) -> Result<Vec<LayoutLine>> {
        let (page_num, page_id) = self.page_id(index)?;
        match extract_page_layout(&self.doc, page_id) {
            Ok(lines) => Ok(lines),
            Err(e) => {
                warn!("layout extraction failed on page {}: {}", page_num, e);
                Ok(Vec::new())
            }
        }
    }
}
