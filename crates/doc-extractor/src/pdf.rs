//! PDF document source backed by `lopdf`.

use std::path::Path;

use tracing::debug;
use tts_core::{DocumentSource, PagedDocument, TtsError, TtsResult};

/// Opens PDF files.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfSource;

impl PdfSource {
    /// Create a new PDF source.
    pub fn new() -> Self {
        Self
    }
}

impl DocumentSource for PdfSource {
    fn open(&self, path: &Path) -> TtsResult<Box<dyn PagedDocument>> {
        let doc = lopdf::Document::load(path)
            .map_err(|e| TtsError::document_open(path, e.to_string()))?;
        Ok(Box::new(PdfDocument::new(doc)))
    }
}

/// A loaded PDF with its page numbers in document order.
pub struct PdfDocument {
    doc: lopdf::Document,
    page_numbers: Vec<u32>,
}

impl std::fmt::Debug for PdfDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PdfDocument")
            .field("pages", &self.page_numbers.len())
            .finish()
    }
}

impl PdfDocument {
    /// Wrap a parsed document.
    pub fn new(doc: lopdf::Document) -> Self {
        // `get_pages` is keyed by page number, so iteration is already in order.
        let page_numbers = doc.get_pages().into_keys().collect();
        Self { doc, page_numbers }
    }
}

impl PagedDocument for PdfDocument {
    fn page_count(&self) -> usize {
        self.page_numbers.len()
    }

    fn page_text(&self, page: usize) -> TtsResult<Option<String>> {
        let number = page
            .checked_sub(1)
            .and_then(|i| self.page_numbers.get(i))
            .copied()
            .ok_or_else(|| TtsError::page_extraction(page, "page index out of range"))?;

        let text = self
            .doc
            .extract_text(&[number])
            .map_err(|e| TtsError::page_extraction(page, e.to_string()))?;

        debug!(page, raw_len = text.len(), "Extracted raw page text");

        if text.trim().is_empty() {
            Ok(None)
        } else {
            Ok(Some(text))
        }
    }
}
