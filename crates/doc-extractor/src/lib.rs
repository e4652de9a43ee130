//! # doc-extractor
//!
//! Pulls text out of paginated documents one page at a time, normalizes each
//! page and joins the results. A page that fails to extract is logged and
//! skipped; the document only fails as a whole when no page yields text.
//!
//! # Example
//!
//! ```ignore
//! use doc_extractor::DocumentTextExtractor;
//!
//! let extractor = DocumentTextExtractor::pdf();
//! let body = extractor.extract("documents/report.pdf".as_ref())?;
//! println!("{} of {} pages used", body.pages_used, body.total_pages);
//! ```

pub mod pdf;

use std::path::Path;

use text_normalizer::Normalizer;
use tracing::{info, instrument, warn};
use tts_core::{
    AggregatedBody, DocumentSource, PageFailure, PageOutcome, PageResult, PagedDocument,
    TextNormalizer, TtsError, TtsResult,
};

pub use pdf::{PdfDocument, PdfSource};

/// Extracts and aggregates normalized text from documents.
pub struct DocumentTextExtractor<S = PdfSource> {
    source: S,
    normalizer: Box<dyn TextNormalizer>,
}

impl<S> std::fmt::Debug for DocumentTextExtractor<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentTextExtractor").finish_non_exhaustive()
    }
}

impl DocumentTextExtractor<PdfSource> {
    /// Extractor for PDF files with the default normalizer.
    pub fn pdf() -> Self {
        Self::new(PdfSource::new())
    }
}

impl<S: DocumentSource> DocumentTextExtractor<S> {
    /// Create an extractor over the given document source.
    pub fn new(source: S) -> Self {
        Self {
            source,
            normalizer: Box::new(Normalizer::new()),
        }
    }

    /// Replace the page normalizer.
    pub fn with_normalizer(mut self, normalizer: Box<dyn TextNormalizer>) -> Self {
        self.normalizer = normalizer;
        self
    }

    /// Extract the aggregated body of the document at `path`.
    ///
    /// # Errors
    /// * `DocumentNotFound` - `path` is not an existing file; nothing is opened
    /// * `DocumentOpen` - the file could not be parsed
    /// * `EmptyDocument` - the document has no pages
    /// * `NoExtractableText` - no page produced text after normalization
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn extract(&self, path: &Path) -> TtsResult<AggregatedBody> {
        if !path.is_file() {
            return Err(TtsError::document_not_found(path));
        }

        info!("Opening document");
        let document = self.source.open(path)?;
        let total_pages = document.page_count();

        if total_pages == 0 {
            return Err(TtsError::EmptyDocument {
                path: path.to_path_buf(),
            });
        }

        let pages = self.extract_pages(document.as_ref());
        let body = aggregate(&pages).ok_or_else(|| TtsError::NoExtractableText {
            path: path.to_path_buf(),
            pages: total_pages,
        })?;

        info!(
            total_pages = body.total_pages,
            pages_used = body.pages_used,
            failed_pages = body.failures.len(),
            chars = body.char_count(),
            "Extraction complete"
        );

        Ok(body)
    }

    /// Visit every page in order, recording one result per page.
    pub fn extract_pages(&self, document: &dyn PagedDocument) -> Vec<PageResult> {
        let total = document.page_count();

        (1..=total)
            .map(|page| {
                info!(page, total, "Processing page");
                let outcome = match document.page_text(page) {
                    Ok(Some(raw)) => {
                        let text = self.normalizer.normalize(&raw);
                        if text.is_empty() {
                            PageOutcome::Empty
                        } else {
                            PageOutcome::Text(text)
                        }
                    }
                    Ok(None) => PageOutcome::Empty,
                    Err(e) => {
                        let reason = match e {
                            TtsError::PageExtraction { reason, .. } => reason,
                            other => other.to_string(),
                        };
                        warn!(page, total, reason = %reason, "Page extraction failed, skipping");
                        PageOutcome::Failed { reason }
                    }
                };
                PageResult::new(page, outcome)
            })
            .collect()
    }
}

/// Join the text of successful pages in page order.
///
/// Returns `None` when no page contributed text.
pub fn aggregate(pages: &[PageResult]) -> Option<AggregatedBody> {
    let texts: Vec<&str> = pages
        .iter()
        .filter_map(PageResult::text)
        .map(|t| t.as_str())
        .collect();

    if texts.is_empty() {
        return None;
    }

    let failures = pages
        .iter()
        .filter_map(|p| match &p.outcome {
            PageOutcome::Failed { reason } => Some(PageFailure {
                page: p.page,
                reason: reason.clone(),
            }),
            _ => None,
        })
        .collect();

    Some(AggregatedBody {
        text: texts.join("\n"),
        total_pages: pages.len(),
        pages_used: texts.len(),
        failures,
    })
}
