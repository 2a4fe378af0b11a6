//! Raw PDF text, the input of the text fallback backend.

#[cfg(feature = "pdf")]
mod extractor;

#[cfg(feature = "pdf")]
pub use extractor::PdfTextExtractor;

use std::path::Path;

use crate::error::PdfError;

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// Source of per-page raw text for a document.
pub trait TextSource {
    /// Extract the text of every page, in page order.
    fn pages(&self, path: &Path) -> Result<Vec<String>>;
}

/// Reads the text layer of PDF files.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfTextSource;

impl PdfTextSource {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(feature = "pdf")]
impl TextSource for PdfTextSource {
    fn pages(&self, path: &Path) -> Result<Vec<String>> {
        let data = std::fs::read(path).map_err(|e| PdfError::Parse(e.to_string()))?;
        let mut extractor = PdfTextExtractor::new();
        extractor.load(&data)?;
        extractor.extract_pages()
    }
}

#[cfg(not(feature = "pdf"))]
impl TextSource for PdfTextSource {
    fn pages(&self, _path: &Path) -> Result<Vec<String>> {
        Err(PdfError::Unsupported)
    }
}
