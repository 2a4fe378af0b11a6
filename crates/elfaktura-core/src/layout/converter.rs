//! Document conversion collaborators.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::{parse_html_layout, RenderedDocument, SourceDocument};
use crate::error::{ConversionError, Result};
use crate::models::config::ConversionConfig;
use crate::pdf::TextSource;

/// Converts a document into its table layout.
pub trait LayoutConverter {
    /// Produce the table layout. Failure is fatal for the document.
    fn convert(&self, path: &Path) -> std::result::Result<RenderedDocument, ConversionError>;
}

/// Reads pre-rendered HTML layouts.
///
/// HTML inputs are parsed directly. For any other input the layout is read
/// from a sidecar file next to it (`invoice_1.pdf` -> `invoice_1.html`).
pub struct HtmlLayoutConverter {
    suffix: String,
}

impl HtmlLayoutConverter {
    pub fn new(suffix: impl Into<String>) -> Self {
        Self {
            suffix: suffix.into(),
        }
    }

    /// Path of the layout file for a document.
    pub fn layout_path(&self, path: &Path) -> PathBuf {
        if is_html(path) {
            return path.to_path_buf();
        }
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        path.with_file_name(format!("{}{}", stem, self.suffix))
    }
}

impl Default for HtmlLayoutConverter {
    fn default() -> Self {
        Self::new(".html")
    }
}

impl LayoutConverter for HtmlLayoutConverter {
    fn convert(&self, path: &Path) -> std::result::Result<RenderedDocument, ConversionError> {
        let layout_path = self.layout_path(path);
        if !layout_path.exists() {
            return Err(ConversionError::MissingLayout(path.to_path_buf()));
        }
        let html = fs::read_to_string(&layout_path).map_err(|source| ConversionError::Read {
            path: layout_path.clone(),
            source,
        })?;
        debug!("Read layout {}", layout_path.display());
        parse_html_layout(&html)
    }
}

/// Assembles a [`SourceDocument`] from a layout converter and an optional
/// raw-text source.
pub struct DocumentLoader {
    converter: Box<dyn LayoutConverter>,
    text_source: Option<Box<dyn TextSource>>,
    page_separator: String,
}

impl DocumentLoader {
    pub fn new(converter: Box<dyn LayoutConverter>) -> Self {
        Self {
            converter,
            text_source: None,
            page_separator: " ".to_string(),
        }
    }

    /// Loader configured with the HTML converter and, when enabled, the PDF
    /// text layer.
    pub fn from_config(config: &ConversionConfig) -> Self {
        let loader = Self::new(Box::new(HtmlLayoutConverter::new(config.layout_suffix.clone())))
            .with_page_separator(config.page_separator.clone());
        if config.read_pdf_text {
            loader.with_text_source(Box::new(crate::pdf::PdfTextSource::new()))
        } else {
            loader
        }
    }

    pub fn with_text_source(mut self, source: Box<dyn TextSource>) -> Self {
        self.text_source = Some(source);
        self
    }

    pub fn with_page_separator(mut self, separator: impl Into<String>) -> Self {
        self.page_separator = separator.into();
        self
    }

    /// Load a document. Only a layout conversion failure is an error; when
    /// the raw text cannot be read, the layout's own text stands in for it.
    pub fn load(&self, path: &Path) -> Result<SourceDocument> {
        let layout = self.converter.convert(path)?;

        let text = match self.raw_text(path) {
            Some(text) => text,
            None => layout.plain_text(),
        };

        Ok(SourceDocument {
            name: path
                .file_name()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default(),
            layout: Some(layout),
            text,
        })
    }

    fn raw_text(&self, path: &Path) -> Option<String> {
        let source = self.text_source.as_ref()?;
        let pdf_path = if is_html(path) {
            let sibling = path.with_extension("pdf");
            if !sibling.exists() {
                return None;
            }
            sibling
        } else {
            path.to_path_buf()
        };

        match source.pages(&pdf_path) {
            Ok(pages) => Some(pages.join(&self.page_separator)),
            Err(e) => {
                warn!("Could not read text from {}: {}", pdf_path.display(), e);
                None
            }
        }
    }
}

fn is_html(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("html") || e.eq_ignore_ascii_case("htm"))
        .unwrap_or(false)
}
