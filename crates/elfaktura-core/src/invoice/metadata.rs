//! Invoice date and number, read from either representation.

use std::sync::Arc;

use tracing::debug;

use super::rules::first_capture;
use super::schema::CompiledTemplate;
use crate::layout::RenderedDocument;

/// Identifying metadata of one invoice. Either part may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentMetadata {
    pub date: Option<String>,
    pub invoice_number: Option<String>,
}

impl DocumentMetadata {
    /// Keep every value found here and take the rest from `other`.
    pub fn or(self, other: DocumentMetadata) -> Self {
        Self {
            date: self.date.or(other.date),
            invoice_number: self.invoice_number.or(other.invoice_number),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.date.is_some() && self.invoice_number.is_some()
    }
}

/// Reads metadata markers configured by the template.
#[derive(Debug, Clone)]
pub struct MetadataExtractor {
    template: Arc<CompiledTemplate>,
}

impl MetadataExtractor {
    pub fn new(template: Arc<CompiledTemplate>) -> Self {
        Self { template }
    }

    /// Read metadata from the rendered layout.
    ///
    /// The date is the first token of the first heading ending with the
    /// heading suffix. The invoice number is the paragraph right after the
    /// first one starting with the paragraph prefix.
    pub fn from_layout(&self, layout: &RenderedDocument) -> DocumentMetadata {
        let spec = &self.template.template().metadata;

        let date = layout
            .headings
            .iter()
            .map(|h| h.trim())
            .find(|h| h.ends_with(spec.heading_suffix.as_str()))
            .and_then(|h| h.split_whitespace().next())
            .map(str::to_string);

        let invoice_number = layout
            .paragraphs
            .iter()
            .position(|p| p.trim().starts_with(spec.paragraph_prefix.as_str()))
            .and_then(|i| layout.paragraphs.get(i + 1))
            .map(|p| p.trim())
            .filter(|p| !p.is_empty())
            .map(str::to_string);

        debug!("Layout metadata: date={:?} number={:?}", date, invoice_number);
        DocumentMetadata {
            date,
            invoice_number,
        }
    }

    /// Read metadata from raw text with the template's patterns.
    pub fn from_text(&self, text: &str) -> DocumentMetadata {
        let date = first_capture(self.template.date_pattern(), text).map(str::to_string);
        let invoice_number =
            first_capture(self.template.invoice_number_pattern(), text).map(str::to_string);

        debug!("Text metadata: date={:?} number={:?}", date, invoice_number);
        DocumentMetadata {
            date,
            invoice_number,
        }
    }
}
