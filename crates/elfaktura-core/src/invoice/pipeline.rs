//! Per-document extraction: table backend first, text backend as fallback.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use thiserror::Error;
use tracing::{debug, info, warn};

use super::categorizer::TableCategorizer;
use super::metadata::{DocumentMetadata, MetadataExtractor};
use super::schema::CompiledTemplate;
use super::table::TableFieldExtractor;
use super::text::TextFieldExtractor;
use crate::error::{ExtractionError, Result, TemplateError};
use crate::layout::{DocumentLoader, SourceDocument};
use crate::models::config::ExtractionConfig;
use crate::models::record::{Backend, ExtractionOutcome, InvoiceRecord};
use crate::models::template::InvoiceTemplate;

/// Why the table backend was abandoned for a document.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FallbackReason {
    /// The document has no table layout at all.
    #[error("no table layout")]
    NoLayout,

    /// A category table or a configured column was missing.
    #[error(transparent)]
    Extraction(#[from] ExtractionError),
}

/// Which backend produced the fields of a document.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractionPath {
    /// All required category tables were found and read.
    TableExtracted(InvoiceRecord),
    /// The table backend failed; the record comes from the raw text.
    TextFallback {
        record: InvoiceRecord,
        reason: FallbackReason,
    },
}

impl ExtractionPath {
    pub fn backend(&self) -> Backend {
        match self {
            Self::TableExtracted(_) => Backend::Table,
            Self::TextFallback { .. } => Backend::Text,
        }
    }
}

/// Result of invoice extraction.
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    /// The emitted record, classified by completeness.
    pub outcome: ExtractionOutcome,
    /// Backend that produced the fields.
    pub backend: Backend,
    /// Set when the text fallback ran.
    pub fallback_reason: Option<FallbackReason>,
    /// Extraction warnings.
    pub warnings: Vec<String>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

impl ExtractionResult {
    pub fn record(&self) -> &InvoiceRecord {
        self.outcome.record()
    }

    pub fn used_fallback(&self) -> bool {
        self.fallback_reason.is_some()
    }
}

/// Runs both backends over one document at a time.
///
/// Holds only the compiled template, so a single pipeline serves a whole
/// batch.
#[derive(Debug, Clone)]
pub struct InvoicePipeline {
    template: Arc<CompiledTemplate>,
    categorizer: TableCategorizer,
    tables: TableFieldExtractor,
    text: TextFieldExtractor,
    metadata: MetadataExtractor,
}

impl InvoicePipeline {
    /// Build a pipeline for a template, validating it first.
    pub fn new(template: InvoiceTemplate) -> std::result::Result<Self, TemplateError> {
        Ok(Self::with_compiled(Arc::new(CompiledTemplate::compile(template)?)))
    }

    /// Pipeline for the built-in template.
    pub fn builtin() -> Self {
        Self::with_compiled(Arc::new(CompiledTemplate::builtin()))
    }

    pub fn with_compiled(template: Arc<CompiledTemplate>) -> Self {
        Self {
            categorizer: TableCategorizer::new(template.keyword_sets().to_vec()),
            tables: TableFieldExtractor::new(Arc::clone(&template)),
            text: TextFieldExtractor::new(Arc::clone(&template)),
            metadata: MetadataExtractor::new(Arc::clone(&template)),
            template,
        }
    }

    /// Pipeline for the configured template file, or the built-in one.
    pub fn from_config(config: &ExtractionConfig) -> Result<Self> {
        match &config.template_path {
            Some(path) => {
                debug!("Loading template from {}", path.display());
                Ok(Self::new(InvoiceTemplate::from_file(path)?)?)
            }
            None => Ok(Self::builtin()),
        }
    }

    pub fn template(&self) -> &CompiledTemplate {
        &self.template
    }

    /// Run the table backend, switching to the text backend when it fails.
    ///
    /// After a switch, fields the text backend left at the sentinel are
    /// filled from the category tables that were found.
    pub fn run(&self, document: &SourceDocument) -> ExtractionPath {
        let Some(layout) = &document.layout else {
            return self.fallback(document, FallbackReason::NoLayout, None);
        };

        let categorized = self.categorizer.categorize(&layout.tables);
        debug!(
            "Categorized {} of {} tables: {:?}",
            categorized.len(),
            layout.tables.len(),
            categorized.categories()
        );

        match self.tables.extract_category_fields(&categorized) {
            Ok(record) => ExtractionPath::TableExtracted(record),
            Err(e) => {
                let partial = self.tables.extract_available_fields(&categorized);
                self.fallback(document, e.into(), Some(&partial))
            }
        }
    }

    fn fallback(
        &self,
        document: &SourceDocument,
        reason: FallbackReason,
        partial: Option<&InvoiceRecord>,
    ) -> ExtractionPath {
        info!(
            "{}: table extraction failed ({}), falling back to raw text",
            document.name, reason
        );
        let mut record = self.text.extract_from_text(&document.text);
        if let Some(partial) = partial {
            let filled = record.fill_missing(partial);
            if filled > 0 {
                debug!("{}: {} fields filled from found tables", document.name, filled);
            }
        }
        ExtractionPath::TextFallback { record, reason }
    }

    /// Extract one document into a single record.
    pub fn extract(&self, document: &SourceDocument) -> ExtractionResult {
        let start = Instant::now();
        let mut warnings = Vec::new();

        let path = self.run(document);
        let backend = path.backend();
        let (mut record, fallback_reason) = match path {
            ExtractionPath::TableExtracted(record) => (record, None),
            ExtractionPath::TextFallback { record, reason } => {
                warnings.push(format!("Used raw-text fallback: {}", reason));
                (record, Some(reason))
            }
        };

        let metadata = self.metadata_for(document, backend);
        record.date = metadata.date;
        record.invoice_number = metadata.invoice_number;
        record.source = Some(document.name.clone());

        match &record.date {
            None => warnings.push("Could not extract billing date".to_string()),
            Some(date) if record.billing_date().is_none() => {
                warn!("{}: billing date {:?} is not YYYY-MM-DD", document.name, date);
                warnings.push(format!("Unrecognized billing date {:?}", date));
            }
            Some(_) => {}
        }
        if record.invoice_number.is_none() {
            warnings.push("Could not extract invoice number".to_string());
        }

        if record.is_blank() {
            warn!(
                "{}: no fields and no date extracted, keeping record for manual review",
                document.name
            );
            warnings.push("Document appears unparseable".to_string());
        }

        let outcome = ExtractionOutcome::from_record(record);
        if let ExtractionOutcome::Degraded { missing, .. } = &outcome {
            warnings.push(format!("{} fields missing", missing.len()));
        }

        let processing_time_ms = start.elapsed().as_millis() as u64;
        info!(
            "{}: extracted via {} backend in {}ms",
            document.name, backend, processing_time_ms
        );

        ExtractionResult {
            outcome,
            backend,
            fallback_reason,
            warnings,
            processing_time_ms,
        }
    }

    /// Load a document from disk and extract it. Only a conversion failure
    /// is returned as an error.
    pub fn process_path(&self, loader: &DocumentLoader, path: &Path) -> Result<ExtractionResult> {
        let document = loader.load(path)?;
        Ok(self.extract(&document))
    }

    /// Metadata from the source matching the backend, gaps filled from the
    /// other source.
    fn metadata_for(&self, document: &SourceDocument, backend: Backend) -> DocumentMetadata {
        let from_layout = || {
            document
                .layout
                .as_ref()
                .map(|layout| self.metadata.from_layout(layout))
                .unwrap_or_default()
        };
        let from_text = || self.metadata.from_text(&document.text);

        match backend {
            Backend::Table => fill_gaps(from_layout(), from_text),
            Backend::Text => fill_gaps(from_text(), from_layout),
        }
    }
}

fn fill_gaps(
    primary: DocumentMetadata,
    secondary: impl FnOnce() -> DocumentMetadata,
) -> DocumentMetadata {
    if primary.is_complete() {
        primary
    } else {
        primary.or(secondary())
    }
}

impl Default for InvoicePipeline {
    fn default() -> Self {
        Self::builtin()
    }
}
