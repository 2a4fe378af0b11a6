//! Error types for the elfaktura-core library.

use std::path::PathBuf;

use thiserror::Error;

use crate::models::template::BillingCategory;

/// Main error type for the elfaktura library.
#[derive(Error, Debug)]
pub enum ElfakturaError {
    /// Document conversion error (document-fatal).
    #[error("conversion error: {0}")]
    Conversion(#[from] ConversionError),

    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// Invoice extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Invoice template error.
    #[error("template error: {0}")]
    Template(#[from] TemplateError),

    /// Numeric format error.
    #[error(transparent)]
    Format(#[from] FormatError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// A locale-formatted number could not be parsed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("not a locale-formatted number: {input:?}")]
pub struct FormatError {
    /// The offending input, before normalization.
    pub input: String,
}

impl FormatError {
    pub fn new(input: impl Into<String>) -> Self {
        Self { input: input.into() }
    }
}

/// Errors raised while reading fields out of categorized tables.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    /// No row in the category table starts with the configured label.
    #[error("no row starting with {label:?} in {category} table")]
    FieldLookup {
        category: BillingCategory,
        label: String,
    },

    /// The category table is missing from the document entirely.
    #[error("no {0} table found in document")]
    CategoryLookup(BillingCategory),

    /// The category table has no column with the configured key.
    #[error("{category} table has no column {column:?}")]
    UnknownColumn {
        category: BillingCategory,
        column: String,
    },
}

/// Errors from the document conversion collaborator.
#[derive(Error, Debug)]
pub enum ConversionError {
    /// No table layout is available for the document.
    #[error("no table layout found for {}", .0.display())]
    MissingLayout(PathBuf),

    /// Failed to read the layout source.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The layout source is not usable markup.
    #[error("failed to parse layout: {0}")]
    Parse(String),
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// PDF support was not compiled in.
    #[error("PDF support is disabled")]
    Unsupported,
}

/// Errors raised when an invoice template is invalid.
#[derive(Error, Debug)]
pub enum TemplateError {
    /// A field pattern is not a valid regular expression.
    #[error("invalid pattern for {field}: {source}")]
    Pattern {
        field: String,
        #[source]
        source: regex::Error,
    },

    /// A field refers to a category without a keyword set.
    #[error("field {field} refers to undeclared category {category}")]
    UndeclaredCategory {
        field: String,
        category: BillingCategory,
    },

    /// Two fields share a name.
    #[error("duplicate field name: {0}")]
    DuplicateField(String),

    /// A field name collides with a metadata column.
    #[error("field name {0} is reserved")]
    ReservedName(String),

    /// A category has no keywords and would match every table.
    #[error("category {0} has an empty keyword set")]
    EmptyKeywords(BillingCategory),

    /// The template file could not be read or decoded.
    #[error("failed to load template: {0}")]
    Load(String),
}

/// Result type for the elfaktura library.
pub type Result<T> = std::result::Result<T, ElfakturaError>;
