//! Core library for utility invoice field extraction.
//!
//! This crate provides:
//! - HTML table-layout parsing and PDF raw-text extraction
//! - Keyword-based categorization of unlabeled invoice tables
//! - Table field extraction with locale-aware number parsing
//! - A regex fallback over raw text when the table layout is unusable
//! - Schema-union datasets combining records from both backends

pub mod error;
pub mod invoice;
pub mod layout;
pub mod models;
pub mod pdf;

pub use error::{ElfakturaError, Result};
pub use invoice::{CompiledTemplate, ExtractionPath, ExtractionResult, FallbackReason, InvoicePipeline};
pub use layout::{DocumentLoader, RawTable, RenderedDocument, SourceDocument};
pub use models::{Backend, ElfakturaConfig, ExtractionOutcome, FieldValue, InvoiceDataset, InvoiceRecord, InvoiceTemplate};
pub use pdf::{PdfTextSource, TextSource};
