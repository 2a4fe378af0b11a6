//! Data models for templates, records, datasets and configuration.

pub mod config;
pub mod dataset;
pub mod record;
pub mod template;

pub use config::ElfakturaConfig;
pub use dataset::{Cell, InvoiceDataset};
pub use record::{Backend, ExtractionOutcome, FieldValue, InvoiceRecord};
pub use template::{BillingCategory, CategoryKeywords, ColumnRef, FieldSpec, InvoiceTemplate, MetadataSpec};
