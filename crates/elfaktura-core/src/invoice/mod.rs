//! Invoice field extraction: categorization, the two backends and the
//! orchestrating pipeline.

mod categorizer;
mod metadata;
mod pipeline;
pub mod rules;
mod schema;
mod table;
mod text;

#[cfg(test)]
mod fixtures;

pub use categorizer::{CategorizedTables, TableCategorizer};
pub use metadata::{DocumentMetadata, MetadataExtractor};
pub use pipeline::{ExtractionPath, ExtractionResult, FallbackReason, InvoicePipeline};
pub use schema::CompiledTemplate;
pub use table::TableFieldExtractor;
pub use text::TextFieldExtractor;
