//! Table backend: reads canonical fields out of categorized tables.

use std::sync::Arc;

use tracing::warn;

use super::categorizer::CategorizedTables;
use super::rules::normalize;
use super::schema::CompiledTemplate;
use crate::error::ExtractionError;
use crate::layout::{CellValue, RawTable};
use crate::models::record::{Backend, FieldValue, InvoiceRecord};
use crate::models::template::FieldSpec;

/// Reads labeled rows from category tables.
#[derive(Debug, Clone)]
pub struct TableFieldExtractor {
    template: Arc<CompiledTemplate>,
}

impl TableFieldExtractor {
    pub fn new(template: Arc<CompiledTemplate>) -> Self {
        Self { template }
    }

    /// Read one field from its category table.
    ///
    /// A missing row or an unparseable value yields the sentinel with a
    /// warning; a missing column is a schema error and is returned.
    pub fn try_extract_field(
        &self,
        table: &RawTable,
        field: &FieldSpec,
    ) -> Result<FieldValue, ExtractionError> {
        let label_col = table
            .column_index(&self.template.template().label_column)
            .ok_or_else(|| ExtractionError::UnknownColumn {
                category: field.category,
                column: self.template.template().label_column.to_string(),
            })?;
        let value_col =
            table
                .column_index(&field.column)
                .ok_or_else(|| ExtractionError::UnknownColumn {
                    category: field.category,
                    column: field.column.to_string(),
                })?;

        let row = table.rows.iter().find(|row| {
            row.get(label_col)
                .is_some_and(|cell| cell.as_text().starts_with(field.row_label.as_str()))
        });

        let Some(row) = row else {
            let err = ExtractionError::FieldLookup {
                category: field.category,
                label: field.row_label.clone(),
            };
            warn!("{}; {} is missing", err, field.name);
            return Ok(None);
        };

        let cell = row.get(value_col).unwrap_or(&CellValue::Empty);
        Ok(normalize_cell(&field.name, cell))
    }

    /// Read one field, degrading every failure to the sentinel.
    pub fn extract_field(&self, table: &RawTable, field: &FieldSpec) -> FieldValue {
        self.try_extract_field(table, field).unwrap_or_else(|e| {
            warn!("{}; {} is missing", e, field.name);
            None
        })
    }

    /// Read every canonical field from the categorized tables.
    ///
    /// Fails with [`ExtractionError::CategoryLookup`] when a category that
    /// fields are read from has no table, and with
    /// [`ExtractionError::UnknownColumn`] when a table lacks a configured
    /// column. Either failure means the table layout cannot be trusted.
    pub fn extract_category_fields(
        &self,
        tables: &CategorizedTables<'_>,
    ) -> Result<InvoiceRecord, ExtractionError> {
        if let Some(missing) = self
            .template
            .template()
            .required_categories()
            .into_iter()
            .find(|c| !tables.contains(*c))
        {
            return Err(ExtractionError::CategoryLookup(missing));
        }

        let mut record = self.template.empty_record(Backend::Table);
        for field in self.template.fields() {
            let table = tables
                .get(field.category)
                .ok_or(ExtractionError::CategoryLookup(field.category))?;
            let value = self.try_extract_field(table, field)?;
            record.set(&field.name, value);
        }
        Ok(record)
    }

    /// Read the fields of every category that has a table, leaving the rest
    /// at the sentinel. Never fails.
    pub fn extract_available_fields(&self, tables: &CategorizedTables<'_>) -> InvoiceRecord {
        let mut record = self.template.empty_record(Backend::Table);
        for field in self.template.fields() {
            if let Some(table) = tables.get(field.category) {
                record.set(&field.name, self.extract_field(table, field));
            }
        }
        record
    }
}

fn normalize_cell(field: &str, cell: &CellValue) -> FieldValue {
    match normalize(cell) {
        Ok(v) if v.is_finite() => Some(v),
        Ok(v) => {
            warn!("Non-finite value {} for {}; treating as missing", v, field);
            None
        }
        Err(e) => {
            warn!("{} for {}; treating as missing", e, field);
            None
        }
    }
}
