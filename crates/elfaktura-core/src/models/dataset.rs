//! Combined dataset of invoice records with schema-union semantics.

use serde::Serialize;

use super::record::InvoiceRecord;
use super::template::METADATA_COLUMNS;

/// A single dataset cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Number(f64),
    Text(String),
}

impl Cell {
    /// Render the cell for delimited output.
    pub fn to_field(&self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s.clone(),
        }
    }
}

/// Records from many documents, in insertion order.
///
/// Columns are the union of every record's field names in first-seen order,
/// followed by the metadata columns. A record lacking a column yields an
/// absent cell instead of dropping the column.
#[derive(Debug, Clone, Default)]
pub struct InvoiceDataset {
    records: Vec<InvoiceRecord>,
}

impl InvoiceDataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: InvoiceRecord) {
        self.records.push(record);
    }

    /// Diagonal concatenation of two datasets.
    pub fn concat(mut self, other: InvoiceDataset) -> Self {
        self.records.extend(other.records);
        self
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[InvoiceRecord] {
        &self.records
    }

    /// Union of all columns.
    pub fn columns(&self) -> Vec<String> {
        let mut columns: Vec<String> = Vec::new();
        for record in &self.records {
            for name in record.field_names() {
                if !columns.iter().any(|c| c == name) {
                    columns.push(name.to_string());
                }
            }
        }
        columns.extend(METADATA_COLUMNS.iter().map(|c| c.to_string()));
        columns
    }

    /// Every record aligned to [`columns`](Self::columns).
    pub fn rows(&self) -> Vec<Vec<Option<Cell>>> {
        let columns = self.columns();
        self.records
            .iter()
            .map(|record| columns.iter().map(|c| cell(record, c)).collect())
            .collect()
    }
}

impl FromIterator<InvoiceRecord> for InvoiceDataset {
    fn from_iter<T: IntoIterator<Item = InvoiceRecord>>(iter: T) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

fn cell(record: &InvoiceRecord, column: &str) -> Option<Cell> {
    match column {
        "date" => record.date.clone().map(Cell::Text),
        "invoice_number" => record.invoice_number.clone().map(Cell::Text),
        "backend" => Some(Cell::Text(record.backend.to_string())),
        "source" => record.source.clone().map(Cell::Text),
        name => record.get(name).flatten().map(Cell::Number),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::record::Backend;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_union_keeps_columns_from_both_records() {
        let mut first = InvoiceRecord::empty(["a", "b"], Backend::Table);
        first.set("a", Some(1.0));
        let mut second = InvoiceRecord::empty(["b", "c"], Backend::Text);
        second.set("c", Some(3.0));

        let dataset = InvoiceDataset::from_iter([first]).concat(InvoiceDataset::from_iter([second]));

        assert_eq!(
            dataset.columns(),
            vec!["a", "b", "c", "date", "invoice_number", "backend", "source"]
        );
        let rows = dataset.rows();
        assert_eq!(rows[0][0], Some(Cell::Number(1.0)));
        assert_eq!(rows[0][2], None);
        assert_eq!(rows[1][0], None);
        assert_eq!(rows[1][2], Some(Cell::Number(3.0)));
        assert_eq!(rows[1][5], Some(Cell::Text("text".to_string())));
    }

    #[test]
    fn test_disjoint_missing_fields_keep_full_schema() {
        let names = ["x", "y"];
        let mut first = InvoiceRecord::empty(names, Backend::Table);
        first.set("x", Some(1.0));
        let mut second = InvoiceRecord::empty(names, Backend::Text);
        second.set("y", Some(2.0));

        let mut dataset = InvoiceDataset::new();
        dataset.push(first);
        dataset.push(second);

        assert_eq!(dataset.columns().len(), names.len() + METADATA_COLUMNS.len());
        assert!(dataset.rows().iter().all(|r| r.len() == dataset.columns().len()));
    }

    #[test]
    fn test_empty_dataset_has_metadata_columns() {
        let dataset = InvoiceDataset::new();
        assert!(dataset.is_empty());
        assert_eq!(dataset.columns().len(), METADATA_COLUMNS.len());
    }
}
