//! Dataset writers.

use std::fs;
use std::path::Path;

use elfaktura_core::models::config::DatasetFormat;
use elfaktura_core::models::InvoiceDataset;
use serde_json::{Map, Value};
use tracing::debug;

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Delimited text, one row per invoice
    Csv,
    /// JSON array of objects
    Json,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }
}

impl From<DatasetFormat> for OutputFormat {
    fn from(format: DatasetFormat) -> Self {
        match format {
            DatasetFormat::Csv => Self::Csv,
            DatasetFormat::Json => Self::Json,
        }
    }
}

/// Write the dataset to `path`.
pub fn write_dataset(
    dataset: &InvoiceDataset,
    path: &Path,
    format: OutputFormat,
    delimiter: char,
) -> anyhow::Result<()> {
    let content = match format {
        OutputFormat::Csv => format_csv(dataset, delimiter)?,
        OutputFormat::Json => format_json(dataset)?,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    debug!("Wrote {} rows to {}", dataset.len(), path.display());
    Ok(())
}

/// Render the dataset as CSV. Absent cells are left empty.
pub fn format_csv(dataset: &InvoiceDataset, delimiter: char) -> anyhow::Result<String> {
    if !delimiter.is_ascii() {
        anyhow::bail!("CSV delimiter must be an ASCII character, got {:?}", delimiter);
    }

    let mut wtr = csv::WriterBuilder::new()
        .delimiter(delimiter as u8)
        .from_writer(vec![]);

    wtr.write_record(dataset.columns())?;
    for row in dataset.rows() {
        wtr.write_record(
            row.iter()
                .map(|cell| cell.as_ref().map(|c| c.to_field()).unwrap_or_default()),
        )?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

/// Render the dataset as a JSON array. Absent cells become `null`.
pub fn format_json(dataset: &InvoiceDataset) -> anyhow::Result<String> {
    let columns = dataset.columns();
    let mut objects = Vec::with_capacity(dataset.len());

    for row in dataset.rows() {
        let mut object = Map::new();
        for (column, cell) in columns.iter().zip(row) {
            object.insert(column.clone(), serde_json::to_value(cell)?);
        }
        objects.push(Value::Object(object));
    }

    Ok(serde_json::to_string_pretty(&objects)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use elfaktura_core::models::{Backend, InvoiceRecord};

    fn dataset() -> InvoiceDataset {
        let mut first = InvoiceRecord::empty(["a", "b"], Backend::Table);
        first.set("a", Some(1.5));
        first.date = Some("2024-01-31".to_string());

        let mut second = InvoiceRecord::empty(["b", "c"], Backend::Text);
        second.set("c", Some(2.0));

        [first, second].into_iter().collect()
    }

    #[test]
    fn test_csv_keeps_every_column() {
        let csv = format_csv(&dataset(), ';').unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "a;b;c;date;invoice_number;backend;source");
        assert_eq!(lines[1], "1.5;;;2024-01-31;;table;");
        assert_eq!(lines[2], ";;2;;;text;");
    }

    #[test]
    fn test_json_absent_is_null() {
        let json = format_json(&dataset()).unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["a"], serde_json::json!(1.5));
        assert_eq!(value[0]["c"], Value::Null);
        assert_eq!(value[1]["backend"], serde_json::json!("text"));
    }

    #[test]
    fn test_non_ascii_delimiter_rejected() {
        assert!(format_csv(&dataset(), '§').is_err());
    }
}
