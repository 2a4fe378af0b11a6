//! Rendered document model: unlabeled tables, headings and paragraphs.

mod converter;
mod html;

pub use converter::{DocumentLoader, HtmlLayoutConverter, LayoutConverter};
pub use html::parse_html_layout;

use crate::models::template::ColumnRef;

/// A single table cell.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Empty,
}

impl CellValue {
    /// Cell from rendered text; blank text becomes [`CellValue::Empty`].
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        if text.trim().is_empty() {
            Self::Empty
        } else {
            Self::Text(text)
        }
    }

    /// Text form of the cell; empty cells render as "".
    pub fn as_text(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Number(n) => n.to_string(),
            Self::Empty => String::new(),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        Self::from_text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

/// An unlabeled grid extracted from a rendered document.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawTable {
    /// Column names taken from the header row.
    pub columns: Vec<String>,
    /// Body rows, each exactly `columns.len()` wide.
    pub rows: Vec<Vec<CellValue>>,
}

impl RawTable {
    /// Build a table, padding or truncating rows to the header width.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, CellValue::Empty);
                row
            })
            .collect();
        Self { columns, rows }
    }

    /// Resolve a column reference to an index.
    pub fn column_index(&self, column: &ColumnRef) -> Option<usize> {
        match column {
            ColumnRef::Index(i) if *i < self.columns.len() => Some(*i),
            ColumnRef::Index(_) => None,
            ColumnRef::Name(name) => self.columns.iter().position(|c| c == name),
        }
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&CellValue> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// Flattened text form: header line followed by one line per row,
    /// cells separated by tabs.
    pub fn to_text(&self) -> String {
        let mut lines = Vec::with_capacity(self.rows.len() + 1);
        lines.push(self.columns.join("\t"));
        for row in &self.rows {
            lines.push(row.iter().map(CellValue::as_text).collect::<Vec<_>>().join("\t"));
        }
        lines.join("\n")
    }
}

/// The table-layout representation of one invoice.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RenderedDocument {
    pub tables: Vec<RawTable>,
    /// Heading texts in document order.
    pub headings: Vec<String>,
    /// Paragraph texts in document order.
    pub paragraphs: Vec<String>,
}

impl RenderedDocument {
    /// All rendered text, used when no PDF text layer is available.
    pub fn plain_text(&self) -> String {
        self.headings
            .iter()
            .cloned()
            .chain(self.paragraphs.iter().cloned())
            .chain(self.tables.iter().map(RawTable::to_text))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// A document ready for extraction.
#[derive(Debug, Clone, Default)]
pub struct SourceDocument {
    /// Document name, usually the file name.
    pub name: String,
    /// Table layout, when conversion produced one.
    pub layout: Option<RenderedDocument>,
    /// Concatenated raw text of all pages.
    pub text: String,
}
