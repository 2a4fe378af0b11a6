//! HTML table-layout parsing.
//!
//! The layout converter renders each invoice page as HTML: tables for the
//! line items, headings and paragraphs for everything else.

use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use super::{CellValue, RawTable, RenderedDocument};
use crate::error::ConversionError;
use crate::invoice::rules::patterns::collapse_whitespace;

/// Upper bound on `colspan`, guarding against malformed markup.
const MAX_COLSPAN: usize = 64;

/// Parse rendered HTML into tables, headings and paragraphs.
///
/// The first row of every table is its header. Empty header cells are
/// named `Unnamed: {index}` and repeated names get a `.{n}` suffix, so a
/// label column without a header is still addressable.
pub fn parse_html_layout(html: &str) -> Result<RenderedDocument, ConversionError> {
    let document = Html::parse_document(html);

    let table_sel = selector("table")?;
    let row_sel = selector("tr")?;
    let heading_sel = selector("h1, h2, h3, h4, h5, h6")?;
    let paragraph_sel = selector("p")?;

    let tables: Vec<RawTable> = document
        .select(&table_sel)
        .filter_map(|table| parse_table(table, &row_sel))
        .collect();

    let headings = document.select(&heading_sel).map(element_text).collect();
    let paragraphs = document.select(&paragraph_sel).map(element_text).collect();

    debug!("Parsed layout with {} tables", tables.len());

    Ok(RenderedDocument {
        tables,
        headings,
        paragraphs,
    })
}

fn selector(css: &str) -> Result<Selector, ConversionError> {
    Selector::parse(css).map_err(|e| ConversionError::Parse(format!("{:?}", e)))
}

fn element_text(element: ElementRef<'_>) -> String {
    collapse_whitespace(&element.text().collect::<Vec<_>>().join(" "))
}

fn parse_table(table: ElementRef<'_>, row_sel: &Selector) -> Option<RawTable> {
    let mut rows = table.select(row_sel).map(parse_row);
    let header = rows.next()?;
    let columns = header_names(&header);
    let body = rows
        .map(|row| row.into_iter().map(CellValue::from_text).collect())
        .collect();
    Some(RawTable::new(columns, body))
}

fn parse_row(row: ElementRef<'_>) -> Vec<String> {
    let mut cells = Vec::new();
    for cell in row.children().filter_map(ElementRef::wrap) {
        if !matches!(cell.value().name(), "td" | "th") {
            continue;
        }
        let span = cell
            .value()
            .attr("colspan")
            .and_then(|s| s.trim().parse::<usize>().ok())
            .unwrap_or(1)
            .clamp(1, MAX_COLSPAN);
        let text = element_text(cell);
        cells.extend(std::iter::repeat_n(text, span));
    }
    cells
}

fn header_names(header: &[String]) -> Vec<String> {
    let mut names: Vec<String> = Vec::with_capacity(header.len());
    for (i, text) in header.iter().enumerate() {
        let base = if text.is_empty() {
            format!("Unnamed: {}", i)
        } else {
            text.clone()
        };
        let mut name = base.clone();
        let mut n = 1;
        while names.contains(&name) {
            name = format!("{}.{}", base, n);
            n += 1;
        }
        names.push(name);
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const LAYOUT: &str = r#"
        <html><body>
        <h2>2024-02-01 FAKTURA</h2>
        <p>Faktura-nr</p>
        <p>123456</p>
        <table>
          <tr><th></th><th>Antal</th><th>Pris</th><th>Summa</th></tr>
          <tr><td>Överföring enkeltariff</td><td>1 234,00</td><td>45,67</td><td>563,57</td></tr>
          <tr><td colspan="3">TOTALT BELOPP</td><td>1 000,00</td></tr>
        </table>
        </body></html>
    "#;

    #[test]
    fn test_parse_layout() {
        let doc = parse_html_layout(LAYOUT).unwrap();
        assert_eq!(doc.headings, vec!["2024-02-01 FAKTURA"]);
        assert_eq!(doc.paragraphs, vec!["Faktura-nr", "123456"]);
        assert_eq!(doc.tables.len(), 1);

        let table = &doc.tables[0];
        assert_eq!(table.columns, vec!["Unnamed: 0", "Antal", "Pris", "Summa"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0][2], CellValue::Text("45,67".to_string()));
    }

    #[test]
    fn test_colspan_repeats_cell() {
        let doc = parse_html_layout(LAYOUT).unwrap();
        let row = &doc.tables[0].rows[1];
        assert_eq!(row[0], CellValue::Text("TOTALT BELOPP".to_string()));
        assert_eq!(row[2], CellValue::Text("TOTALT BELOPP".to_string()));
        assert_eq!(row[3], CellValue::Text("1 000,00".to_string()));
    }

    #[test]
    fn test_duplicate_and_empty_headers() {
        let names = header_names(&[
            String::new(),
            "Pris".to_string(),
            "Pris".to_string(),
            String::new(),
        ]);
        assert_eq!(names, vec!["Unnamed: 0", "Pris", "Pris.1", "Unnamed: 3"]);
    }

    #[test]
    fn test_whitespace_collapsed() {
        let doc = parse_html_layout("<p>  Faktura \n  datum </p><table></table>").unwrap();
        assert_eq!(doc.paragraphs, vec!["Faktura datum"]);
        assert!(doc.tables.is_empty());
    }
}
