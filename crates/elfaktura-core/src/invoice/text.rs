//! Text backend: regex extraction over the raw PDF text.
//!
//! This is the terminal fallback. It always produces a complete record;
//! fields without a pattern or without a match hold the sentinel.

use std::sync::Arc;

use tracing::{debug, warn};

use super::rules::{first_capture, parse_locale_number};
use super::schema::CompiledTemplate;
use crate::models::record::{Backend, InvoiceRecord};

/// Applies the template's field -> pattern table to raw text.
#[derive(Debug, Clone)]
pub struct TextFieldExtractor {
    template: Arc<CompiledTemplate>,
}

impl TextFieldExtractor {
    pub fn new(template: Arc<CompiledTemplate>) -> Self {
        Self { template }
    }

    /// Extract every canonical field from the concatenated text of all pages.
    /// Each field takes the first capture group of its pattern's first match.
    pub fn extract_from_text(&self, text: &str) -> InvoiceRecord {
        let mut record = self.template.empty_record(Backend::Text);

        for (field, pattern) in self.template.field_patterns() {
            let Some(pattern) = pattern else {
                continue;
            };
            let Some(raw) = first_capture(pattern, text) else {
                debug!("No match for {}", field.name);
                continue;
            };
            match parse_locale_number(raw) {
                Ok(value) => {
                    record.set(&field.name, Some(value));
                }
                Err(e) => warn!("{} for {}; treating as missing", e, field.name),
            }
        }

        record
    }

    /// Join page texts and extract.
    pub fn extract_from_pages(&self, pages: &[String], separator: &str) -> InvoiceRecord {
        self.extract_from_text(&pages.join(separator))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoice::fixtures::INVOICE_TEXT;
    use crate::models::template::InvoiceTemplate;
    use pretty_assertions::assert_eq;

    fn extractor() -> TextFieldExtractor {
        TextFieldExtractor::new(Arc::new(CompiledTemplate::builtin()))
    }

    #[test]
    fn test_extract_from_invoice_text() {
        let record = extractor().extract_from_text(INVOICE_TEXT);

        assert_eq!(record.backend, Backend::Text);
        assert_eq!(record.get("El förbrukning (kWh)"), Some(Some(1234.0)));
        assert_eq!(record.get("Elnät fast avgift enkeltariff (kr/mån)"), Some(Some(1.0)));
        assert_eq!(record.get("Elnät överföring enkeltariff (öre/kWh)"), Some(Some(45.67)));
        assert_eq!(record.get("Elnät energiskatt (öre/kWh)"), Some(Some(53.5)));
        assert_eq!(record.get("Elnät totalt belopp (kr)"), Some(Some(1536.26)));
        assert_eq!(record.get("Elhandel rörliga kostnader (öre/kWh)"), Some(Some(84.62)));
        assert_eq!(record.get("Elhandel fasta avgift (kr/mån)"), Some(Some(39.0)));
        assert_eq!(record.get("Elhandel totalt belopp (kr)"), Some(Some(1131.34)));
        assert_eq!(record.get("Fjärrvärme förbrukning (MWh)"), Some(Some(1.25)));
        assert_eq!(record.get("Fjärrvärme fast avgift (kr/år)"), Some(Some(4200.0)));
        assert_eq!(record.get("Fjärrvärme energiavgift (kr/MWh)"), Some(Some(780.0)));
        assert_eq!(record.get("Fjärrvärme totalt belopp (kr)"), Some(Some(1325.0)));
        assert_eq!(record.get("Stadsnät serviceavgift villa (kr/st)"), Some(Some(99.0)));
    }

    #[test]
    fn test_fields_without_pattern_are_sentinel() {
        let record = extractor().extract_from_text(INVOICE_TEXT);
        assert_eq!(
            record.missing_fields(),
            vec![
                "Elhandel medelspotpris (öre/kWh)".to_string(),
                "Elhandel fasta påslag (öre/kWh)".to_string(),
            ]
        );
    }

    #[test]
    fn test_empty_text_yields_full_key_set() {
        let record = extractor().extract_from_text("");
        let template = InvoiceTemplate::builtin();
        let expected: Vec<&str> = template
            .fields
            .iter()
            .map(|f| f.name.as_str())
            .collect();
        assert_eq!(record.field_names().collect::<Vec<_>>(), expected);
        assert!(record.is_blank());
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let extractor = extractor();
        let first = serde_json::to_string(&extractor.extract_from_text(INVOICE_TEXT)).unwrap();
        let second = serde_json::to_string(&extractor.extract_from_text(INVOICE_TEXT)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_pages_joined_before_matching() {
        let pages = vec![
            "Serviceavgift villa".to_string(),
            "1,0099,00 99,00".to_string(),
        ];
        let record = extractor().extract_from_pages(&pages, " ");
        assert_eq!(record.get("Stadsnät serviceavgift villa (kr/st)"), Some(Some(99.0)));
    }
}
