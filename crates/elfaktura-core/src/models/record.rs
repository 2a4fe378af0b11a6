//! Normalized invoice records produced by the extraction backends.

use std::fmt;

use chrono::NaiveDate;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde::Deserialize;

/// Value of a canonical field. `None` is the missing-value sentinel: it never
/// takes part in arithmetic, unlike a NaN would.
pub type FieldValue = Option<f64>;

/// Which extraction backend produced a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    /// Categorized table layout.
    Table,
    /// Regex fallback over raw text.
    Text,
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Table => f.write_str("table"),
            Self::Text => f.write_str("text"),
        }
    }
}

/// One invoice, keyed by canonical field name.
///
/// The key set is fixed at construction from the template's field list, so
/// records from either backend always carry the same keys.
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceRecord {
    fields: Vec<(String, FieldValue)>,
    /// Billing date as printed on the invoice.
    pub date: Option<String>,
    /// Invoice identifier.
    pub invoice_number: Option<String>,
    /// Producing backend.
    pub backend: Backend,
    /// Source document name.
    pub source: Option<String>,
}

impl InvoiceRecord {
    /// Create a record with every field set to the sentinel.
    pub fn empty<I, S>(names: I, backend: Backend) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: names.into_iter().map(|n| (n.into(), None)).collect(),
            date: None,
            invoice_number: None,
            backend,
            source: None,
        }
    }

    /// Look up a field. The outer `Option` is `None` only for unknown keys.
    pub fn get(&self, name: &str) -> Option<FieldValue> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| *v)
    }

    /// Set a known field. Returns `false` (and changes nothing) for unknown keys.
    pub fn set(&mut self, name: &str, value: FieldValue) -> bool {
        match self.fields.iter_mut().find(|(n, _)| n == name) {
            Some((_, slot)) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    /// Field names in template order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(n, _)| n.as_str())
    }

    /// Fields with their values in template order.
    pub fn fields(&self) -> &[(String, FieldValue)] {
        &self.fields
    }

    /// Names of fields holding the sentinel.
    pub fn missing_fields(&self) -> Vec<String> {
        self.fields
            .iter()
            .filter(|(_, v)| v.is_none())
            .map(|(n, _)| n.clone())
            .collect()
    }

    /// True when every field holds the sentinel and no date was found.
    pub fn is_blank(&self) -> bool {
        self.date.is_none() && self.fields.iter().all(|(_, v)| v.is_none())
    }

    /// Parse the billing date (ISO `YYYY-MM-DD`).
    pub fn billing_date(&self) -> Option<NaiveDate> {
        self.date
            .as_deref()
            .and_then(|d| NaiveDate::parse_from_str(d.trim(), "%Y-%m-%d").ok())
    }

    /// Fill sentinel fields with the values `other` holds under the same
    /// name. Returns how many fields were filled.
    pub fn fill_missing(&mut self, other: &InvoiceRecord) -> usize {
        let mut filled = 0;
        for (name, slot) in self.fields.iter_mut().filter(|(_, v)| v.is_none()) {
            if let Some(value) = other.get(name.as_str()).flatten() {
                *slot = Some(value);
                filled += 1;
            }
        }
        filled
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl Serialize for InvoiceRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len() + 4))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.serialize_entry("date", &self.date)?;
        map.serialize_entry("invoice_number", &self.invoice_number)?;
        map.serialize_entry("backend", &self.backend)?;
        map.serialize_entry("source", &self.source)?;
        map.end()
    }
}

/// Result of running the pipeline on one document.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractionOutcome {
    /// Every canonical field was found.
    Succeeded(InvoiceRecord),
    /// Some fields hold the sentinel.
    Degraded {
        record: InvoiceRecord,
        missing: Vec<String>,
    },
}

impl ExtractionOutcome {
    /// Classify a finished record.
    pub fn from_record(record: InvoiceRecord) -> Self {
        let missing = record.missing_fields();
        if missing.is_empty() {
            Self::Succeeded(record)
        } else {
            Self::Degraded { record, missing }
        }
    }

    pub fn record(&self) -> &InvoiceRecord {
        match self {
            Self::Succeeded(record) | Self::Degraded { record, .. } => record,
        }
    }

    pub fn into_record(self) -> InvoiceRecord {
        match self {
            Self::Succeeded(record) | Self::Degraded { record, .. } => record,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded { .. })
    }
}
