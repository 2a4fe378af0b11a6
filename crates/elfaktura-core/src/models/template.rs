//! Declarative invoice template: billing categories, keyword sets and the
//! canonical field table shared by the table and text backends.
//!
//! A template is plain data. Adapting to a new invoice layout means editing
//! (or loading) a template, not touching the extraction code.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::TemplateError;

/// Column names that every record carries in addition to the canonical fields.
pub const METADATA_COLUMNS: [&str; 4] = ["date", "invoice_number", "backend", "source"];

/// The line-item group a table (or text fragment) belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BillingCategory {
    /// Grid operator fee (elnät).
    NetworkFee,
    /// Electricity supplier charges (elhandel).
    EnergyTrade,
    /// District heating (fjärrvärme).
    DistrictHeating,
    /// City fibre network (stadsnät).
    CityNetwork,
}

impl BillingCategory {
    /// All categories in declaration order.
    pub const ALL: [BillingCategory; 4] = [
        BillingCategory::NetworkFee,
        BillingCategory::EnergyTrade,
        BillingCategory::DistrictHeating,
        BillingCategory::CityNetwork,
    ];

    /// Stable tag used in logs and serialized templates.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::NetworkFee => "network-fee",
            Self::EnergyTrade => "energy-trade",
            Self::DistrictHeating => "district-heating",
            Self::CityNetwork => "city-network",
        }
    }

    /// Heading used for the category on the invoice itself.
    pub fn invoice_label(&self) -> &'static str {
        match self {
            Self::NetworkFee => "elnät",
            Self::EnergyTrade => "elhandel",
            Self::DistrictHeating => "fjärrvärme",
            Self::CityNetwork => "stadsnät",
        }
    }
}

impl fmt::Display for BillingCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Reference to a table column, either by header name or by position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColumnRef {
    Index(usize),
    Name(String),
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(i) => write!(f, "#{}", i),
            Self::Name(name) => f.write_str(name),
        }
    }
}

/// Keywords that must all be present in a table for it to belong to a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryKeywords {
    pub category: BillingCategory,
    pub keywords: Vec<String>,
}

/// One canonical output field and how each backend locates it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Output column name.
    pub name: String,

    /// Category whose table holds the field.
    pub category: BillingCategory,

    /// Prefix of the label cell identifying the row.
    pub row_label: String,

    /// Column holding the value in that row.
    pub column: ColumnRef,

    /// Regular expression for the raw-text backend. The first capture group
    /// (or the whole match without groups) is the value. `None` means the
    /// text backend never supplies this field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

/// Markers used to find the billing date and invoice number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataSpec {
    /// A heading ending with this word carries the date as its first token.
    pub heading_suffix: String,

    /// The paragraph after one starting with this word is the invoice number.
    pub paragraph_prefix: String,

    /// Date pattern for raw text.
    pub date_pattern: String,

    /// Invoice number pattern for raw text.
    pub invoice_number_pattern: String,
}

/// A complete, versioned invoice template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceTemplate {
    pub name: String,
    pub version: u32,

    /// Column holding row labels in every category table.
    pub label_column: ColumnRef,

    /// Keyword sets, in categorization order.
    pub categories: Vec<CategoryKeywords>,

    /// Canonical fields, in output order.
    pub fields: Vec<FieldSpec>,

    pub metadata: MetadataSpec,
}

impl InvoiceTemplate {
    /// Parse a template from JSON.
    pub fn from_json(json: &str) -> Result<Self, TemplateError> {
        serde_json::from_str(json).map_err(|e| TemplateError::Load(e.to_string()))
    }

    /// Load a template from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, TemplateError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| TemplateError::Load(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&content)
    }

    /// Serialize the template as pretty JSON.
    pub fn to_json(&self) -> String {
        // Plain data with string keys; serialization cannot fail.
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Canonical field names in output order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Categories that at least one field reads from, in keyword-set order.
    pub fn required_categories(&self) -> Vec<BillingCategory> {
        self.categories
            .iter()
            .map(|c| c.category)
            .filter(|c| self.fields.iter().any(|f| f.category == *c))
            .collect()
    }

    /// Template for the Swedish multi-utility invoice (electricity grid and
    /// supply, district heating, city network).
    pub fn builtin() -> Self {
        use BillingCategory::*;

        let keywords = |category, words: &[&str]| CategoryKeywords {
            category,
            keywords: words.iter().map(|w| w.to_string()).collect(),
        };
        let field = |name: &str, category, row_label: &str, column: &str, pattern: Option<&str>| {
            FieldSpec {
                name: name.to_string(),
                category,
                row_label: row_label.to_string(),
                column: ColumnRef::Name(column.to_string()),
                pattern: pattern.map(str::to_string),
            }
        };

        Self {
            name: "se-multi-utility".to_string(),
            version: 1,
            label_column: ColumnRef::Index(0),
            categories: vec![
                keywords(NetworkFee, &["Energiskatt", "kWh", "Överföring", "Summa"]),
                keywords(EnergyTrade, &["Medelspotpris", "påslag", "kWh"]),
                keywords(DistrictHeating, &["Energiavgift", "MWh"]),
                keywords(CityNetwork, &["Serviceavgift"]),
            ],
            fields: vec![
                field(
                    "El förbrukning (kWh)",
                    NetworkFee,
                    "Överföring",
                    "Antal",
                    Some(r"(\d+,\d{2}) kWh"),
                ),
                field(
                    "Elnät fast avgift enkeltariff (kr/mån)",
                    NetworkFee,
                    "Fast avgift",
                    "Pris",
                    Some(r"(?si)^.+?Fast avgift enkeltariff.*?(\d+,\d{2})"),
                ),
                field(
                    "Elnät överföring enkeltariff (öre/kWh)",
                    NetworkFee,
                    "Överföring",
                    "Pris",
                    Some(r"Överföring enkeltariff\s+\d+,\d{2}(\d+,\d{2})"),
                ),
                field(
                    "Elnät energiskatt (öre/kWh)",
                    NetworkFee,
                    "Energiskatt",
                    "Pris",
                    Some(r"Energiskatt.+\d+,\d{2}(\d+,\d{2})"),
                ),
                field(
                    "Elnät totalt belopp (kr)",
                    NetworkFee,
                    "TOTALT BELOPP",
                    "Summa",
                    Some(r"TOTALT BELOPP ELNÄT.+?(\d+,\d{2}) kr\n"),
                ),
                field(
                    "Elhandel medelspotpris (öre/kWh)",
                    EnergyTrade,
                    "Medelspotpris",
                    "Pris",
                    None,
                ),
                field(
                    "Elhandel rörliga kostnader (öre/kWh)",
                    EnergyTrade,
                    "Rörliga kostnader",
                    "Pris",
                    Some(r"Rörligt månadspris.+?\d+,\d{2}(\d+,\d{2})"),
                ),
                field(
                    "Elhandel fasta påslag (öre/kWh)",
                    EnergyTrade,
                    "Fasta påslag",
                    "Pris",
                    None,
                ),
                field(
                    "Elhandel fasta avgift (kr/mån)",
                    EnergyTrade,
                    "Fast avgift",
                    "Pris",
                    Some(r"(?s)TOTALT BELOPP ELNÄT.+?ELHANDEL\n.+?kr/mån.+?Fast avgift.+?\d+,\d{2}(\d+,\d{2})"),
                ),
                field(
                    "Elhandel totalt belopp (kr)",
                    EnergyTrade,
                    "TOTALT BELOPP",
                    "Summa",
                    Some(r"ELHANDEL (\d+,\d{2}) kr"),
                ),
                field(
                    "Fjärrvärme förbrukning (MWh)",
                    DistrictHeating,
                    "Energiavgift",
                    "Antal",
                    Some(r"(\d+,\d{1,2}) MW"),
                ),
                field(
                    "Fjärrvärme fast avgift (kr/år)",
                    DistrictHeating,
                    "Fast Avgift",
                    "Pris",
                    Some(r"\d+ dgr kr/år krFast Avgift\s+\d+,\d{2}([\d\s]+,\d{2})"),
                ),
                field(
                    "Fjärrvärme energiavgift (kr/MWh)",
                    DistrictHeating,
                    "Energiavgift",
                    "Pris",
                    Some(r"kr/MWh krEnergiavgift\s+[\d+\s]+,\d{2}(\d+,\d{2})"),
                ),
                field(
                    "Fjärrvärme totalt belopp (kr)",
                    DistrictHeating,
                    "TOTALT BELOPP",
                    "Summa",
                    Some(r"FJÄRRVÄRME ([\d+\s]+,\d{2}) kr"),
                ),
                field(
                    "Stadsnät serviceavgift villa (kr/st)",
                    CityNetwork,
                    "Serviceavgift",
                    "Pris",
                    Some(r"Serviceavgift villa.+?\d+,\d{2}(\d+,\d{2})"),
                ),
            ],
            metadata: MetadataSpec {
                heading_suffix: "FAKTURA".to_string(),
                paragraph_prefix: "Faktura".to_string(),
                date_pattern: r"\d{4}-\d{2}-\d{2}".to_string(),
                invoice_number_pattern: r"Faktura-nr: (\d+)".to_string(),
            },
        }
    }
}

impl Default for InvoiceTemplate {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_builtin_covers_all_categories() {
        let template = InvoiceTemplate::builtin();
        assert_eq!(template.required_categories(), BillingCategory::ALL.to_vec());
        assert_eq!(template.fields.len(), 15);
    }

    #[test]
    fn test_template_json_round_trip() {
        let template = InvoiceTemplate::builtin();
        let json = template.to_json();
        let parsed = InvoiceTemplate::from_json(&json).unwrap();
        assert_eq!(parsed, template);
    }

    #[test]
    fn test_column_ref_untagged() {
        let json = r#"{"name":"x","version":2,"label_column":0,"categories":[],"fields":[
            {"name":"a","category":"city-network","row_label":"Serviceavgift","column":"Pris"}
        ],"metadata":{"heading_suffix":"F","paragraph_prefix":"F","date_pattern":"d","invoice_number_pattern":"n"}}"#;
        let template = InvoiceTemplate::from_json(json).unwrap();
        assert_eq!(template.label_column, ColumnRef::Index(0));
        assert_eq!(template.fields[0].column, ColumnRef::Name("Pris".to_string()));
        assert_eq!(template.fields[0].pattern, None);
    }

    #[test]
    fn test_category_display() {
        assert_eq!(BillingCategory::DistrictHeating.to_string(), "district-heating");
        assert_eq!(BillingCategory::NetworkFee.invoice_label(), "elnät");
    }
}
