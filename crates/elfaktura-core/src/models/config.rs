//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration for elfaktura.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ElfakturaConfig {
    /// Input discovery configuration.
    pub input: InputConfig,

    /// Document conversion configuration.
    pub conversion: ConversionConfig,

    /// Invoice extraction configuration.
    pub extraction: ExtractionConfig,

    /// Output configuration.
    pub output: OutputConfig,
}

/// Which files in an input directory are invoices.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Only files whose name starts with this prefix are processed.
    pub filename_prefix: String,

    /// Accepted file extensions (lowercase, without dot).
    pub extensions: Vec<String>,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            filename_prefix: "invoice_".to_string(),
            extensions: vec!["pdf".to_string(), "html".to_string(), "htm".to_string()],
        }
    }
}

impl InputConfig {
    /// Check a file name against the prefix and extension filters.
    pub fn accepts(&self, file_name: &str) -> bool {
        if !file_name.starts_with(&self.filename_prefix) {
            return false;
        }
        let ext = file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_lowercase())
            .unwrap_or_default();
        self.extensions.iter().any(|e| *e == ext)
    }
}

/// How documents are turned into a table layout and raw text.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionConfig {
    /// Suffix of the pre-rendered layout file stored next to a PDF.
    pub layout_suffix: String,

    /// Read the PDF text layer for the fallback backend.
    pub read_pdf_text: bool,

    /// Separator used when joining page texts.
    pub page_separator: String,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            layout_suffix: ".html".to_string(),
            read_pdf_text: true,
            page_separator: " ".to_string(),
        }
    }
}

/// Invoice extraction configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// JSON invoice template; the built-in template is used when unset.
    pub template_path: Option<PathBuf>,
}

/// Output dataset format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetFormat {
    #[default]
    Csv,
    Json,
}

/// Output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format.
    pub format: DatasetFormat,

    /// CSV field delimiter.
    pub csv_delimiter: char,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: DatasetFormat::Csv,
            csv_delimiter: ',',
        }
    }
}

impl ElfakturaConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}
