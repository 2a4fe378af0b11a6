//! Inspect command - extract one invoice and report how it was read.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use serde_json::json;
use tracing::info;

use elfaktura_core::invoice::rules::format_locale_number;
use elfaktura_core::invoice::{ExtractionResult, InvoicePipeline};
use elfaktura_core::layout::DocumentLoader;

use super::load_config;

/// Arguments for the inspect command.
#[derive(Args)]
pub struct InspectArgs {
    /// Input document (PDF with an HTML layout sidecar, or HTML)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: InspectFormat,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum InspectFormat {
    /// JSON report
    Json,
    /// Plain text report
    Text,
}

pub fn run(args: InspectArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Inspecting {}", args.input.display());

    let pipeline = InvoicePipeline::from_config(&config.extraction)?;
    let loader = DocumentLoader::from_config(&config.conversion);
    let result = pipeline.process_path(&loader, &args.input)?;

    let output = match args.format {
        InspectFormat::Json => format_json(&result)?,
        InspectFormat::Text => format_text(&result),
    };

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    Ok(())
}

fn format_json(result: &ExtractionResult) -> anyhow::Result<String> {
    let report = json!({
        "record": result.record(),
        "backend": result.backend,
        "fallback_reason": result.fallback_reason.as_ref().map(|r| r.to_string()),
        "missing": result.record().missing_fields(),
        "warnings": result.warnings,
        "processing_time_ms": result.processing_time_ms,
    });
    Ok(serde_json::to_string_pretty(&report)?)
}

fn format_text(result: &ExtractionResult) -> String {
    let record = result.record();
    let mut output = String::new();

    output.push_str(&format!(
        "Invoice: {}\n",
        record.invoice_number.as_deref().unwrap_or("-")
    ));
    output.push_str(&format!("Date: {}\n", record.date.as_deref().unwrap_or("-")));
    output.push_str(&format!("Backend: {}\n", result.backend));
    if let Some(reason) = &result.fallback_reason {
        output.push_str(&format!("Fallback: {}\n", reason));
    }
    output.push('\n');

    let width = record.field_names().map(|n| n.chars().count()).max().unwrap_or(0);
    for (name, value) in record.fields() {
        let value = value.map(format_locale_number).unwrap_or_else(|| "-".to_string());
        output.push_str(&format!("  {:<width$}  {:>12}\n", name, value, width = width));
    }

    if !result.warnings.is_empty() {
        output.push_str("\nWarnings:\n");
        for warning in &result.warnings {
            output.push_str(&format!("  - {}\n", warning));
        }
    }

    output
}
