//! Parse command - extract a directory of invoices into one dataset.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use glob::{glob, Pattern};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, info};

use elfaktura_core::invoice::InvoicePipeline;
use elfaktura_core::layout::{DocumentLoader, HtmlLayoutConverter};
use elfaktura_core::models::config::InputConfig;
use elfaktura_core::models::{Backend, InvoiceDataset};

use super::load_config;
use super::output::{write_dataset, OutputFormat};

/// Arguments for the parse command.
#[derive(Args)]
pub struct ParseArgs {
    /// Directory containing the invoice documents
    #[arg(required = true)]
    input_dir: PathBuf,

    /// Output file (default: invoices.<format> in the input directory)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format (default: from config)
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Only process files starting with this prefix
    #[arg(long)]
    prefix: Option<String>,

    /// Also write a per-document status CSV
    #[arg(long)]
    summary: Option<PathBuf>,

    /// Stop at the first document that cannot be converted
    #[arg(long)]
    fail_fast: bool,
}

/// Outcome of one document.
struct DocumentStatus {
    path: PathBuf,
    backend: Option<Backend>,
    fallback_reason: Option<String>,
    missing: usize,
    error: Option<String>,
    processing_time_ms: u64,
}

pub fn run(args: ParseArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = load_config(config_path)?;
    if let Some(prefix) = &args.prefix {
        config.input.filename_prefix = prefix.clone();
    }

    if !args.input_dir.is_dir() {
        anyhow::bail!("Input directory not found: {}", args.input_dir.display());
    }

    let converter = HtmlLayoutConverter::new(config.conversion.layout_suffix.clone());
    let files = discover(&args.input_dir, &config.input, &converter)?;
    if files.is_empty() {
        anyhow::bail!(
            "No invoice documents starting with {:?} found in {}",
            config.input.filename_prefix,
            args.input_dir.display()
        );
    }

    println!(
        "{} Found {} documents to process",
        style("ℹ").blue(),
        files.len()
    );

    let pipeline = InvoicePipeline::from_config(&config.extraction)?;
    let loader = DocumentLoader::from_config(&config.conversion);

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} documents")?
            .progress_chars("=>-"),
    );

    // Sequential, so the dataset keeps input order
    let mut dataset = InvoiceDataset::new();
    let mut statuses = Vec::with_capacity(files.len());

    for path in files {
        let file_start = Instant::now();
        match pipeline.process_path(&loader, &path) {
            Ok(result) => {
                statuses.push(DocumentStatus {
                    path: path.clone(),
                    backend: Some(result.backend),
                    fallback_reason: result.fallback_reason.as_ref().map(|r| r.to_string()),
                    missing: result.record().missing_fields().len(),
                    error: None,
                    processing_time_ms: result.processing_time_ms,
                });
                dataset.push(result.outcome.into_record());
            }
            Err(e) => {
                error!("Failed to process {}: {}", path.display(), e);
                if args.fail_fast {
                    pb.abandon();
                    anyhow::bail!("Processing failed: {}", e);
                }
                statuses.push(DocumentStatus {
                    path: path.clone(),
                    backend: None,
                    fallback_reason: None,
                    missing: 0,
                    error: Some(e.to_string()),
                    processing_time_ms: file_start.elapsed().as_millis() as u64,
                });
            }
        }
        pb.inc(1);
    }

    pb.finish_with_message("Complete");

    let format = args
        .format
        .unwrap_or_else(|| OutputFormat::from(config.output.format));
    let output_path = args
        .output
        .clone()
        .unwrap_or_else(|| args.input_dir.join(format!("invoices.{}", format.extension())));

    write_dataset(&dataset, &output_path, format, config.output.csv_delimiter)?;
    info!("Wrote dataset with {} rows", dataset.len());

    if let Some(summary_path) = &args.summary {
        write_summary(summary_path, &statuses)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    print_summary(&statuses, &output_path, start);
    Ok(())
}

/// Files in `dir` accepted by the input filter, in lexicographic order.
/// A layout file that belongs to another discovered document is not a
/// document of its own.
fn discover(
    dir: &Path,
    input: &InputConfig,
    converter: &HtmlLayoutConverter,
) -> anyhow::Result<Vec<PathBuf>> {
    let pattern = format!(
        "{}/{}*",
        Pattern::escape(&dir.to_string_lossy()),
        Pattern::escape(&input.filename_prefix)
    );
    debug!("Discovering documents with {}", pattern);

    let mut files: Vec<PathBuf> = glob(&pattern)?
        .filter_map(|r| r.ok())
        .filter(|p| p.is_file())
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| input.accepts(n))
        })
        .collect();

    let sidecars: HashSet<PathBuf> = files
        .iter()
        .filter_map(|p| {
            let layout = converter.layout_path(p);
            (layout != *p).then_some(layout)
        })
        .collect();
    files.retain(|p| {
        let is_sidecar = sidecars.contains(p);
        if is_sidecar {
            debug!("Skipping layout sidecar {}", p.display());
        }
        !is_sidecar
    });

    files.sort();
    Ok(files)
}

fn print_summary(statuses: &[DocumentStatus], output_path: &Path, start: Instant) {
    let failed: Vec<_> = statuses.iter().filter(|s| s.error.is_some()).collect();
    let fallbacks = statuses
        .iter()
        .filter(|s| s.backend == Some(Backend::Text))
        .count();
    let degraded = statuses
        .iter()
        .filter(|s| s.error.is_none() && s.missing > 0)
        .count();

    println!();
    println!(
        "{} Processed {} documents in {:?}",
        style("✓").green(),
        statuses.len(),
        start.elapsed()
    );
    println!(
        "   {} extracted, {} via text fallback, {} with missing fields, {} failed",
        style(statuses.len() - failed.len()).green(),
        style(fallbacks).yellow(),
        style(degraded).yellow(),
        style(failed.len()).red()
    );
    println!(
        "{} Dataset written to {}",
        style("✓").green(),
        output_path.display()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed documents:").red());
        for status in &failed {
            println!(
                "  - {}: {}",
                status.path.display(),
                status.error.as_deref().unwrap_or("unknown error")
            );
        }
    }
}

fn write_summary(path: &Path, statuses: &[DocumentStatus]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "backend",
        "fallback_reason",
        "missing_fields",
        "processing_time_ms",
        "error",
    ])?;

    for status in statuses {
        let filename = status
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("");
        let state = match (&status.error, status.missing) {
            (Some(_), _) => "error",
            (None, 0) => "success",
            (None, _) => "degraded",
        };

        wtr.write_record([
            filename,
            state,
            &status.backend.map(|b| b.to_string()).unwrap_or_default(),
            status.fallback_reason.as_deref().unwrap_or(""),
            &status.missing.to_string(),
            &status.processing_time_ms.to_string(),
            status.error.as_deref().unwrap_or(""),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_discover_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        for name in [
            "invoice_2.html",
            "invoice_10.pdf",
            "invoice_1.HTML",
            "invoice_3.txt",
            "receipt_1.pdf",
        ] {
            fs::write(dir.path().join(name), "").unwrap();
        }
        fs::create_dir(dir.path().join("invoice_dir.pdf")).unwrap();

        let files = discover(dir.path(), &InputConfig::default(), &HtmlLayoutConverter::default())
            .unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["invoice_1.HTML", "invoice_10.pdf", "invoice_2.html"]);
    }

    #[test]
    fn test_discover_skips_layout_sidecars() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["invoice_1.pdf", "invoice_1.html", "invoice_2.html"] {
            fs::write(dir.path().join(name), "").unwrap();
        }

        let files = discover(dir.path(), &InputConfig::default(), &HtmlLayoutConverter::default())
            .unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["invoice_1.pdf", "invoice_2.html"]);
    }
}
