//! Template command - show, export and check invoice templates.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use console::style;

use elfaktura_core::invoice::CompiledTemplate;
use elfaktura_core::models::InvoiceTemplate;

use super::load_config;

/// Arguments for the template command.
#[derive(Args)]
pub struct TemplateArgs {
    #[command(subcommand)]
    command: TemplateCommand,
}

#[derive(Subcommand)]
enum TemplateCommand {
    /// Print the active template (configured, or built-in)
    Show {
        /// Print the built-in template even when one is configured
        #[arg(long)]
        builtin: bool,
    },

    /// Write the built-in template to a file as a starting point
    Export {
        /// Output path
        output: PathBuf,

        /// Overwrite existing file
        #[arg(long)]
        force: bool,
    },

    /// Validate a template file
    Check {
        /// Template file
        path: PathBuf,
    },
}

pub fn run(args: TemplateArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    match args.command {
        TemplateCommand::Show { builtin } => show_template(builtin, config_path),
        TemplateCommand::Export { output, force } => export_template(&output, force),
        TemplateCommand::Check { path } => check_template(&path),
    }
}

fn show_template(builtin: bool, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    let template = match (&config.extraction.template_path, builtin) {
        (Some(path), false) => InvoiceTemplate::from_file(path)?,
        _ => InvoiceTemplate::builtin(),
    };

    println!("{}", template.to_json());
    Ok(())
}

fn export_template(output: &Path, force: bool) -> anyhow::Result<()> {
    if output.exists() && !force {
        anyhow::bail!(
            "File already exists at {}. Use --force to overwrite.",
            output.display()
        );
    }

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(output, InvoiceTemplate::builtin().to_json())?;

    println!(
        "{} Exported built-in template to {}",
        style("✓").green(),
        output.display()
    );
    Ok(())
}

fn check_template(path: &Path) -> anyhow::Result<()> {
    let template = InvoiceTemplate::from_file(path)?;
    let compiled = CompiledTemplate::compile(template)?;
    let patterned = compiled.field_patterns().filter(|(_, p)| p.is_some()).count();

    println!(
        "{} {} v{}: {} categories, {} fields ({} with text patterns)",
        style("✓").green(),
        compiled.template().name,
        compiled.template().version,
        compiled.keyword_sets().len(),
        compiled.fields().len(),
        patterned
    );
    Ok(())
}
