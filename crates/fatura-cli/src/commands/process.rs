//! Process command - extract data from a single invoice file.

use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use crate::output::{format_record, OutputFormat};

use super::{extract_file, is_supported, load_config};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input file (OCR text as .txt, or an image)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Validate extracted data
    #[arg(long)]
    validate: bool,

    /// Show extraction warnings
    #[arg(long)]
    show_warnings: bool,
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }
    if !is_supported(&args.input) {
        anyhow::bail!(
            "Unsupported file format: {}",
            args.input
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or("")
        );
    }

    info!("Processing file: {}", args.input.display());

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap(),
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message("Extracting invoice data...");

    let result = extract_file(&args.input, &config);
    pb.finish_and_clear();
    let result = result?;

    if args.show_warnings && !result.warnings.is_empty() {
        eprintln!("{}", style("Extraction warnings:").yellow());
        for warning in &result.warnings {
            eprintln!("  - {}", warning);
        }
    }

    if args.validate {
        let issues = result
            .record
            .validate(config.extraction.consistency_tolerance);
        if issues.is_empty() {
            eprintln!("{} No validation issues", style("✓").green());
        } else {
            eprintln!("{}", style("Validation issues:").yellow());
            for issue in &issues {
                eprintln!("  - {}", issue);
            }
        }
    }

    let output = format_record(&result.record, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)
            .with_context(|| format!("Failed to write {}", output_path.display()))?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    debug!(
        "Extraction took {}ms, total {:?}",
        result.processing_time_ms,
        start.elapsed()
    );

    Ok(())
}
