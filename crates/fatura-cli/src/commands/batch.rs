//! Batch processing command for multiple invoice files.

use std::fs;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, warn};

use fatura_core::{ExtractionResult, FIELD_NAMES};

use crate::output::{format_record, record_row, OutputFormat};

use super::{extract_file, is_supported, load_config};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern matching input files
    #[arg(required = true)]
    input: String,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Number of parallel workers
    #[arg(short = 'j', long, default_value = "4")]
    jobs: usize,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Result of processing a single file.
struct ProcessResult {
    path: PathBuf,
    extraction: Option<ExtractionResult>,
    error: Option<String>,
    processing_time_ms: u64,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = Arc::new(load_config(config_path)?);

    let mut files: Vec<PathBuf> = glob(&args.input)
        .with_context(|| format!("Invalid glob pattern: {}", args.input))?
        .filter_map(|r| r.ok())
        .filter(|p| is_supported(p))
        .collect();
    files.sort();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let overall_pb = ProgressBar::new(files.len() as u64);
    overall_pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")
            .unwrap()
            .progress_chars("=>-"),
    );

    // Documents are independent; the semaphore bounds concurrent extractions
    let semaphore = Arc::new(Semaphore::new(args.jobs.max(1)));
    let mut tasks = JoinSet::new();

    for (index, path) in files.into_iter().enumerate() {
        let permit = Arc::clone(&semaphore).acquire_owned().await?;
        let config = Arc::clone(&config);

        tasks.spawn_blocking(move || {
            let _permit = permit;
            let file_start = Instant::now();
            let result = panic::catch_unwind(AssertUnwindSafe(|| extract_file(&path, &config)))
                .unwrap_or_else(|_| Err(anyhow::anyhow!("extraction panicked")));
            let processing_time_ms = file_start.elapsed().as_millis() as u64;
            (index, path, result, processing_time_ms)
        });
    }

    let mut results = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        let (index, path, result, processing_time_ms) = joined?;
        overall_pb.inc(1);

        match result {
            Ok(extraction) => results.push((
                index,
                ProcessResult {
                    path,
                    extraction: Some(extraction),
                    error: None,
                    processing_time_ms,
                },
            )),
            Err(e) => {
                let error_msg = format!("{:#}", e);
                if args.continue_on_error {
                    warn!("Failed to process {}: {}", path.display(), error_msg);
                    results.push((
                        index,
                        ProcessResult {
                            path,
                            extraction: None,
                            error: Some(error_msg),
                            processing_time_ms,
                        },
                    ));
                } else {
                    overall_pb.abandon();
                    error!("Failed to process {}: {}", path.display(), error_msg);
                    anyhow::bail!("Processing failed for {}: {}", path.display(), error_msg);
                }
            }
        }
    }

    overall_pb.finish_and_clear();

    results.sort_by_key(|(index, _)| *index);
    let results: Vec<ProcessResult> = results.into_iter().map(|(_, r)| r).collect();

    let successful: Vec<_> = results.iter().filter(|r| r.extraction.is_some()).collect();
    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();

    if let Some(output_dir) = &args.output_dir {
        for result in &successful {
            let Some(extraction) = &result.extraction else {
                continue;
            };
            // Keep the source extension so `a.txt` and `a.png` do not collide
            let output_name = result
                .path
                .file_name()
                .and_then(|s| s.to_str())
                .unwrap_or("invoice");
            let output_path =
                output_dir.join(format!("{}.{}", output_name, args.format.extension()));

            let content = format_record(&extraction.record, args.format)?;
            fs::write(&output_path, content)
                .with_context(|| format!("Failed to write {}", output_path.display()))?;
            debug!("Wrote output to {}", output_path.display());
        }
    }

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed",
        style(successful.len()).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for result in &failed {
            println!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

fn write_summary(path: &Path, results: &[ProcessResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;

    let mut header = vec!["filename", "status"];
    header.extend(FIELD_NAMES);
    header.extend(["processing_time_ms", "error"]);
    wtr.write_record(&header)?;

    for result in results {
        let filename = result
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_string();

        let mut row = vec![filename];
        match &result.extraction {
            Some(extraction) => {
                row.push("success".to_string());
                row.extend(record_row(&extraction.record));
            }
            None => {
                row.push("error".to_string());
                row.extend(FIELD_NAMES.iter().map(|_| String::new()));
            }
        }
        row.push(result.processing_time_ms.to_string());
        row.push(result.error.clone().unwrap_or_default());

        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    Ok(())
}
