//! Batch processing command for multiple bill text files.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tokio::sync::Semaphore;
use tracing::{debug, error, warn};

use utilx_core::{BillParser, ExtractionResult, Provider};

use super::process::{format_result, OutputFormat};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern (e.g. "bills/*.txt")
    #[arg(required = true)]
    input: String,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Parse every file as this provider instead of detecting it
    #[arg(long)]
    provider: Option<String>,

    /// Also generate a summary.json
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
struct FileResult {
    path: PathBuf,
    result: Option<ExtractionResult>,
    error: Option<String>,
    processing_time_ms: u64,
}

/// One line of the batch summary file.
#[derive(Serialize)]
struct SummaryEntry<'a> {
    filename: &'a str,
    status: &'static str,
    provider: Option<Provider>,
    records: usize,
    incomplete_records: usize,
    skipped_sections: usize,
    processing_time_ms: u64,
    error: Option<&'a str>,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = super::load_config(config_path)?;

    // Expand glob pattern
    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("txt"))
        })
        .collect();

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

    let forced = match &args.provider {
        Some(name) => Some(name.parse::<Provider>()?),
        None => config.extraction.force_provider,
    };
    let parser = Arc::new(BillParser::from_config(&config.extraction).with_provider(forced));

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let semaphore = Arc::new(Semaphore::new(args.jobs.max(1)));
    let mut handles = Vec::with_capacity(files.len());

    for path in files {
        let permit = semaphore.clone().acquire_owned().await?;
        let parser = parser.clone();
        let pb = pb.clone();

        handles.push(tokio::task::spawn_blocking(move || {
            let file_start = Instant::now();
            let outcome = process_single_file(&path, &parser);
            let processing_time_ms = file_start.elapsed().as_millis() as u64;
            pb.inc(1);
            drop(permit);

            match outcome {
                Ok(result) => FileResult {
                    path,
                    result: Some(result),
                    error: None,
                    processing_time_ms,
                },
                Err(e) => FileResult {
                    path,
                    result: None,
                    error: Some(e.to_string()),
                    processing_time_ms,
                },
            }
        }));
    }

    let mut results = Vec::with_capacity(handles.len());
    for handle in handles {
        let result = handle.await?;

        if let Some(error_msg) = &result.error {
            if args.continue_on_error {
                warn!("Failed to process {}: {}", result.path.display(), error_msg);
            } else {
                pb.abandon();
                error!("Failed to process {}: {}", result.path.display(), error_msg);
                anyhow::bail!("Processing failed: {}", error_msg);
            }
        }

        results.push(result);
    }

    pb.finish_with_message("Complete");

    let successful: Vec<_> = results.iter().filter(|r| r.result.is_some()).collect();
    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();

    if let Some(output_dir) = &args.output_dir {
        for file in &successful {
            if let Some(result) = &file.result {
                let output_name = file
                    .path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("bill");
                let output_path =
                    output_dir.join(format!("{}.{}", output_name, args.format.extension()));

                fs::write(&output_path, format_result(result, args.format, &config.output)?)?;
                debug!("Wrote output to {}", output_path.display());
            }
        }
    }

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.json"))
            .unwrap_or_else(|| PathBuf::from("summary.json"));

        write_summary(&summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let records: usize = successful
        .iter()
        .filter_map(|f| f.result.as_ref())
        .map(|r| r.records.len())
        .sum();

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed, {} records extracted",
        style(successful.len()).green(),
        style(failed.len()).red(),
        records
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for file in &failed {
            println!(
                "  - {}: {}",
                file.path.display(),
                file.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

fn process_single_file(path: &Path, parser: &BillParser) -> anyhow::Result<ExtractionResult> {
    let text = fs::read_to_string(path)?;
    Ok(parser.parse(&text)?)
}

fn write_summary(path: &Path, results: &[FileResult]) -> anyhow::Result<()> {
    let entries: Vec<SummaryEntry<'_>> = results
        .iter()
        .map(|file| {
            let filename = file
                .path
                .file_name()
                .and_then(|s| s.to_str())
                .unwrap_or("");

            match &file.result {
                Some(result) => SummaryEntry {
                    filename,
                    status: "success",
                    provider: Some(result.provider),
                    records: result.records.len(),
                    incomplete_records: result
                        .records
                        .iter()
                        .filter(|r| !r.is_complete())
                        .count(),
                    skipped_sections: result.skipped_sections,
                    processing_time_ms: file.processing_time_ms,
                    error: None,
                },
                None => SummaryEntry {
                    filename,
                    status: "error",
                    provider: None,
                    records: 0,
                    incomplete_records: 0,
                    skipped_sections: 0,
                    processing_time_ms: file.processing_time_ms,
                    error: file.error.as_deref(),
                },
            }
        })
        .collect();

    fs::write(path, serde_json::to_string_pretty(&entries)?)?;
    Ok(())
}
