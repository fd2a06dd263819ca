//! Process command - extract records from a single bill text file.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use utilx_core::bill::rules::format_amount;
use utilx_core::{BillParser, BillRecord, ExtractionResult, OutputConfig, Provider};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input file (plain text extracted from a bill)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Parse as this provider instead of detecting it (e.g. "bc_hydro")
    #[arg(long)]
    provider: Option<String>,

    /// Report records missing required fields
    #[arg(long)]
    validate: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Text => "txt",
        }
    }
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = super::load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    let forced = match &args.provider {
        Some(name) => Some(name.parse::<Provider>()?),
        None => config.extraction.force_provider,
    };
    let parser = BillParser::from_config(&config.extraction).with_provider(forced);

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.set_message("Reading bill text...");

    let text = fs::read_to_string(&args.input)?;

    pb.set_message("Extracting records...");
    let result = parser.parse(&text);
    pb.finish_and_clear();
    let result = result?;

    debug!(
        "Parsed {} as {}: {} record(s) in {}ms",
        args.input.display(),
        result.provider,
        result.records.len(),
        result.processing_time_ms
    );

    if args.validate {
        report_missing_fields(&result.records);
    }

    let output = format_result(&result, args.format, &config.output)?;

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

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

/// Print every record's missing required fields to stderr.
pub fn report_missing_fields(records: &[BillRecord]) {
    let incomplete: Vec<(usize, Vec<&str>)> = records
        .iter()
        .enumerate()
        .map(|(i, r)| (i + 1, r.missing_fields()))
        .filter(|(_, missing)| !missing.is_empty())
        .collect();

    if incomplete.is_empty() {
        return;
    }

    eprintln!("{}", style("Validation issues:").yellow());
    for (number, missing) in incomplete {
        eprintln!("  - record {}: missing {}", number, missing.join(", "));
    }
}

/// Render an extraction result in the requested format.
pub fn format_result(
    result: &ExtractionResult,
    format: OutputFormat,
    output: &OutputConfig,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => format_json(result, output),
        OutputFormat::Text => Ok(format_text(result)),
    }
}

fn format_json(result: &ExtractionResult, output: &OutputConfig) -> anyhow::Result<String> {
    let value = if output.include_warnings {
        serde_json::to_value(result)?
    } else {
        let mut value = serde_json::to_value(result)?;
        if let Some(obj) = value.as_object_mut() {
            obj.remove("warnings");
        }
        value
    };

    Ok(if output.pretty_json {
        serde_json::to_string_pretty(&value)?
    } else {
        serde_json::to_string(&value)?
    })
}

fn format_text(result: &ExtractionResult) -> String {
    let mut output = String::new();

    output.push_str(&format!("Provider: {}\n", result.provider));
    output.push_str(&format!(
        "Sections: {} ({} skipped)\n",
        result.sections, result.skipped_sections
    ));

    for (i, record) in result.records.iter().enumerate() {
        output.push('\n');
        output.push_str(&format!("Record {}:\n", i + 1));
        output.push_str(&format!("  Account: {}\n", text_or_dash(&record.account_number)));
        output.push_str(&format!("  Name:    {}\n", text_or_dash(&record.name)));
        output.push_str(&format!("  Address: {}\n", text_or_dash(&record.service_address)));
        output.push_str(&format!(
            "  Billed:  {}\n",
            record.billing_date.map_or("-".to_string(), |d| d.to_string())
        ));
        output.push_str(&format!(
            "  Period:  {} to {}\n",
            record.period_start.map_or("-".to_string(), |d| d.to_string()),
            record.period_end.map_or("-".to_string(), |d| d.to_string())
        ));
        output.push_str(&format!(
            "  Usage:   {} {} ({}, {})\n",
            record.consumption.map_or("-".to_string(), |c| c.to_string()),
            record.usage_unit(),
            record.usage_type(),
            if record.is_metered { "metered" } else { "unmetered" }
        ));
        output.push_str(&format!(
            "  Charges: {}\n",
            record
                .charges
                .map_or("-".to_string(), |c| format!("${}", format_amount(c)))
        ));
    }

    if !result.warnings.is_empty() {
        output.push_str("\nWarnings:\n");
        for warning in &result.warnings {
            output.push_str(&format!("  - {}\n", warning));
        }
    }

    output
}

fn text_or_dash(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("-")
}
