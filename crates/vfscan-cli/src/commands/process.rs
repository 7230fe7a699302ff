//! Process command - extract data from a single report file.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use serde::Serialize;
use tracing::{debug, info};

use vfscan_core::models::config::VfscanConfig;
use vfscan_core::pdf::{PdfTextExtractor, PdfTextSource};
use vfscan_core::report::missing_critical_fields;
use vfscan_core::{ExtractionReport, ExtractionResult, Field, ReportParser, VisualFieldParser};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input file (PDF or extracted text)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "tagged")]
    format: OutputFormat,

    /// Print extraction status, missing critical fields and warnings to stderr
    #[arg(long)]
    show_status: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// Status tag followed by the record JSON, e.g. [(1)]{...}
    Tagged,
    /// Record JSON only
    Json,
    /// Record wrapped with an outcome message
    Report,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    /// File extension used when writing this format.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Tagged | OutputFormat::Text => "txt",
            OutputFormat::Json | OutputFormat::Report => "json",
        }
    }
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;
    let critical = config.extraction.critical_fields()?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    let result = extract_file(&args.input, &config)?;
    let output = format_result(&result, args.format, &config, &critical)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        eprintln!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    if args.show_status {
        print_status(&result, &critical);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

/// Load configuration from the given path, or defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<VfscanConfig> {
    Ok(match config_path {
        Some(path) => VfscanConfig::from_file(Path::new(path))?,
        None => VfscanConfig::default(),
    })
}

/// Read a report file and run extraction on its text.
///
/// PDFs go through the text layer extractor; anything else is read as text.
pub fn extract_file(path: &Path, config: &VfscanConfig) -> anyhow::Result<ExtractionResult> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let parser = VisualFieldParser::new().with_strict_utf8(config.extraction.strict_utf8);
    let data = fs::read(path)?;

    let result = if extension == "pdf" {
        let mut extractor = PdfTextExtractor::new().with_max_pages(config.pdf.max_pages);
        extractor.load(&data)?;
        debug!("PDF has {} pages", extractor.page_count());

        let text = extractor.extract_text()?;
        let text_len = text.trim().chars().count();
        if text_len < config.pdf.min_text_length {
            anyhow::bail!(
                "PDF has no usable text layer ({} characters, need {})",
                text_len,
                config.pdf.min_text_length
            );
        }
        parser.parse(&text)?
    } else {
        parser.parse_bytes(&data)?
    };

    debug!(
        "{}: {} lines, {} fields, {:?}",
        path.display(),
        result.line_count,
        result.record.filled_count(),
        result.status
    );

    Ok(result)
}

/// Render an extraction result in the requested format.
pub fn format_result(
    result: &ExtractionResult,
    format: OutputFormat,
    config: &VfscanConfig,
    critical: &[Field],
) -> anyhow::Result<String> {
    let pretty = config.output.pretty;

    match format {
        OutputFormat::Tagged => Ok(result.to_tagged().to_string()),
        OutputFormat::Json => to_json(&result.record, pretty),
        OutputFormat::Report => {
            let report = ExtractionReport::from_output(&result.to_tagged(), critical);
            to_json(&report, pretty)
        }
        OutputFormat::Text => Ok(format_text(result, critical)),
    }
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> anyhow::Result<String> {
    Ok(if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    })
}

fn format_text(result: &ExtractionResult, critical: &[Field]) -> String {
    let mut output = String::new();

    output.push_str(&format!("Status: {:?}\n", result.status));
    output.push('\n');

    for (field, value) in result.record.iter() {
        if let Some(value) = value {
            output.push_str(&format!("{:<18}{}\n", format!("{}:", field), value));
        }
    }

    let missing = missing_critical_fields(&result.record, critical);
    if !missing.is_empty() {
        let names: Vec<&str> = missing.iter().map(|f| f.name()).collect();
        output.push_str(&format!("\nMissing critical fields: {}\n", names.join(", ")));
    }

    output
}

fn print_status(result: &ExtractionResult, critical: &[Field]) {
    let status = if result.status.is_complete() {
        style("complete").green()
    } else {
        style("partial").yellow()
    };
    eprintln!();
    eprintln!(
        "{} Extraction {}: {} of {} fields from {} lines",
        style("ℹ").blue(),
        status,
        result.record.filled_count(),
        Field::COUNT,
        result.line_count
    );

    let missing = missing_critical_fields(&result.record, critical);
    if !missing.is_empty() {
        let names: Vec<&str> = missing.iter().map(|f| f.name()).collect();
        eprintln!(
            "{} Missing critical fields: {}",
            style("ℹ").blue(),
            names.join(", ")
        );
    }

    for warning in &result.warnings {
        eprintln!("  {} {}", style("!").yellow(), warning);
    }
}
