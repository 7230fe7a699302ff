//! Batch processing command for multiple report files.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, warn};

use vfscan_core::report::missing_critical_fields;
use vfscan_core::{ExtractionResult, Field, VfscanConfig};

use super::process::{extract_file, format_result, load_config, OutputFormat};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "tagged")]
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
    result: Option<ExtractionResult>,
    error: Option<String>,
    processing_time_ms: u64,
}

impl ProcessResult {
    fn status(&self) -> &'static str {
        match &self.result {
            Some(r) if r.status.is_complete() => "complete",
            Some(_) => "partial",
            None => "error",
        }
    }
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = Arc::new(load_config(config_path)?);
    let critical = config.extraction.critical_fields()?;

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            let ext = p.extension().and_then(|e| e.to_str()).unwrap_or("");
            matches!(ext.to_lowercase().as_str(), "pdf" | "txt")
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

    let progress = ProgressBar::new(files.len() as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let semaphore = Arc::new(Semaphore::new(args.jobs.max(1)));
    let mut tasks = JoinSet::new();

    for (index, path) in files.iter().cloned().enumerate() {
        let semaphore = Arc::clone(&semaphore);
        let config = Arc::clone(&config);

        tasks.spawn(async move {
            let _permit = semaphore.acquire_owned().await?;
            let outcome = tokio::task::spawn_blocking(move || {
                let file_start = Instant::now();
                let result = extract_file(&path, &config);
                let processing_time_ms = file_start.elapsed().as_millis() as u64;
                (path, result, processing_time_ms)
            })
            .await?;
            anyhow::Ok((index, outcome))
        });
    }

    let mut results: Vec<(usize, ProcessResult)> = Vec::with_capacity(files.len());

    while let Some(joined) = tasks.join_next().await {
        let (index, (path, result, processing_time_ms)) = joined??;

        match result {
            Ok(result) => results.push((
                index,
                ProcessResult {
                    path,
                    result: Some(result),
                    error: None,
                    processing_time_ms,
                },
            )),
            Err(e) => {
                let error_msg = e.to_string();
                if args.continue_on_error {
                    warn!("Failed to process {}: {}", path.display(), error_msg);
                    results.push((
                        index,
                        ProcessResult {
                            path,
                            result: None,
                            error: Some(error_msg),
                            processing_time_ms,
                        },
                    ));
                } else {
                    error!("Failed to process {}: {}", path.display(), error_msg);
                    tasks.abort_all();
                    progress.abandon();
                    anyhow::bail!("Processing failed for {}: {}", path.display(), error_msg);
                }
            }
        }

        progress.inc(1);
    }

    progress.finish_and_clear();

    results.sort_by_key(|(index, _)| *index);
    let results: Vec<ProcessResult> = results.into_iter().map(|(_, r)| r).collect();

    if let Some(output_dir) = &args.output_dir {
        write_outputs(output_dir, &results, args.format, &config, &critical)?;
    }

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results, &critical)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let count = |status: &str| results.iter().filter(|r| r.status() == status).count();
    let failed: Vec<&ProcessResult> = results.iter().filter(|r| r.error.is_some()).collect();

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} complete, {} partial, {} failed",
        style(count("complete")).green(),
        style(count("partial")).yellow(),
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

fn write_outputs(
    output_dir: &Path,
    results: &[ProcessResult],
    format: OutputFormat,
    config: &VfscanConfig,
    critical: &[Field],
) -> anyhow::Result<()> {
    for entry in results {
        let Some(result) = &entry.result else {
            continue;
        };

        let stem = entry
            .path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("report");
        let output_path = output_dir.join(format!("{}.{}", stem, format.extension()));

        let content = format_result(result, format, config, critical)?;
        fs::write(&output_path, content)?;
        debug!("Wrote output to {}", output_path.display());
    }

    Ok(())
}

fn write_summary(path: &Path, results: &[ProcessResult], critical: &[Field]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "patient",
        "patient_id",
        "test_type",
        "missing_critical",
        "processing_time_ms",
        "error",
    ])?;

    for entry in results {
        let filename = entry
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("");
        let time = entry.processing_time_ms.to_string();

        if let Some(result) = &entry.result {
            let record = &result.record;
            let missing: Vec<&str> = missing_critical_fields(record, critical)
                .iter()
                .map(|f| f.name())
                .collect();

            wtr.write_record([
                filename,
                entry.status(),
                record.get(Field::Patient).unwrap_or(""),
                record.get(Field::PatientId).unwrap_or(""),
                record.get(Field::TestType).unwrap_or(""),
                &missing.join("; "),
                &time,
                "",
            ])?;
        } else {
            wtr.write_record([
                filename,
                entry.status(),
                "",
                "",
                "",
                "",
                &time,
                entry.error.as_deref().unwrap_or(""),
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}
