//! Run orchestration.
//!
//! Resolves the inputs of a run, parses each one with the strategy bound
//! to the selected mode and exports the result. A single input is
//! processed directly and its failure is the run's failure; several
//! inputs go through the batch pipeline where failures are counted.

pub mod batch;
pub mod discovery;

#[cfg(test)]
pub mod tests;

use self::{batch::BatchProcessor, discovery::FileDiscovery};

use crate::config::ParserConfig;
use crate::error::{FieldLogError, Result};
use crate::export::{export_csv, output_path_for, print_summary, with_csv_extension};
use crate::models::{FileSummary, ParseMode, ProcessingStats, RawLog};
use crate::strategies::resolve_strategy;
use crate::table::Table;

use colored::*;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tokio::fs;
use tokio::task;
use tracing::info;

/// Parses and exports log files for one mode
#[derive(Debug, Clone)]
pub struct LogProcessor {
    mode: ParseMode,
    config: ParserConfig,
    show_progress: bool,
}

impl LogProcessor {
    /// Create a processor, validating the configuration for the mode
    pub fn new(mode: ParseMode, config: ParserConfig) -> Result<Self> {
        config.validate(mode)?;
        Ok(Self {
            mode,
            config,
            show_progress: true,
        })
    }

    /// Show a progress bar while processing batches
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn mode(&self) -> ParseMode {
        self.mode
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Read and parse one file without exporting it
    pub fn parse_file(&self, path: &Path) -> Result<Table> {
        let raw = RawLog::read(path)?;
        info!(
            "Parsing {} as {} ({} bytes)",
            path.display(),
            self.mode,
            raw.content().len()
        );
        resolve_strategy(self.mode).parse(&raw, &self.config)
    }

    /// Parse one file and export it to `output`
    pub fn process_file(&self, input: &Path, output: &Path) -> Result<FileSummary> {
        let table = self.parse_file(input)?;
        let output = with_csv_extension(output);
        let rows = export_csv(&table, &output)?;

        Ok(FileSummary {
            input: input.to_path_buf(),
            output,
            rows,
            columns: table.column_names().to_vec(),
        })
    }

    /// Output for `input`. `output` is the requested file for a single
    /// input, or the target directory for a batch.
    pub fn output_for(&self, input: &Path, output: Option<&Path>, batch: bool) -> PathBuf {
        let default = output_path_for(input, self.mode);
        match output {
            Some(dir) if batch => dir.join(default.file_name().unwrap_or_default()),
            Some(path) => with_csv_extension(path),
            None => default,
        }
    }

    /// Pair every input with its output. Batch inputs that would share an
    /// output name get their parent directory name as a prefix; outputs
    /// that still collide fail the run before anything is written.
    pub fn assign_outputs(
        &self,
        files: Vec<PathBuf>,
        output: Option<&Path>,
        batch: bool,
    ) -> Result<Vec<(PathBuf, PathBuf)>> {
        let mut jobs: Vec<(PathBuf, PathBuf)> = files
            .into_iter()
            .map(|input| {
                let target = self.output_for(&input, output, batch);
                (input, target)
            })
            .collect();

        let mut counts: HashMap<PathBuf, usize> = HashMap::new();
        for (_, target) in &jobs {
            *counts.entry(target.clone()).or_default() += 1;
        }
        for (input, target) in &mut jobs {
            if counts[target.as_path()] > 1 {
                let renamed = prefixed_with_parent(input, target);
                *target = renamed;
            }
        }

        let mut claimed: HashMap<&Path, &Path> = HashMap::new();
        for (input, target) in &jobs {
            if let Some(previous) = claimed.insert(target.as_path(), input.as_path()) {
                return Err(FieldLogError::configuration(format!(
                    "{} and {} would both be written to {}",
                    previous.display(),
                    input.display(),
                    target.display()
                )));
            }
        }
        Ok(jobs)
    }

    /// Process every input of a run and report the outcome
    pub async fn process(&self, inputs: &[PathBuf], output: Option<&Path>) -> Result<ProcessingStats> {
        let start_time = Instant::now();
        println!(
            "{} {}",
            "Parsing logs as".bright_green().bold(),
            self.mode.to_string().bright_white().bold()
        );

        let files = FileDiscovery::new(self.mode).discover(inputs).await?;
        let batch = files.len() > 1;
        if batch {
            println!(
                "  {} {} input files",
                "Found".bright_green(),
                files.len().to_string().bright_white().bold()
            );
            if let Some(dir) = output {
                fs::create_dir_all(dir).await?;
            }
        }

        let jobs = self.assign_outputs(files, output, batch)?;

        let mut stats = if batch {
            BatchProcessor::new(self.clone())
                .with_progress(self.show_progress)
                .run(jobs)
                .await
        } else {
            self.process_single(jobs).await?
        };

        for summary in &stats.outputs {
            print_summary(summary);
        }

        stats.processing_time_ms = start_time.elapsed().as_millis();
        if batch {
            self.print_totals(&stats);
        }
        Ok(stats)
    }

    async fn process_single(&self, jobs: Vec<(PathBuf, PathBuf)>) -> Result<ProcessingStats> {
        let mut stats = ProcessingStats::default();
        let Some((input, output)) = jobs.into_iter().next() else {
            return Ok(stats);
        };

        let processor = self.clone();
        let path = input.clone();
        let summary = task::spawn_blocking(move || processor.process_file(&input, &output))
            .await
            .map_err(|e| FieldLogError::ProcessingFailed {
                path,
                reason: e.to_string(),
            })??;

        stats.files_processed = 1;
        stats.total_rows = summary.rows;
        stats.outputs.push(summary);
        Ok(stats)
    }

    fn print_totals(&self, stats: &ProcessingStats) {
        println!("\n{}", "Processing Summary".bright_green().bold());
        println!(
            "  {} {}ms",
            "Time elapsed:".bright_cyan(),
            stats.processing_time_ms.to_string().bright_white()
        );
        println!(
            "  {} {}",
            "Files processed:".bright_cyan(),
            stats.files_processed.to_string().bright_white()
        );
        if stats.files_failed > 0 {
            println!(
                "  {} {}",
                "Files failed:".bright_red(),
                stats.files_failed.to_string().bright_red().bold()
            );
        }
        println!(
            "  {} {}",
            "Total rows:".bright_cyan(),
            stats.total_rows.to_string().bright_white().bold()
        );
    }
}

/// `<dir>/<name>` becomes `<dir>/<input parent>_<name>`
fn prefixed_with_parent(input: &Path, target: &Path) -> PathBuf {
    let parent = input
        .parent()
        .and_then(Path::file_name)
        .map(|name| name.to_string_lossy().into_owned());
    match (parent, target.file_name()) {
        (Some(parent), Some(name)) => {
            target.with_file_name(format!("{}_{}", parent, name.to_string_lossy()))
        }
        _ => target.to_path_buf(),
    }
}
