//! Batch processing of many log files.
//!
//! Each file is parsed on a blocking worker with its own table, so no
//! state is shared between files. A failed file is logged and counted; it
//! does not stop the rest of the batch.

use super::LogProcessor;
use crate::error::FieldLogError;
use crate::models::{FileSummary, ProcessingStats};

use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use tokio::task;
use tracing::{debug, error};

#[derive(Debug)]
pub struct BatchProcessor {
    processor: LogProcessor,
    show_progress: bool,
}

impl BatchProcessor {
    pub fn new(processor: LogProcessor) -> Self {
        Self {
            processor,
            show_progress: true,
        }
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Process `(input, output)` pairs with bounded parallelism
    pub async fn run(&self, jobs: Vec<(PathBuf, PathBuf)>) -> ProcessingStats {
        let pb = if self.show_progress {
            ProgressBar::new(jobs.len() as u64)
        } else {
            ProgressBar::hidden()
        };
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        pb.set_message("Parsing logs");

        let concurrent_limit = self
            .processor
            .config()
            .max_concurrent_files
            .min(jobs.len())
            .max(1);
        debug!(
            "Processing {} files with {} workers",
            jobs.len(),
            concurrent_limit
        );

        let results: Vec<Result<FileSummary, FieldLogError>> = stream::iter(jobs)
            .map(|(input, output)| {
                let processor = self.processor.clone();
                let pb = pb.clone();
                async move {
                    if let Some(file_name) = input.file_name() {
                        pb.set_message(format!("Parsing: {}", file_name.to_string_lossy()));
                    }

                    let path = input.clone();
                    let result =
                        task::spawn_blocking(move || processor.process_file(&input, &output))
                            .await
                            .map_err(|e| FieldLogError::ProcessingFailed {
                                path: path.clone(),
                                reason: e.to_string(),
                            })
                            .and_then(|result| result);
                    pb.inc(1);

                    match &result {
                        Ok(summary) => debug!(
                            "Parsed {} into {} rows",
                            path.display(),
                            summary.rows
                        ),
                        Err(e) => error!("Failed to process {}: {}", path.display(), e),
                    }
                    result
                }
            })
            .buffer_unordered(concurrent_limit)
            .collect()
            .await;

        pb.finish_with_message("All logs parsed");

        let mut stats = ProcessingStats::default();
        for result in results {
            match result {
                Ok(summary) => {
                    stats.files_processed += 1;
                    stats.total_rows += summary.rows;
                    stats.outputs.push(summary);
                }
                Err(_) => stats.files_failed += 1,
            }
        }
        // Completion order is arbitrary; report in input order
        stats.outputs.sort_by(|a, b| a.input.cmp(&b.input));
        stats
    }
}
