//! CSV export of parsed tables.
//!
//! Tables are written through a polars `DataFrame` with every column kept
//! as text. Output goes to a sibling `.partial` file that is renamed into
//! place once complete, so a failed export never leaves a half-written CSV.

use crate::constants::CSV_EXTENSION;
use crate::error::{FieldLogError, Result};
use crate::models::{FileSummary, ParseMode};
use crate::table::Table;
use colored::*;
use polars::prelude::*;
use std::ffi::OsString;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::debug;

const PARTIAL_SUFFIX: &str = "partial";

/// Default output for an input: the input path with a `.csv` extension.
/// Inputs that are already CSV get the mode tag inserted so they are not overwritten.
pub fn output_path_for(input: &Path, mode: ParseMode) -> PathBuf {
    let candidate = input.with_extension(CSV_EXTENSION);
    if candidate != input {
        return candidate;
    }

    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    input.with_file_name(format!("{}.{}.{}", stem, mode, CSV_EXTENSION))
}

/// Append `.csv` unless the path already ends with it
pub fn with_csv_extension(path: &Path) -> PathBuf {
    let has_csv = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(CSV_EXTENSION));
    if has_csv {
        return path.to_path_buf();
    }

    let mut name = OsString::from(path.as_os_str());
    name.push(".");
    name.push(CSV_EXTENSION);
    PathBuf::from(name)
}

/// Convert a table into a string-typed DataFrame in column insertion order.
/// Empty values become nulls so they are written as empty fields.
pub fn table_to_dataframe(table: &Table) -> Result<DataFrame> {
    let columns: Vec<Column> = table
        .iter_columns()
        .map(|(name, values)| {
            let values: Vec<Option<&str>> = values
                .iter()
                .map(|value| (!value.is_empty()).then_some(value.as_str()))
                .collect();
            Column::new(name.into(), values)
        })
        .collect();

    Ok(DataFrame::new(columns)?)
}

/// Write a table as CSV with a header row. Returns the number of data rows written.
pub fn export_csv(table: &Table, path: &Path) -> Result<usize> {
    let path = with_csv_extension(path);
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut df = table_to_dataframe(table)?;
    let partial = partial_path(&path);

    let written = File::create(&partial)
        .map_err(FieldLogError::from)
        .and_then(|mut file| {
            CsvWriter::new(&mut file)
                .include_header(true)
                .finish(&mut df)?;
            file.sync_all()?;
            Ok(())
        });
    if let Err(e) = written {
        let _ = fs::remove_file(&partial);
        return Err(e);
    }
    fs::rename(&partial, &path)?;

    debug!(
        "Wrote {} rows x {} columns to {}",
        df.height(),
        df.width(),
        path.display()
    );
    Ok(df.height())
}

fn partial_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".");
    name.push(PARTIAL_SUFFIX);
    PathBuf::from(name)
}

/// Operator-facing report of one export
pub fn print_summary(summary: &FileSummary) {
    println!(
        "{} {} lines of data in {}",
        "Saved".bright_green(),
        summary.rows.to_string().bright_white().bold(),
        summary.output.display()
    );
    println!("{}", "Available fields:".bright_cyan());
    for column in &summary.columns {
        println!("{}", column);
    }
}
