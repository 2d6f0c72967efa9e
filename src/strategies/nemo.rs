//! Nemo drive-test CSV exports.
//!
//! Radio KPIs for every detected cell are packed into one row as
//! comma separated lists, keyed by the cell identity column. Each row is
//! exploded into one output row per cell with every list split in step.
//! Rows without a cell identity (uplink reports) stay a single row.
//!
//! The `Time` column only carries a time of day, so every row is anchored
//! to the log date from [`ParserConfig::nemo_date`] and an absolute epoch
//! millisecond column is appended.

use super::Strategy;
use crate::config::{ExplosionPolicy, ParserConfig};
use crate::constants::{LINE_TIMESTAMP_FORMAT, NEMO_DATE_FORMAT, NEMO_TIME_FORMAT, nemo};
use crate::error::{FieldLogError, Result};
use crate::models::{ParseMode, RawLog};
use crate::normalize::format_decimal;
use crate::table::{FieldSchema, Record, Table};
use crate::timestamp::to_epoch_ms;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use polars::prelude::*;
use std::io::Cursor;
use tracing::{debug, info, warn};

/// Cell values the exporting tool writes for "no measurement"
const MISSING_TOKENS: &[&str] = &[
    "", "NaN", "nan", "-nan", "NA", "N/A", "n/a", "null", "NULL", "None", "#N/A", "<NA>",
];

pub struct NemoStrategy;

impl Strategy for NemoStrategy {
    fn mode(&self) -> ParseMode {
        ParseMode::Nemo
    }

    fn parse(&self, input: &RawLog, config: &ParserConfig) -> Result<Table> {
        let date = config
            .nemo_date
            .ok_or_else(|| FieldLogError::configuration("nemo mode requires a log date"))?;

        let frame = NemoFrame::read(input)?;
        let time_index = frame
            .position(nemo::TIME)
            .ok_or_else(|| FieldLogError::InvalidFormat {
                path: input.source.clone(),
                reason: format!("no '{}' column", nemo::TIME),
            })?;
        let cell_index = frame
            .position(nemo::LTE_CELL_ID)
            .or_else(|| frame.position(nemo::NR_CELL_ID));

        // Columns with no value anywhere are dropped before explosion
        let kept: Vec<usize> = (0..frame.columns.len())
            .filter(|&column| frame.has_values(column))
            .collect();
        let mut names: Vec<&str> = kept.iter().map(|&c| frame.columns[c].as_str()).collect();
        names.push(nemo::ABS_TIME);
        let schema = FieldSchema::new(&names)?;

        let explosion = Explosion {
            frame: &frame,
            schema: &schema,
            kept: &kept,
            time_index,
            cell_index,
            date,
        };

        let mut table = Table::with_schema(&schema);
        let mut skipped = 0usize;
        for row in 0..frame.height {
            match explosion.row(row) {
                Ok(records) => {
                    if records.is_empty() {
                        skipped += 1;
                    }
                    for record in records {
                        table.append(record)?;
                    }
                }
                Err(e @ FieldLogError::ExplosionMismatch { .. })
                    if config.explosion_policy == ExplosionPolicy::SkipRow =>
                {
                    skipped += 1;
                    warn!("{}: skipping row: {}", input.source.display(), e);
                }
                Err(e) => return Err(e),
            }
        }

        info!(
            "nemo: {} rows read, {} records, {} rows skipped ({})",
            frame.height,
            table.num_rows(),
            skipped,
            if cell_index.is_some() { "cellular" } else { "non-cellular" }
        );
        Ok(table)
    }
}

/// Raw Nemo export, every value kept as text, missing values as `None`
struct NemoFrame {
    columns: Vec<String>,
    values: Vec<Vec<Option<String>>>,
    height: usize,
}

impl NemoFrame {
    fn read(input: &RawLog) -> Result<Self> {
        let invalid = |e: PolarsError| FieldLogError::InvalidFormat {
            path: input.source.clone(),
            reason: e.to_string(),
        };

        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .into_reader_with_file_handle(Cursor::new(input.content().as_bytes().to_vec()))
            .finish()
            .map_err(invalid)?;

        let mut columns = Vec::with_capacity(df.width());
        let mut values = Vec::with_capacity(df.width());
        for column in df.get_columns() {
            let series = column.as_materialized_series();
            columns.push(series.name().to_string());
            values.push(
                series
                    .str()?
                    .into_iter()
                    .map(|value| value.filter(|v| !is_missing(v)).map(str::to_string))
                    .collect(),
            );
        }

        debug!(
            "{}: {} columns, {} rows",
            input.source.display(),
            columns.len(),
            df.height()
        );
        Ok(Self {
            columns,
            values,
            height: df.height(),
        })
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    fn value(&self, column: usize, row: usize) -> Option<&str> {
        self.values[column][row].as_deref()
    }

    fn has_values(&self, column: usize) -> bool {
        self.values[column].iter().any(Option::is_some)
    }
}

fn is_missing(value: &str) -> bool {
    MISSING_TOKENS.contains(&value.trim())
}

/// Per-row expansion context
struct Explosion<'a> {
    frame: &'a NemoFrame,
    schema: &'a FieldSchema,
    kept: &'a [usize],
    time_index: usize,
    cell_index: Option<usize>,
    date: NaiveDate,
}

impl Explosion<'_> {
    /// Records for one input row; empty when the row is rejected.
    /// Records are only returned once the whole row has been expanded.
    fn row(&self, row: usize) -> Result<Vec<Record>> {
        let Some(time) = self.frame.value(self.time_index, row) else {
            debug!("nemo row {}: no time", row + 1);
            return Ok(Vec::new());
        };
        if NaiveTime::parse_from_str(time, NEMO_TIME_FORMAT).is_err() {
            debug!("nemo row {}: invalid time '{}'", row + 1, time);
            return Ok(Vec::new());
        }
        let measured = (0..self.frame.columns.len())
            .filter(|&column| column != self.time_index)
            .any(|column| self.frame.value(column, row).is_some());
        if !measured {
            debug!("nemo row {}: no measurements", row + 1);
            return Ok(Vec::new());
        }

        let composed = format!("{} {}", self.date.format(NEMO_DATE_FORMAT), time);
        let absolute = NaiveDateTime::parse_from_str(&composed, LINE_TIMESTAMP_FORMAT)
            .map_err(|_| FieldLogError::invalid_value(composed.as_str(), "not a valid Nemo time"))?;
        let abs_time = format_decimal(to_epoch_ms(&absolute));

        // Uplink rows carry no cell identity and are never split
        let cells = self
            .cell_index
            .and_then(|column| self.frame.value(column, row))
            .map(split_list);
        let count = cells.as_ref().map_or(1, Vec::len);

        let mut columns: Vec<Vec<String>> = Vec::with_capacity(self.kept.len());
        for &column in self.kept {
            let name = &self.frame.columns[column];
            let value = if column == self.time_index {
                Some(composed.as_str())
            } else {
                self.frame.value(column, row)
            };

            let expanded = match value {
                Some(value)
                    if cells.is_some()
                        && !name.to_lowercase().contains("time")
                        && value.contains(nemo::LIST_SEPARATOR) =>
                {
                    let items = split_list(value);
                    if items.len() != count {
                        return Err(FieldLogError::ExplosionMismatch {
                            row: row + 1,
                            column: name.clone(),
                            expected: count,
                            found: items.len(),
                        });
                    }
                    items
                }
                value => vec![value.unwrap_or_default().to_string(); count],
            };
            columns.push(expanded);
        }

        let mut records = Vec::with_capacity(count);
        for index in 0..count {
            let values = columns
                .iter()
                .map(|column| column[index].as_str())
                .chain(std::iter::once(abs_time.as_str()));
            records.push(self.schema.record(values)?);
        }
        Ok(records)
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(nemo::LIST_SEPARATOR)
        .map(|item| item.trim().to_string())
        .collect()
}
