//! Export round-trip tests
//!
//! Tables written by the exporter are read back with polars to check the
//! header and row count survive unchanged.

use fieldlog::export::{export_csv, with_csv_extension};
use fieldlog::{ParseMode, ParserConfig, RawLog, Table, resolve_strategy};
use polars::prelude::*;
use std::io::Cursor;
use std::path::Path;
use tempfile::TempDir;

fn read_back(path: &Path) -> DataFrame {
    let bytes = std::fs::read(path).unwrap();
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .into_reader_with_file_handle(Cursor::new(bytes))
        .finish()
        .unwrap()
}

fn assert_round_trip(table: &Table, path: &Path) {
    let rows = export_csv(table, path).unwrap();
    assert_eq!(rows, table.num_rows());

    let df = read_back(&with_csv_extension(path));
    assert_eq!(df.height(), table.num_rows());

    let names: Vec<String> = df
        .get_column_names()
        .into_iter()
        .map(|name| name.to_string())
        .collect();
    assert_eq!(names, table.column_names());
}

#[test]
fn test_ue_round_trip() {
    let log = "\
[2023-06-14 10:00:01.000000]   0    1   -85   85  -1.2k |  27   30    0.5   12.3M    0% |   0.0   20   31k   1.2M    5%
[2023-06-14 10:00:02.000000]   0    1   -86   86  -1.0k |  27   29    0.5   11.9M    0% |   0.0   20   30k   1.1M    4%
[2023-06-14 10:00:03.000000]   0    1   -87   87  -0.9k |  26   28    0.5   11.0M    1% |   0.0   19   20k   1.1M    0%
";
    let table = resolve_strategy(ParseMode::Ue)
        .parse(&RawLog::new("ue.log", log), &ParserConfig::default())
        .unwrap();
    assert_eq!(table.num_rows(), 3);

    let temp_dir = TempDir::new().unwrap();
    assert_round_trip(&table, &temp_dir.path().join("ue"));
}

#[test]
fn test_dynamic_columns_round_trip() {
    let log = r#"{"abs_time": 1686738063123, "connected_pci": 3, "cells": [{"pci": 3, "rsrp": -80, "band": "n/a"}, {"pci": 4, "rsrp": -90, "band": null}]}
{"abs_time": 1686738064123, "connected_pci": 4, "cells": [{"pci": 3, "rsrp": -81, "band": "7"}]}"#;
    let table = resolve_strategy(ParseMode::Pawprints4G)
        .parse(&RawLog::new("paw.json", log), &ParserConfig::default())
        .unwrap();
    assert_eq!(table.num_rows(), 3);
    assert_eq!(table.num_columns(), 6);

    let temp_dir = TempDir::new().unwrap();
    assert_round_trip(&table, &temp_dir.path().join("paw.csv"));
}

#[test]
fn test_log_text_with_commas_and_quotes_round_trip() {
    let log = "\
[2023-06-14 10:00:00.000000] attach accepted, \"imsi\" 001010123456789
[2023-06-14 10:00:01.000000] detach
";
    let table = resolve_strategy(ParseMode::Epc)
        .parse(&RawLog::new("epc.log", log), &ParserConfig::default())
        .unwrap();

    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("epc.csv");
    assert_round_trip(&table, &path);

    let df = read_back(&path);
    let logs = df.column("log").unwrap().as_materialized_series().str().unwrap().clone();
    assert_eq!(
        logs.get(0),
        Some(" attach accepted, \"imsi\" 001010123456789")
    );
}
