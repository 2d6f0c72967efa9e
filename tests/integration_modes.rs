//! End-to-end parsing tests through the public API
//!
//! Every mode is driven through the strategy registry from its tag, the
//! way the command line resolves it.

use chrono::NaiveDate;
use fieldlog::{
    ErrorKind, ExplosionPolicy, ParseMode, ParserConfig, RawLog, Table, resolve_strategy,
    resolve_strategy_by_name,
};

fn parse(tag: &str, content: &str, config: &ParserConfig) -> fieldlog::Result<Table> {
    let strategy = resolve_strategy_by_name(tag)?;
    strategy.parse(&RawLog::new(format!("{}.log", tag), content), config)
}

fn assert_columns_aligned(table: &Table) {
    for (name, values) in table.iter_columns() {
        assert_eq!(values.len(), table.num_rows(), "column {} is misaligned", name);
    }
}

fn nemo_config() -> ParserConfig {
    ParserConfig::default().with_nemo_date(NaiveDate::from_ymd_opt(2023, 6, 14).unwrap())
}

#[test]
fn test_every_mode_handles_noise_without_misaligning() {
    let noise = "\
garbage line
[2023-06-14 10:00:00.000000]
[not a time] 1 2 3
{\"abs_time\": 1686738063123, \"cells\": [{\"pci\": 1}], \"connected_pci\": 1}
[2023-06-14 10:00:01.000000] 1 -40.5
";
    for mode in ParseMode::ALL {
        let config = nemo_config();
        let result = resolve_strategy(mode).parse(&RawLog::new("noise.log", noise), &config);
        match mode {
            // Not a CSV with a Time column
            ParseMode::Nemo => {
                assert_eq!(result.unwrap_err().kind(), ErrorKind::InvalidInput)
            }
            _ => assert_columns_aligned(&result.unwrap()),
        }
    }
}

#[test]
fn test_token_count_gate() {
    let log = "\
[2023-06-14 10:00:01.000000]   46  15   1  27   10M  100    0   0%   30   20  20  1.5M   50    1   2%   0.0
[2023-06-14 10:00:02.000000]   46  15   1  27   10M  100    0   0%   30   20  20  1.5M   50    1   2%
[2023-06-14 10:00:03.000000]   46  15   1  27   10M  100    0   0%   30   20  20  1.5M   50    1   2%   0.0  extra
";
    let table = parse("enb", log, &ParserConfig::default()).unwrap();
    assert_eq!(table.num_rows(), 1);
    assert_eq!(table.num_columns(), 17);
}

#[test]
fn test_iperf_terminator_truncates() {
    let log = "\
[2023-06-14 10:00:01.000000] [  5]   0.00-1.00   sec  1.48 MBytes  12.4 Mbits/sec
[2023-06-14 10:00:02.000000] - - - - - - - - - - - - - - - - - - - - - - - - -
[2023-06-14 10:00:03.000000] [  5]   1.00-2.00   sec  1.30 MBytes  10.9 Mbits/sec
";
    let table = parse("iperfServer", log, &ParserConfig::default()).unwrap();

    assert_eq!(table.num_rows(), 1);
    assert_eq!(table.column("ID").unwrap(), ["5"]);
    assert_eq!(table.column("Interval(sec)").unwrap(), ["0.00-1.00"]);
    assert_eq!(table.column("Bandwidth(MBits/sec)").unwrap(), ["12.4"]);
}

#[test]
fn test_nemo_explosion_alignment() {
    let csv = "\
Time,Physical layer identity (LTE detected),RSRQ
10:00:00.000,\"100,101,102\",\"10,11,12\"
10:00:01.000,\"100,101,102\",\"10,11\"
";
    let err = parse("nemo", csv, &nemo_config()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ExplosionMismatch);

    let config = nemo_config().with_explosion_policy(ExplosionPolicy::SkipRow);
    let table = parse("nemo", csv, &config).unwrap();

    let cells = table
        .column("Physical layer identity (LTE detected)")
        .unwrap();
    let rsrq = table.column("RSRQ").unwrap();
    let pairs: Vec<(&str, &str)> = cells
        .iter()
        .map(String::as_str)
        .zip(rsrq.iter().map(String::as_str))
        .collect();
    assert_eq!(pairs, [("100", "10"), ("101", "11"), ("102", "12")]);
    assert_columns_aligned(&table);
}

#[test]
fn test_pawprints_connected_flag() {
    let log = r#"{"abs_time": 1686738063123, "connected_pci": 101, "cells": [{"pci": 100, "rsrp": -99}, {"pci": 101, "rsrp": -82}]}"#;
    let table = parse("pawprints_4G", log, &ParserConfig::default()).unwrap();

    assert_eq!(table.column("pci").unwrap(), ["100", "101"]);
    assert_eq!(table.column("is_connected").unwrap(), ["0", "1"]);
}

#[test]
fn test_ue_si_suffix_policies() {
    let line = "[2023-06-14 10:00:01.000000]   0    1   -85   85  -1.2k |  27   30    0.5   k2    0% |   0.0   20   31k   1.2M    5%";

    // A prefix letter anywhere in the token rescales it by default
    let historical = parse("ue", line, &ParserConfig::default()).unwrap();
    assert_eq!(historical.column("brateDl").unwrap(), ["2000.0"]);

    let config = ParserConfig::default().with_si_suffix(fieldlog::SuffixMatching::TrailingOnly);
    let trailing = parse("ue", line, &config).unwrap();
    assert_eq!(trailing.column("brateDl").unwrap(), ["k2"]);
    assert_eq!(trailing.column("cfo").unwrap(), ["-1200.0"]);
}

#[test]
fn test_unknown_mode() {
    let err = parse("parse_epc", "", &ParserConfig::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownMode);
}
