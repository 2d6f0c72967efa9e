//! Cellular stack logs: UE and eNodeB metric tables and cell search output.

use super::{LineOutcome, Strategy, expect_token_count, run_lines};
use crate::config::ParserConfig;
use crate::constants::{CELL_SEARCH_LABELS, schemas};
use crate::error::{FieldLogError, Result};
use crate::models::{ParseMode, RawLog};
use crate::normalize::normalize_value;
use crate::table::{FieldSchema, Table};
use crate::timestamp::{format_timestamp, split_timestamp};
use crate::tokenizer::tokenize;

/// First tokens of the periodic column-header lines in UE metric output
const UE_HEADER_TOKENS: &[&str] = &["cc", "Current"];

/// First token of the eNodeB metric header line
const ENB_HEADER_TOKEN: &str = "rnti";

/// UE metrics. Every value is SI normalized (`12.3k` -> `12300.0`).
pub struct UeStrategy;

impl Strategy for UeStrategy {
    fn mode(&self) -> ParseMode {
        ParseMode::Ue
    }

    fn parse(&self, input: &RawLog, config: &ParserConfig) -> Result<Table> {
        let schema = FieldSchema::from_static(schemas::UE);
        let table = Table::with_schema(&schema);

        run_lines(self.mode(), input, table, |_, line| {
            let (timestamp, rest) = split_timestamp(line)?;
            let rest = rest.replace('|', "");
            let tokens = tokenize(&rest);

            if tokens
                .first()
                .is_some_and(|first| UE_HEADER_TOKENS.contains(first))
            {
                return Ok(LineOutcome::Ignore);
            }
            expect_token_count(&schema, 1, tokens.len())?;

            let mut values = vec![format_timestamp(&timestamp)];
            for token in tokens {
                values.push(normalize_value(token, config.si_suffix)?);
            }
            Ok(LineOutcome::record(schema.record(values)?))
        })
    }
}

/// eNodeB per-UE metrics, kept verbatim
pub struct EnbStrategy;

impl Strategy for EnbStrategy {
    fn mode(&self) -> ParseMode {
        ParseMode::Enb
    }

    fn parse(&self, input: &RawLog, _config: &ParserConfig) -> Result<Table> {
        let schema = FieldSchema::from_static(schemas::ENB);
        let table = Table::with_schema(&schema);

        run_lines(self.mode(), input, table, |_, line| {
            let (timestamp, rest) = split_timestamp(line)?;
            let tokens = tokenize(rest);

            if tokens.first() == Some(&ENB_HEADER_TOKEN) {
                return Ok(LineOutcome::Ignore);
            }
            expect_token_count(&schema, 1, tokens.len())?;

            let time = format_timestamp(&timestamp);
            let values = std::iter::once(time.as_str()).chain(tokens);
            Ok(LineOutcome::record(schema.record(values)?))
        })
    }
}

/// Cell search results: comma separated `label, value` pairs after the timestamp.
/// The first line of the file is a banner and is skipped.
pub struct CellSearchStrategy;

impl Strategy for CellSearchStrategy {
    fn mode(&self) -> ParseMode {
        ParseMode::CellSearch
    }

    fn parse(&self, input: &RawLog, _config: &ParserConfig) -> Result<Table> {
        let schema = FieldSchema::from_static(schemas::CELL_SEARCH);
        let table = Table::with_schema(&schema);

        run_lines(self.mode(), input, table, |index, line| {
            if index == 0 {
                return Ok(LineOutcome::Ignore);
            }

            let (timestamp, rest) = split_timestamp(line)?;
            let parts: Vec<&str> = rest.split(',').map(str::trim).collect();

            let mut values = vec![format_timestamp(&timestamp)];
            for label in CELL_SEARCH_LABELS {
                values.push(labelled_value(&parts, label)?.to_string());
            }
            Ok(LineOutcome::record(schema.record(values)?))
        })
    }
}

fn labelled_value<'a>(parts: &[&'a str], label: &str) -> Result<&'a str> {
    parts
        .iter()
        .position(|part| *part == label)
        .and_then(|position| parts.get(position + 1).copied())
        .ok_or_else(|| FieldLogError::InvalidRecord {
            reason: format!("cell search line has no value for '{}'", label),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(strategy: &dyn Strategy, content: &str) -> Table {
        strategy
            .parse(&RawLog::new("inline", content), &ParserConfig::default())
            .unwrap()
    }

    const UE_LOG: &str = "\
[2023-06-14 10:00:00.000000] ---------Signal----------|-----------------DL-----------------|-----------UL-----------
[2023-06-14 10:00:00.000100]  cc  pci  rsrp   pl   cfo | mcs  snr  turbo  brate   bler | ta_us  mcs  buff  brate   bler
[2023-06-14 10:00:01.000000]   0    1   -85   85  -1.2k |  27   30    0.5   12.3M    0% |   0.0   20   31k   1.2M    5%
[2023-06-14 10:00:02.000000]   0    1   -86   86   500 |  27   29
[2023-06-14 10:00:03.000000]   0    1   -87   87  -1.1k |  26   28    0.5   11.0M    1% |   0.0   19   20k   1.1M    0%
";

    #[test]
    fn test_ue_metrics() {
        let table = parse(&UeStrategy, UE_LOG);

        assert_eq!(table.num_rows(), 2);
        assert_eq!(table.num_columns(), schemas::UE.len());
        assert_eq!(
            table.column("time").unwrap(),
            ["2023-06-14 10:00:01.000000", "2023-06-14 10:00:03.000000"]
        );
        assert_eq!(table.column("cfo").unwrap(), ["-1200.0", "-1100.0"]);
        assert_eq!(table.column("brateDl").unwrap(), ["12300000.0", "11000000.0"]);
        assert_eq!(table.column("blerUl").unwrap(), ["0.05", "0.0"]);
        assert_eq!(table.column("rsrp").unwrap(), ["-85", "-87"]);
    }

    #[test]
    fn test_ue_bad_timestamp_is_skipped() {
        let log = "\
[garbage]   0    1   -85   85  -1.2k |  27   30    0.5   12.3M    0% |   0.0   20   31k   1.2M    5%
[2023-06-14 10:00:01.000000]   0    1   -85   85  -1.2k |  27   30    0.5   12.3M    0% |   0.0   20   31k   1.2M    5%
";
        assert_eq!(parse(&UeStrategy, log).num_rows(), 1);
    }

    #[test]
    fn test_enb_metrics() {
        let log = "\
[2023-06-14 10:00:00.000000] rnti cqi  ri mcs brate   ok  nok  (%)  snr  phr mcs brate   ok  nok  (%)   bsr
[2023-06-14 10:00:01.000000]   46  15   1  27   10M  100    0   0%   30   20  20  1.5M   50    1   2%   0.0
[2023-06-14 10:00:02.000000]   46  15   1  27
";
        let table = parse(&EnbStrategy, log);

        assert_eq!(table.num_rows(), 1);
        assert_eq!(table.column("rnti").unwrap(), ["46"]);
        // eNodeB values are not rescaled
        assert_eq!(table.column("brateDl").unwrap(), ["10M"]);
        assert_eq!(table.column("(%)Ul").unwrap(), ["2%"]);
        assert_eq!(table.column("bsr").unwrap(), ["0.0"]);
    }

    #[test]
    fn test_cell_search() {
        let log = "\
Opening RF device...
[2023-06-14 10:00:01.000000] Found CELL MHz, 2685.0, EARFCN, 3350, PHYID, 1, PRB, 50, ports, 2, PSS power dB, -30.1, PSR, 5.3
[2023-06-14 10:00:02.000000] Found CELL MHz, 2685.0, EARFCN, 3350
";
        let table = parse(&CellSearchStrategy, log);

        assert_eq!(table.num_rows(), 1);
        assert_eq!(table.column("Freq").unwrap(), ["2685.0"]);
        assert_eq!(table.column("PHYID").unwrap(), ["1"]);
        assert_eq!(table.column("Ports").unwrap(), ["2"]);
        assert_eq!(table.column("PSS").unwrap(), ["-30.1"]);
        assert_eq!(table.column("PSR").unwrap(), ["5.3"]);
    }
}
