//! Unstructured logs kept line by line.

use super::{LineOutcome, Strategy, run_lines};
use crate::config::ParserConfig;
use crate::constants::schemas;
use crate::error::Result;
use crate::models::{ParseMode, RawLog};
use crate::table::{FieldSchema, Table};
use crate::timestamp::{format_timestamp, split_timestamp};

/// Timestamp plus the verbatim remainder of the line. Used for core
/// network (`epc`) and vehicle controller (`vehicleLog`) output, which are
/// too varied to split into fields.
pub struct FreeTextStrategy {
    mode: ParseMode,
}

impl FreeTextStrategy {
    pub fn new(mode: ParseMode) -> Self {
        Self { mode }
    }
}

impl Strategy for FreeTextStrategy {
    fn mode(&self) -> ParseMode {
        self.mode
    }

    fn parse(&self, input: &RawLog, _config: &ParserConfig) -> Result<Table> {
        let schema = FieldSchema::from_static(schemas::FREE_TEXT);
        let table = Table::with_schema(&schema);

        run_lines(self.mode, input, table, |_, line| {
            let (timestamp, rest) = split_timestamp(line)?;
            if rest.trim().is_empty() {
                return Ok(LineOutcome::Ignore);
            }

            let time = format_timestamp(&timestamp);
            Ok(LineOutcome::record(schema.record([time.as_str(), rest])?))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remainder_is_kept_verbatim() {
        let log = "\
[2023-06-14 10:00:00.000000] [S1AP] Received S1 Setup Request
[2023-06-14 10:00:01.000000]
[2023-06-14 10:00:02.000000]  UE attach accepted: IMSI=001010123456789
not a log line
";
        let strategy = FreeTextStrategy::new(ParseMode::Epc);
        let table = strategy
            .parse(&RawLog::new("epc.log", log), &ParserConfig::default())
            .unwrap();

        assert_eq!(table.num_rows(), 2);
        assert_eq!(
            table.column("log").unwrap(),
            [
                " [S1AP] Received S1 Setup Request",
                "  UE attach accepted: IMSI=001010123456789"
            ]
        );
        assert_eq!(
            table.column("time").unwrap(),
            ["2023-06-14 10:00:00.000000", "2023-06-14 10:00:02.000000"]
        );
    }

    #[test]
    fn test_vehicle_log_shares_grammar() {
        let strategy = FreeTextStrategy::new(ParseMode::VehicleLog);
        assert_eq!(strategy.mode(), ParseMode::VehicleLog);

        let table = strategy
            .parse(
                &RawLog::new("vehicle.log", "[2023-06-14 10:00:00.5] ARMED\n"),
                &ParserConfig::default(),
            )
            .unwrap();
        assert_eq!(table.column("time").unwrap(), ["2023-06-14 10:00:00.500000"]);
        assert_eq!(table.column("log").unwrap(), [" ARMED"]);
    }
}
