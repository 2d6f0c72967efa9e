//! Vehicle telemetry CSV written by the trajectory and GPS loggers.

use super::{LineOutcome, Strategy, expect_token_count, run_lines};
use crate::config::ParserConfig;
use crate::constants::schemas;
use crate::error::Result;
use crate::models::{ParseMode, RawLog};
use crate::table::{FieldSchema, Table};

/// Quoting that wraps attitude and velocity 3-vectors, e.g. `"(0.1,0.2,0.3)"`
const VECTOR_GROUP_OPEN: &str = "\"(";
const VECTOR_GROUP_CLOSE: &str = ")\"";

/// Fixed-order comma separated rows. The time column sits inside the row,
/// so there is no bracketed prefix to extract.
pub struct VehicleOutStrategy;

impl Strategy for VehicleOutStrategy {
    fn mode(&self) -> ParseMode {
        ParseMode::VehicleOut
    }

    fn parse(&self, input: &RawLog, _config: &ParserConfig) -> Result<Table> {
        let schema = FieldSchema::from_static(schemas::VEHICLE_OUT);
        let table = Table::with_schema(&schema);

        run_lines(self.mode(), input, table, |_, line| {
            if line.trim().is_empty() {
                return Ok(LineOutcome::Ignore);
            }

            let flattened = line
                .replace(VECTOR_GROUP_OPEN, "")
                .replace(VECTOR_GROUP_CLOSE, "");
            let fields: Vec<&str> = flattened.split(',').collect();

            // Loggers that write a header row repeat the schema names
            if fields.first().map(|f| f.trim()) == Some(schema.columns()[0].as_str()) {
                return Ok(LineOutcome::Ignore);
            }
            expect_token_count(&schema, 0, fields.len())?;

            Ok(LineOutcome::record(schema.record(fields)?))
        })
    }
}
