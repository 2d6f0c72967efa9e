//! PawPrints phone diagnostics: one JSON object per line.
//!
//! 4G lines carry a `cells` array that is flattened into one record per
//! cell. 5G lines carry a single `nr_signal_strength` object. Both get the
//! phone's capture time (raw and readable) and, when the companion device
//! reported one, its capture time too. The output columns are the union
//! of every record's fields; a record lacking a field leaves it empty.

use super::{LineOutcome, Strategy, collect_lines};
use crate::config::ParserConfig;
use crate::constants::pawprints::{
    ABS_TIME, CELLS, COMPANION_ABS_TIME, COMPANION_TIME_READABLE, CONNECTED_PCI, IS_CONNECTED,
    NR_SIGNAL_STRENGTH, PCI, PHONE_ABS_TIME, PHONE_TIME_READABLE,
};
use crate::error::{FieldLogError, Result};
use crate::models::{ParseMode, RawLog};
use crate::table::{Record, Table};
use crate::timestamp::epoch_ms_to_readable;
use serde_json::{Map, Value};

/// Per-cell LTE measurements
pub struct Pawprints4GStrategy;

impl Strategy for Pawprints4GStrategy {
    fn mode(&self) -> ParseMode {
        ParseMode::Pawprints4G
    }

    fn parse(&self, input: &RawLog, _config: &ParserConfig) -> Result<Table> {
        let records = collect_lines(self.mode(), input, |_, line| {
            if line.trim().is_empty() {
                return Ok(LineOutcome::Ignore);
            }
            let row = parse_object(line)?;

            let Some(cells) = row.get(CELLS).and_then(Value::as_array) else {
                return Ok(LineOutcome::Emit(Vec::new()));
            };
            let connected_pci = row.get(CONNECTED_PCI).and_then(as_integer);
            let timing = Timing::from_row(&row)?;

            let mut records = Vec::with_capacity(cells.len());
            for cell in cells {
                let cell = cell.as_object().ok_or_else(|| FieldLogError::InvalidRecord {
                    reason: format!("'{}' entry is not an object", CELLS),
                })?;
                let pci = cell.get(PCI).and_then(as_integer).ok_or_else(|| {
                    FieldLogError::invalid_value(
                        cell.get(PCI).map(json_text).unwrap_or_default(),
                        "cell pci is not an integer",
                    )
                })?;

                let mut record = flatten(cell);
                timing.annotate_phone(&mut record);
                let connected = connected_pci == Some(pci);
                record.insert(IS_CONNECTED, if connected { "1" } else { "0" });
                timing.annotate_companion(&mut record);
                records.push(record);
            }
            Ok(LineOutcome::Emit(records))
        })?;
        Table::from_records(records)
    }
}

/// NR signal strength, at most one record per line
pub struct Pawprints5GStrategy;

impl Strategy for Pawprints5GStrategy {
    fn mode(&self) -> ParseMode {
        ParseMode::Pawprints5G
    }

    fn parse(&self, input: &RawLog, _config: &ParserConfig) -> Result<Table> {
        let records = collect_lines(self.mode(), input, |_, line| {
            if line.trim().is_empty() {
                return Ok(LineOutcome::Ignore);
            }
            let row = parse_object(line)?;

            // A lone key is the placeholder the phone writes when NR is not attached
            let signal = match row.get(NR_SIGNAL_STRENGTH).and_then(Value::as_object) {
                Some(signal) if signal.len() > 1 => signal,
                _ => return Ok(LineOutcome::Emit(Vec::new())),
            };

            let timing = Timing::from_row(&row)?;
            let mut record = flatten(signal);
            timing.annotate_phone(&mut record);
            timing.annotate_companion(&mut record);
            Ok(LineOutcome::record(record))
        })?;
        Table::from_records(records)
    }
}

/// Capture times of one JSON line
struct Timing {
    phone_abs: String,
    phone_readable: String,
    companion: Option<(String, String)>,
}

impl Timing {
    fn from_row(row: &Map<String, Value>) -> Result<Self> {
        let (phone_abs, phone_readable) = match row.get(ABS_TIME) {
            Some(value) => epoch_pair(value)?,
            None => {
                return Err(FieldLogError::InvalidRecord {
                    reason: format!("line has no '{}'", ABS_TIME),
                });
            }
        };
        let companion = row.get(COMPANION_ABS_TIME).map(epoch_pair).transpose()?;

        Ok(Self {
            phone_abs,
            phone_readable,
            companion,
        })
    }

    fn annotate_phone(&self, record: &mut Record) {
        record.insert(PHONE_ABS_TIME, self.phone_abs.as_str());
        record.insert(PHONE_TIME_READABLE, self.phone_readable.as_str());
    }

    fn annotate_companion(&self, record: &mut Record) {
        if let Some((abs, readable)) = &self.companion {
            record.insert(COMPANION_ABS_TIME, abs.as_str());
            record.insert(COMPANION_TIME_READABLE, readable.as_str());
        }
    }
}

fn parse_object(line: &str) -> Result<Map<String, Value>> {
    match serde_json::from_str::<Value>(line) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(FieldLogError::InvalidRecord {
            reason: "line is not a JSON object".to_string(),
        }),
        Err(e) => Err(FieldLogError::InvalidRecord {
            reason: format!("malformed JSON: {}", e),
        }),
    }
}

/// Raw and readable forms of an epoch-millisecond value
fn epoch_pair(value: &Value) -> Result<(String, String)> {
    let epoch_ms = value
        .as_f64()
        .ok_or_else(|| FieldLogError::invalid_value(json_text(value), "epoch time is not a number"))?;
    Ok((json_text(value), epoch_ms_to_readable(epoch_ms)?))
}

/// Copy every field of a JSON object, in document order
fn flatten(object: &Map<String, Value>) -> Record {
    let mut record = Record::new();
    for (name, value) in object {
        record.insert(name.as_str(), json_text(value));
    }
    record
}

/// Integer view of a pci-like value; numeric strings and whole floats are accepted
fn as_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

/// Textual CSV value of a JSON field
fn json_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => number.to_string(),
        nested => nested.to_string(),
    }
}
