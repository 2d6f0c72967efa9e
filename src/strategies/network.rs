//! Network tester output: ping, iperf (client and server) and MGEN reports.

use super::{LineOutcome, Strategy, expect_token_count, run_lines};
use crate::config::ParserConfig;
use crate::constants::{IPERF_UNIT_TOKENS, PING_FRAMING_TOKENS, schemas};
use crate::error::{FieldLogError, Result};
use crate::models::{ParseMode, RawLog};
use crate::normalize::format_decimal;
use crate::table::{FieldSchema, Table};
use crate::timestamp::{format_timestamp, split_timestamp};
use crate::tokenizer::{after_last_bracket, contains_any, tokenize, tokenize_stripped, value_after};
use regex::Regex;
use std::sync::LazyLock;

/// Spaced separator (`- - - - - - - -`) before a trailing summary. Solid
/// dash rules are banners and do not end the data.
static SUMMARY_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-(?: -){7,}").expect("separator pattern is valid"));

/// Bracketed stream id at the start of an iperf line, e.g. `[  5]` or `[SUM]`
static STREAM_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\[\s*([^\]]*?)\s*\]").expect("stream id pattern is valid"));

pub(crate) fn is_summary_separator(line: &str) -> bool {
    SUMMARY_SEPARATOR.is_match(line)
}

/// ICMP echo replies
pub struct PingStrategy;

impl Strategy for PingStrategy {
    fn mode(&self) -> ParseMode {
        ParseMode::Ping
    }

    fn parse(&self, input: &RawLog, _config: &ParserConfig) -> Result<Table> {
        let schema = FieldSchema::from_static(schemas::PING);
        let table = Table::with_schema(&schema);

        run_lines(self.mode(), input, table, |_, line| {
            let (timestamp, rest) = split_timestamp(line)?;
            if !rest.contains("icmp_seq=") {
                return Ok(LineOutcome::Ignore);
            }

            let tokens: Vec<&str> = tokenize_stripped(rest, PING_FRAMING_TOKENS)
                .into_iter()
                .map(|token| value_after(token, '='))
                .collect();
            expect_token_count(&schema, 1, tokens.len())?;

            let time = format_timestamp(&timestamp);
            let values = std::iter::once(time.as_str()).chain(tokens);
            Ok(LineOutcome::record(schema.record(values)?))
        })
    }
}

/// iperf interval reports. Parsing stops at the summary separator.
pub struct IperfStrategy {
    mode: ParseMode,
    schema: &'static [&'static str],
    markers: &'static [&'static str],
}

impl IperfStrategy {
    pub fn client() -> Self {
        Self {
            mode: ParseMode::IperfClient,
            schema: schemas::IPERF_CLIENT,
            markers: &["sec", "MBytes", "KBytes"],
        }
    }

    pub fn server() -> Self {
        Self {
            mode: ParseMode::IperfServer,
            schema: schemas::IPERF_SERVER,
            markers: &["sec", "MBytes"],
        }
    }
}

impl Strategy for IperfStrategy {
    fn mode(&self) -> ParseMode {
        self.mode
    }

    fn parse(&self, input: &RawLog, _config: &ParserConfig) -> Result<Table> {
        let schema = FieldSchema::from_static(self.schema);
        let table = Table::with_schema(&schema);

        run_lines(self.mode, input, table, |_, line| {
            if is_summary_separator(line) {
                return Ok(LineOutcome::Stop);
            }

            let (timestamp, rest) = split_timestamp(line)?;
            let payload = after_last_bracket(rest);
            if !contains_any(&tokenize(payload), self.markers) {
                return Ok(LineOutcome::Ignore);
            }

            let id = STREAM_ID
                .captures(rest)
                .and_then(|captures| captures.get(1))
                .map(|m| m.as_str())
                .ok_or_else(|| FieldLogError::InvalidRecord {
                    reason: "iperf line has no stream id".to_string(),
                })?;

            let tokens = tokenize_stripped(payload, IPERF_UNIT_TOKENS);
            expect_token_count(&schema, 2, tokens.len())?;

            let time = format_timestamp(&timestamp);
            let values = [time.as_str(), id].into_iter().chain(tokens);
            Ok(LineOutcome::record(schema.record(values)?))
        })
    }
}

/// MGEN receiver `REPORT` lines. Values are taken by position from
/// `key>value` tokens; bandwidth is reported in kbit/s and stored in Mbit/s.
pub struct MgenStrategy;

const MGEN_PREAMBLE_LINES: usize = 2;
const MGEN_INTERVAL_INDEX: usize = 6;
const MGEN_BANDWIDTH_INDEX: usize = 7;
const MGEN_LATENCY_INDEX: usize = 11;

impl Strategy for MgenStrategy {
    fn mode(&self) -> ParseMode {
        ParseMode::Mgen
    }

    fn parse(&self, input: &RawLog, _config: &ParserConfig) -> Result<Table> {
        let schema = FieldSchema::from_static(schemas::MGEN);
        let table = Table::with_schema(&schema);

        run_lines(self.mode(), input, table, |index, line| {
            if index < MGEN_PREAMBLE_LINES {
                return Ok(LineOutcome::Ignore);
            }
            if is_summary_separator(line) {
                return Ok(LineOutcome::Stop);
            }

            let (timestamp, rest) = split_timestamp(line)?;
            let tokens = tokenize(after_last_bracket(rest));
            if !tokens.contains(&"REPORT") {
                return Ok(LineOutcome::Ignore);
            }

            let tokens: Vec<&str> = tokens.into_iter().map(|t| value_after(t, '>')).collect();
            if tokens.len() <= MGEN_LATENCY_INDEX {
                return Err(FieldLogError::SchemaMismatch {
                    expected: MGEN_LATENCY_INDEX + 1,
                    found: tokens.len(),
                });
            }

            let bandwidth_text = tokens[MGEN_BANDWIDTH_INDEX];
            let bandwidth_kbps: f64 = bandwidth_text.parse().map_err(|_| {
                FieldLogError::invalid_value(bandwidth_text, "MGEN bandwidth is not a number")
            })?;

            let values = [
                format_timestamp(&timestamp),
                tokens[MGEN_INTERVAL_INDEX].to_string(),
                tokens[MGEN_LATENCY_INDEX].to_string(),
                format_decimal(bandwidth_kbps / 1000.0),
            ];
            Ok(LineOutcome::record(schema.record(values)?))
        })
    }
}
