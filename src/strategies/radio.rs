//! RF measurement tools: channel sounder power readings and GNU Radio OFDM tag dumps.

use super::{LineOutcome, Strategy, expect_token_count, run_lines};
use crate::config::ParserConfig;
use crate::constants::{
    GNURADIO_LABEL_TOKENS, GNURADIO_MARKERS, GNURADIO_MARKERS_BEFORE_DATA, schemas,
};
use crate::error::Result;
use crate::models::{ParseMode, RawLog};
use crate::table::{FieldSchema, Table};
use crate::timestamp::{format_timestamp, split_timestamp};
use crate::tokenizer::{after_last_bracket, tokenize, tokenize_stripped};

/// `<measurement number> <power dB>` pairs
pub struct ChannelSounderStrategy;

impl Strategy for ChannelSounderStrategy {
    fn mode(&self) -> ParseMode {
        ParseMode::ChannelSounder
    }

    fn parse(&self, input: &RawLog, _config: &ParserConfig) -> Result<Table> {
        let schema = FieldSchema::from_static(schemas::CHANNEL_SOUNDER);
        let table = Table::with_schema(&schema);

        run_lines(self.mode(), input, table, |_, line| {
            let (timestamp, rest) = split_timestamp(line)?;
            let tokens = tokenize(after_last_bracket(rest));
            expect_token_count(&schema, 1, tokens.len())?;

            let time = format_timestamp(&timestamp);
            let values = std::iter::once(time.as_str()).chain(tokens);
            Ok(LineOutcome::record(schema.record(values)?))
        })
    }
}

/// Tag debug output. A data line is only accepted after two marker
/// lines have been seen; the counter resets after each accepted line.
pub struct GnuradioOfdmStrategy;

impl Strategy for GnuradioOfdmStrategy {
    fn mode(&self) -> ParseMode {
        ParseMode::GnuradioOfdm
    }

    fn parse(&self, input: &RawLog, _config: &ParserConfig) -> Result<Table> {
        let schema = FieldSchema::from_static(schemas::GNURADIO_OFDM);
        let table = Table::with_schema(&schema);
        let mut markers_seen = 0usize;

        run_lines(self.mode(), input, table, |_, line| {
            let (timestamp, rest) = split_timestamp(line)?;
            let payload = after_last_bracket(rest);

            let is_marker = GNURADIO_MARKERS.iter().any(|m| payload.contains(m));
            if is_marker && markers_seen != GNURADIO_MARKERS_BEFORE_DATA {
                markers_seen += 1;
                return Ok(LineOutcome::Ignore);
            }
            if markers_seen != GNURADIO_MARKERS_BEFORE_DATA {
                return Ok(LineOutcome::Ignore);
            }

            markers_seen = 0;
            let tokens = tokenize_stripped(payload, GNURADIO_LABEL_TOKENS);
            expect_token_count(&schema, 1, tokens.len())?;

            let time = format_timestamp(&timestamp);
            let values = std::iter::once(time.as_str()).chain(tokens);
            Ok(LineOutcome::record(schema.record(values)?))
        })
    }
}
