//! Format strategy registry.
//!
//! Every [`ParseMode`] is bound to exactly one [`Strategy`] at compile
//! time. Line-oriented strategies share [`run_lines`], which is the
//! per-line error boundary: recoverable errors drop the line with a log
//! entry, anything else aborts the file.

pub mod free_text;
pub mod nemo;
pub mod network;
pub mod pawprints;
pub mod radio;
pub mod srsran;
pub mod vehicle;

use crate::config::ParserConfig;
use crate::error::{FieldLogError, Result};
use crate::models::{ParseMode, RawLog};
use crate::table::{FieldSchema, Record, Table};
use tracing::{debug, info};

pub use free_text::FreeTextStrategy;
pub use nemo::NemoStrategy;
pub use network::{IperfStrategy, MgenStrategy, PingStrategy};
pub use pawprints::{Pawprints4GStrategy, Pawprints5GStrategy};
pub use radio::{ChannelSounderStrategy, GnuradioOfdmStrategy};
pub use srsran::{CellSearchStrategy, EnbStrategy, UeStrategy};
pub use vehicle::VehicleOutStrategy;

/// Extraction strategy for one log grammar
pub trait Strategy: Send + Sync {
    fn mode(&self) -> ParseMode;

    /// Parse a complete input into a fresh table
    fn parse(&self, input: &RawLog, config: &ParserConfig) -> Result<Table>;
}

/// Resolve the strategy bound to a mode
pub fn resolve_strategy(mode: ParseMode) -> Box<dyn Strategy> {
    match mode {
        ParseMode::Ue => Box::new(UeStrategy),
        ParseMode::Enb => Box::new(EnbStrategy),
        ParseMode::CellSearch => Box::new(CellSearchStrategy),
        ParseMode::Epc => Box::new(FreeTextStrategy::new(ParseMode::Epc)),
        ParseMode::VehicleLog => Box::new(FreeTextStrategy::new(ParseMode::VehicleLog)),
        ParseMode::Ping => Box::new(PingStrategy),
        ParseMode::IperfClient => Box::new(IperfStrategy::client()),
        ParseMode::IperfServer => Box::new(IperfStrategy::server()),
        ParseMode::Mgen => Box::new(MgenStrategy),
        ParseMode::ChannelSounder => Box::new(ChannelSounderStrategy),
        ParseMode::GnuradioOfdm => Box::new(GnuradioOfdmStrategy),
        ParseMode::VehicleOut => Box::new(VehicleOutStrategy),
        ParseMode::Pawprints4G => Box::new(Pawprints4GStrategy),
        ParseMode::Pawprints5G => Box::new(Pawprints5GStrategy),
        ParseMode::Nemo => Box::new(NemoStrategy),
    }
}

/// Resolve a strategy from its mode tag, failing with `UnknownMode`
pub fn resolve_strategy_by_name(tag: &str) -> Result<Box<dyn Strategy>> {
    Ok(resolve_strategy(tag.parse()?))
}

/// What a line-oriented strategy made of one line
#[derive(Debug)]
pub enum LineOutcome {
    /// Records to append, possibly none
    Emit(Vec<Record>),
    /// Line is not part of the grammar (headers, banners, blank lines)
    Ignore,
    /// Terminator reached; nothing after this line is ingested
    Stop,
}

impl LineOutcome {
    pub fn record(record: Record) -> Self {
        LineOutcome::Emit(vec![record])
    }
}

/// Per-run line accounting
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LineStats {
    pub lines: usize,
    pub records: usize,
    pub ignored: usize,
    pub dropped: usize,
}

/// Drive a line parser over every line of the input, appending to `table`
pub fn run_lines<F>(mode: ParseMode, input: &RawLog, mut table: Table, parse_line: F) -> Result<Table>
where
    F: FnMut(usize, &str) -> Result<LineOutcome>,
{
    drive_lines(mode, input, parse_line, |record| table.append(record))?;
    Ok(table)
}

/// Drive a line parser over every line of the input and return the records
/// in line order, for grammars whose column set is only known at the end.
pub fn collect_lines<F>(mode: ParseMode, input: &RawLog, parse_line: F) -> Result<Vec<Record>>
where
    F: FnMut(usize, &str) -> Result<LineOutcome>,
{
    let mut records = Vec::new();
    drive_lines(mode, input, parse_line, |record| {
        records.push(record);
        Ok(())
    })?;
    Ok(records)
}

fn drive_lines<F, S>(mode: ParseMode, input: &RawLog, mut parse_line: F, mut sink: S) -> Result<()>
where
    F: FnMut(usize, &str) -> Result<LineOutcome>,
    S: FnMut(Record) -> Result<()>,
{
    let mut stats = LineStats::default();

    for (index, line) in input.lines().enumerate() {
        stats.lines += 1;
        match parse_line(index, line) {
            Ok(LineOutcome::Emit(records)) => {
                for record in records {
                    match sink(record) {
                        Ok(()) => stats.records += 1,
                        Err(e) => {
                            stats.dropped += 1;
                            debug!("{} line {}: record rejected: {}", mode, index + 1, e);
                        }
                    }
                }
            }
            Ok(LineOutcome::Ignore) => stats.ignored += 1,
            Ok(LineOutcome::Stop) => {
                debug!("{} line {}: terminator reached", mode, index + 1);
                break;
            }
            Err(e) if e.is_line_recoverable() => {
                stats.dropped += 1;
                debug!("{} line {}: dropped: {}", mode, index + 1, e);
            }
            Err(e) => return Err(e),
        }
    }

    info!(
        "{}: {} lines read, {} records, {} ignored, {} dropped",
        mode, stats.lines, stats.records, stats.ignored, stats.dropped
    );
    Ok(())
}

/// Gate shared by delimited modes: tokens must fill the schema exactly,
/// minus the columns filled from elsewhere on the line.
pub fn expect_token_count(schema: &FieldSchema, prefilled: usize, found: usize) -> Result<()> {
    let expected = schema.len() - prefilled;
    if found != expected {
        return Err(FieldLogError::SchemaMismatch { expected, found });
    }
    Ok(())
}
