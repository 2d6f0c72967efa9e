//! Core data structures shared across the parsing pipeline.
//!
//! Defines the closed set of parse modes, the raw input held for the
//! duration of a run, and the statistics reported after export.

use crate::error::{FieldLogError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Log grammar selector. Each variant is bound to exactly one strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParseMode {
    Ue,
    Enb,
    Epc,
    Ping,
    IperfClient,
    IperfServer,
    CellSearch,
    VehicleLog,
    VehicleOut,
    ChannelSounder,
    GnuradioOfdm,
    Pawprints4G,
    Pawprints5G,
    Nemo,
    Mgen,
}

impl ParseMode {
    pub const ALL: [ParseMode; 15] = [
        ParseMode::Ue,
        ParseMode::Enb,
        ParseMode::Epc,
        ParseMode::Ping,
        ParseMode::IperfClient,
        ParseMode::IperfServer,
        ParseMode::CellSearch,
        ParseMode::VehicleLog,
        ParseMode::VehicleOut,
        ParseMode::ChannelSounder,
        ParseMode::GnuradioOfdm,
        ParseMode::Pawprints4G,
        ParseMode::Pawprints5G,
        ParseMode::Nemo,
        ParseMode::Mgen,
    ];

    /// Tag used on the command line and in log messages
    pub fn as_str(&self) -> &'static str {
        match self {
            ParseMode::Ue => "ue",
            ParseMode::Enb => "enb",
            ParseMode::Epc => "epc",
            ParseMode::Ping => "ping",
            ParseMode::IperfClient => "iperfClient",
            ParseMode::IperfServer => "iperfServer",
            ParseMode::CellSearch => "cellSearch",
            ParseMode::VehicleLog => "vehicleLog",
            ParseMode::VehicleOut => "vehicleOut",
            ParseMode::ChannelSounder => "channelSounder",
            ParseMode::GnuradioOfdm => "gnuradioOfdm",
            ParseMode::Pawprints4G => "pawprints_4G",
            ParseMode::Pawprints5G => "pawprints_5G",
            ParseMode::Nemo => "nemo",
            ParseMode::Mgen => "mgen",
        }
    }

    /// File extensions picked up when a directory is given as input
    pub fn input_extensions(&self) -> &'static [&'static str] {
        match self {
            ParseMode::Nemo => &["csv"],
            ParseMode::VehicleOut => &["csv", "txt", "log"],
            ParseMode::Pawprints4G | ParseMode::Pawprints5G => &["json", "jsonl", "txt", "log"],
            _ => &["log", "txt"],
        }
    }
}

impl fmt::Display for ParseMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParseMode {
    type Err = FieldLogError;

    fn from_str(s: &str) -> Result<Self> {
        ParseMode::ALL
            .iter()
            .copied()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| FieldLogError::UnknownMode {
                mode: s.to_string(),
            })
    }
}

/// Complete contents of one input file, read once before parsing starts
#[derive(Debug, Clone)]
pub struct RawLog {
    pub source: PathBuf,
    content: String,
}

impl RawLog {
    pub fn new(source: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            content: content.into(),
        }
    }

    /// Read a file into memory. Invalid UTF-8 is replaced rather than rejected
    /// so a single corrupt byte cannot cost the whole file.
    pub fn read(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(FieldLogError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let bytes = std::fs::read(path)?;
        let content = String::from_utf8_lossy(&bytes).into_owned();
        Ok(Self::new(path, content))
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.content.lines()
    }

    pub fn is_empty(&self) -> bool {
        self.content.trim().is_empty()
    }
}

/// Outcome of exporting one file
#[derive(Debug, Clone, Default)]
pub struct FileSummary {
    pub input: PathBuf,
    pub output: PathBuf,
    pub rows: usize,
    pub columns: Vec<String>,
}

/// Processing statistics for a run over one or more files
#[derive(Debug, Default)]
pub struct ProcessingStats {
    pub files_processed: usize,
    pub files_failed: usize,
    pub total_rows: usize,
    pub outputs: Vec<FileSummary>,
    pub processing_time_ms: u128,
}
