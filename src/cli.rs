//! Command-line argument definitions.

use crate::config::{ExplosionPolicy, ParserConfig, SuffixMatching};
use crate::error::{FieldLogError, Result};
use crate::models::ParseMode;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing::debug;

/// Convert field-test logs into CSV tables
///
/// Each input is parsed with the grammar of the selected mode and written
/// as a CSV file with one column per field. Several inputs (or a directory
/// of inputs) are processed in parallel.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "fieldlog",
    version,
    about = "Convert radio, network and vehicle field-test logs to CSV"
)]
pub struct Args {
    /// Log files or directories of log files
    #[arg(value_name = "INPUT", required = true)]
    pub inputs: Vec<PathBuf>,

    /// Log grammar of the inputs
    #[arg(
        short = 'm',
        long = "mode",
        value_name = "MODE",
        value_parser = parse_mode,
        help = "Log grammar: ue, enb, epc, ping, iperfClient, iperfServer, cellSearch, vehicleLog, \
                vehicleOut, channelSounder, gnuradioOfdm, pawprints_4G, pawprints_5G, nemo, mgen"
    )]
    pub mode: ParseMode,

    /// Output CSV file for a single input, or output directory for several
    #[arg(short = 'o', long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Date of a Nemo drive test (YYYY-MM-DD); required for nemo mode
    #[arg(long = "nemo-date", value_name = "DATE")]
    pub nemo_date: Option<String>,

    /// Where SI prefix letters are recognised in UE metric values
    #[arg(long = "si-suffix", value_enum, default_value_t = SuffixArg::Anywhere)]
    pub si_suffix: SuffixArg,

    /// Skip Nemo rows whose KPI lists do not match their cell count instead of failing the file
    #[arg(long = "skip-mismatched-rows")]
    pub skip_mismatched_rows: bool,

    /// Number of files parsed in parallel
    #[arg(short = 'j', long = "jobs", value_name = "N")]
    pub jobs: Option<usize>,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Suppress output except errors
    #[arg(short = 'q', long = "quiet", conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SuffixArg {
    /// A prefix letter anywhere in the token rescales it
    Anywhere,
    /// Only a trailing prefix letter rescales the token
    Trailing,
}

impl From<SuffixArg> for SuffixMatching {
    fn from(arg: SuffixArg) -> Self {
        match arg {
            SuffixArg::Anywhere => SuffixMatching::Anywhere,
            SuffixArg::Trailing => SuffixMatching::TrailingOnly,
        }
    }
}

fn parse_mode(text: &str) -> std::result::Result<ParseMode, String> {
    text.parse().map_err(|e: FieldLogError| e.to_string())
}

impl Args {
    /// Build the parser configuration described by the arguments
    pub fn parser_config(&self) -> Result<ParserConfig> {
        let mut config = ParserConfig::default().with_si_suffix(self.si_suffix.into());

        if let Some(date) = &self.nemo_date {
            config = config.with_nemo_date(ParserConfig::parse_nemo_date(date)?);
        }
        if self.skip_mismatched_rows {
            config = config.with_explosion_policy(ExplosionPolicy::SkipRow);
        }
        if let Some(jobs) = self.jobs {
            config.max_concurrent_files = jobs;
        }

        config.validate(self.mode)?;
        Ok(config)
    }

    /// Determine the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }

    /// Check if we should show progress bars (not in quiet mode)
    pub fn show_progress(&self) -> bool {
        !self.quiet
    }
}

/// Set up structured logging on stderr.
///
/// `RUST_LOG` overrides the level derived from the verbosity flags.
pub fn setup_logging(args: &Args) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("fieldlog={}", log_level)));

    let initialized = if args.quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };
    initialized.map_err(|e| FieldLogError::configuration(format!("logging setup failed: {}", e)))?;

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}
