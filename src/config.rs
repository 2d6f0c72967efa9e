//! Configuration management and validation.
//!
//! Holds the knobs that change how strategies interpret their input:
//! SI suffix matching, how Nemo explosion mismatches are treated, the
//! externally supplied Nemo log date, and batch concurrency.

use crate::constants::NEMO_DATE_FORMAT;
use crate::error::{FieldLogError, Result};
use crate::models::ParseMode;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Where SI prefix letters are recognised inside a numeric token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SuffixMatching {
    /// Letter anywhere in the token triggers rescaling (historical output).
    /// `"km2"` is therefore read as kilo.
    #[default]
    Anywhere,
    /// Only a final suffix character is considered
    TrailingOnly,
}

/// Handling of a Nemo row whose KPI list length differs from its cell count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ExplosionPolicy {
    /// Abort the whole file; no output is written
    #[default]
    AbortFile,
    /// Abandon the offending row and continue with the next one
    SkipRow,
}

/// Parser configuration shared by all strategies of one run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParserConfig {
    /// SI prefix matching policy for the value normalizer
    pub si_suffix: SuffixMatching,

    /// Treatment of misaligned Nemo rows
    pub explosion_policy: ExplosionPolicy,

    /// Date anchoring Nemo time-of-day values
    pub nemo_date: Option<NaiveDate>,

    /// Maximum files parsed at once in batch mode
    pub max_concurrent_files: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            si_suffix: SuffixMatching::default(),
            explosion_policy: ExplosionPolicy::default(),
            nemo_date: None,
            max_concurrent_files: num_cpus::get().max(1),
        }
    }
}

impl ParserConfig {
    pub fn with_nemo_date(mut self, date: NaiveDate) -> Self {
        self.nemo_date = Some(date);
        self
    }

    pub fn with_si_suffix(mut self, si_suffix: SuffixMatching) -> Self {
        self.si_suffix = si_suffix;
        self
    }

    pub fn with_explosion_policy(mut self, policy: ExplosionPolicy) -> Self {
        self.explosion_policy = policy;
        self
    }

    /// Parse a `YYYY-MM-DD` Nemo date
    pub fn parse_nemo_date(text: &str) -> Result<NaiveDate> {
        NaiveDate::parse_from_str(text.trim(), NEMO_DATE_FORMAT).map_err(|e| {
            FieldLogError::configuration(format!(
                "Nemo date '{}' is not in YYYY-MM-DD format: {}",
                text, e
            ))
        })
    }

    /// Validate the configuration for the selected mode before any parsing
    pub fn validate(&self, mode: ParseMode) -> Result<()> {
        if self.max_concurrent_files == 0 {
            return Err(FieldLogError::configuration(
                "max_concurrent_files must be at least 1",
            ));
        }

        if mode == ParseMode::Nemo && self.nemo_date.is_none() {
            return Err(FieldLogError::configuration(
                "nemo mode requires a log date (--nemo-date YYYY-MM-DD)",
            ));
        }

        debug!(
            "Configuration valid for mode {}: si_suffix={:?}, explosion_policy={:?}",
            mode, self.si_suffix, self.explosion_policy
        );
        Ok(())
    }
}
