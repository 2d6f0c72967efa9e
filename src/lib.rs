//! Field-test log normalization.
//!
//! Converts heterogeneous logs captured during radio and vehicle field
//! tests (cellular stack metrics, network tool output, RF measurement
//! dumps, phone diagnostics JSON, drive-test CSV exports) into flat,
//! column-oriented CSV tables keyed by time.
//!
//! Each [`ParseMode`] is bound to one [`Strategy`] that turns a
//! [`RawLog`] into a [`Table`]; [`export::export_csv`] writes the table
//! out. [`processor::LogProcessor`] ties the two together for one file or
//! a batch of files.

pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod export;
pub mod models;
pub mod normalize;
pub mod processor;
pub mod strategies;
pub mod table;
pub mod timestamp;
pub mod tokenizer;

pub use config::{ExplosionPolicy, ParserConfig, SuffixMatching};
pub use error::{ErrorKind, FieldLogError, Result};
pub use models::{FileSummary, ParseMode, ProcessingStats, RawLog};
pub use strategies::{Strategy, resolve_strategy, resolve_strategy_by_name};
pub use table::{FieldSchema, Record, Table};
