//! Pipeline tests for the processor module
//!
//! Exercise discovery, parsing and export together against temporary
//! log files.
