//! Timestamp extraction and conversion.
//!
//! Most line grammars start with a bracketed, microsecond-precision
//! timestamp (`[2023-06-14 10:21:03.123456] ...`). Phone and Nemo logs
//! carry epoch milliseconds or a bare time of day instead; helpers for
//! those live here as well. All rendering is UTC.

use crate::constants::{LINE_TIMESTAMP_FORMAT, LINE_TIMESTAMP_LABEL, OUTPUT_TIMESTAMP_FORMAT};
use crate::error::{FieldLogError, Result};
use chrono::{DateTime, NaiveDateTime};

/// Split a line into its bracketed timestamp and the text after the first `]`
pub fn split_timestamp(line: &str) -> Result<(NaiveDateTime, &str)> {
    let close = line.find(']').ok_or_else(|| timestamp_error(line))?;
    let head = &line[..close];
    let open = head.find('[').ok_or_else(|| timestamp_error(line))?;

    let timestamp = parse_timestamp(&head[open + 1..])?;
    Ok((timestamp, &line[close + 1..]))
}

/// Parse the text of a bracketed timestamp
pub fn parse_timestamp(text: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text, LINE_TIMESTAMP_FORMAT).map_err(|_| timestamp_error(text))
}

/// Render a timestamp the way every `time` column is written
pub fn format_timestamp(timestamp: &NaiveDateTime) -> String {
    timestamp.format(OUTPUT_TIMESTAMP_FORMAT).to_string()
}

/// Epoch milliseconds (fractional allowed) to a readable UTC timestamp
pub fn epoch_ms_to_readable(epoch_ms: f64) -> Result<String> {
    if !epoch_ms.is_finite() {
        return Err(FieldLogError::invalid_value(
            epoch_ms.to_string(),
            "epoch milliseconds must be finite",
        ));
    }

    let micros = (epoch_ms * 1000.0).round() as i64;
    let secs = micros.div_euclid(1_000_000);
    let nanos = (micros.rem_euclid(1_000_000) * 1000) as u32;

    DateTime::from_timestamp(secs, nanos)
        .map(|dt| format_timestamp(&dt.naive_utc()))
        .ok_or_else(|| {
            FieldLogError::invalid_value(epoch_ms.to_string(), "epoch milliseconds out of range")
        })
}

/// Absolute epoch milliseconds of a naive UTC timestamp
pub fn to_epoch_ms(timestamp: &NaiveDateTime) -> f64 {
    timestamp.and_utc().timestamp_micros() as f64 / 1000.0
}

fn timestamp_error(text: &str) -> FieldLogError {
    FieldLogError::TimestampFormat {
        text: text.to_string(),
        format: LINE_TIMESTAMP_LABEL,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Timelike};

    #[test]
    fn test_split_timestamp() {
        let (ts, rest) = split_timestamp("[2023-06-14 10:21:03.123456] hello world").unwrap();
        assert_eq!(ts.date(), NaiveDate::from_ymd_opt(2023, 6, 14).unwrap());
        assert_eq!(ts.hour(), 10);
        assert_eq!(ts.nanosecond(), 123_456_000);
        assert_eq!(rest, " hello world");
    }

    #[test]
    fn test_split_keeps_later_brackets() {
        let (_, rest) = split_timestamp("[2023-06-14 10:21:03.5] [  5] 0.0-1.0 sec").unwrap();
        assert_eq!(rest, " [  5] 0.0-1.0 sec");
    }

    #[test]
    fn test_timestamp_errors() {
        for line in [
            "no brackets at all",
            "[not a time] payload",
            "] [2023-06-14 10:21:03.1]",
            "[2023-13-40 10:21:03.1] bad date",
        ] {
            let err = split_timestamp(line).unwrap_err();
            assert!(
                matches!(err, FieldLogError::TimestampFormat { .. }),
                "line {:?} gave {:?}",
                line,
                err
            );
        }
    }

    #[test]
    fn test_format_timestamp() {
        let ts = parse_timestamp("2023-06-14 10:21:03.5").unwrap();
        assert_eq!(format_timestamp(&ts), "2023-06-14 10:21:03.500000");
    }

    #[test]
    fn test_epoch_conversions() {
        assert_eq!(
            epoch_ms_to_readable(1_686_738_063_123.0).unwrap(),
            "2023-06-14 10:21:03.123000"
        );
        let ts = parse_timestamp("2023-06-14 10:21:03.123").unwrap();
        assert_eq!(to_epoch_ms(&ts), 1_686_738_063_123.0);
        assert!(epoch_ms_to_readable(f64::NAN).is_err());
    }
}
