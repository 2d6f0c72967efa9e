//! SI prefix and percentage normalization for numeric tokens.
//!
//! `m` scales by 1e-3, `k` by 1e3, `M` by 1e6 and `%` by 1e-2. The first
//! matching suffix in that order wins and every occurrence of its letter
//! is removed before the remaining text is read as a number.

use crate::config::SuffixMatching;
use crate::error::{FieldLogError, Result};

const SUFFIXES: [(char, f64); 4] = [('m', 1e-3), ('k', 1e3), ('M', 1e6), ('%', 1e-2)];

/// Normalize one token. Tokens without a recognised suffix are returned unchanged.
pub fn normalize_value(token: &str, matching: SuffixMatching) -> Result<String> {
    let Some((suffix, scale)) = find_suffix(token, matching) else {
        return Ok(token.to_string());
    };

    let digits = match matching {
        SuffixMatching::Anywhere => token.replace(suffix, ""),
        SuffixMatching::TrailingOnly => token[..token.len() - suffix.len_utf8()].to_string(),
    };

    let value: f64 = digits.trim().parse().map_err(|_| {
        FieldLogError::invalid_value(token, format!("not a number after removing '{}'", suffix))
    })?;

    Ok(format_decimal(value * scale))
}

fn find_suffix(token: &str, matching: SuffixMatching) -> Option<(char, f64)> {
    match matching {
        SuffixMatching::Anywhere => SUFFIXES
            .iter()
            .copied()
            .find(|(suffix, _)| token.contains(*suffix)),
        SuffixMatching::TrailingOnly => {
            let last = token.chars().last()?;
            SUFFIXES.iter().copied().find(|(suffix, _)| *suffix == last)
        }
    }
}

/// Decimal rendering with a trailing `.0` on integral values (`10000.0`),
/// which is what downstream consumers of historical output expect.
pub fn format_decimal(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}
