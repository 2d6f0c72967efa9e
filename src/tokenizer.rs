//! Line splitting shared by the delimited log grammars.
//!
//! The remainder of a line (after its timestamp) is split on whitespace,
//! empty tokens are dropped and literal unit labels are removed by exact
//! match. What is left lines up positionally with the mode's schema.

/// Whitespace tokens of a line remainder
pub fn tokenize(text: &str) -> Vec<&str> {
    text.split_whitespace().collect()
}

/// Remove literal tokens by exact match, each at most the given number of times.
/// The earliest occurrences are removed first.
pub fn strip_tokens<'a>(tokens: Vec<&'a str>, literals: &[(&str, usize)]) -> Vec<&'a str> {
    let mut remaining: Vec<(&str, usize)> = literals.to_vec();

    tokens
        .into_iter()
        .filter(|token| {
            match remaining
                .iter_mut()
                .find(|(literal, left)| *left > 0 && literal == token)
            {
                Some((_, left)) => {
                    *left -= 1;
                    false
                }
                None => true,
            }
        })
        .collect()
}

/// Tokenize and strip in one pass
pub fn tokenize_stripped<'a>(text: &'a str, literals: &[(&str, usize)]) -> Vec<&'a str> {
    strip_tokens(tokenize(text), literals)
}

/// Value part of a `key<sep>value` token; tokens without `sep` are returned whole
pub fn value_after(token: &str, separator: char) -> &str {
    token.rsplit(separator).next().unwrap_or(token)
}

/// Text after the last `]` of a line, or the whole line when it has none
pub fn after_last_bracket(line: &str) -> &str {
    line.rfind(']').map_or(line, |index| &line[index + 1..])
}

/// Whether any token equals one of the given literals
pub fn contains_any(tokens: &[&str], literals: &[&str]) -> bool {
    tokens.iter().any(|token| literals.contains(token))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::IPERF_UNIT_TOKENS;

    #[test]
    fn test_tokenize_drops_empty() {
        assert_eq!(tokenize("  1   2\t3 \n"), vec!["1", "2", "3"]);
        assert!(tokenize("   ").is_empty());
    }

    #[test]
    fn test_strip_respects_counts() {
        let tokens = vec!["1.0", "MBytes", "2.0", "MBytes", "3.0", "MBytes"];
        let stripped = strip_tokens(tokens, &[("MBytes", 2)]);
        assert_eq!(stripped, vec!["1.0", "2.0", "3.0", "MBytes"]);
    }

    #[test]
    fn test_strip_iperf_line() {
        let stripped = tokenize_stripped(
            "  0.00-1.00   sec  1.50 MBytes  12.6 Mbits/sec    0    120 KBytes",
            IPERF_UNIT_TOKENS,
        );
        assert_eq!(stripped, vec!["0.00-1.00", "1.50", "12.6", "0", "120"]);
    }

    #[test]
    fn test_exact_match_only() {
        let stripped = strip_tokens(vec!["secs", "sec"], &[("sec", 1)]);
        assert_eq!(stripped, vec!["secs"]);
    }

    #[test]
    fn test_value_after() {
        assert_eq!(value_after("ttl=117", '='), "117");
        assert_eq!(value_after("flow>1", '>'), "1");
        assert_eq!(value_after("plain", '='), "plain");
    }

    #[test]
    fn test_after_last_bracket() {
        assert_eq!(after_last_bracket(" [  5]   0.0-1.0 sec"), "   0.0-1.0 sec");
        assert_eq!(after_last_bracket("no brackets"), "no brackets");
    }

    #[test]
    fn test_contains_any() {
        assert!(contains_any(&["1", "sec"], &["sec", "MBytes"]));
        assert!(!contains_any(&["1", "secs"], &["sec"]));
    }
}
