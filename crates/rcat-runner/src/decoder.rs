//! Captured stdout to ordered lines.

/// Strip trailing whitespace and split into lines. Leading whitespace is kept
/// since R right-aligns printed tables with it; `\r\n` endings are accepted.
pub fn decode_lines(stdout: &str) -> Vec<String> {
    let trimmed = stdout.trim_end();
    if trimmed.is_empty() {
        return Vec::new();
    }
    trimmed
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_output_is_empty() {
        assert!(decode_lines("").is_empty());
        assert!(decode_lines("  \n\n").is_empty());
    }

    #[test]
    fn keeps_order_and_indentation() {
        let out = "[1] \"McNemar's Test:\"\n      after\nbefore No Yes\n   No   3   1\n\n";
        assert_eq!(
            decode_lines(out),
            vec!["[1] \"McNemar's Test:\"", "      after", "before No Yes", "   No   3   1"]
        );
    }

    #[test]
    fn keeps_interior_blank_lines() {
        assert_eq!(decode_lines("a\n\nb\n"), vec!["a", "", "b"]);
    }

    #[test]
    fn accepts_crlf() {
        assert_eq!(decode_lines("a\r\nb\r\n"), vec!["a", "b"]);
    }
}
