const LINE_BREAKS: &[char] = &['\n', '\r', '\x0b', '\x0c', '\u{2028}', '\u{2029}'];

/// Collapse whitespace inside lines and drop blank lines.
///
/// Every CR/LF variant becomes one `\n`, runs of spaces and tabs become a
/// single space, and consecutive breaks collapse so paragraphs are separated
/// by exactly one newline.
#[must_use]
pub fn normalize_text(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());

    for line in raw.split(LINE_BREAKS) {
        let mut words = line.split_whitespace().peekable();
        if words.peek().is_none() {
            continue;
        }
        if !out.is_empty() {
            out.push('\n');
        }
        for (i, word) in words.enumerate() {
            if i > 0 {
                out.push(' ');
            }
            out.push_str(word);
        }
    }

    out
}

/// Collapse every whitespace run, newlines included, to one space.
#[must_use]
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

const BULLETS: &[char] = &['•', '-', '*', '·', '▪', '◦'];

#[must_use]
pub fn is_bullet(line: &str) -> bool {
    line.trim_start().starts_with(BULLETS)
}

#[must_use]
pub fn strip_bullet(line: &str) -> &str {
    line.trim().trim_start_matches(BULLETS).trim_start()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapses_horizontal_whitespace() {
        assert_eq!(normalize_text("  John \t  Smith  "), "John Smith");
    }

    #[test]
    fn test_normalizes_line_endings() {
        assert_eq!(normalize_text("a\r\nb\rc\nd"), "a\nb\nc\nd");
    }

    #[test]
    fn test_collapses_blank_lines() {
        assert_eq!(
            normalize_text("Summary:\n\n\n   \nBuilt things.\x0cPage two"),
            "Summary:\nBuilt things.\nPage two"
        );
    }

    #[test]
    fn test_bullets() {
        assert!(is_bullet("• Built a thing"));
        assert!(is_bullet("  - Led a team"));
        assert!(!is_bullet("Senior Engineer"));
        assert_eq!(strip_bullet("•  Built a thing "), "Built a thing");
        assert_eq!(strip_bullet("Plain line"), "Plain line");
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace(" a\n b\t\tc "), "a b c");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(normalize_text(""), "");
        assert_eq!(normalize_text(" \n\r\n\t"), "");
    }
}
