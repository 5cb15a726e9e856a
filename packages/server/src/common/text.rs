//! Pure string helpers shared by the fetcher, synthesizer and notifier.

/// Keep at most `max_chars` characters. Never splits a code point.
pub fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Strip a surrounding markdown code fence (```json ... ```) if present.
pub fn strip_code_fences(s: &str) -> &str {
    let trimmed = s.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string (e.g. "json") on the opening fence line.
    let body = match rest.find('\n') {
        Some(idx) => &rest[idx + 1..],
        // Single-line fence: ```json {...}```
        None => rest.strip_prefix("json").unwrap_or(rest),
    };
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

/// Collapse runs of whitespace into single spaces.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate_chars("hello", 10), "hello");
        assert_eq!(truncate_chars("hello", 3), "hel");
        assert_eq!(truncate_chars("héllo wörld", 7), "héllo w");
        assert_eq!(truncate_chars("🔥🔥🔥", 2), "🔥🔥");
        assert_eq!(truncate_chars("", 5), "");
    }

    #[test]
    fn strips_json_fence() {
        let fenced = "```json\n{\"title\": \"x\"}\n```";
        assert_eq!(strip_code_fences(fenced), "{\"title\": \"x\"}");
    }

    #[test]
    fn strips_single_line_json_fence() {
        assert_eq!(
            strip_code_fences("```json {\"title\": \"x\"}```"),
            "{\"title\": \"x\"}"
        );
        assert_eq!(strip_code_fences("```{\"a\": 1}```"), "{\"a\": 1}");
    }

    #[test]
    fn strips_bare_fence() {
        assert_eq!(strip_code_fences("```\n{}\n```"), "{}");
    }

    #[test]
    fn leaves_plain_text_alone() {
        assert_eq!(strip_code_fences("  {\"a\": 1}  "), "{\"a\": 1}");
    }

    #[test]
    fn collapses_whitespace() {
        assert_eq!(collapse_whitespace("  a \n\n b\tc  "), "a b c");
    }
}
