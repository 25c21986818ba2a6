//! Post-processing: deterministic cleanup of LLM-written descriptions.
//!
//! Chat models occasionally wrap plain prose in a fenced block or pad it
//! with CRLF line endings and stray blank lines. These rules strip that
//! noise before the description is appended to the engine's Markdown.
//!
//! Rules (applied in order):
//! 1. Strip outer markdown fences
//! 2. Normalise line endings (CRLF → LF)
//! 3. Trim trailing whitespace per line
//! 4. Collapse 3+ consecutive blank lines down to 2
//! 5. Trim leading and trailing blank lines

use once_cell::sync::Lazy;
use regex::Regex;

/// Apply all cleanup rules to a raw LLM description.
pub fn clean_description(input: &str) -> String {
    let s = strip_markdown_fences(input);
    let s = normalise_line_endings(&s);
    let s = trim_trailing_whitespace(&s);
    let s = collapse_blank_lines(&s);
    s.trim().to_string()
}

// ── Rule 1: Strip outer markdown fences ──────────────────────────────────────

static RE_OUTER_FENCES: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^```(?:markdown|md|text)?\r?\n(.*?)\r?\n```$").expect("valid regex")
});

fn strip_markdown_fences(input: &str) -> String {
    if let Some(caps) = RE_OUTER_FENCES.captures(input.trim()) {
        caps[1].to_string()
    } else {
        input.to_string()
    }
}

// ── Rule 2: Normalise line endings ───────────────────────────────────────────

fn normalise_line_endings(input: &str) -> String {
    input.replace("\r\n", "\n").replace('\r', "\n")
}

// ── Rule 3: Trim trailing whitespace per line ────────────────────────────────

fn trim_trailing_whitespace(input: &str) -> String {
    input
        .lines()
        .map(|line| line.trim_end())
        .collect::<Vec<_>>()
        .join("\n")
}

// ── Rule 4: Collapse excessive blank lines ───────────────────────────────────

static RE_BLANK_LINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{4,}").expect("valid regex"));

fn collapse_blank_lines(input: &str) -> String {
    RE_BLANK_LINES.replace_all(input, "\n\n\n").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_markdown_fence() {
        let raw = "```markdown\nA red barn in a field.\n```";
        assert_eq!(clean_description(raw), "A red barn in a field.");
    }

    #[test]
    fn strips_bare_fence_with_surrounding_space() {
        let raw = "\n  ```\nLine one\nLine two\n```  \n";
        assert_eq!(clean_description(raw), "Line one\nLine two");
    }

    #[test]
    fn leaves_inner_code_blocks_alone() {
        let raw = "Intro\n```\ncode\n```\nOutro";
        assert_eq!(clean_description(raw), raw);
    }

    #[test]
    fn normalises_crlf_and_trailing_space() {
        assert_eq!(clean_description("a  \r\nb\t\r\n"), "a\nb");
    }

    #[test]
    fn collapses_blank_runs() {
        assert_eq!(clean_description("a\n\n\n\n\n\nb"), "a\n\n\nb");
    }
}
