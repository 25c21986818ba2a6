//! Preview rendering: a bounded slice of the converted Markdown.
//!
//! Truncation counts `char`s, not bytes, so multi-byte text is never cut
//! mid-codepoint.

/// Appended to a preview that was cut short.
pub const TRUNCATION_MARKER: &str = "\n\n... (content truncated for preview)";

/// The first `limit` characters of `content`, plus [`TRUNCATION_MARKER`]
/// if anything was dropped. Content within the limit is returned verbatim.
pub fn render_preview(content: &str, limit: usize) -> String {
    match content.char_indices().nth(limit) {
        Some((cut, _)) => {
            let mut preview = String::with_capacity(cut + TRUNCATION_MARKER.len());
            preview.push_str(&content[..cut]);
            preview.push_str(TRUNCATION_MARKER);
            preview
        }
        None => content.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_content_is_verbatim() {
        assert_eq!(render_preview("# Title\n\nbody", 1000), "# Title\n\nbody");
    }

    #[test]
    fn exactly_at_limit_is_verbatim() {
        let content = "x".repeat(1000);
        assert_eq!(render_preview(&content, 1000), content);
    }

    #[test]
    fn long_content_is_truncated_with_marker() {
        let content = "y".repeat(1001);
        let preview = render_preview(&content, 1000);
        assert!(preview.ends_with(TRUNCATION_MARKER));
        assert_eq!(preview.chars().count(), 1000 + TRUNCATION_MARKER.chars().count());
        assert_eq!(&preview[..1000], &content[..1000]);
    }

    #[test]
    fn counts_characters_not_bytes() {
        let content = "é".repeat(5);
        let preview = render_preview(&content, 3);
        assert_eq!(preview, format!("ééé{TRUNCATION_MARKER}"));
    }
}
