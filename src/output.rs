//! Result types returned to the host runtime.

use crate::error::ConvertError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Outcome of one conversion, shaped for the host's output contract.
///
/// Field names match the host's output object: `markdown_content`,
/// `success`, `error_message`. Construct via [`ConversionResult::success`]
/// or [`ConversionResult::failure`] so the two shapes cannot be mixed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionResult {
    /// The converted Markdown. Present and non-empty only on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub markdown_content: Option<String>,
    pub success: bool,
    /// Human-readable failure description. Absent on success.
    pub error_message: Option<String>,
}

impl ConversionResult {
    /// A successful result carrying `markdown`.
    pub fn success(markdown: String) -> Self {
        Self {
            markdown_content: Some(markdown),
            success: true,
            error_message: None,
        }
    }

    /// A failed result carrying the error's host-facing message.
    pub fn failure(error: &ConvertError) -> Self {
        Self {
            markdown_content: None,
            success: false,
            error_message: Some(error.failure_message()),
        }
    }

    /// Collapse a `run` outcome into the host contract.
    pub fn from_outcome(outcome: Result<ConversionResult, ConvertError>) -> Self {
        outcome.unwrap_or_else(|e| Self::failure(&e))
    }

    /// The Markdown text, or `""` for a failed result.
    pub fn markdown(&self) -> &str {
        self.markdown_content.as_deref().unwrap_or_default()
    }
}

/// Size and name of the file that was converted, for logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    pub path: PathBuf,
    pub size_bytes: u64,
}

impl FileInfo {
    /// Final path component, or the whole path if it has none.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    /// Size in KiB, as shown in the success log line.
    pub fn size_kib(&self) -> f64 {
        self.size_bytes as f64 / 1024.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_shape() {
        let r = ConversionResult::success("# Title".into());
        assert!(r.success);
        assert_eq!(r.markdown(), "# Title");
        assert!(r.error_message.is_none());
    }

    #[test]
    fn failure_shape_has_no_markdown() {
        let r = ConversionResult::failure(&ConvertError::NoContent);
        assert!(!r.success);
        assert!(r.markdown_content.is_none());
        assert_eq!(
            r.error_message.as_deref(),
            Some("Conversion failed: Conversion failed - no content returned")
        );
        let json = serde_json::to_value(&r).unwrap();
        assert!(json.get("markdown_content").is_none());
        assert_eq!(json["success"], false);
    }

    #[test]
    fn success_serialises_null_error() {
        let json = serde_json::to_value(ConversionResult::success("x".into())).unwrap();
        assert_eq!(json["markdown_content"], "x");
        assert_eq!(json["success"], true);
        assert!(json["error_message"].is_null());
    }

    #[test]
    fn file_info_formatting() {
        let info = FileInfo {
            path: PathBuf::from("/data/in/slides.pptx"),
            size_bytes: 2048 + 512,
        };
        assert_eq!(info.file_name(), "slides.pptx");
        assert_eq!(format!("{:.1}", info.size_kib()), "2.5");
    }
}
