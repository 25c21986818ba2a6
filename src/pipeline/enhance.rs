//! LLM enhancement of engine output.
//!
//! markitdown can only report metadata for a photo or scan; it cannot say
//! what the picture shows. In enhanced mode an image input gets a second
//! pass: the model is asked for a description, which is appended under a
//! `# Description:` heading. Non-image inputs pass through untouched.
//!
//! A failed description request is not fatal. The engine's text is
//! returned unchanged and the failure is logged.

use crate::pipeline::llm::LlmClient;
use crate::pipeline::postprocess::clean_description;
use crate::prompts::{DEFAULT_IMAGE_PROMPT, DESCRIPTION_HEADING};
use std::path::Path;
use tracing::{info, warn};

/// Extensions treated as images for enhancement.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// True if `path` has one of [`IMAGE_EXTENSIONS`] (case-insensitive).
pub fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.iter().any(|x| e.eq_ignore_ascii_case(x)))
        .unwrap_or(false)
}

/// A constructed LLM client plus the prompt it should use.
#[derive(Debug, Clone)]
pub struct LlmEnhancement {
    client: LlmClient,
    prompt: Option<String>,
}

impl LlmEnhancement {
    pub fn new(client: LlmClient, prompt: Option<String>) -> Self {
        Self { client, prompt }
    }

    pub fn model(&self) -> &str {
        self.client.model()
    }

    fn prompt(&self) -> &str {
        self.prompt
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .unwrap_or(DEFAULT_IMAGE_PROMPT)
    }

    /// Append an LLM description to `markdown` when `path` is an image.
    pub async fn enhance(&self, path: &Path, markdown: String) -> String {
        if !is_image(path) {
            return markdown;
        }
        match self.client.describe_image(path, self.prompt()).await {
            Ok(raw) => {
                let description = clean_description(&raw);
                if description.is_empty() {
                    return markdown;
                }
                info!(
                    "Added {}-char description from {}",
                    description.chars().count(),
                    self.model()
                );
                append_description(markdown, &description)
            }
            Err(e) => {
                warn!(
                    "Image description via {} failed for {}: {}",
                    self.model(),
                    path.display(),
                    e
                );
                markdown
            }
        }
    }
}

fn append_description(mut markdown: String, description: &str) -> String {
    markdown.push('\n');
    markdown.push_str(DESCRIPTION_HEADING);
    markdown.push('\n');
    markdown.push_str(description);
    markdown.push('\n');
    markdown
}
