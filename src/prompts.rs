//! Prompts used for LLM enhancement.
//!
//! Callers can override the default via [`crate::ModelConfig::prompt`];
//! the constant here is used only when no override is provided.

/// Default prompt for describing an image input.
pub const DEFAULT_IMAGE_PROMPT: &str = "Write a detailed caption for this image.";

/// Heading placed above the LLM-written description in the output.
pub const DESCRIPTION_HEADING: &str = "# Description:";
