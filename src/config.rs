//! Configuration types for a single conversion.
//!
//! Everything a conversion needs is passed in explicitly: the
//! [`ConversionRequest`] describes *what* to convert, [`LlmCredentials`]
//! carries the host-supplied model endpoint, and [`Limits`] holds the
//! guard-rails. Nothing is read from global state inside the adapter, so a
//! test can drive every branch by constructing these values directly.

use crate::error::ConvertError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Model used for enhancement when the host does not name one.
pub const DEFAULT_MODEL: &str = "deepseek-chat";

/// Base URL used when the host supplies a key but no endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Input files larger than this are rejected before conversion. 100 MiB.
pub const DEFAULT_MAX_FILE_BYTES: u64 = 100 * 1024 * 1024;

/// Characters of Markdown shown in the preview notice.
pub const DEFAULT_PREVIEW_CHARS: usize = 1000;

/// Per-request timeout for the LLM endpoint, in seconds.
pub const DEFAULT_API_TIMEOUT_SECS: u64 = 60;

/// One conversion invocation, as received from the host runtime.
///
/// Deserialises from the host's input object, so both the Rust field names
/// and the host names (`input_file`, `llm_model`) are accepted.
///
/// # Example
/// ```rust
/// use file2md::ConversionRequest;
///
/// let request = ConversionRequest::builder("report.docx")
///     .enable_plugins(true)
///     .llm_enhanced(true)
///     .model("gpt-4o-mini")
///     .build()
///     .unwrap();
/// assert_eq!(request.model_config.unwrap().model_name, "gpt-4o-mini");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversionRequest {
    /// Path of the local file to convert.
    #[serde(alias = "input_file")]
    pub file_path: String,

    /// Let markitdown load its third-party converter plugins. Default: false.
    #[serde(default, deserialize_with = "null_as_false")]
    pub enable_plugins: bool,

    /// Ask for LLM enhancement. Only takes effect together with
    /// `model_config` and an API key. Default: false.
    #[serde(default, deserialize_with = "null_as_false")]
    pub llm_enhanced: bool,

    /// Model options for enhancement. An empty object counts as absent.
    #[serde(default, alias = "llm_model", deserialize_with = "non_empty_model")]
    pub model_config: Option<ModelConfig>,
}

/// Hosts send `null` for unset optional booleans.
fn null_as_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}

/// `null` and `{}` both mean "no model options"; a blank model name is rejected.
fn non_empty_model<'de, D>(deserializer: D) -> Result<Option<ModelConfig>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error as _;

    let map = match Option::<serde_json::Map<String, serde_json::Value>>::deserialize(deserializer)? {
        Some(map) if !map.is_empty() => map,
        _ => return Ok(None),
    };
    let model = ModelConfig::deserialize(serde_json::Value::Object(map)).map_err(D::Error::custom)?;
    if model.model_name.trim().is_empty() {
        return Err(D::Error::custom("model name must not be empty"));
    }
    Ok(Some(model))
}

impl ConversionRequest {
    /// Create a new builder for `ConversionRequest`.
    pub fn builder(file_path: impl Into<String>) -> ConversionRequestBuilder {
        ConversionRequestBuilder {
            request: Self {
                file_path: file_path.into(),
                ..Self::default()
            },
        }
    }
}

/// Builder for [`ConversionRequest`].
#[derive(Debug)]
pub struct ConversionRequestBuilder {
    request: ConversionRequest,
}

impl ConversionRequestBuilder {
    pub fn enable_plugins(mut self, v: bool) -> Self {
        self.request.enable_plugins = v;
        self
    }

    pub fn llm_enhanced(mut self, v: bool) -> Self {
        self.request.llm_enhanced = v;
        self
    }

    /// Set the model name, creating a default [`ModelConfig`] if needed.
    pub fn model(mut self, name: impl Into<String>) -> Self {
        self.request
            .model_config
            .get_or_insert_with(ModelConfig::default)
            .model_name = name.into();
        self
    }

    pub fn model_config(mut self, config: ModelConfig) -> Self {
        self.request.model_config = Some(config);
        self
    }

    /// Build the request, validating constraints that do not need the filesystem.
    pub fn build(self) -> Result<ConversionRequest, ConvertError> {
        if self.request.file_path.trim().is_empty() {
            return Err(ConvertError::EmptyPath);
        }
        if let Some(ref m) = self.request.model_config {
            if m.model_name.trim().is_empty() {
                return Err(ConvertError::Internal("model name must not be empty".into()));
            }
        }
        Ok(self.request)
    }
}

/// LLM options supplied alongside an enhanced request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Chat model identifier. Default: `deepseek-chat`.
    #[serde(default = "default_model_name", alias = "model")]
    pub model_name: String,

    /// Sampling temperature forwarded to the API, if set.
    #[serde(default)]
    pub temperature: Option<f32>,

    /// Output token cap forwarded to the API, if set.
    #[serde(default)]
    pub max_tokens: Option<u32>,

    /// Replaces the default image-description prompt.
    #[serde(default)]
    pub prompt: Option<String>,

    /// Timeout for each LLM request in seconds. Default: 60.
    #[serde(default = "default_api_timeout_secs")]
    pub api_timeout_secs: u64,
}

fn default_model_name() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_api_timeout_secs() -> u64 {
    DEFAULT_API_TIMEOUT_SECS
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model_name: default_model_name(),
            temperature: None,
            max_tokens: None,
            prompt: None,
            api_timeout_secs: DEFAULT_API_TIMEOUT_SECS,
        }
    }
}

/// Model-serving endpoint supplied by the host context.
///
/// A missing `api_key` is not an error here: [`crate::ConversionAdapter`]
/// treats it as a failed LLM setup and falls back to plain conversion.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct LlmCredentials {
    /// OpenAI-compatible base URL, e.g. `https://api.deepseek.com/v1`.
    pub base_url: Option<String>,
    /// Bearer token for the endpoint.
    pub api_key: Option<String>,
}

impl LlmCredentials {
    pub fn new(base_url: Option<String>, api_key: Option<String>) -> Self {
        Self { base_url, api_key }
    }

    /// Read credentials from `FILE2MD_LLM_BASE_URL` / `FILE2MD_LLM_API_KEY`,
    /// falling back to `OPENAI_BASE_URL` / `OPENAI_API_KEY`.
    ///
    /// Empty values are treated as unset.
    pub fn from_env() -> Self {
        Self {
            base_url: first_env(&["FILE2MD_LLM_BASE_URL", "OPENAI_BASE_URL"]),
            api_key: first_env(&["FILE2MD_LLM_API_KEY", "OPENAI_API_KEY"]),
        }
    }

    /// The base URL to use, with the default filled in.
    pub fn base_url_or_default(&self) -> &str {
        self.base_url
            .as_deref()
            .filter(|u| !u.trim().is_empty())
            .unwrap_or(DEFAULT_BASE_URL)
    }
}

fn first_env(names: &[&str]) -> Option<String> {
    names
        .iter()
        .filter_map(|n| std::env::var(n).ok())
        .find(|v| !v.trim().is_empty())
}

impl fmt::Debug for LlmCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmCredentials")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Guard-rails applied to every conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Maximum input size in bytes. Default: 100 MiB.
    pub max_file_bytes: u64,
    /// Characters kept in the preview notice. Default: 1000.
    pub preview_chars: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
            preview_chars: DEFAULT_PREVIEW_CHARS,
        }
    }
}
