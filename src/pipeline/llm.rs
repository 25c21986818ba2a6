//! LLM client for enhancement: a minimal OpenAI-compatible chat client.
//!
//! Speaks the `/chat/completions` wire format directly over `reqwest`, so
//! any OpenAI-compatible server can be used.
//!
//! Construction ([`LlmClient::new`]) never touches the network; it only
//! validates that a key and a well-formed base URL are present. Failures
//! there are [`LlmSetupError`]s, which the adapter recovers from.

use crate::config::{LlmCredentials, ModelConfig};
use crate::error::{LlmCallError, LlmSetupError};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// A configured chat-completions client bound to one model.
#[derive(Clone)]
pub struct LlmClient {
    http: reqwest::Client,
    endpoint: Url,
    api_key: String,
    model: String,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
    timeout: Duration,
}

impl std::fmt::Debug for LlmClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmClient")
            .field("endpoint", &self.endpoint.as_str())
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: Vec<ContentPart>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
enum ContentPart {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "image_url")]
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Serialize)]
struct ImageUrl {
    url: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

impl LlmClient {
    /// Build a client from host credentials and model options.
    ///
    /// # Errors
    /// - [`LlmSetupError::MissingApiKey`] if no non-blank key was supplied
    /// - [`LlmSetupError::InvalidBaseUrl`] if the base URL does not parse
    /// - [`LlmSetupError::ClientBuild`] if reqwest rejects its configuration
    pub fn new(credentials: &LlmCredentials, model: &ModelConfig) -> Result<Self, LlmSetupError> {
        let api_key = credentials
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or(LlmSetupError::MissingApiKey)?
            .to_string();

        let base = credentials.base_url_or_default();
        let endpoint = completions_endpoint(base)?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(model.api_timeout_secs))
            .build()
            .map_err(|e| LlmSetupError::ClientBuild(e.to_string()))?;

        Ok(Self {
            http,
            endpoint,
            api_key,
            model: model.model_name.clone(),
            temperature: model.temperature,
            max_tokens: model.max_tokens,
            timeout: Duration::from_secs(model.api_timeout_secs),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Ask the model to describe the image at `path`.
    pub async fn describe_image(&self, path: &Path, prompt: &str) -> Result<String, LlmCallError> {
        let bytes = tokio::fs::read(path).await?;
        let data_url = format!("data:{};base64,{}", image_mime(path), STANDARD.encode(&bytes));
        debug!(
            "Requesting description of {} ({} bytes) from {}",
            path.display(),
            bytes.len(),
            self.model
        );

        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: vec![
                    ContentPart::Text {
                        text: prompt.to_string(),
                    },
                    ContentPart::ImageUrl {
                        image_url: ImageUrl { url: data_url },
                    },
                ],
            }],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let response = self
            .http
            .post(self.endpoint.clone())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmCallError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response.json().await?;
        first_content(parsed).ok_or(LlmCallError::EmptyResponse)
    }
}

/// Append `chat/completions` to `base`, tolerating a missing trailing slash.
fn completions_endpoint(base: &str) -> Result<Url, LlmSetupError> {
    let invalid = |reason: String| LlmSetupError::InvalidBaseUrl {
        url: base.to_string(),
        reason,
    };
    let mut normalised = base.trim().to_string();
    if !normalised.ends_with('/') {
        normalised.push('/');
    }
    let url = Url::parse(&normalised).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    url.join("chat/completions").map_err(|e| invalid(e.to_string()))
}

fn first_content(response: ChatResponse) -> Option<String> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .filter(|c| !c.trim().is_empty())
}

/// MIME type for the `data:` URL, by file extension.
fn image_mime(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "image/jpeg",
    }
}
