//! The conversion adapter: validate → build engine → convert.
//!
//! [`ConversionAdapter::run`] is the single entry point a host calls. It is
//! also split into its three stages ([`validate`], [`build_engine`],
//! [`convert`]) so each can be exercised on its own.
//!
//! ## Why an explicit `EngineSetup`?
//!
//! Enhanced mode can fail to initialise (no API key, malformed base URL).
//! That must never abort the conversion. Returning
//! [`EngineSetup::Degraded`] instead of swallowing an error keeps the
//! fallback visible to callers and tests.
//!
//! [`validate`]: ConversionAdapter::validate
//! [`build_engine`]: ConversionAdapter::build_engine
//! [`convert`]: ConversionAdapter::convert

use crate::config::{ConversionRequest, Limits, LlmCredentials};
use crate::error::{ConvertError, LlmSetupError};
use crate::notice::{NoopNoticeSink, Preview, SharedNoticeSink};
use crate::output::{ConversionResult, FileInfo};
use crate::pipeline::engine::{ConversionEngine, EngineRequest, MarkitdownEngine};
use crate::pipeline::enhance::LlmEnhancement;
use crate::pipeline::llm::LlmClient;
use crate::pipeline::{input, preview};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// A request whose input file has been checked.
#[derive(Debug, Clone)]
pub struct ValidatedRequest {
    pub request: ConversionRequest,
    pub file: FileInfo,
}

/// The configured engine for one invocation.
#[derive(Debug, Clone)]
pub struct EngineHandle {
    pub enable_plugins: bool,
    /// Present only in enhanced mode.
    pub llm: Option<LlmEnhancement>,
}

/// Outcome of [`ConversionAdapter::build_engine`].
#[derive(Debug, Clone)]
pub enum EngineSetup {
    /// Enhancement not requested, or requested without a model configuration.
    Plain(EngineHandle),
    /// Enhancement requested and the LLM client was built.
    Enhanced(EngineHandle),
    /// Enhancement requested but the client could not be built; running plain.
    Degraded {
        handle: EngineHandle,
        reason: LlmSetupError,
    },
}

impl EngineSetup {
    pub fn handle(&self) -> &EngineHandle {
        match self {
            EngineSetup::Plain(h) | EngineSetup::Enhanced(h) => h,
            EngineSetup::Degraded { handle, .. } => handle,
        }
    }

    pub fn is_enhanced(&self) -> bool {
        matches!(self, EngineSetup::Enhanced(_))
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, EngineSetup::Degraded { .. })
    }
}

/// Converts one file per call. Holds no state between calls.
pub struct ConversionAdapter<E = MarkitdownEngine> {
    engine: E,
    credentials: LlmCredentials,
    limits: Limits,
    notices: SharedNoticeSink,
}

impl ConversionAdapter<MarkitdownEngine> {
    /// An adapter driving the `markitdown` CLI (see [`MarkitdownEngine::default`]).
    pub fn new(credentials: LlmCredentials) -> Self {
        Self::with_engine(MarkitdownEngine::default(), credentials)
    }
}

impl<E: ConversionEngine> ConversionAdapter<E> {
    /// An adapter driving a custom engine.
    pub fn with_engine(engine: E, credentials: LlmCredentials) -> Self {
        Self {
            engine,
            credentials,
            limits: Limits::default(),
            notices: Arc::new(NoopNoticeSink),
        }
    }

    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_notices(mut self, notices: SharedNoticeSink) -> Self {
        self.notices = notices;
        self
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Check the input file exists, is readable, and is within the size limit.
    pub fn validate(&self, request: &ConversionRequest) -> Result<ValidatedRequest, ConvertError> {
        let file = input::validate_file(&request.file_path, self.limits.max_file_bytes)?;
        Ok(ValidatedRequest {
            request: request.clone(),
            file,
        })
    }

    /// Select plain, enhanced or degraded mode. Never fails.
    ///
    /// Emits one status notice naming the mode. Enhanced and degraded modes
    /// are also announced as a text preview.
    pub fn build_engine(&self, validated: &ValidatedRequest) -> EngineSetup {
        let request = &validated.request;
        let enable_plugins = request.enable_plugins;
        let plain = EngineHandle {
            enable_plugins,
            llm: None,
        };

        let model = match (request.llm_enhanced, request.model_config.as_ref()) {
            (true, Some(model)) => model,
            (true, None) => {
                debug!("LLM enhancement requested without a model configuration");
                self.notify_plain(enable_plugins);
                return EngineSetup::Plain(plain);
            }
            (false, _) => {
                self.notify_plain(enable_plugins);
                return EngineSetup::Plain(plain);
            }
        };

        match LlmClient::new(&self.credentials, model) {
            Ok(client) => {
                let message = format!(
                    "Using LLM-enhanced conversion with {} model",
                    client.model()
                );
                info!("{}", message);
                self.announce(&message);
                EngineSetup::Enhanced(EngineHandle {
                    enable_plugins,
                    llm: Some(LlmEnhancement::new(client, model.prompt.clone())),
                })
            }
            Err(reason) => {
                let message = format!(
                    "LLM client setup failed ({}), falling back to basic conversion",
                    reason
                );
                warn!("{}", message);
                self.announce(&message);
                EngineSetup::Degraded {
                    handle: plain,
                    reason,
                }
            }
        }
    }

    fn announce(&self, message: &str) {
        self.notices.on_status(message);
        self.notices.on_preview(&Preview::text(message));
    }

    fn notify_plain(&self, enable_plugins: bool) {
        let message = format!(
            "Using basic conversion (plugins {})",
            if enable_plugins { "enabled" } else { "disabled" }
        );
        debug!("{}", message);
        self.notices.on_status(&message);
    }

    /// Run the engine and shape its output.
    ///
    /// # Errors
    /// - [`ConvertError::NoContent`] if the engine returned nothing or no text
    /// - [`ConvertError::EmptyContent`] if the text is empty or whitespace
    /// - whatever the engine itself reports (missing binary, non-zero exit)
    pub async fn convert(
        &self,
        handle: &EngineHandle,
        validated: &ValidatedRequest,
    ) -> Result<ConversionResult, ConvertError> {
        let path = validated.file.path.as_path();
        let request = EngineRequest {
            path,
            enable_plugins: handle.enable_plugins,
        };

        let output = self
            .engine
            .convert(&request)
            .await?
            .ok_or(ConvertError::NoContent)?;
        let text = output.text_content.ok_or(ConvertError::NoContent)?;

        let markdown = match handle.llm {
            Some(ref llm) => llm.enhance(path, text).await,
            None => text,
        };

        if markdown.trim().is_empty() {
            return Err(ConvertError::EmptyContent);
        }

        let preview = preview::render_preview(&markdown, self.limits.preview_chars);
        self.notices.on_preview(&Preview::markdown(preview));

        info!(
            "Successfully converted: {} ({:.1} KB)",
            validated.file.file_name(),
            validated.file.size_kib()
        );

        Ok(ConversionResult::success(markdown))
    }

    /// Convert `request.file_path` to Markdown.
    ///
    /// This is the primary entry point for the library.
    ///
    /// # Errors
    /// Returns `Err(ConvertError)` for every fatal failure; use
    /// [`ConvertError::failure_message`] or [`ConversionResult::failure`] to
    /// shape it for the host. LLM setup failures are not errors.
    pub async fn run(&self, request: &ConversionRequest) -> Result<ConversionResult, ConvertError> {
        info!("Starting conversion: {}", request.file_path);

        let outcome = async {
            // ── Step 1: Validate input ───────────────────────────────────────
            let validated = self.validate(request)?;

            // ── Step 2: Select engine mode ───────────────────────────────────
            let setup = self.build_engine(&validated);

            // ── Step 3: Convert ──────────────────────────────────────────────
            self.convert(setup.handle(), &validated).await
        }
        .await;

        if let Err(ref e) = outcome {
            error!("Conversion error: {}", e.failure_message());
        }
        outcome
    }

    /// Synchronous wrapper around [`run`](Self::run).
    ///
    /// Creates a current-thread tokio runtime internally; must not be called
    /// from inside another runtime.
    pub fn run_sync(&self, request: &ConversionRequest) -> Result<ConversionResult, ConvertError> {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| ConvertError::Internal(format!("Failed to create tokio runtime: {}", e)))?
            .block_on(self.run(request))
    }

    /// Convert and write the Markdown to `output_path`.
    ///
    /// Uses atomic write (sibling temp file + rename) to prevent partial
    /// files. The temp file is removed if the rename fails.
    pub async fn run_to_file(
        &self,
        request: &ConversionRequest,
        output_path: impl AsRef<Path>,
    ) -> Result<ConversionResult, ConvertError> {
        let result = self.run(request).await?;
        let path = output_path.as_ref();
        let write_err = |source| ConvertError::OutputWriteFailed {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(write_err)?;
        }

        let tmp_path = path.with_extension("md.tmp");
        tokio::fs::write(&tmp_path, result.markdown())
            .await
            .map_err(write_err)?;
        if let Err(e) = tokio::fs::rename(&tmp_path, path).await {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(write_err(e));
        }
        debug!("Wrote {} bytes to {}", result.markdown().len(), path.display());

        Ok(result)
    }
}
