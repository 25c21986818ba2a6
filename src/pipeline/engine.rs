//! Conversion engines: the component that actually turns a file into Markdown.
//!
//! Parsing PDFs, Office documents, spreadsheets, HTML and friends is
//! entirely delegated. [`MarkitdownEngine`] shells out to the `markitdown`
//! command-line tool; tests and embedders can substitute any other
//! [`ConversionEngine`].

use crate::error::ConvertError;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Environment variable overriding the markitdown executable.
pub const MARKITDOWN_BIN_ENV: &str = "MARKITDOWN_BIN";

/// What the engine is asked to do.
#[derive(Debug, Clone, Copy)]
pub struct EngineRequest<'a> {
    pub path: &'a Path,
    pub enable_plugins: bool,
}

/// What the engine handed back.
///
/// `text_content` is optional because an engine may return a result object
/// without any text; the adapter treats that the same as no result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineOutput {
    pub text_content: Option<String>,
}

impl EngineOutput {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text_content: Some(text.into()),
        }
    }
}

/// A document-to-Markdown converter.
///
/// `Ok(None)` means the engine ran but produced no result at all.
pub trait ConversionEngine: Send + Sync {
    fn convert(
        &self,
        request: &EngineRequest<'_>,
    ) -> impl Future<Output = Result<Option<EngineOutput>, ConvertError>> + Send;
}

/// Runs the `markitdown` CLI as a child process and captures stdout.
#[derive(Debug, Clone)]
pub struct MarkitdownEngine {
    program: PathBuf,
    args: Vec<String>,
}

impl Default for MarkitdownEngine {
    /// Uses `$MARKITDOWN_BIN` if set, else `markitdown` from `PATH`.
    fn default() -> Self {
        let program = std::env::var_os(MARKITDOWN_BIN_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("markitdown"));
        Self::new(program)
    }
}

impl MarkitdownEngine {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Extra arguments placed before the plugin flag and the input path.
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    fn command(&self, request: &EngineRequest<'_>) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        if request.enable_plugins {
            cmd.arg("--use-plugins");
        }
        cmd.arg("--")
            .arg(request.path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }
}

impl ConversionEngine for MarkitdownEngine {
    async fn convert(
        &self,
        request: &EngineRequest<'_>,
    ) -> Result<Option<EngineOutput>, ConvertError> {
        debug!(
            "Running {} on {} (plugins: {})",
            self.program.display(),
            request.path.display(),
            request.enable_plugins
        );

        let output = match self.command(request).output().await {
            Ok(output) => output,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ConvertError::MissingDependency {
                    program: self.program.clone(),
                });
            }
            Err(e) => return Err(ConvertError::Io(e)),
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(ConvertError::EngineFailed {
                status: output.status,
                stderr,
            });
        }

        debug!("markitdown produced {} bytes", output.stdout.len());
        Ok(Some(EngineOutput::text(
            String::from_utf8_lossy(&output.stdout).into_owned(),
        )))
    }
}
