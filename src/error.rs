//! Error types for the file2md library.
//!
//! Three error types reflect three distinct failure modes:
//!
//! * [`ConvertError`]: **Fatal**: the invocation cannot produce Markdown
//!   (missing or oversized input, markitdown not installed, empty output).
//!   Returned as `Err(ConvertError)` from [`crate::ConversionAdapter::run`].
//!
//! * [`LlmSetupError`]: **Recovered**: the LLM client could not be built.
//!   Never returned from `run`; it is carried inside
//!   [`crate::EngineSetup::Degraded`] and the conversion proceeds in plain mode.
//!
//! * [`LlmCallError`]: **Recovered**: an enhancement request failed after the
//!   client was built. Logged, and the engine's text is kept as-is.

use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

/// Install hint surfaced when the markitdown executable cannot be spawned.
pub const INSTALL_HINT: &str =
    "MarkItDown library not installed. Please install with: pip install 'markitdown[all]'";

const MIB: u64 = 1024 * 1024;

fn as_mib(bytes: &u64) -> f64 {
    *bytes as f64 / MIB as f64
}

fn whole_mib(bytes: &u64) -> u64 {
    bytes / MIB
}

/// Coarse classification of a [`ConvertError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The input file is missing, unreadable, or too large.
    InvalidInput,
    /// The conversion engine is not installed.
    MissingDependency,
    /// The engine ran but produced no usable Markdown.
    ConversionFailed,
    /// Unexpected I/O or runtime failure.
    Internal,
}

/// All fatal errors returned by the file2md library.
#[derive(Debug, Error)]
pub enum ConvertError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// No input path was given.
    #[error("Input file not found: (empty path)")]
    EmptyPath,

    /// Input file was not found at the given path.
    #[error("Input file not found: {}", .path.display())]
    FileNotFound { path: PathBuf },

    /// Path exists but is a directory or other non-regular entry.
    #[error("Input path is not a regular file: {}", .path.display())]
    NotAFile { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{}'", .path.display())]
    PermissionDenied { path: PathBuf },

    /// File exceeds the configured size ceiling.
    #[error(
        "File size ({:.1}MB) exceeds limit of {}MB",
        as_mib(.size_bytes),
        whole_mib(.limit_bytes)
    )]
    FileTooLarge { size_bytes: u64, limit_bytes: u64 },

    // ── Engine errors ─────────────────────────────────────────────────────
    /// The markitdown executable could not be found.
    #[error("{} (looked for '{}')", INSTALL_HINT, .program.display())]
    MissingDependency { program: PathBuf },

    /// markitdown exited with a non-zero status.
    #[error("markitdown exited with {status}: {stderr}")]
    EngineFailed { status: ExitStatus, stderr: String },

    /// The engine returned nothing, or a result without text.
    #[error("Conversion failed - no content returned")]
    NoContent,

    /// The engine returned only whitespace.
    #[error("Conversion resulted in empty content")]
    EmptyContent,

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the output Markdown file.
    #[error("Failed to write output file '{}': {source}", .path.display())]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Any other I/O failure while inspecting or converting the input.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ConvertError {
    /// Classify the error for callers that branch on failure category.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ConvertError::EmptyPath
            | ConvertError::FileNotFound { .. }
            | ConvertError::NotAFile { .. }
            | ConvertError::PermissionDenied { .. }
            | ConvertError::FileTooLarge { .. } => ErrorKind::InvalidInput,
            ConvertError::MissingDependency { .. } => ErrorKind::MissingDependency,
            ConvertError::EngineFailed { .. }
            | ConvertError::NoContent
            | ConvertError::EmptyContent => ErrorKind::ConversionFailed,
            ConvertError::OutputWriteFailed { .. }
            | ConvertError::Io(_)
            | ConvertError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// The single human-readable message reported to the host runtime.
    ///
    /// A missing engine gets the install instruction verbatim; everything
    /// else is prefixed with `Conversion failed:`.
    pub fn failure_message(&self) -> String {
        match self {
            ConvertError::MissingDependency { .. } => INSTALL_HINT.to_string(),
            other => format!("Conversion failed: {other}"),
        }
    }
}

/// Why the LLM-enhanced engine could not be constructed.
///
/// The adapter treats every variant the same way (fall back to plain
/// conversion); the variants exist so the notice says what went wrong.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LlmSetupError {
    /// No API key was supplied by the host.
    #[error("No API key provided")]
    MissingApiKey,

    /// The base URL could not be parsed.
    #[error("Invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// reqwest refused to build a client.
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),
}

/// A failed enhancement request.
#[derive(Debug, Error)]
pub enum LlmCallError {
    /// Reading the image to attach failed.
    #[error("Failed to read image: {0}")]
    Io(#[from] std::io::Error),

    /// Transport-level failure.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("LLM API error ({status}): {body}")]
    Api { status: u16, body: String },

    /// The API answered without any message content.
    #[error("LLM returned no content")]
    EmptyResponse,
}
