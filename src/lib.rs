//! # file2md
//!
//! Convert local documents (PDF, Word, PowerPoint, Excel, HTML, images, …) to
//! Markdown by driving the [markitdown] command-line tool, optionally
//! enriching image inputs with an LLM-written description.
//!
//! ## Pipeline Overview
//!
//! ```text
//! file
//!  │
//!  ├─ 1. Validate  exists, regular file, readable, ≤ 100 MiB
//!  ├─ 2. Engine    plain / LLM-enhanced / degraded (setup failed → plain)
//!  ├─ 3. Convert   markitdown <file>  (+ image description in enhanced mode)
//!  └─ 4. Shape     non-empty check, 1000-char preview notice, result
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use file2md::{ConversionAdapter, ConversionRequest, LlmCredentials};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let adapter = ConversionAdapter::new(LlmCredentials::from_env());
//!     let request = ConversionRequest::builder("quarterly.xlsx").build()?;
//!     let result = adapter.run(&request).await?;
//!     println!("{}", result.markdown());
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `file2md` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! [markitdown]: https://github.com/microsoft/markitdown

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod notice;
pub mod output;
pub mod pipeline;
pub mod prompts;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{
    ConversionRequest, ConversionRequestBuilder, Limits, LlmCredentials, ModelConfig,
    DEFAULT_MODEL,
};
pub use convert::{ConversionAdapter, EngineHandle, EngineSetup, ValidatedRequest};
pub use error::{ConvertError, ErrorKind, LlmCallError, LlmSetupError};
pub use notice::{NoopNoticeSink, NoticeSink, Preview, PreviewKind, SharedNoticeSink};
pub use output::{ConversionResult, FileInfo};
pub use pipeline::engine::{ConversionEngine, EngineOutput, EngineRequest, MarkitdownEngine};
