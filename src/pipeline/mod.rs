//! Pipeline stages for file-to-Markdown conversion.
//!
//! Each submodule implements exactly one step, so each is independently
//! testable and the engine can be swapped without touching the others.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ engine ──▶ enhance ──▶ preview
//! (checks)  (markitdown) (LLM, images) (bounded notice)
//! ```
//!
//! 1. [`input`]   : existence, file type, readability and size ceiling
//! 2. [`engine`]  : run the conversion engine and capture its text
//! 3. [`enhance`]: optionally append an LLM description; uses [`llm`] and
//!    [`postprocess`]
//! 4. [`preview`]: render the first N characters for the notice channel

pub mod engine;
pub mod enhance;
pub mod input;
pub mod llm;
pub mod postprocess;
pub mod preview;
