//! Notice-sink trait for the preview and status side channel.
//!
//! Inject an [`Arc<dyn NoticeSink>`] via
//! [`crate::ConversionAdapter::with_notices`] to observe which engine mode was
//! selected and to receive a bounded preview of the converted Markdown.
//! Notices are observational only; nothing a sink does changes the
//! [`crate::ConversionResult`].
//!
//! # Example
//!
//! ```rust
//! use file2md::{NoticeSink, Preview};
//! use std::sync::Mutex;
//!
//! #[derive(Default)]
//! struct Collect(Mutex<Vec<String>>);
//!
//! impl NoticeSink for Collect {
//!     fn on_status(&self, message: &str) {
//!         self.0.lock().unwrap().push(message.to_string());
//!     }
//! }
//!
//! let sink = Collect::default();
//! sink.on_status("Using basic conversion (plugins disabled)");
//! sink.on_preview(&Preview::markdown("# ignored by default"));
//! assert_eq!(sink.0.lock().unwrap().len(), 1);
//! ```

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// How the host should render a preview payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreviewKind {
    Text,
    Markdown,
}

/// A preview payload, serialised as `{"type": "...", "data": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preview {
    #[serde(rename = "type")]
    pub kind: PreviewKind,
    pub data: String,
}

impl Preview {
    pub fn text(data: impl Into<String>) -> Self {
        Self {
            kind: PreviewKind::Text,
            data: data.into(),
        }
    }

    pub fn markdown(data: impl Into<String>) -> Self {
        Self {
            kind: PreviewKind::Markdown,
            data: data.into(),
        }
    }
}

/// Receives notices emitted during a conversion.
///
/// All methods have default no-op implementations so callers only override
/// what they care about.
pub trait NoticeSink: Send + Sync {
    /// A one-line description of the selected mode or a recovered failure.
    fn on_status(&self, message: &str) {
        let _ = message;
    }

    /// A bounded rendering of the converted output.
    fn on_preview(&self, preview: &Preview) {
        let _ = preview;
    }
}

/// A no-op implementation for callers that don't need notices.
///
/// This is the default when no sink is configured.
pub struct NoopNoticeSink;

impl NoticeSink for NoopNoticeSink {}

/// Convenience alias matching the type stored in [`crate::ConversionAdapter`].
pub type SharedNoticeSink = Arc<dyn NoticeSink>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingSink {
        statuses: AtomicUsize,
        previews: AtomicUsize,
    }

    impl NoticeSink for CountingSink {
        fn on_status(&self, _message: &str) {
            self.statuses.fetch_add(1, Ordering::SeqCst);
        }

        fn on_preview(&self, _preview: &Preview) {
            self.previews.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_sink_does_not_panic() {
        let sink = NoopNoticeSink;
        sink.on_status("status");
        sink.on_preview(&Preview::text("preview"));
    }

    #[test]
    fn counting_sink_receives_events() {
        let sink = CountingSink {
            statuses: AtomicUsize::new(0),
            previews: AtomicUsize::new(0),
        };
        sink.on_status("a");
        sink.on_status("b");
        sink.on_preview(&Preview::markdown("# x"));
        assert_eq!(sink.statuses.load(Ordering::SeqCst), 2);
        assert_eq!(sink.previews.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn preview_serialises_with_type_tag() {
        let json = serde_json::to_value(Preview::markdown("# Hi")).unwrap();
        assert_eq!(json["type"], "markdown");
        assert_eq!(json["data"], "# Hi");
    }

    #[test]
    fn arc_dyn_sink_works() {
        let sink: SharedNoticeSink = Arc::new(NoopNoticeSink);
        sink.on_status("ok");
    }
}
