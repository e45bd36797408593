//! Service context bundling all port trait objects.

use std::path::Path;
use std::sync::Arc;

use crate::adapters::live::{
    FileArtifactSink, FileSessionStore, LiveClock, LiveCompletionClient, LiveIdGenerator,
};
use crate::ports::{
    ArtifactSink, CaptureSurface, Clock, CompletionClient, IdGenerator, SessionStore, SurfaceHost,
};

/// Bundles all port trait objects into a single context.
///
/// Each field provides access to one external boundary. Ports are shared
/// via `Arc` because the controller, the capture agent, and the
/// synthesizer run in separate tasks.
pub struct ServiceContext {
    /// Clock for obtaining the current time.
    pub clock: Arc<dyn Clock>,
    /// ID generator for entity identity.
    pub ids: Arc<dyn IdGenerator>,
    /// Completion client for test-case synthesis.
    pub llm: Arc<dyn CompletionClient>,
    /// Store for sessions and test cases.
    pub store: Arc<dyn SessionStore>,
    /// Host that opens capture surfaces.
    pub host: Arc<dyn SurfaceHost>,
    /// Sink for rendered artifacts.
    pub sink: Arc<dyn ArtifactSink>,
}

impl ServiceContext {
    /// Creates a live context with real adapters.
    ///
    /// No browser automation driver is bundled, so the surface host is a
    /// panicking stub with a clear message; `generate` and `sessions` work
    /// fully, `record` requires wiring a real host.
    #[must_use]
    pub fn live() -> Self {
        Self {
            clock: Arc::new(LiveClock),
            ids: Arc::new(LiveIdGenerator),
            llm: Arc::new(LiveCompletionClient::new()),
            store: Arc::new(FileSessionStore::default()),
            host: Arc::new(PanickingSurfaceHost),
            sink: Arc::new(FileArtifactSink::default()),
        }
    }

    /// Creates a live context with stores and sinks rooted at `root`.
    #[must_use]
    pub fn live_at(root: &Path) -> Self {
        Self {
            clock: Arc::new(LiveClock),
            ids: Arc::new(LiveIdGenerator),
            llm: Arc::new(LiveCompletionClient::new()),
            store: Arc::new(FileSessionStore::new(&root.join(".testloom"))),
            host: Arc::new(PanickingSurfaceHost),
            sink: Arc::new(FileArtifactSink::new(&root.join("artifacts"))),
        }
    }
}

// --- Panicking adapter for the unconfigured surface port ---

struct PanickingSurfaceHost;
impl SurfaceHost for PanickingSurfaceHost {
    fn open(
        &self,
        _url: &str,
    ) -> Result<Box<dyn CaptureSurface>, Box<dyn std::error::Error + Send + Sync>> {
        panic!("SurfaceHost port not configured: no browser automation driver is wired up");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn live_context_constructs() {
        let ctx = ServiceContext::live();
        let id = ctx.ids.generate_id();
        assert_eq!(id.len(), 36);
    }

    #[test]
    #[should_panic(expected = "SurfaceHost port not configured")]
    fn unconfigured_surface_host_panics_with_clear_message() {
        let ctx = ServiceContext::live();
        let _ = ctx.host.open("https://example.com");
    }
}
