//! Artifact-sink port for one-shot artifact emission.

use std::error::Error;

/// Emits a rendered artifact to wherever downloads land.
///
/// Multi-artifact export concatenates artifacts with delimiting headers into
/// a single emission rather than producing a standard archive format.
pub trait ArtifactSink: Send + Sync {
    /// Emits one artifact.
    ///
    /// # Errors
    ///
    /// Returns an error if the artifact cannot be delivered.
    fn emit(
        &self,
        content: &[u8],
        filename: &str,
        mime_type: &str,
    ) -> Result<(), Box<dyn Error + Send + Sync>>;
}
