//! Artifact sink writing emitted artifacts to a local directory.

use std::error::Error;
use std::path::{Path, PathBuf};

use crate::ports::ArtifactSink;

/// Default artifact output directory relative to the working directory.
pub const DEFAULT_DIR: &str = "artifacts";

/// Sink that writes each emitted artifact as a file.
pub struct FileArtifactSink {
    dir: PathBuf,
}

impl FileArtifactSink {
    /// Creates a sink writing into the given directory.
    #[must_use]
    pub fn new(dir: &Path) -> Self {
        Self { dir: dir.to_path_buf() }
    }
}

impl Default for FileArtifactSink {
    fn default() -> Self {
        Self::new(Path::new(DEFAULT_DIR))
    }
}

impl ArtifactSink for FileArtifactSink {
    fn emit(
        &self,
        content: &[u8],
        filename: &str,
        _mime_type: &str,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        std::fs::create_dir_all(&self.dir)
            .map_err(|e| format!("failed to create {}: {e}", self.dir.display()))?;
        let path = self.dir.join(filename);
        std::fs::write(&path, content)
            .map_err(|e| format!("failed to write {}: {e}", path.display()))?;
        println!("Wrote {}", path.display());
        Ok(())
    }
}
