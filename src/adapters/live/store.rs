//! File-backed session store.
//!
//! Entities are written as YAML under `<root>/<kind>/<id>.yaml`. The core
//! imposes no schema beyond the entity shape, so this adapter just
//! serializes whole entities.

use std::error::Error;
use std::path::{Path, PathBuf};

use crate::ports::store::{EntityKind, SessionStore, StoredEntity};

/// Default store root relative to the working directory.
pub const DEFAULT_ROOT: &str = ".testloom";

/// Session store writing YAML files under a root directory.
pub struct FileSessionStore {
    root: PathBuf,
}

impl FileSessionStore {
    /// Creates a store rooted at the given path.
    #[must_use]
    pub fn new(root: &Path) -> Self {
        Self { root: root.to_path_buf() }
    }

    fn entity_path(&self, kind: EntityKind, id: &str) -> PathBuf {
        self.root.join(kind.as_str()).join(format!("{id}.yaml"))
    }
}

impl Default for FileSessionStore {
    fn default() -> Self {
        Self::new(Path::new(DEFAULT_ROOT))
    }
}

impl SessionStore for FileSessionStore {
    fn save(&self, entity: &StoredEntity) -> Result<(), Box<dyn Error + Send + Sync>> {
        let path = self.entity_path(entity.kind(), entity.id());
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("failed to create {}: {e}", parent.display()))?;
        }
        let yaml = serde_yaml::to_string(entity)
            .map_err(|e| format!("failed to serialize entity {}: {e}", entity.id()))?;
        std::fs::write(&path, yaml)
            .map_err(|e| format!("failed to write {}: {e}", path.display()))?;
        Ok(())
    }

    fn list(
        &self,
        kind: EntityKind,
        owner_id: &str,
    ) -> Result<Vec<StoredEntity>, Box<dyn Error + Send + Sync>> {
        let dir = self.root.join(kind.as_str());
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut entities = Vec::new();
        let entries =
            std::fs::read_dir(&dir).map_err(|e| format!("failed to list {}: {e}", dir.display()))?;
        for entry in entries {
            let entry = entry.map_err(|e| format!("failed to list {}: {e}", dir.display()))?;
            let path = entry.path();
            if path.extension().map_or(true, |ext| ext != "yaml") {
                continue;
            }
            let content = std::fs::read_to_string(&path)
                .map_err(|e| format!("failed to read {}: {e}", path.display()))?;
            let entity: StoredEntity = serde_yaml::from_str(&content)
                .map_err(|e| format!("failed to parse {}: {e}", path.display()))?;
            if entity.owner_id() == owner_id {
                entities.push(entity);
            }
        }
        Ok(entities)
    }
}
