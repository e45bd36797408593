//! Session-store port for opaque entity persistence.
//!
//! The core imposes no schema beyond the entity shapes in `model/`; the
//! store is a key-value surface keyed by entity kind and owner.

use std::error::Error;

use serde::{Deserialize, Serialize};

use crate::model::{RecordingSession, TestCase};

/// Kind discriminator for stored entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// A [`RecordingSession`].
    Session,
    /// A [`TestCase`].
    TestCase,
}

impl EntityKind {
    /// Directory-friendly name for this kind.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Session => "sessions",
            Self::TestCase => "test_cases",
        }
    }
}

/// An entity the store knows how to persist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoredEntity {
    /// A recording session snapshot.
    Session(RecordingSession),
    /// A synthesized test case.
    TestCase(TestCase),
}

impl StoredEntity {
    /// Kind of this entity.
    #[must_use]
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Session(_) => EntityKind::Session,
            Self::TestCase(_) => EntityKind::TestCase,
        }
    }

    /// Unique identifier of the wrapped entity.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Session(session) => &session.id,
            Self::TestCase(case) => &case.id,
        }
    }

    /// Identifier of the owning user (test cases are owned via their session).
    #[must_use]
    pub fn owner_id(&self) -> &str {
        match self {
            Self::Session(session) => &session.user_id,
            Self::TestCase(case) => &case.session_id,
        }
    }
}

/// Persists and lists recording sessions and test cases.
pub trait SessionStore: Send + Sync {
    /// Saves (or overwrites) an entity.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity cannot be serialized or written.
    fn save(&self, entity: &StoredEntity) -> Result<(), Box<dyn Error + Send + Sync>>;

    /// Lists all entities of `kind` owned by `owner_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be read.
    fn list(
        &self,
        kind: EntityKind,
        owner_id: &str,
    ) -> Result<Vec<StoredEntity>, Box<dyn Error + Send + Sync>>;
}
