//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the application core and an
//! external system (time, IDs, the generative completion service, the
//! session store, the capture surface, the artifact sink). Implementations
//! live in `src/adapters/`.

pub mod clock;
pub mod id_gen;
pub mod llm;
pub mod sink;
pub mod store;
pub mod surface;

pub use clock::Clock;
pub use id_gen::IdGenerator;
pub use llm::{CompletionClient, CompletionFuture, CompletionRequest, CompletionResponse};
pub use sink::ArtifactSink;
pub use store::{EntityKind, SessionStore, StoredEntity};
pub use surface::{AgentConduit, CaptureSurface, InjectionError, SurfaceEvent, SurfaceHost};
