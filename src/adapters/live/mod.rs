//! Live adapters backed by the real system (clock, uuid, Anthropic API,
//! filesystem store, filesystem artifact sink).

pub mod clock;
pub mod id_gen;
pub mod llm;
pub mod sink;
pub mod store;

pub use clock::LiveClock;
pub use id_gen::LiveIdGenerator;
pub use llm::LiveCompletionClient;
pub use sink::FileArtifactSink;
pub use store::FileSessionStore;
