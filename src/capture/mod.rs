//! In-surface capture: selector resolution, the agent task, and the typed
//! message channel back to the session controller.

pub mod agent;
pub mod channel;
pub mod selector;

pub use agent::CaptureAgent;
pub use channel::ChannelMessage;
pub use selector::{ElementHandle, ElementNode};
