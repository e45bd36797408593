//! Typed messages carried from the capture agent to the session controller.
//!
//! The agent and the controller are independent state machines joined only
//! by this channel; delivery is asynchronous and messages may arrive after
//! the session has already stopped. The serde representation matches the
//! wire format (`kind` tag plus `data` payload); payloads with an
//! unrecognized tag fail to decode and are dropped at the boundary.

use serde::{Deserialize, Serialize};

use crate::model::{ApiCall, Interaction};

/// A record streamed out of the capture surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data")]
pub enum ChannelMessage {
    /// A refined user interaction.
    #[serde(rename = "INTERACTION_RECORDED")]
    InteractionRecorded(Interaction),
    /// A refined network call.
    #[serde(rename = "API_CALL_RECORDED")]
    ApiCallRecorded(ApiCall),
}

impl ChannelMessage {
    /// Decodes a wire message, returning `None` for unrecognized kinds.
    #[must_use]
    pub fn decode(raw: &str) -> Option<Self> {
        serde_json::from_str(raw).ok()
    }
}
