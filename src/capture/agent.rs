//! The capture agent: refines raw surface observations into records.
//!
//! The agent runs as its own task, isolated from the controller; the only
//! thing the two share is the typed message channel. Sends are fire and
//! forget: once the controller hangs up (session stopped), records are
//! silently discarded.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

use super::channel::ChannelMessage;
use super::selector::{resolve_selector, ElementHandle};
use crate::model::{ApiCall, Interaction, InteractionKind};
use crate::ports::surface::{AgentConduit, SurfaceEvent};
use crate::ports::{Clock, IdGenerator};

/// Interval at which the agent polls the surface location.
pub const LOCATION_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Maximum length of click text content carried on an interaction.
const CLICK_TEXT_LIMIT: usize = 100;

/// Observes one capture surface and streams records to the controller.
pub struct CaptureAgent {
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
    tx: mpsc::Sender<ChannelMessage>,
    last_location: String,
}

impl CaptureAgent {
    /// Creates an agent for a surface opened on `initial_url`.
    ///
    /// The initial URL seeds the location poll so that opening the surface
    /// does not itself count as a navigation.
    #[must_use]
    pub fn new(
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
        tx: mpsc::Sender<ChannelMessage>,
        initial_url: &str,
    ) -> Self {
        Self { clock, ids, tx, last_location: initial_url.to_string() }
    }

    /// Consumes surface events until the surface hangs up.
    ///
    /// Runs a ~1s location poll alongside the event stream; a changed
    /// location becomes a navigation interaction.
    pub async fn run(mut self, mut conduit: AgentConduit) {
        let mut poll = tokio::time::interval(LOCATION_POLL_INTERVAL);
        poll.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                event = conduit.events.recv() => {
                    let Some(event) = event else { break };
                    self.handle_event(event).await;
                }
                _ = poll.tick() => {
                    let current = conduit.location.borrow().clone();
                    self.observe_location(current).await;
                }
            }
        }
    }

    async fn handle_event(&mut self, event: SurfaceEvent) {
        match event {
            SurfaceEvent::PointerActivated { element, text } => {
                let interaction = self.interaction(
                    InteractionKind::Click,
                    &element,
                    Some(truncate(&text, CLICK_TEXT_LIMIT)),
                );
                self.send(ChannelMessage::InteractionRecorded(interaction)).await;
            }
            SurfaceEvent::ValueChanged { element, value } => {
                let interaction = self.interaction(InteractionKind::Input, &element, Some(value));
                self.send(ChannelMessage::InteractionRecorded(interaction)).await;
            }
            SurfaceEvent::RequestCompleted { method, url, headers, body, response_body, status } => {
                let call = ApiCall {
                    id: self.ids.generate_id(),
                    method,
                    url,
                    headers,
                    body,
                    response_body,
                    status_code: status,
                    occurred_at: self.clock.now(),
                };
                self.send(ChannelMessage::ApiCallRecorded(call)).await;
            }
        }
    }

    /// Emits a navigation interaction when the polled location changed.
    async fn observe_location(&mut self, current: String) {
        if current.is_empty() || current == self.last_location {
            return;
        }
        self.last_location.clone_from(&current);
        let interaction = Interaction {
            id: self.ids.generate_id(),
            kind: InteractionKind::Navigation,
            element_tag: "document".into(),
            selector: "window.location".into(),
            value: Some(current),
            occurred_at: self.clock.now(),
            screenshot: None,
        };
        self.send(ChannelMessage::InteractionRecorded(interaction)).await;
    }

    fn interaction(
        &self,
        kind: InteractionKind,
        element: &ElementHandle,
        value: Option<String>,
    ) -> Interaction {
        Interaction {
            id: self.ids.generate_id(),
            kind,
            element_tag: element.element.tag.clone(),
            selector: resolve_selector(element),
            value,
            occurred_at: self.clock.now(),
            screenshot: None,
        }
    }

    async fn send(&self, message: ChannelMessage) {
        // Receiver gone means the session stopped; drop silently.
        let _ = self.tx.send(message).await;
    }
}

fn truncate(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}
