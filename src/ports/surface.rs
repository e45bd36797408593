//! Capture-surface port: the separate browsing context being recorded.
//!
//! The controller and the capture agent never call into the surface
//! synchronously; the surface publishes raw observations through the
//! [`AgentConduit`] and the agent refines them into records. Live
//! implementations are expected to wrap the surface's fetch-equivalent APIs
//! exactly once so that request completions are observed without altering
//! the response handed to the page.

use std::collections::BTreeMap;
use std::error::Error;
use std::fmt;

use tokio::sync::{mpsc, watch};

use crate::capture::selector::ElementHandle;

/// A raw observation emitted from inside the capture surface.
///
/// These are unrefined: selector resolution, truncation, and record identity
/// are applied by the capture agent, not the surface.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceEvent {
    /// A pointer activation (click) on an element.
    PointerActivated {
        /// The activated element with its ancestor chain.
        element: ElementHandle,
        /// Text content of the element, untruncated.
        text: String,
    },
    /// A value change on an input-like element.
    ValueChanged {
        /// The changed element with its ancestor chain.
        element: ElementHandle,
        /// Full current value of the element.
        value: String,
    },
    /// An outbound network call observed after completion.
    RequestCompleted {
        /// HTTP method.
        method: String,
        /// Request URL.
        url: String,
        /// Request headers.
        headers: BTreeMap<String, String>,
        /// Request body, if any.
        body: Option<String>,
        /// Response payload, if captured.
        response_body: Option<String>,
        /// HTTP status code.
        status: u16,
    },
}

/// Channels handed to the capture agent when injection succeeds.
#[derive(Debug)]
pub struct AgentConduit {
    /// Raw surface observations, FIFO per event type.
    pub events: mpsc::Receiver<SurfaceEvent>,
    /// Current location of the surface; the agent polls this.
    pub location: watch::Receiver<String>,
}

/// Error raised when the capture agent cannot be installed in a surface.
///
/// Non-fatal: recording continues with degraded capture fidelity.
#[derive(Debug)]
pub struct InjectionError(pub String);

impl fmt::Display for InjectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "agent injection failed: {}", self.0)
    }
}

impl Error for InjectionError {}

/// An open browsing surface under observation.
pub trait CaptureSurface: Send {
    /// Installs the capture agent in the surface. Best-effort, at most once.
    ///
    /// # Errors
    ///
    /// Returns [`InjectionError`] if the surface failed to load or the agent
    /// script could not be installed.
    fn inject_agent(&mut self) -> Result<AgentConduit, InjectionError>;

    /// Whether the surface is still open.
    fn is_open(&self) -> bool;

    /// The surface's current location.
    fn current_url(&self) -> String;

    /// Closes the surface. Idempotent.
    fn close(&mut self);
}

/// Opens capture surfaces on demand.
pub trait SurfaceHost: Send + Sync {
    /// Opens a new surface on the given URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface cannot be opened at all; callers
    /// treat this as degraded capture rather than a session failure.
    fn open(&self, url: &str) -> Result<Box<dyn CaptureSurface>, Box<dyn Error + Send + Sync>>;
}
