//! Core domain entities: recording sessions and synthesized test cases.
//!
//! Everything here is plain serializable data. Sessions are mutated only by
//! the [`crate::session::SessionController`]; interactions and api calls are
//! append-only once inserted, and test cases are immutable after synthesis.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of a recording session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// Actively accepting interaction and api-call records.
    Recording,
    /// Paused by the user; the capture surface stays open.
    Stopped,
    /// Recording finished; synthesis may be in flight.
    Processing,
    /// Terminal state; the session has been released by its controller.
    Completed,
}

/// Kind of a captured user interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionKind {
    /// Pointer activation on an element.
    Click,
    /// Value change on an input-like element.
    Input,
    /// Scroll movement.
    Scroll,
    /// Location change observed by the agent's poll.
    Navigation,
    /// Pointer hover over an element.
    Hover,
}

/// A captured user-originated event. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    /// Unique identifier.
    pub id: String,
    /// What the user did.
    pub kind: InteractionKind,
    /// Tag name of the target element (e.g. `"button"`).
    pub element_tag: String,
    /// Stable locator for the target element.
    pub selector: String,
    /// Entered value, truncated text content, or navigation target.
    pub value: Option<String>,
    /// When the event was observed.
    pub occurred_at: DateTime<Utc>,
    /// Reference to a screenshot taken alongside the event, if any.
    pub screenshot: Option<String>,
}

/// A captured outbound network request/response pair. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiCall {
    /// Unique identifier.
    pub id: String,
    /// HTTP method.
    pub method: String,
    /// Request URL.
    pub url: String,
    /// Request headers.
    pub headers: BTreeMap<String, String>,
    /// Request body, if any.
    pub body: Option<String>,
    /// Response payload, if captured.
    pub response_body: Option<String>,
    /// HTTP status code of the response.
    pub status_code: u16,
    /// When the call completed.
    pub occurred_at: DateTime<Utc>,
}

/// Target dialect for a synthesized test artifact. Closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestFormat {
    /// Fixture-based pytest module.
    Pytest,
    /// Feature file plus step-definition stubs plus page-object scaffold.
    SeleniumBdd,
    /// Plain Gherkin feature file.
    Gherkin,
}

impl TestFormat {
    /// File extension for artifacts in this format.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Pytest => "py",
            Self::SeleniumBdd | Self::Gherkin => "feature",
        }
    }
}

impl fmt::Display for TestFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pytest => "pytest",
            Self::SeleniumBdd => "selenium_bdd",
            Self::Gherkin => "gherkin",
        };
        f.write_str(name)
    }
}

impl FromStr for TestFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pytest" => Ok(Self::Pytest),
            "selenium_bdd" => Ok(Self::SeleniumBdd),
            "gherkin" => Ok(Self::Gherkin),
            other => Err(format!(
                "unknown format '{other}' (expected pytest, selenium_bdd, or gherkin)"
            )),
        }
    }
}

/// A single step within a test case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestStep {
    /// Unique identifier.
    pub id: String,
    /// Human-readable action description (e.g. `Click on "#buy"`).
    pub action: String,
    /// Locator of the element the step targets, if known.
    pub target: Option<String>,
    /// Value involved in the step, if any.
    pub value: Option<String>,
    /// Expected outcome, if the step asserts one.
    pub expected: Option<String>,
}

/// A structured test case derived from a finished recording.
///
/// Created by the synthesizer and immutable thereafter; the format renderer
/// and the download path only read it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestCase {
    /// Unique identifier.
    pub id: String,
    /// Identifier of the session this case was derived from.
    pub session_id: String,
    /// Short title.
    pub title: String,
    /// What the case verifies.
    pub description: String,
    /// Ordered steps.
    pub steps: Vec<TestStep>,
    /// Target artifact dialect.
    pub format: TestFormat,
    /// Raw generated text backing this case.
    pub content: String,
    /// When the case was synthesized.
    pub created_at: DateTime<Utc>,
}

/// A recording of one user's interaction with a target page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordingSession {
    /// Unique identifier.
    pub id: String,
    /// Owning user.
    pub user_id: String,
    /// URL the capture surface was opened on.
    pub target_url: String,
    /// Current lifecycle status.
    pub status: SessionStatus,
    /// When recording started.
    pub started_at: DateTime<Utc>,
    /// Set exactly when the session leaves the recording/paused states.
    pub ended_at: Option<DateTime<Utc>>,
    /// Captured interactions, ordered by arrival. Append-only.
    pub interactions: Vec<Interaction>,
    /// Captured api calls, ordered by arrival. Append-only.
    pub api_calls: Vec<ApiCall>,
    /// Test cases attached at completion, if synthesis finished in time.
    pub test_cases: Vec<TestCase>,
}

impl RecordingSession {
    /// Wall-clock duration of the recording in seconds.
    ///
    /// Falls back to zero while the session is still recording.
    #[must_use]
    pub fn duration_secs(&self) -> i64 {
        self.ended_at.map_or(0, |end| (end - self.started_at).num_seconds())
    }
}
