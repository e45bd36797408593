//! Session lifecycle controller.
//!
//! One controller owns at most one recording session at a time and is the
//! only writer of session state. The capture agent runs in its own task and
//! reaches the controller exclusively through the typed message channel;
//! ingestion is guarded by the session status, so late messages arriving
//! after `stop` are dropped rather than erroring.

use std::error::Error;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::capture::{CaptureAgent, ChannelMessage};
use crate::model::{ApiCall, Interaction, RecordingSession, SessionStatus, TestCase, TestFormat};
use crate::ports::surface::AgentConduit;
use crate::ports::{CaptureSurface, Clock, IdGenerator, SessionStore, StoredEntity, SurfaceHost};
use crate::synth::{SynthesisError, TestCaseSynthesizer};

/// Interval of the surface liveness check.
pub const LIVENESS_INTERVAL: Duration = Duration::from_secs(1);

/// Upper bound on synthesis before the session is force-completed.
pub const SYNTHESIS_DEADLINE: Duration = Duration::from_secs(15);

/// Buffer depth of the agent → controller message channel.
const CHANNEL_CAPACITY: usize = 256;

/// Lifecycle violations surfaced to the caller.
#[derive(Debug, PartialEq, Eq)]
pub enum SessionError {
    /// A non-completed session is already held by this controller.
    Conflict,
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Conflict => f.write_str("a recording session is already active"),
        }
    }
}

impl Error for SessionError {}

/// Owns the active recording session and drives its state machine.
///
/// Explicitly constructed and passed by reference to whatever owns the
/// application lifetime; there is no ambient global instance. The
/// single-active-session invariant holds because [`SessionController::start`]
/// rejects while a session is held and [`SessionController::complete`] is
/// the only release point.
pub struct SessionController {
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
    store: Arc<dyn SessionStore>,
    host: Arc<dyn SurfaceHost>,
    session: Option<RecordingSession>,
    surface: Option<Box<dyn CaptureSurface>>,
    accepting: bool,
    tasks: Vec<JoinHandle<()>>,
}

impl SessionController {
    /// Creates a controller with no active session.
    #[must_use]
    pub fn new(
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
        store: Arc<dyn SessionStore>,
        host: Arc<dyn SurfaceHost>,
    ) -> Self {
        Self {
            clock,
            ids,
            store,
            host,
            session: None,
            surface: None,
            accepting: false,
            tasks: Vec::new(),
        }
    }

    /// Read-only view of the held session, if any.
    #[must_use]
    pub fn session(&self) -> Option<&RecordingSession> {
        self.session.as_ref()
    }

    /// Starts a new recording session on `url`.
    ///
    /// Opens the capture surface and installs the agent best-effort: if
    /// either fails the session still records, just without captured
    /// events. Returns the session snapshot and, when injection succeeded,
    /// the conduit the agent task should consume.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Conflict`] while a session is held; held
    /// sessions are never `completed`, so this is exactly the
    /// active-session check.
    pub fn start(
        &mut self,
        url: &str,
        user_id: &str,
    ) -> Result<(RecordingSession, Option<AgentConduit>), SessionError> {
        if self.session.is_some() {
            return Err(SessionError::Conflict);
        }

        let session = RecordingSession {
            id: self.ids.generate_id(),
            user_id: user_id.to_string(),
            target_url: url.to_string(),
            status: SessionStatus::Recording,
            started_at: self.clock.now(),
            ended_at: None,
            interactions: Vec::new(),
            api_calls: Vec::new(),
            test_cases: Vec::new(),
        };
        self.persist(&session);

        let mut surface = match self.host.open(url) {
            Ok(surface) => Some(surface),
            Err(err) => {
                eprintln!("Warning: could not open capture surface for {url}: {err}");
                None
            }
        };
        let conduit = surface.as_mut().and_then(|surface| match surface.inject_agent() {
            Ok(conduit) => Some(conduit),
            Err(err) => {
                eprintln!("Warning: {err}; recording continues without capture");
                None
            }
        });

        self.surface = surface;
        self.accepting = true;
        self.session = Some(session.clone());
        Ok((session, conduit))
    }

    /// Appends an interaction to the active session.
    ///
    /// Silent no-op when no session is accepting records; this is the guard
    /// against agent messages arriving after `stop` or while paused.
    pub fn record_interaction(&mut self, interaction: Interaction) {
        if !self.accepting {
            return;
        }
        if let Some(session) = self.session.as_mut() {
            if matches!(session.status, SessionStatus::Recording | SessionStatus::Stopped) {
                session.interactions.push(interaction);
            }
        }
    }

    /// Appends an api call to the active session. Same guard as
    /// [`SessionController::record_interaction`].
    pub fn record_api_call(&mut self, call: ApiCall) {
        if !self.accepting {
            return;
        }
        if let Some(session) = self.session.as_mut() {
            if matches!(session.status, SessionStatus::Recording | SessionStatus::Stopped) {
                session.api_calls.push(call);
            }
        }
    }

    /// Pauses ingestion without terminating the surface.
    pub fn pause(&mut self) {
        if let Some(session) = self.session.as_mut() {
            if session.status == SessionStatus::Recording {
                session.status = SessionStatus::Stopped;
                self.accepting = false;
            }
        }
    }

    /// Resumes a paused session.
    pub fn resume(&mut self) {
        if let Some(session) = self.session.as_mut() {
            if session.status == SessionStatus::Stopped {
                session.status = SessionStatus::Recording;
                self.accepting = true;
            }
        }
    }

    /// Finishes recording and hands the session snapshot to synthesis.
    ///
    /// Returns `None` unless the session was recording or paused; calling
    /// twice is harmless. Sets `processing`, stamps the end time, closes
    /// the surface, stops the agent and liveness tasks, and persists.
    pub fn stop(&mut self) -> Option<RecordingSession> {
        let session = self.session.as_mut()?;
        if !matches!(session.status, SessionStatus::Recording | SessionStatus::Stopped) {
            return None;
        }
        session.status = SessionStatus::Processing;
        session.ended_at = Some(self.clock.now());
        self.accepting = false;

        if let Some(mut surface) = self.surface.take() {
            surface.close();
        }
        for task in self.tasks.drain(..) {
            task.abort();
        }

        let snapshot = session.clone();
        self.persist(&snapshot);
        Some(snapshot)
    }

    /// Completes and releases the held session.
    ///
    /// Only valid for the currently held session id; any other id is a
    /// no-op returning `None`. Attaches `test_cases` (empty on a forced
    /// completion), persists, and drops ownership.
    pub fn complete(
        &mut self,
        session_id: &str,
        test_cases: Vec<TestCase>,
    ) -> Option<RecordingSession> {
        if self.session.as_ref().map_or(true, |s| s.id != session_id) {
            return None;
        }
        let mut session = self.session.take()?;
        session.test_cases = test_cases;
        session.status = SessionStatus::Completed;
        if session.ended_at.is_none() {
            session.ended_at = Some(self.clock.now());
        }
        self.persist(&session);
        Some(session)
    }

    fn persist(&self, session: &RecordingSession) {
        if let Err(err) = self.store.save(&StoredEntity::Session(session.clone())) {
            eprintln!("Warning: failed to persist session {}: {err}", session.id);
        }
    }
}

/// Starts a session and wires up the agent, ingest pump, and liveness tasks.
///
/// This is the async entry point commands use; [`SessionController::start`]
/// alone only mutates state.
///
/// # Errors
///
/// Returns [`SessionError::Conflict`] when a session is already held.
pub async fn launch(
    controller: &Arc<Mutex<SessionController>>,
    url: &str,
    user_id: &str,
) -> Result<RecordingSession, SessionError> {
    let (session, conduit, clock, ids) = {
        let mut guard = controller.lock().await;
        let (session, conduit) = guard.start(url, user_id)?;
        (session, conduit, Arc::clone(&guard.clock), Arc::clone(&guard.ids))
    };

    let mut tasks = Vec::new();
    if let Some(conduit) = conduit {
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        let agent = CaptureAgent::new(clock, ids, tx, url);
        tasks.push(tokio::spawn(agent.run(conduit)));
        tasks.push(spawn_ingest(Arc::clone(controller), rx));
    }
    tasks.push(spawn_liveness(Arc::clone(controller)));
    controller.lock().await.tasks.extend(tasks);

    Ok(session)
}

/// Pumps agent messages into the controller until the agent hangs up.
fn spawn_ingest(
    controller: Arc<Mutex<SessionController>>,
    mut rx: mpsc::Receiver<ChannelMessage>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(message) = rx.recv().await {
            let mut guard = controller.lock().await;
            match message {
                ChannelMessage::InteractionRecorded(interaction) => {
                    guard.record_interaction(interaction);
                }
                ChannelMessage::ApiCallRecorded(call) => guard.record_api_call(call),
            }
        }
    })
}

/// Stops the session automatically if the surface closes while recording.
fn spawn_liveness(controller: Arc<Mutex<SessionController>>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut tick = tokio::time::interval(LIVENESS_INTERVAL);
        tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            tick.tick().await;
            let mut guard = controller.lock().await;
            let Some(session) = guard.session.as_ref() else { break };
            match session.status {
                SessionStatus::Recording => {
                    // A surface that never opened is degraded capture, not
                    // a closed surface.
                    if guard.surface.as_ref().is_some_and(|s| !s.is_open()) {
                        guard.stop();
                        break;
                    }
                }
                SessionStatus::Stopped => {}
                SessionStatus::Processing | SessionStatus::Completed => break,
            }
        }
    })
}

/// Runs synthesis under the completion deadline and finalizes the session.
///
/// On success the cases are attached and the session completes. A
/// generation failure leaves the session `processing` so the caller may
/// retry. If the deadline elapses the session is force-completed with no
/// test cases and any in-flight synthesis result is dropped.
///
/// # Errors
///
/// Returns [`SynthesisError`] when the completion service fails.
pub async fn synthesize_and_complete(
    controller: &Arc<Mutex<SessionController>>,
    synthesizer: &TestCaseSynthesizer,
    session: &RecordingSession,
    format: TestFormat,
    specifications: Option<&str>,
) -> Result<Vec<TestCase>, SynthesisError> {
    let outcome = tokio::time::timeout(
        SYNTHESIS_DEADLINE,
        synthesizer.generate(session, format, specifications),
    )
    .await;

    match outcome {
        Ok(Ok(cases)) => {
            controller.lock().await.complete(&session.id, cases.clone());
            Ok(cases)
        }
        Ok(Err(err)) => Err(err),
        Err(_) => {
            eprintln!(
                "Warning: synthesis for session {} exceeded {}s; completing without test cases",
                session.id,
                SYNTHESIS_DEADLINE.as_secs()
            );
            controller.lock().await.complete(&session.id, Vec::new());
            Ok(Vec::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::InteractionKind;
    use chrono::{TimeZone, Utc};
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
    use std::sync::Mutex as StdMutex;

    struct FixedClock;
    impl Clock for FixedClock {
        fn now(&self) -> chrono::DateTime<Utc> {
            Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
        }
    }

    struct SeqIds(AtomicU32);
    impl IdGenerator for SeqIds {
        fn generate_id(&self) -> String {
            format!("id-{}", self.0.fetch_add(1, Ordering::SeqCst))
        }
    }

    #[derive(Default)]
    struct MemoryStore {
        saved: StdMutex<Vec<StoredEntity>>,
    }
    impl SessionStore for MemoryStore {
        fn save(
            &self,
            entity: &StoredEntity,
        ) -> Result<(), Box<dyn Error + Send + Sync>> {
            self.saved.lock().unwrap().push(entity.clone());
            Ok(())
        }
        fn list(
            &self,
            kind: crate::ports::EntityKind,
            owner_id: &str,
        ) -> Result<Vec<StoredEntity>, Box<dyn Error + Send + Sync>> {
            Ok(self
                .saved
                .lock()
                .unwrap()
                .iter()
                .filter(|e| e.kind() == kind && e.owner_id() == owner_id)
                .cloned()
                .collect())
        }
    }

    struct FakeSurface {
        open: Arc<AtomicBool>,
    }
    impl CaptureSurface for FakeSurface {
        fn inject_agent(&mut self) -> Result<AgentConduit, crate::ports::InjectionError> {
            Err(crate::ports::InjectionError("no agent in fake surface".into()))
        }
        fn is_open(&self) -> bool {
            self.open.load(Ordering::SeqCst)
        }
        fn current_url(&self) -> String {
            "https://example.com".into()
        }
        fn close(&mut self) {
            self.open.store(false, Ordering::SeqCst);
        }
    }

    struct FakeHost {
        open: Arc<AtomicBool>,
    }
    impl SurfaceHost for FakeHost {
        fn open(
            &self,
            _url: &str,
        ) -> Result<Box<dyn CaptureSurface>, Box<dyn Error + Send + Sync>> {
            self.open.store(true, Ordering::SeqCst);
            Ok(Box::new(FakeSurface { open: Arc::clone(&self.open) }))
        }
    }

    fn controller() -> (SessionController, Arc<MemoryStore>, Arc<AtomicBool>) {
        let store = Arc::new(MemoryStore::default());
        let open = Arc::new(AtomicBool::new(false));
        let controller = SessionController::new(
            Arc::new(FixedClock),
            Arc::new(SeqIds(AtomicU32::new(0))),
            Arc::clone(&store) as Arc<dyn SessionStore>,
            Arc::new(FakeHost { open: Arc::clone(&open) }),
        );
        (controller, store, open)
    }

    fn click(id: &str) -> Interaction {
        Interaction {
            id: id.into(),
            kind: InteractionKind::Click,
            element_tag: "button".into(),
            selector: "#buy".into(),
            value: None,
            occurred_at: Utc::now(),
            screenshot: None,
        }
    }

    #[test]
    fn start_allocates_recording_session_and_persists() {
        let (mut controller, store, surface_open) = controller();
        let (session, _conduit) = controller.start("https://example.com", "user-1").unwrap();

        assert_eq!(session.status, SessionStatus::Recording);
        assert_eq!(session.target_url, "https://example.com");
        assert!(session.ended_at.is_none());
        assert!(surface_open.load(Ordering::SeqCst));
        assert_eq!(store.saved.lock().unwrap().len(), 1);
    }

    #[test]
    fn second_start_is_a_conflict() {
        let (mut controller, _, _) = controller();
        controller.start("https://example.com", "user-1").unwrap();
        let err = controller.start("https://example.com/other", "user-1").unwrap_err();
        assert_eq!(err, SessionError::Conflict);
    }

    #[test]
    fn start_allowed_again_after_complete() {
        let (mut controller, _, _) = controller();
        let (session, _) = controller.start("https://example.com", "user-1").unwrap();
        controller.stop().unwrap();
        controller.complete(&session.id, Vec::new()).unwrap();
        assert!(controller.start("https://example.com", "user-1").is_ok());
    }

    #[test]
    fn records_append_in_arrival_order() {
        let (mut controller, _, _) = controller();
        controller.start("https://example.com", "user-1").unwrap();
        controller.record_interaction(click("i-1"));
        controller.record_interaction(click("i-2"));
        controller.record_api_call(ApiCall {
            id: "c-1".into(),
            method: "GET".into(),
            url: "https://example.com/api".into(),
            headers: BTreeMap::new(),
            body: None,
            response_body: None,
            status_code: 200,
            occurred_at: Utc::now(),
        });

        let session = controller.session().unwrap();
        let ids: Vec<&str> = session.interactions.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, ["i-1", "i-2"]);
        assert_eq!(session.api_calls.len(), 1);
    }

    #[test]
    fn records_dropped_without_active_session() {
        let (mut controller, _, _) = controller();
        controller.record_interaction(click("i-1"));
        assert!(controller.session().is_none());
    }

    #[test]
    fn records_dropped_after_stop() {
        let (mut controller, _, _) = controller();
        controller.start("https://example.com", "user-1").unwrap();
        controller.stop().unwrap();
        controller.record_interaction(click("late"));
        assert!(controller.session().unwrap().interactions.is_empty());
    }

    #[test]
    fn pause_and_resume_flip_status() {
        let (mut controller, _, _) = controller();
        controller.start("https://example.com", "user-1").unwrap();

        controller.pause();
        assert_eq!(controller.session().unwrap().status, SessionStatus::Stopped);
        controller.record_interaction(click("paused"));
        assert!(controller.session().unwrap().interactions.is_empty());

        controller.resume();
        assert_eq!(controller.session().unwrap().status, SessionStatus::Recording);
        controller.record_interaction(click("resumed"));
        assert_eq!(controller.session().unwrap().interactions.len(), 1);
    }

    #[test]
    fn stop_transitions_to_processing_and_closes_surface() {
        let (mut controller, _, surface_open) = controller();
        controller.start("https://example.com", "user-1").unwrap();

        let snapshot = controller.stop().unwrap();
        assert_eq!(snapshot.status, SessionStatus::Processing);
        assert!(snapshot.ended_at.is_some());
        assert!(!surface_open.load(Ordering::SeqCst));
    }

    #[test]
    fn stop_twice_returns_none_without_panicking() {
        let (mut controller, _, _) = controller();
        controller.start("https://example.com", "user-1").unwrap();
        assert!(controller.stop().is_some());
        assert!(controller.stop().is_none());
    }

    #[test]
    fn stop_without_session_returns_none() {
        let (mut controller, _, _) = controller();
        assert!(controller.stop().is_none());
    }

    #[test]
    fn stop_works_from_paused() {
        let (mut controller, _, _) = controller();
        controller.start("https://example.com", "user-1").unwrap();
        controller.pause();
        let snapshot = controller.stop().unwrap();
        assert_eq!(snapshot.status, SessionStatus::Processing);
    }

    #[test]
    fn complete_requires_matching_id() {
        let (mut controller, _, _) = controller();
        let (session, _) = controller.start("https://example.com", "user-1").unwrap();
        controller.stop().unwrap();

        assert!(controller.complete("someone-else", Vec::new()).is_none());
        assert!(controller.session().is_some());

        let completed = controller.complete(&session.id, Vec::new()).unwrap();
        assert_eq!(completed.status, SessionStatus::Completed);
        assert!(controller.session().is_none());
    }

    #[test]
    fn surface_open_failure_degrades_instead_of_failing() {
        struct ClosedHost;
        impl SurfaceHost for ClosedHost {
            fn open(
                &self,
                _url: &str,
            ) -> Result<Box<dyn CaptureSurface>, Box<dyn Error + Send + Sync>> {
                Err("browser unavailable".into())
            }
        }

        let mut controller = SessionController::new(
            Arc::new(FixedClock),
            Arc::new(SeqIds(AtomicU32::new(0))),
            Arc::new(MemoryStore::default()),
            Arc::new(ClosedHost),
        );
        let (session, conduit) = controller.start("https://example.com", "user-1").unwrap();
        assert_eq!(session.status, SessionStatus::Recording);
        assert!(conduit.is_none());
    }
}
