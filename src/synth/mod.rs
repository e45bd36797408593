//! Test-case synthesis: prompt → completion service → structured cases.

pub mod parse;
pub mod prompt;

use std::error::Error;
use std::fmt;
use std::sync::Arc;

use crate::model::{RecordingSession, TestCase, TestFormat, TestStep};
use crate::ports::{
    Clock, CompletionClient, CompletionRequest, IdGenerator, SessionStore, StoredEntity,
};
use parse::{parse_test_cases, quoted_tokens, ParsedCase};

/// Model used for synthesis completions.
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";

/// Upper bound on generated output length.
pub const MAX_OUTPUT_TOKENS: u32 = 4096;

/// Title of the fallback case produced for unparseable output.
pub const FALLBACK_TITLE: &str = "Generated Test Case";

/// Errors surfaced from synthesis.
#[derive(Debug)]
pub enum SynthesisError {
    /// The completion service failed; the session stays `processing` and
    /// synthesis may be retried.
    Generation(Box<dyn Error + Send + Sync>),
}

impl fmt::Display for SynthesisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Generation(source) => write!(f, "completion service failed: {source}"),
        }
    }
}

impl Error for SynthesisError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Generation(source) => Some(source.as_ref()),
        }
    }
}

/// Converts a finished recording into structured test cases.
///
/// Parsing irregularities never propagate: once completion text is
/// obtained, `generate` returns at least one case.
pub struct TestCaseSynthesizer {
    llm: Arc<dyn CompletionClient>,
    store: Arc<dyn SessionStore>,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
}

impl TestCaseSynthesizer {
    /// Creates a synthesizer over the given ports.
    #[must_use]
    pub fn new(
        llm: Arc<dyn CompletionClient>,
        store: Arc<dyn SessionStore>,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        Self { llm, store, clock, ids }
    }

    /// Generates test cases for a stopped session.
    ///
    /// Persistence of produced cases is fire and forget: a store failure is
    /// logged and the cases are returned regardless.
    ///
    /// # Errors
    ///
    /// Returns [`SynthesisError::Generation`] when the completion call
    /// fails. Session state is untouched by that failure.
    pub async fn generate(
        &self,
        session: &RecordingSession,
        format: TestFormat,
        specifications: Option<&str>,
    ) -> Result<Vec<TestCase>, SynthesisError> {
        let request = CompletionRequest {
            model: DEFAULT_MODEL.into(),
            prompt: prompt::build_prompt(session, format, specifications),
            max_tokens: MAX_OUTPUT_TOKENS,
        };
        let response =
            self.llm.complete(&request).await.map_err(SynthesisError::Generation)?;

        let parsed = parse_test_cases(&response.text);
        let cases = if parsed.is_empty() {
            eprintln!(
                "Warning: generated output for session {} had no recognizable sections; keeping it verbatim",
                session.id
            );
            vec![self.fallback_case(session, format, &response.text)]
        } else {
            parsed.into_iter().map(|case| self.structured_case(session, format, case)).collect()
        };

        for case in &cases {
            if let Err(err) = self.store.save(&StoredEntity::TestCase(case.clone())) {
                eprintln!("Warning: failed to persist test case {}: {err}", case.id);
            }
        }

        Ok(cases)
    }

    fn structured_case(
        &self,
        session: &RecordingSession,
        format: TestFormat,
        parsed: ParsedCase,
    ) -> TestCase {
        let steps = parsed.steps.iter().map(|action| self.step(action)).collect();
        TestCase {
            id: self.ids.generate_id(),
            session_id: session.id.clone(),
            title: parsed.title,
            description: parsed.description,
            steps,
            format,
            content: parsed.body,
            created_at: self.clock.now(),
        }
    }

    fn fallback_case(
        &self,
        session: &RecordingSession,
        format: TestFormat,
        raw: &str,
    ) -> TestCase {
        TestCase {
            id: self.ids.generate_id(),
            session_id: session.id.clone(),
            title: FALLBACK_TITLE.into(),
            description: "Automatically generated from the recorded session".into(),
            steps: Vec::new(),
            format,
            content: raw.to_string(),
            created_at: self.clock.now(),
        }
    }

    fn step(&self, action: &str) -> TestStep {
        let quoted = quoted_tokens(action);
        let target = quoted
            .iter()
            .find(|t| t.starts_with('#') || t.starts_with('.'))
            .map(|t| (*t).to_string());
        let value = quoted
            .iter()
            .find(|t| !t.starts_with('#') && !t.starts_with('.'))
            .map(|t| (*t).to_string());
        let expected = action
            .to_lowercase()
            .starts_with("then ")
            .then(|| action[5..].trim().to_string());

        TestStep { id: self.ids.generate_id(), action: action.to_string(), target, value, expected }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SessionStatus;
    use crate::ports::llm::{CompletionFuture, CompletionResponse};
    use crate::ports::EntityKind;
    use chrono::{TimeZone, Utc};
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

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

    struct ScriptedLlm(&'static str);
    impl CompletionClient for ScriptedLlm {
        fn complete(&self, _request: &CompletionRequest) -> CompletionFuture<'_> {
            let text = self.0.to_string();
            Box::pin(async move { Ok(CompletionResponse { text }) })
        }
    }

    struct FailingLlm;
    impl CompletionClient for FailingLlm {
        fn complete(&self, _request: &CompletionRequest) -> CompletionFuture<'_> {
            Box::pin(async { Err("completion timed out".into()) })
        }
    }

    #[derive(Default)]
    struct MemoryStore {
        saved: Mutex<Vec<StoredEntity>>,
        fail: bool,
    }
    impl SessionStore for MemoryStore {
        fn save(&self, entity: &StoredEntity) -> Result<(), Box<dyn Error + Send + Sync>> {
            if self.fail {
                return Err("store offline".into());
            }
            self.saved.lock().unwrap().push(entity.clone());
            Ok(())
        }
        fn list(
            &self,
            _kind: EntityKind,
            _owner_id: &str,
        ) -> Result<Vec<StoredEntity>, Box<dyn Error + Send + Sync>> {
            Ok(self.saved.lock().unwrap().clone())
        }
    }

    fn session() -> RecordingSession {
        let started = Utc.with_ymd_and_hms(2024, 6, 1, 11, 58, 0).unwrap();
        RecordingSession {
            id: "s-1".into(),
            user_id: "u-1".into(),
            target_url: "https://example.com".into(),
            status: SessionStatus::Processing,
            started_at: started,
            ended_at: Some(started + chrono::Duration::seconds(120)),
            interactions: Vec::new(),
            api_calls: Vec::new(),
            test_cases: Vec::new(),
        }
    }

    fn synthesizer(llm: Arc<dyn CompletionClient>, store: Arc<MemoryStore>) -> TestCaseSynthesizer {
        TestCaseSynthesizer::new(
            llm,
            store,
            Arc::new(FixedClock),
            Arc::new(SeqIds(AtomicU32::new(0))),
        )
    }

    const WELL_FORMED: &str = "\
Test Case 1: Purchase flow
Description: covers the buy button
1. Navigate to https://example.com
2. Click on \"#buy\"
Then the cart updates

Test Case 2: Quantity entry
Description: covers the quantity field
- Enter \"42\" into \"#qty\"
";

    #[tokio::test]
    async fn parses_structured_cases_with_steps() {
        let store = Arc::new(MemoryStore::default());
        let synth = synthesizer(Arc::new(ScriptedLlm(WELL_FORMED)), Arc::clone(&store));

        let cases = synth.generate(&session(), TestFormat::Gherkin, None).await.unwrap();
        assert_eq!(cases.len(), 2);
        assert_eq!(cases[0].title, "Purchase flow");
        assert_eq!(cases[0].steps.len(), 3);
        assert_eq!(cases[0].steps[1].target.as_deref(), Some("#buy"));
        assert_eq!(cases[1].steps[0].target.as_deref(), Some("#qty"));
        assert_eq!(cases[1].steps[0].value.as_deref(), Some("42"));
    }

    #[tokio::test]
    async fn unparseable_output_degrades_to_single_fallback() {
        let store = Arc::new(MemoryStore::default());
        let raw = "I could not derive tests, sorry.";
        let synth = synthesizer(Arc::new(ScriptedLlm(raw)), Arc::clone(&store));

        let cases = synth.generate(&session(), TestFormat::Pytest, None).await.unwrap();
        assert_eq!(cases.len(), 1);
        assert_eq!(cases[0].title, FALLBACK_TITLE);
        assert_eq!(cases[0].content, raw);
        assert!(cases[0].steps.is_empty());
    }

    #[tokio::test]
    async fn completion_failure_surfaces_generation_error() {
        let store = Arc::new(MemoryStore::default());
        let synth = synthesizer(Arc::new(FailingLlm), Arc::clone(&store));

        let err = synth.generate(&session(), TestFormat::Pytest, None).await.unwrap_err();
        assert!(matches!(err, SynthesisError::Generation(_)));
        assert!(store.saved.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn cases_are_persisted_fire_and_forget() {
        let store = Arc::new(MemoryStore::default());
        let synth = synthesizer(Arc::new(ScriptedLlm(WELL_FORMED)), Arc::clone(&store));
        synth.generate(&session(), TestFormat::Gherkin, None).await.unwrap();
        assert_eq!(store.saved.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn store_failure_does_not_fail_generation() {
        let store = Arc::new(MemoryStore { saved: Mutex::new(Vec::new()), fail: true });
        let synth = synthesizer(Arc::new(ScriptedLlm(WELL_FORMED)), store);
        let cases = synth.generate(&session(), TestFormat::Gherkin, None).await.unwrap();
        assert_eq!(cases.len(), 2);
    }

    #[tokio::test]
    async fn then_steps_carry_expected_outcome() {
        let store = Arc::new(MemoryStore::default());
        let synth = synthesizer(Arc::new(ScriptedLlm(WELL_FORMED)), store);
        let cases = synth.generate(&session(), TestFormat::Gherkin, None).await.unwrap();
        assert_eq!(cases[0].steps[2].expected.as_deref(), Some("the cart updates"));
    }
}
