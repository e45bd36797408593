//! `testloom generate` command: synthesize artifacts from a stored session.

use std::sync::Arc;

use crate::commands::record::emit_artifacts;
use crate::context::ServiceContext;
use crate::model::{RecordingSession, TestFormat};
use crate::ports::{EntityKind, StoredEntity};
use crate::synth::TestCaseSynthesizer;

/// Execute the `generate` command.
///
/// # Errors
///
/// Returns an error string if the session is not found, generation fails,
/// or artifact emission fails.
pub async fn run_with_context(
    ctx: &ServiceContext,
    session_id: &str,
    user: &str,
    format: TestFormat,
    spec: Option<&str>,
) -> Result<(), String> {
    let session = load_session(ctx, session_id, user)?;

    let synthesizer = TestCaseSynthesizer::new(
        Arc::clone(&ctx.llm),
        Arc::clone(&ctx.store),
        Arc::clone(&ctx.clock),
        Arc::clone(&ctx.ids),
    );
    let cases = synthesizer.generate(&session, format, spec).await.map_err(|e| e.to_string())?;
    emit_artifacts(ctx, &cases)
}

fn load_session(
    ctx: &ServiceContext,
    session_id: &str,
    user: &str,
) -> Result<RecordingSession, String> {
    let entities = ctx
        .store
        .list(EntityKind::Session, user)
        .map_err(|e| format!("failed to list sessions: {e}"))?;
    entities
        .into_iter()
        .find_map(|entity| match entity {
            StoredEntity::Session(session) if session.id == session_id => Some(session),
            _ => None,
        })
        .ok_or_else(|| format!("no session '{session_id}' recorded for user '{user}'"))
}
