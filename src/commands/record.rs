//! `testloom record` command: full capture → synthesis → export pipeline.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;

use crate::context::ServiceContext;
use crate::model::{SessionStatus, TestCase, TestFormat};
use crate::render;
use crate::session::{self, SessionController};
use crate::synth::TestCaseSynthesizer;

/// Poll interval for noticing that recording has ended on its own.
const STATUS_POLL: Duration = Duration::from_millis(500);

/// Execute the `record` command.
///
/// Records until the surface closes or `duration` seconds elapse, then
/// synthesizes test cases and emits the rendered artifacts.
///
/// # Errors
///
/// Returns an error string if a session is already active, the completion
/// service fails, or artifact emission fails.
pub async fn run_with_context(
    ctx: &ServiceContext,
    url: &str,
    user: &str,
    format: TestFormat,
    duration: u64,
) -> Result<(), String> {
    let controller = Arc::new(Mutex::new(SessionController::new(
        Arc::clone(&ctx.clock),
        Arc::clone(&ctx.ids),
        Arc::clone(&ctx.store),
        Arc::clone(&ctx.host),
    )));

    let started = session::launch(&controller, url, user).await.map_err(|e| e.to_string())?;
    println!("Recording session {} on {url}", started.id);

    wait_for_end(&controller, duration).await;

    let snapshot = {
        let mut guard = controller.lock().await;
        // The liveness watcher may have stopped the session already.
        match guard.stop() {
            Some(snapshot) => Some(snapshot),
            None => guard.session().cloned(),
        }
    }
    .ok_or("recording ended without a session snapshot")?;

    println!(
        "Captured {} interactions and {} api calls in {}s",
        snapshot.interactions.len(),
        snapshot.api_calls.len(),
        snapshot.duration_secs()
    );

    let synthesizer = TestCaseSynthesizer::new(
        Arc::clone(&ctx.llm),
        Arc::clone(&ctx.store),
        Arc::clone(&ctx.clock),
        Arc::clone(&ctx.ids),
    );
    let cases =
        session::synthesize_and_complete(&controller, &synthesizer, &snapshot, format, None)
            .await
            .map_err(|e| e.to_string())?;

    if cases.is_empty() {
        println!("Synthesis timed out; session {} completed without test cases", snapshot.id);
        return Ok(());
    }
    emit_artifacts(ctx, &cases)
}

/// Waits until the session leaves the recording/paused states or the
/// duration budget elapses.
async fn wait_for_end(controller: &Arc<Mutex<SessionController>>, duration: u64) {
    let deadline = tokio::time::sleep(Duration::from_secs(duration));
    tokio::pin!(deadline);
    let mut tick = tokio::time::interval(STATUS_POLL);
    loop {
        tokio::select! {
            () = &mut deadline => break,
            _ = tick.tick() => {
                let guard = controller.lock().await;
                let still_recording = guard.session().map_or(false, |s| {
                    matches!(s.status, SessionStatus::Recording | SessionStatus::Stopped)
                });
                if !still_recording {
                    break;
                }
            }
        }
    }
}

/// Emits one artifact per case, or a delimited bundle for multiple cases.
pub(crate) fn emit_artifacts(ctx: &ServiceContext, cases: &[TestCase]) -> Result<(), String> {
    if let [case] = cases {
        let rendered = render::render(case);
        let filename = render::artifact_filename(&case.title, case.format);
        ctx.sink
            .emit(rendered.as_bytes(), &filename, "text/plain")
            .map_err(|e| format!("failed to emit {filename}: {e}"))?;
    } else {
        let bundle = render::export_bundle(cases);
        ctx.sink
            .emit(bundle.content.as_bytes(), &bundle.filename, bundle.mime_type)
            .map_err(|e| format!("failed to emit {}: {e}", bundle.filename))?;
    }
    println!("Emitted {} test case(s)", cases.len());
    Ok(())
}
