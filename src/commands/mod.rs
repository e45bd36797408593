//! Command dispatch and handlers.

pub mod generate;
pub mod record;
pub mod sessions;

use crate::cli::Command;
use crate::context::ServiceContext;

/// Dispatch a parsed command to its handler.
///
/// # Errors
///
/// Returns an error string if the selected command handler fails.
pub fn dispatch(command: &Command) -> Result<(), String> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("failed to start async runtime: {e}"))?;
    let ctx = ServiceContext::live();
    runtime.block_on(dispatch_with_context(command, &ctx))
}

/// Dispatch a command with the given service context.
async fn dispatch_with_context(command: &Command, ctx: &ServiceContext) -> Result<(), String> {
    match command {
        Command::Record { url, user, format, duration } => {
            record::run_with_context(ctx, url, user, *format, *duration).await
        }
        Command::Generate { session, user, format, spec } => {
            generate::run_with_context(ctx, session, user, *format, spec.as_deref()).await
        }
        Command::Sessions { user } => sessions::run_with_context(ctx, user),
    }
}
