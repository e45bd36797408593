//! `testloom sessions` command: list a user's recorded sessions.

use crate::context::ServiceContext;
use crate::ports::{EntityKind, StoredEntity};

/// Execute the `sessions` command.
///
/// # Errors
///
/// Returns an error string if the store cannot be listed.
pub fn run_with_context(ctx: &ServiceContext, user: &str) -> Result<(), String> {
    let entities = ctx
        .store
        .list(EntityKind::Session, user)
        .map_err(|e| format!("failed to list sessions: {e}"))?;

    if entities.is_empty() {
        println!("No sessions found for user '{user}'");
        return Ok(());
    }

    for entity in entities {
        if let StoredEntity::Session(session) = entity {
            println!(
                "{}  {:?}  {}  ({} interactions, {} api calls)",
                session.id,
                session.status,
                session.target_url,
                session.interactions.len(),
                session.api_calls.len()
            );
        }
    }
    Ok(())
}
