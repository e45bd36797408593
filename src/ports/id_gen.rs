//! ID generator port for producing unique identifiers.

/// Generates unique identifiers for sessions, records, and test cases.
///
/// Abstracting ID generation allows tests to substitute a predictable
/// sequence.
pub trait IdGenerator: Send + Sync {
    /// Generates a new unique identifier string.
    fn generate_id(&self) -> String;
}
