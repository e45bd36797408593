//! Completion-service port for generative text.
//!
//! The synthesizer treats the backend as an opaque `complete(prompt) → text`
//! service over unreliable network I/O; failures surface to callers as
//! [`crate::synth::SynthesisError::Generation`].

use std::error::Error;
use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

/// Boxed future type alias used by [`CompletionClient`] to keep the trait
/// dyn-compatible.
pub type CompletionFuture<'a> = Pin<
    Box<dyn Future<Output = Result<CompletionResponse, Box<dyn Error + Send + Sync>>> + Send + 'a>,
>;

/// A request to generate a completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// The model identifier (e.g. `"claude-sonnet-4-20250514"`).
    pub model: String,
    /// The prompt to send.
    pub prompt: String,
    /// Upper bound on generated output length.
    pub max_tokens: u32,
}

/// The response from a completion call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    /// The generated text.
    pub text: String,
}

/// Sends completion requests to a generative text backend.
pub trait CompletionClient: Send + Sync {
    /// Generates a completion for the given request.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails (network, auth, rate-limit,
    /// timeout).
    fn complete(&self, request: &CompletionRequest) -> CompletionFuture<'_>;
}
