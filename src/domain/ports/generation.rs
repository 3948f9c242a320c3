//! Chat-completion port.

use async_trait::async_trait;

use crate::domain::errors::GenerationError;

/// Hosted chat-completion API.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate text from a prompt. One attempt per call with a hard
    /// timeout; no automatic retries, so per-message latency stays
    /// bounded. A 2xx response with an empty completion is `Ok("")` — the
    /// caller owns the empty-completion fallback.
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}
