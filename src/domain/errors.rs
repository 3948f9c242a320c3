//! Error taxonomy for the cafebot system.
//!
//! Two classes: fatal startup errors (`ConfigError`, and
//! `EmbeddingError::ModelUnavailable`) abort the process before the
//! listener binds; everything else is recoverable and collapses to one of
//! the pipeline's fixed fallback replies without ever crossing the
//! pipeline boundary.

use thiserror::Error;

/// Startup configuration errors. Fatal: the process must not serve
/// traffic while any of these hold.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variables: {}", .0.join(", "))]
    MissingEnv(Vec<String>),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Embedding encoder errors.
#[derive(Debug, Error)]
pub enum EmbeddingError {
    /// Model weights or tokenizer could not be loaded. The encoder is
    /// loaded once at startup, so this is fatal, never per-request.
    #[error("embedding model unavailable: {0}")]
    ModelUnavailable(String),

    /// Inference failed for a single request.
    #[error("embedding inference failed: {0}")]
    Inference(String),
}

/// Vector index transport errors. The pipeline treats these as "no
/// documents found" rather than failing the message.
#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("vector index request failed: {0}")]
    Network(String),

    #[error("vector index returned {status}: {body}")]
    Http { status: u16, body: String },

    #[error("malformed vector index response: {0}")]
    MalformedResponse(String),
}

/// Completion API errors. The pipeline substitutes a fixed fallback reply
/// and keeps the retrieved sources.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("completion request timed out")]
    Timeout,

    #[error("completion request failed: {0}")]
    Network(String),

    #[error("completion API returned {status}: {body}")]
    Http { status: u16, body: String },

    #[error("malformed completion response: {0}")]
    MalformedResponse(String),
}
