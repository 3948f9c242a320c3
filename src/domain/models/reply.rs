//! Per-message reply models: search results and the pipeline's answer.

use serde::{Deserialize, Serialize};

/// A suggested quick-reply chip.
///
/// The chip's label and the message text echoed when the user taps it are
/// one and the same string, by contract. Renderers must read both from
/// this single field rather than carrying two copies that could drift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickReply(pub String);

impl QuickReply {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    /// The chip label, and equally the tapped-message payload.
    pub fn text(&self) -> &str {
        &self.0
    }
}

/// One scored match from the vector index, ephemeral and per-query.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub title: String,
    pub content: String,
    /// Cosine similarity against the query embedding.
    pub score: f32,
}

/// The pipeline's answer to a single inbound message. Constructed once,
/// returned to the caller, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RagReply {
    pub reply_text: String,
    pub quick_replies: Vec<QuickReply>,
    /// Cited document titles, capped short for chat UI.
    pub sources: Vec<String>,
}
