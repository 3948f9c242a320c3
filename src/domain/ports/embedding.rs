//! Embedding encoder port.

use async_trait::async_trait;

use crate::domain::errors::EmbeddingError;

/// Maps text to a fixed-length dense vector for similarity comparison.
///
/// Deterministic for a fixed model revision: the same text always yields
/// the same vector. Implementations must accept the empty string without
/// failing (it embeds like any other text).
#[async_trait]
pub trait TextEmbedder: Send + Sync {
    /// Output vector length. Must match the index dimension.
    fn dimension(&self) -> usize;

    /// Embed a single text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    /// Embed several texts, preserving input order.
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let mut vectors = Vec::with_capacity(texts.len());
        for text in texts {
            vectors.push(self.embed(text).await?);
        }
        Ok(vectors)
    }
}
