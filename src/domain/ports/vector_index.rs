//! Vector index port.

use async_trait::async_trait;

use crate::domain::errors::RetrievalError;
use crate::domain::models::{KnowledgeDocument, SearchResult};

/// A record queued for upsert: opaque index key, embedding, and the
/// document carried as metadata.
#[derive(Debug, Clone)]
pub struct UpsertRecord {
    pub id: String,
    pub values: Vec<f32>,
    pub document: KnowledgeDocument,
}

/// Hosted nearest-neighbor index over document embeddings.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Similarity query, ordered by descending score, at most `top_k`
    /// results. Zero matches is `Ok(vec![])`, never an error; only
    /// transport and auth failures surface as `RetrievalError`.
    async fn query(
        &self,
        vector: &[f32],
        top_k: usize,
    ) -> Result<Vec<SearchResult>, RetrievalError>;

    /// Bulk upsert, idempotent per id. Setup flow only, never the serving
    /// path.
    async fn upsert(&self, records: &[UpsertRecord]) -> Result<(), RetrievalError>;

    /// Create the index if it does not exist; safe to call repeatedly.
    async fn ensure_index(&self, dimension: usize) -> Result<(), RetrievalError>;
}
