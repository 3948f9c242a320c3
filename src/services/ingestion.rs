//! Offline index provisioning and document import.
//!
//! Runs out-of-band from the serving path (`cafebot setup`). Reads a JSON
//! array of knowledge records, embeds each one, and upserts into the
//! vector index under deterministic positional keys, so re-running the
//! import overwrites in place instead of duplicating.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::domain::models::KnowledgeDocument;
use crate::domain::ports::{TextEmbedder, UpsertRecord, VectorIndex};

/// Batch size for embedding during import.
const EMBED_BATCH: usize = 32;

/// One-time setup flow: ensure the index exists, then import documents.
pub struct IngestionService {
    embedder: Arc<dyn TextEmbedder>,
    index: Arc<dyn VectorIndex>,
}

impl IngestionService {
    pub fn new(embedder: Arc<dyn TextEmbedder>, index: Arc<dyn VectorIndex>) -> Self {
        Self { embedder, index }
    }

    /// Provision the index and import every record from `data_path`.
    /// Returns the number of documents uploaded.
    pub async fn run(&self, data_path: &Path) -> Result<usize> {
        self.index
            .ensure_index(self.embedder.dimension())
            .await
            .context("failed to provision vector index")?;

        let documents = Self::read_documents(data_path)?;

        tracing::info!(
            "importing {} documents from {}",
            documents.len(),
            data_path.display()
        );

        let mut records = Vec::with_capacity(documents.len());
        for (chunk_idx, chunk) in documents.chunks(EMBED_BATCH).enumerate() {
            let texts: Vec<String> = chunk
                .iter()
                .map(KnowledgeDocument::embedding_text)
                .collect();
            let text_refs: Vec<&str> = texts.iter().map(String::as_str).collect();

            let vectors = self
                .embedder
                .embed_batch(&text_refs)
                .await
                .context("failed to embed documents")?;

            for (offset, (document, values)) in chunk.iter().zip(vectors).enumerate() {
                let position = chunk_idx * EMBED_BATCH + offset;
                records.push(UpsertRecord {
                    id: format!("cafe_{position}"),
                    values,
                    document: document.clone(),
                });
            }
        }

        self.index
            .upsert(&records)
            .await
            .context("failed to upsert documents")?;

        tracing::info!("uploaded {} documents", records.len());

        Ok(records.len())
    }

    /// Post-import smoke check: run a handful of queries and report the
    /// best-matching title for each.
    pub async fn verify(&self, queries: &[&str]) -> Result<()> {
        for query in queries {
            let vector = self
                .embedder
                .embed(query)
                .await
                .context("failed to embed verification query")?;

            match self.index.query(&vector, 1).await {
                Ok(results) => match results.first() {
                    Some(result) => {
                        tracing::info!("query '{}' matched '{}'", query, result.title);
                    }
                    None => tracing::warn!("query '{}' matched nothing", query),
                },
                Err(err) => tracing::warn!("verification query '{}' failed: {}", query, err),
            }
        }
        Ok(())
    }

    fn read_documents(data_path: &Path) -> Result<Vec<KnowledgeDocument>> {
        let raw = std::fs::read_to_string(data_path)
            .with_context(|| format!("failed to read {}", data_path.display()))?;
        let documents: Vec<KnowledgeDocument> = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse {}", data_path.display()))?;
        Ok(documents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_read_documents_parses_json_array() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"title": "เมนูลาเต้", "content": "45 บาท", "type": "menu"}}]"#
        )
        .unwrap();
        file.flush().unwrap();

        let documents = IngestionService::read_documents(file.path()).unwrap();
        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0].title, "เมนูลาเต้");
        assert_eq!(documents[0].doc_type.as_deref(), Some("menu"));
    }

    #[test]
    fn test_read_documents_rejects_malformed_json() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        file.flush().unwrap();

        assert!(IngestionService::read_documents(file.path()).is_err());
    }
}
