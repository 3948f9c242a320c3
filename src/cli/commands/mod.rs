//! CLI command implementations.

pub mod chat;
pub mod serve;
pub mod setup;

use std::sync::Arc;
use std::time::Duration;

use crate::domain::models::Config;
use crate::domain::ports::{TextEmbedder, TextGenerator, VectorIndex};
use crate::infrastructure::embeddings::MiniLmEncoder;
use crate::infrastructure::openrouter::OpenRouterClient;
use crate::infrastructure::pinecone::PineconeIndex;
use crate::services::RagPipeline;

/// Load the sentence encoder. Shared by every command; each one needs
/// embeddings before it can do anything else.
fn load_embedder() -> anyhow::Result<Arc<dyn TextEmbedder>> {
    let encoder = MiniLmEncoder::load()?;
    Ok(Arc::new(encoder))
}

/// Returns the concrete client so callers can resolve the data-plane
/// host before erasing to the port type.
fn build_index(config: &Config) -> anyhow::Result<Arc<PineconeIndex>> {
    Ok(Arc::new(PineconeIndex::new(
        config.pinecone_api_key.clone(),
        config.retrieval.index_name.clone(),
        Duration::from_secs(config.retrieval.timeout_secs),
    )?))
}

fn build_generator(config: &Config) -> anyhow::Result<Arc<dyn TextGenerator>> {
    Ok(Arc::new(OpenRouterClient::new(
        config.openrouter_api_key.clone(),
        config.openrouter_model.clone(),
        config.generation.max_tokens,
        config.generation.temperature,
        Duration::from_secs(config.generation.timeout_secs),
    )?))
}

/// Assemble the pipeline around an already-connected index.
fn build_pipeline(config: &Config, index: Arc<dyn VectorIndex>) -> anyhow::Result<Arc<RagPipeline>> {
    let embedder = load_embedder()?;
    let generator = build_generator(config)?;

    Ok(Arc::new(RagPipeline::new(
        embedder,
        index,
        generator,
        config.retrieval.top_k,
    )))
}
