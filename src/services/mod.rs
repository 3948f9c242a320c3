//! Service layer: pipeline orchestration and offline ingestion.

pub mod ingestion;
pub mod rag_pipeline;

pub use ingestion::IngestionService;
pub use rag_pipeline::RagPipeline;
