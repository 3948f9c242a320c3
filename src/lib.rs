//! Cafebot: a retrieval-augmented LINE chat bot for the Coffee Corner
//! cafe.
//!
//! Inbound LINE messages are embedded with a local MiniLM encoder,
//! matched against a Pinecone index of shop knowledge, and answered by an
//! OpenRouter-hosted model grounded in the retrieved documents. The
//! pipeline never fails a message: every error path collapses to a fixed
//! Thai fallback reply with quick-reply chips.
//!
//! Layers follow the hexagonal layout: `domain` holds models, ports, and
//! errors; `services` the pipeline and ingestion flows; `infrastructure`
//! the adapters for LINE, Pinecone, OpenRouter, the encoder, and the HTTP
//! server; `cli` the command surface.

pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

pub use domain::models::{Config, KnowledgeDocument, QuickReply, RagReply, SearchResult};
pub use services::{IngestionService, RagPipeline};
