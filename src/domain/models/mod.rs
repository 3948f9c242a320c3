//! Domain models.

pub mod config;
pub mod document;
pub mod reply;

pub use config::{Config, GenerationConfig, RetrievalConfig, ServerConfig};
pub use document::KnowledgeDocument;
pub use reply::{QuickReply, RagReply, SearchResult};
