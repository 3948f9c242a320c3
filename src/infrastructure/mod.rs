//! Infrastructure layer: adapters for the external collaborators.

pub mod config;
pub mod embeddings;
pub mod line;
pub mod openrouter;
pub mod pinecone;
pub mod server;
