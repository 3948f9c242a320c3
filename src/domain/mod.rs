//! Domain layer for the cafebot RAG pipeline.
//!
//! Pure models, the error taxonomy, and the port traits that
//! infrastructure adapters implement.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{ConfigError, EmbeddingError, GenerationError, RetrievalError};
