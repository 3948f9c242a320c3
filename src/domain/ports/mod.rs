//! Port trait definitions (hexagonal architecture).
//!
//! Each of the three external collaborators is reached through one trait:
//!
//! - `TextEmbedder`: sentence-embedding encoder
//! - `VectorIndex`: hosted nearest-neighbor index
//! - `TextGenerator`: hosted chat-completion API
//!
//! The pipeline depends only on these contracts, so all three services can
//! be replaced with test doubles without process-wide patching.

pub mod embedding;
pub mod generation;
pub mod vector_index;

pub use embedding::TextEmbedder;
pub use generation::TextGenerator;
pub use vector_index::{UpsertRecord, VectorIndex};
