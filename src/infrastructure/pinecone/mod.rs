//! Pinecone vector index adapter.

pub mod client;
mod types;

pub use client::PineconeIndex;
