//! LINE Messaging API adapter: webhook types, signature verification, and
//! the reply client.

pub mod client;
pub mod signature;
pub mod types;

pub use client::LineClient;
pub use signature::verify_signature;
