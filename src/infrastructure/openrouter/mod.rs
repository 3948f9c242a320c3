//! OpenRouter chat-completion adapter.

pub mod client;
mod types;

pub use client::OpenRouterClient;
