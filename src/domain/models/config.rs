//! Process configuration, populated once at startup and never mutated.

use serde::{Deserialize, Serialize};

/// Top-level configuration.
///
/// The four secret fields map 1:1 onto required environment variables
/// (`PINECONE_API_KEY`, `OPENROUTER_API_KEY`, `LINE_CHANNEL_ACCESS_TOKEN`,
/// `LINE_CHANNEL_SECRET`); `openrouter_model` is the one optional
/// override. Everything else has defaults and is tunable through
/// `CAFEBOT_*` variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub pinecone_api_key: String,
    pub openrouter_api_key: String,
    pub line_channel_access_token: String,
    pub line_channel_secret: String,
    pub openrouter_model: String,
    pub server: ServerConfig,
    pub retrieval: RetrievalConfig,
    pub generation: GenerationConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pinecone_api_key: String::new(),
            openrouter_api_key: String::new(),
            line_channel_access_token: String::new(),
            line_channel_secret: String::new(),
            openrouter_model: "deepseek/deepseek-chat-v3.1:free".to_string(),
            server: ServerConfig::default(),
            retrieval: RetrievalConfig::default(),
            generation: GenerationConfig::default(),
        }
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

/// Vector index settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    pub index_name: String,
    /// Must match the embedding model's output dimension.
    pub dimension: usize,
    /// Bounded to keep prompt size bounded, not for throughput.
    pub top_k: usize,
    pub timeout_secs: u64,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            index_name: "cafe-line-bot".to_string(),
            dimension: 384,
            top_k: 4,
            timeout_secs: 10,
        }
    }
}

/// Completion API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout_secs: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_tokens: 1000,
            temperature: 0.3,
            timeout_secs: 30,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(config.pinecone_api_key.is_empty());
        assert_eq!(config.openrouter_model, "deepseek/deepseek-chat-v3.1:free");
        assert_eq!(config.retrieval.index_name, "cafe-line-bot");
        assert_eq!(config.retrieval.dimension, 384);
        assert_eq!(config.retrieval.top_k, 4);
        assert_eq!(config.generation.max_tokens, 1000);
        assert!((config.generation.temperature - 0.3).abs() < f32::EPSILON);
        assert_eq!(config.server.port, 8000);
    }
}
