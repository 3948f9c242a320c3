//! MiniLM sentence encoder on candle.
//!
//! Follows the sentence-transformers recipe for
//! `all-MiniLM-L6-v2` (384-dim): tokenize with padding/truncation, BERT
//! forward pass, attention-mask mean pooling, L2 normalization. Weights
//! and tokenizer come from the HuggingFace hub and are cached locally, so
//! only the first startup needs network access.

use std::sync::Arc;

use async_trait::async_trait;
use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config as BertConfig};
use tokenizers::{PaddingParams, PaddingStrategy, Tokenizer, TruncationParams};

use crate::domain::errors::EmbeddingError;
use crate::domain::ports::TextEmbedder;

/// HuggingFace repo the encoder loads from.
const MODEL_REPO: &str = "sentence-transformers/all-MiniLM-L6-v2";

/// Output dimension of the MiniLM model.
pub const EMBEDDING_DIMENSION: usize = 384;

/// The sentence encoder. Loaded once at startup, then shared across
/// requests; inference runs on the blocking thread pool.
pub struct MiniLmEncoder {
    inner: Arc<EncoderInner>,
}

struct EncoderInner {
    model: BertModel,
    tokenizer: Tokenizer,
    device: Device,
    max_seq_length: usize,
}

impl MiniLmEncoder {
    /// Load tokenizer, config, and weights. Any failure here is
    /// `ModelUnavailable` and must abort startup; the encoder is never
    /// loaded per-request.
    pub fn load() -> Result<Self, EmbeddingError> {
        let device = Device::Cpu;

        tracing::info!("loading sentence encoder {MODEL_REPO}");

        let api = hf_hub::api::sync::Api::new().map_err(unavailable)?;
        let repo = api.model(MODEL_REPO.to_string());

        let tokenizer_path = repo.get("tokenizer.json").map_err(unavailable)?;
        let config_path = repo.get("config.json").map_err(unavailable)?;
        let weights_path = repo.get("model.safetensors").map_err(unavailable)?;

        let config_file = std::fs::File::open(&config_path).map_err(unavailable)?;
        let config: BertConfig = serde_json::from_reader(config_file).map_err(unavailable)?;

        if config.hidden_size != EMBEDDING_DIMENSION {
            return Err(EmbeddingError::ModelUnavailable(format!(
                "model dimension mismatch: expected {EMBEDDING_DIMENSION}, config says {}",
                config.hidden_size
            )));
        }

        let mut tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|err| EmbeddingError::ModelUnavailable(err.to_string()))?;

        // Configure padding/truncation once; every encode call reuses it.
        tokenizer.with_padding(Some(PaddingParams {
            strategy: PaddingStrategy::BatchLongest,
            ..PaddingParams::default()
        }));
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: config.max_position_embeddings,
                ..TruncationParams::default()
            }))
            .map_err(|err| EmbeddingError::ModelUnavailable(err.to_string()))?;

        let vb = Self::load_weights(&weights_path, &device)?;
        let model = BertModel::load(vb, &config)
            .map_err(|err| EmbeddingError::ModelUnavailable(err.to_string()))?;

        tracing::info!(
            "sentence encoder ready: {} dims, max sequence {}",
            config.hidden_size,
            config.max_position_embeddings
        );

        Ok(Self {
            inner: Arc::new(EncoderInner {
                model,
                tokenizer,
                device,
                max_seq_length: config.max_position_embeddings,
            }),
        })
    }

    // Memory-mapped safetensors load; the file stays valid for the
    // lifetime of the process.
    #[allow(unsafe_code)]
    fn load_weights(
        weights_path: &std::path::Path,
        device: &Device,
    ) -> Result<VarBuilder<'static>, EmbeddingError> {
        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[weights_path], DType::F32, device)
                .map_err(|err| EmbeddingError::ModelUnavailable(err.to_string()))?
        };
        Ok(vb)
    }

    /// Maximum token sequence length accepted by the model.
    pub fn max_seq_length(&self) -> usize {
        self.inner.max_seq_length
    }
}

fn unavailable(err: impl std::fmt::Display) -> EmbeddingError {
    EmbeddingError::ModelUnavailable(err.to_string())
}

fn inference(err: impl std::fmt::Display) -> EmbeddingError {
    EmbeddingError::Inference(err.to_string())
}

impl EncoderInner {
    /// Synchronous encode: tokenize → forward → mean pool → normalize.
    fn encode_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let (input_ids, attention_mask) = self.tokenize(texts)?;
        let token_type_ids = Tensor::zeros_like(&input_ids).map_err(inference)?;

        // The mask goes into attention too, not just pooling: padded
        // positions must not influence the other tokens' representations,
        // or a text's batch embedding drifts from its solo embedding.
        let hidden_states = self
            .model
            .forward(&input_ids, &token_type_ids, Some(&attention_mask))
            .map_err(inference)?;

        let pooled = mean_pool(&hidden_states, &attention_mask).map_err(inference)?;
        let normalized = normalize_l2(&pooled).map_err(inference)?;

        tensor_to_rows(&normalized).map_err(inference)
    }

    /// Tokenize with batch-longest padding. Special tokens are always
    /// added, so even the empty string yields a non-empty sequence.
    fn tokenize(&self, texts: &[&str]) -> Result<(Tensor, Tensor), EmbeddingError> {
        let encodings = self
            .tokenizer
            .encode_batch(texts.to_vec(), true)
            .map_err(|err| EmbeddingError::Inference(err.to_string()))?;

        let batch_size = encodings.len();
        let seq_len = encodings[0].get_ids().len();

        let input_ids: Vec<u32> = encodings
            .iter()
            .flat_map(|enc| enc.get_ids().iter().copied())
            .collect();
        let attention_mask: Vec<u32> = encodings
            .iter()
            .flat_map(|enc| enc.get_attention_mask().iter().copied())
            .collect();

        let input_ids = Tensor::from_vec(input_ids, (batch_size, seq_len), &self.device)
            .map_err(inference)?;
        let attention_mask =
            Tensor::from_vec(attention_mask, (batch_size, seq_len), &self.device)
                .map_err(inference)?
                .to_dtype(DType::F32)
                .map_err(inference)?;

        Ok((input_ids, attention_mask))
    }
}

/// Mean pooling weighted by the attention mask, so padding tokens do not
/// dilute the sentence vector.
fn mean_pool(hidden_states: &Tensor, attention_mask: &Tensor) -> candle_core::Result<Tensor> {
    // hidden_states: (batch, seq, hidden); attention_mask: (batch, seq)
    let mask = attention_mask
        .unsqueeze(2)?
        .broadcast_as(hidden_states.shape())?;

    let summed = hidden_states.mul(&mask)?.sum(1)?;
    let counts = mask.sum(1)?.clamp(1e-9, f32::MAX)?;

    summed.div(&counts)
}

/// L2-normalize each row to a unit vector so cosine similarity reduces to
/// a dot product, which is what the index's cosine metric expects.
fn normalize_l2(embeddings: &Tensor) -> candle_core::Result<Tensor> {
    let norms = embeddings.sqr()?.sum_keepdim(1)?.sqrt()?.clamp(1e-12, f32::MAX)?;
    embeddings.broadcast_div(&norms)
}

fn tensor_to_rows(tensor: &Tensor) -> candle_core::Result<Vec<Vec<f32>>> {
    tensor.to_dtype(DType::F32)?.to_vec2()
}

#[async_trait]
impl TextEmbedder for MiniLmEncoder {
    fn dimension(&self) -> usize {
        EMBEDDING_DIMENSION
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let inner = Arc::clone(&self.inner);
        let text = text.to_string();

        let mut rows = tokio::task::spawn_blocking(move || inner.encode_batch(&[&text]))
            .await
            .map_err(inference)??;

        rows.pop()
            .ok_or_else(|| EmbeddingError::Inference("empty encoder output".to_string()))
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let inner = Arc::clone(&self.inner);
        let owned: Vec<String> = texts.iter().map(ToString::to_string).collect();

        tokio::task::spawn_blocking(move || {
            let refs: Vec<&str> = owned.iter().map(String::as_str).collect();
            inner.encode_batch(&refs)
        })
        .await
        .map_err(inference)?
    }
}
