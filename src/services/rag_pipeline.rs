//! The RAG pipeline: retrieve → augment → generate.
//!
//! `process_message` is the entire public surface of the core. Its
//! contract: it never returns an error and never produces an empty reply.
//! Every failure mode collapses to one of three fixed Thai fallback
//! replies (no knowledge, degraded generation, pipeline error), each with
//! its own quick-reply menu, so the user always gets *some* response.

use std::sync::Arc;

use crate::domain::errors::EmbeddingError;
use crate::domain::models::{QuickReply, RagReply, SearchResult};
use crate::domain::ports::{TextEmbedder, TextGenerator, VectorIndex};

/// Reply when retrieval finds nothing relevant.
pub const NO_KNOWLEDGE_REPLY: &str =
    "ขออภัยค่ะ ไม่พบข้อมูล กรุณาติดต่อร้าน LINE @coffeecorner ค่ะ 📞";

/// Reply when the completion API times out or errors.
pub const GENERATION_DEGRADED_REPLY: &str = "ขออภัยค่ะ ระบบมีปัญหา กรุณาลองใหม่ค่ะ 🙏";

/// Reply when the completion API answers 2xx with a blank completion.
pub const EMPTY_GENERATION_REPLY: &str = "ขออภัยค่ะ ไม่สามารถตอบได้ กรุณาติดต่อร้านค่ะ 📞";

/// Reply when anything else inside the pipeline fails unexpectedly.
pub const PIPELINE_ERROR_REPLY: &str = "ขออภัยค่ะ เกิดข้อผิดพลาด กรุณาลองใหม่ค่ะ 🙏";

/// Cited source titles are truncated to keep the chat UI citation short.
const MAX_CITED_SOURCES: usize = 2;

fn no_knowledge_menu() -> Vec<QuickReply> {
    vec![
        QuickReply::new("☕ เมนูเครื่องดื่ม"),
        QuickReply::new("🕐 เวลาเปิด-ปิด"),
    ]
}

fn error_menu() -> Vec<QuickReply> {
    vec![QuickReply::new("☕ เมนู"), QuickReply::new("📞 ติดต่อร้าน")]
}

fn full_menu() -> Vec<QuickReply> {
    vec![
        QuickReply::new("☕ เมนูเครื่องดื่ม"),
        QuickReply::new("🍕 เมนูอาหาร"),
        QuickReply::new("🕐 เวลาเปิด-ปิด"),
        QuickReply::new("📍 ที่อยู่"),
    ]
}

/// Build the grounded prompt: fixed persona/rules preamble, one line per
/// retrieved document, then the literal user question.
pub fn build_prompt(question: &str, documents: &[SearchResult]) -> String {
    let context = documents
        .iter()
        .map(|doc| format!("📄 {}: {}", doc.title, doc.content))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"คุณคือผู้ช่วยของร้านกาแฟ "Coffee Corner" 🏪

กฎการตอบ:
- ตอบเป็นภาษาไทยและใส่อีโมจิ
- ใช้ข้อมูลที่ให้มาเท่านั้น
- ตอบสั้น เหมาะสำหรับ LINE chat
- ใส่ราคาชัดเจน
- ไม่ตอบเป็น markdown format

ข้อมูลร้าน:
{context}

คำถาม: {question}
ตอบ:"#
    )
}

/// Orchestrates one message through retrieve → augment → generate.
///
/// Stateless across messages; safe to share behind an `Arc` between
/// concurrent requests since all three ports are read-only after
/// construction.
pub struct RagPipeline {
    embedder: Arc<dyn TextEmbedder>,
    index: Arc<dyn VectorIndex>,
    generator: Arc<dyn TextGenerator>,
    top_k: usize,
}

impl RagPipeline {
    pub fn new(
        embedder: Arc<dyn TextEmbedder>,
        index: Arc<dyn VectorIndex>,
        generator: Arc<dyn TextGenerator>,
        top_k: usize,
    ) -> Self {
        Self {
            embedder,
            index,
            generator,
            top_k,
        }
    }

    /// Answer one user message. Never fails; always returns a well-formed
    /// reply with non-empty text.
    pub async fn process_message(&self, user_text: &str) -> RagReply {
        match self.answer(user_text).await {
            Ok(reply) => reply,
            Err(err) => {
                tracing::error!("pipeline failed: {err}");
                RagReply {
                    reply_text: PIPELINE_ERROR_REPLY.to_string(),
                    quick_replies: error_menu(),
                    sources: Vec::new(),
                }
            }
        }
    }

    async fn answer(&self, user_text: &str) -> Result<RagReply, EmbeddingError> {
        let documents = self.retrieve(user_text).await?;

        if documents.is_empty() {
            tracing::info!("no knowledge found for message");
            return Ok(RagReply {
                reply_text: NO_KNOWLEDGE_REPLY.to_string(),
                quick_replies: no_knowledge_menu(),
                sources: Vec::new(),
            });
        }

        let sources: Vec<String> = documents
            .iter()
            .take(MAX_CITED_SOURCES)
            .map(|doc| doc.title.clone())
            .collect();

        let prompt = build_prompt(user_text, &documents);

        let reply_text = match self.generator.generate(&prompt).await {
            Ok(text) => {
                let text = text.trim();
                if text.is_empty() {
                    tracing::warn!("completion API returned a blank answer");
                    EMPTY_GENERATION_REPLY.to_string()
                } else {
                    text.to_string()
                }
            }
            Err(err) => {
                tracing::warn!("generation failed, sending fallback: {err}");
                GENERATION_DEGRADED_REPLY.to_string()
            }
        };

        Ok(RagReply {
            reply_text,
            quick_replies: full_menu(),
            sources,
        })
    }

    /// Embed the message and query the index. Retrieval transport errors
    /// degrade to "no documents" so the message still gets a reply.
    async fn retrieve(&self, user_text: &str) -> Result<Vec<SearchResult>, EmbeddingError> {
        let vector = self.embedder.embed(user_text).await?;

        match self.index.query(&vector, self.top_k).await {
            Ok(documents) => {
                tracing::debug!("retrieved {} documents", documents.len());
                Ok(documents)
            }
            Err(err) => {
                tracing::warn!("retrieval failed, treating as no documents: {err}");
                Ok(Vec::new())
            }
        }
    }
}
