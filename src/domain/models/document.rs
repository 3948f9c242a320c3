//! Knowledge base records ingested into the vector index.

use serde::{Deserialize, Serialize};

/// A reference document as stored in the vector index metadata.
///
/// Created during ingestion and immutable thereafter. Identity is the
/// opaque index key (`cafe_{n}`), not anything in the record itself.
/// Empty titles are tolerated but degrade the cited-sources output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeDocument {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub source_url: Option<String>,
    #[serde(default, rename = "type")]
    pub doc_type: Option<String>,
}

impl KnowledgeDocument {
    /// The text that gets embedded for this document: title and content
    /// concatenated, matching what queries are matched against.
    pub fn embedding_text(&self) -> String {
        format!("{} {}", self.title, self.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_minimal_record() {
        let doc: KnowledgeDocument =
            serde_json::from_str(r#"{"title": "เมนูลาเต้", "content": "45 บาท"}"#).unwrap();
        assert_eq!(doc.title, "เมนูลาเต้");
        assert_eq!(doc.content, "45 บาท");
        assert!(doc.source_url.is_none());
        assert!(doc.doc_type.is_none());
    }

    #[test]
    fn test_deserialize_full_record() {
        let doc: KnowledgeDocument = serde_json::from_str(
            r#"{"title": "t", "content": "c", "source_url": "https://example.com", "type": "menu"}"#,
        )
        .unwrap();
        assert_eq!(doc.source_url.as_deref(), Some("https://example.com"));
        assert_eq!(doc.doc_type.as_deref(), Some("menu"));
    }

    #[test]
    fn test_embedding_text_concatenates_title_and_content() {
        let doc = KnowledgeDocument {
            title: "เมนูลาเต้".to_string(),
            content: "45 บาท".to_string(),
            source_url: None,
            doc_type: None,
        };
        assert_eq!(doc.embedding_text(), "เมนูลาเต้ 45 บาท");
    }
}
