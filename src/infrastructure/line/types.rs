//! Wire types for LINE webhook deliveries and the reply API.

use serde::{Deserialize, Serialize};

use crate::domain::models::RagReply;

// ---- inbound webhook ----

/// The webhook envelope LINE posts to `/webhook`.
#[derive(Debug, Deserialize)]
pub struct WebhookEnvelope {
    #[serde(default)]
    pub events: Vec<WebhookEvent>,
}

/// One event in a webhook delivery. Non-message events carry no
/// `replyToken`/`message` and are skipped.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    pub reply_token: Option<String>,
    pub message: Option<EventMessage>,
}

/// The message payload of a message event.
#[derive(Debug, Deserialize)]
pub struct EventMessage {
    #[serde(rename = "type")]
    pub message_type: String,
    #[serde(default)]
    pub text: String,
}

impl WebhookEvent {
    /// Extract the text and reply token if this is a text-message event.
    pub fn as_text_message(&self) -> Option<(&str, &str)> {
        if self.event_type != "message" {
            return None;
        }
        let token = self.reply_token.as_deref()?;
        let message = self.message.as_ref()?;
        if message.message_type != "text" {
            return None;
        }
        Some((message.text.as_str(), token))
    }
}

// ---- outbound reply ----

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyRequest {
    pub reply_token: String,
    pub messages: Vec<TextMessage>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextMessage {
    #[serde(rename = "type")]
    pub message_type: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quick_reply: Option<QuickReplyMenu>,
}

#[derive(Debug, Serialize)]
pub struct QuickReplyMenu {
    pub items: Vec<QuickReplyItem>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickReplyItem {
    #[serde(rename = "type")]
    pub item_type: String,
    pub action: QuickReplyAction,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickReplyAction {
    #[serde(rename = "type")]
    pub action_type: String,
    pub label: String,
    pub text: String,
}

impl ReplyRequest {
    /// Render a pipeline answer as a single LINE text message with
    /// quick-reply chips. The chip label and the echoed text are the same
    /// string on both sides of the action.
    pub fn from_rag_reply(reply_token: impl Into<String>, reply: &RagReply) -> Self {
        let items: Vec<QuickReplyItem> = reply
            .quick_replies
            .iter()
            .map(|chip| QuickReplyItem {
                item_type: "action".to_string(),
                action: QuickReplyAction {
                    action_type: "message".to_string(),
                    label: chip.text().to_string(),
                    text: chip.text().to_string(),
                },
            })
            .collect();

        let quick_reply = if items.is_empty() {
            None
        } else {
            Some(QuickReplyMenu { items })
        };

        Self {
            reply_token: reply_token.into(),
            messages: vec![TextMessage {
                message_type: "text".to_string(),
                text: reply.reply_text.clone(),
                quick_reply,
            }],
        }
    }
}
