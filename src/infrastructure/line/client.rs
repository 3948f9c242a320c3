//! LINE reply API client.

use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::domain::models::RagReply;

use super::types::ReplyRequest;

const DEFAULT_BASE_URL: &str = "https://api.line.me";
const REPLY_TIMEOUT_SECS: u64 = 10;

/// Client for sending reply messages through the LINE Messaging API.
#[derive(Clone)]
pub struct LineClient {
    client: reqwest::Client,
    access_token: String,
    base_url: String,
}

impl LineClient {
    pub fn new(access_token: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REPLY_TIMEOUT_SECS))
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            client,
            access_token: access_token.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Override the API base URL. Test hook.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Send a pipeline answer back through the reply token. Reply tokens
    /// are single-use and expire quickly, so failures here are logged by
    /// the caller rather than retried.
    pub async fn reply(&self, reply_token: &str, reply: &RagReply) -> Result<()> {
        let url = format!("{}/v2/bot/message/reply", self.base_url);
        let request = ReplyRequest::from_rag_reply(reply_token, reply);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(&request)
            .send()
            .await
            .context("LINE reply request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("LINE reply API returned {status}: {body}");
        }

        Ok(())
    }
}
