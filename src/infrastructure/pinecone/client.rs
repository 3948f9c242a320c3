//! Pinecone HTTP client.
//!
//! Two surfaces: the control plane (`api.pinecone.io`) for index
//! lifecycle and host discovery, and the per-index data-plane host for
//! queries and upserts. The data-plane host is resolved once via
//! `connect` and cached for the life of the client.

use std::collections::BTreeMap;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use tokio::sync::OnceCell;

use crate::domain::errors::RetrievalError;
use crate::domain::models::SearchResult;
use crate::domain::ports::{UpsertRecord, VectorIndex};

use super::types::{
    CreateIndexRequest, DescribeIndexResponse, IndexSpec, Match, QueryRequest, QueryResponse,
    ServerlessSpec, UpsertRequest, Vector,
};

const DEFAULT_CONTROL_URL: &str = "https://api.pinecone.io";
const API_VERSION: &str = "2024-07";

/// Client for one named Pinecone index.
pub struct PineconeIndex {
    client: reqwest::Client,
    api_key: String,
    control_url: String,
    index_name: String,
    host: OnceCell<String>,
}

impl PineconeIndex {
    /// Build a client for `index_name` with a per-request timeout.
    pub fn new(
        api_key: impl Into<String>,
        index_name: impl Into<String>,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            control_url: DEFAULT_CONTROL_URL.to_string(),
            index_name: index_name.into(),
            host: OnceCell::new(),
        })
    }

    /// Override the control-plane URL. Test hook.
    #[must_use]
    pub fn with_control_url(mut self, url: impl Into<String>) -> Self {
        self.control_url = url.into();
        self
    }

    /// Pre-seed the data-plane host, skipping discovery. Test hook.
    #[must_use]
    pub fn with_host(self, host: impl Into<String>) -> Self {
        let cell = OnceCell::new_with(Some(normalize_host(&host.into())));
        Self { host: cell, ..self }
    }

    /// Resolve and cache the data-plane host. Called once at startup so
    /// that a bad index name or API key fails before the listener binds.
    pub async fn connect(&self) -> Result<(), RetrievalError> {
        self.data_plane_host().await?;
        Ok(())
    }

    async fn data_plane_host(&self) -> Result<&str, RetrievalError> {
        let host = self
            .host
            .get_or_try_init(|| self.describe_host())
            .await?;
        Ok(host)
    }

    async fn describe_host(&self) -> Result<String, RetrievalError> {
        let url = format!("{}/indexes/{}", self.control_url, self.index_name);

        let response = self
            .client
            .get(&url)
            .header("Api-Key", &self.api_key)
            .header("X-Pinecone-API-Version", API_VERSION)
            .send()
            .await
            .map_err(network)?;

        let response = check_status(response).await?;
        let described: DescribeIndexResponse = response.json().await.map_err(malformed)?;

        tracing::debug!(index = %self.index_name, host = %described.host, "resolved index host");
        Ok(normalize_host(&described.host))
    }
}

/// The describe endpoint returns a bare hostname; data-plane requests
/// need a scheme.
fn normalize_host(host: &str) -> String {
    if host.starts_with("http") {
        host.to_string()
    } else {
        format!("https://{host}")
    }
}

fn network(err: reqwest::Error) -> RetrievalError {
    RetrievalError::Network(err.to_string())
}

fn malformed(err: reqwest::Error) -> RetrievalError {
    RetrievalError::MalformedResponse(err.to_string())
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, RetrievalError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(RetrievalError::Http {
        status: status.as_u16(),
        body,
    })
}

fn match_to_result(m: Match) -> SearchResult {
    let metadata = m.metadata.unwrap_or_default();
    SearchResult {
        title: metadata_str(&metadata, "title"),
        content: metadata_str(&metadata, "content"),
        score: m.score,
    }
}

fn metadata_str(metadata: &BTreeMap<String, Value>, key: &str) -> String {
    metadata
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn record_to_vector(record: &UpsertRecord) -> Vector {
    let mut metadata = BTreeMap::new();
    metadata.insert("title".to_string(), Value::from(record.document.title.clone()));
    metadata.insert(
        "content".to_string(),
        Value::from(record.document.content.clone()),
    );
    if let Some(url) = &record.document.source_url {
        metadata.insert("source_url".to_string(), Value::from(url.clone()));
    }
    if let Some(doc_type) = &record.document.doc_type {
        metadata.insert("type".to_string(), Value::from(doc_type.clone()));
    }

    Vector {
        id: record.id.clone(),
        values: record.values.clone(),
        metadata,
    }
}

#[async_trait]
impl VectorIndex for PineconeIndex {
    async fn query(
        &self,
        vector: &[f32],
        top_k: usize,
    ) -> Result<Vec<SearchResult>, RetrievalError> {
        let host = self.data_plane_host().await?;
        let url = format!("{host}/query");

        let request = QueryRequest {
            vector: vector.to_vec(),
            top_k,
            include_metadata: true,
        };

        let response = self
            .client
            .post(&url)
            .header("Api-Key", &self.api_key)
            .header("X-Pinecone-API-Version", API_VERSION)
            .json(&request)
            .send()
            .await
            .map_err(network)?;

        let response = check_status(response).await?;
        let parsed: QueryResponse = response.json().await.map_err(malformed)?;

        Ok(parsed.matches.into_iter().map(match_to_result).collect())
    }

    async fn upsert(&self, records: &[UpsertRecord]) -> Result<(), RetrievalError> {
        let host = self.data_plane_host().await?;
        let url = format!("{host}/vectors/upsert");

        let request = UpsertRequest {
            vectors: records.iter().map(record_to_vector).collect(),
        };

        let response = self
            .client
            .post(&url)
            .header("Api-Key", &self.api_key)
            .header("X-Pinecone-API-Version", API_VERSION)
            .json(&request)
            .send()
            .await
            .map_err(network)?;

        check_status(response).await?;
        Ok(())
    }

    async fn ensure_index(&self, dimension: usize) -> Result<(), RetrievalError> {
        let url = format!("{}/indexes", self.control_url);

        let request = CreateIndexRequest {
            name: self.index_name.clone(),
            dimension,
            metric: "cosine".to_string(),
            spec: IndexSpec {
                serverless: ServerlessSpec {
                    cloud: "aws".to_string(),
                    region: "us-east-1".to_string(),
                },
            },
        };

        let response = self
            .client
            .post(&url)
            .header("Api-Key", &self.api_key)
            .header("X-Pinecone-API-Version", API_VERSION)
            .json(&request)
            .send()
            .await
            .map_err(network)?;

        // 409 means the index already exists, which is the desired state.
        if response.status() == StatusCode::CONFLICT {
            tracing::info!(index = %self.index_name, "index already exists");
            return Ok(());
        }

        check_status(response).await?;
        tracing::info!(index = %self.index_name, dimension, "created index");
        Ok(())
    }
}
