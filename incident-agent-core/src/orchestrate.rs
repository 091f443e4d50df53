//! HTTP client for watsonx Orchestrate knowledge bases.
//!
//! Implements [`KnowledgeStore`] against the knowledge base endpoints of
//! one Orchestrate instance: name listing, status (document count) and
//! multipart document upload. Every call fetches a fresh bearer token
//! through the configured [`TokenProvider`] first.

use std::io::Write;
use std::time::{Duration, SystemTime};

use async_trait::async_trait;
use serde::Deserialize;
use tempfile::NamedTempFile;
use tracing::{debug, error, info};

use crate::contract::{
    DocumentCountSnapshot, KnowledgeStore, StoreHandle, StoreResolution, TokenProvider,
};
use crate::error::{ApiError, SyncError};
use crate::token::{IamTokenProvider, DEFAULT_TOKEN_URL};

const API_TIMEOUT: Duration = Duration::from_secs(20);
const UPLOAD_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings for one Orchestrate instance.
#[derive(Debug, Clone)]
pub struct OrchestrateConfig {
    /// Base URL of the service instance, up to and including the instance
    /// id segment.
    pub instance_url: String,
    /// Token exchange endpoint.
    pub token_url: String,
    /// Long-lived API key, exchanged for a bearer token on every call.
    pub api_key: String,
}

impl OrchestrateConfig {
    pub fn new(instance_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            instance_url: instance_url.into(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            api_key: api_key.into(),
        }
    }
}

/// Knowledge base client for one Orchestrate instance.
pub struct OrchestrateClient<P = IamTokenProvider> {
    http: reqwest::Client,
    instance_url: String,
    tokens: P,
}

impl OrchestrateClient<IamTokenProvider> {
    pub fn new(config: OrchestrateConfig) -> Self {
        let tokens = IamTokenProvider::new(config.token_url, config.api_key);
        Self::with_token_provider(config.instance_url, tokens)
    }
}

impl<P: TokenProvider> OrchestrateClient<P> {
    /// Build a client around an explicit token provider.
    pub fn with_token_provider(instance_url: impl Into<String>, tokens: P) -> Self {
        let instance_url = instance_url.into().trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            instance_url,
            tokens,
        }
    }

    fn knowledge_bases_url(&self) -> String {
        format!("{}/v1/orchestrate/knowledge-bases", self.instance_url)
    }
}

#[derive(Debug, Deserialize)]
struct KnowledgeBaseSummary {
    id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct KnowledgeBaseStatus {
    #[serde(default)]
    documents: Vec<serde_json::Value>,
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        let body = response.text().await.unwrap_or_default();
        Err(ApiError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl<P: TokenProvider> KnowledgeStore for OrchestrateClient<P> {
    async fn resolve_store(&self, name: &str) -> Result<StoreResolution, SyncError> {
        let token = self.tokens.bearer_token().await?;
        let response = self
            .http
            .get(self.knowledge_bases_url())
            .bearer_auth(&token.access_token)
            .query(&[("names", name)])
            .timeout(API_TIMEOUT)
            .send()
            .await
            .map_err(|e| SyncError::Resolve(e.into()))?;
        let response = check_status(response).await.map_err(SyncError::Resolve)?;
        let listed: Vec<KnowledgeBaseSummary> = response
            .json()
            .await
            .map_err(|e| SyncError::Resolve(e.into()))?;

        if listed.is_empty() {
            info!(store = name, "Knowledge base listing returned no match");
            return Ok(StoreResolution::NotFound);
        }
        match listed.into_iter().next().and_then(|kb| kb.id) {
            Some(id) => {
                info!(store = name, id = %id, "Resolved knowledge base");
                Ok(StoreResolution::Resolved(StoreHandle {
                    name: name.to_string(),
                    id,
                }))
            }
            None => {
                error!(store = name, "Knowledge base listing entry carries no id");
                Ok(StoreResolution::MissingId)
            }
        }
    }

    async fn document_count(
        &self,
        store: &StoreHandle,
    ) -> Result<DocumentCountSnapshot, SyncError> {
        let token = self.tokens.bearer_token().await?;
        let url = format!("{}/{}/status", self.knowledge_bases_url(), store.id);
        let response = self
            .http
            .get(&url)
            .bearer_auth(&token.access_token)
            .timeout(API_TIMEOUT)
            .send()
            .await
            .map_err(|e| SyncError::Probe(e.into()))?;
        let response = check_status(response).await.map_err(SyncError::Probe)?;
        let status: KnowledgeBaseStatus = response
            .json()
            .await
            .map_err(|e| SyncError::Probe(e.into()))?;

        let snapshot = DocumentCountSnapshot {
            count: status.documents.len(),
            captured_at: SystemTime::now(),
        };
        debug!(store = %store.name, count = snapshot.count, "Probed document count");
        Ok(snapshot)
    }

    async fn upload_document(
        &self,
        store: &StoreHandle,
        filename: &str,
        body: &str,
    ) -> Result<(), SyncError> {
        let token = self.tokens.bearer_token().await?;

        // Stage the body in a single-use temp file; the guard removes it
        // on every exit path, including the error returns below.
        let mut staged = NamedTempFile::new()?;
        staged.write_all(body.as_bytes())?;
        staged.flush()?;
        let bytes = std::fs::read(staged.path())?;

        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(filename.to_string())
            .mime_str("text/plain")
            .map_err(|e| SyncError::Upload(e.into()))?;
        let form = reqwest::multipart::Form::new()
            .part("files", part)
            .text("file_urls", "{}");

        let url = format!("{}/{}/documents", self.knowledge_bases_url(), store.id);
        let response = self
            .http
            .put(&url)
            .bearer_auth(&token.access_token)
            .multipart(form)
            .timeout(UPLOAD_TIMEOUT)
            .send()
            .await
            .map_err(|e| SyncError::Upload(e.into()))?;
        check_status(response).await.map_err(SyncError::Upload)?;

        info!(store = %store.name, filename, "Uploaded runbook document");
        Ok(())
    }
}
