//! # contract: interfaces between the sync workflow and the outside world
//!
//! This module defines the two traits the publish-and-verify workflow is
//! generic over, plus the plain data types they exchange.
//!
//! ## Interface & Extensibility
//! - Implement [`TokenProvider`] to supply bearer credentials. The real
//!   implementation exchanges an IBM Cloud API key; tests substitute a mock.
//! - Implement [`KnowledgeStore`] for a concrete document store backend.
//!   The shipped implementation talks to watsonx Orchestrate knowledge
//!   bases; the workflow itself never sees HTTP.
//!
//! ## Mocking & Testing
//! - Both traits are annotated for `mockall` so consumers can generate
//!   deterministic mocks for unit/integration tests.

use std::time::SystemTime;

use async_trait::async_trait;

use mockall::automock;

use crate::error::{AuthError, SyncError};

/// A short-lived credential obtained from a token exchange.
#[derive(Debug, Clone)]
pub struct BearerToken {
    pub access_token: String,
}

/// A store name resolved to the service's concrete identifier.
///
/// Valid for a single sync attempt; handles are never cached across
/// attempts, so a store recreated under the same name is picked up on the
/// next run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreHandle {
    pub name: String,
    pub id: String,
}

/// Outcome of looking up a store name in the listing endpoint.
#[derive(Debug, Clone)]
pub enum StoreResolution {
    /// The first listed store carrying the requested name. Duplicate names
    /// are not disambiguated; the first entry wins.
    Resolved(StoreHandle),
    /// The listing returned no store for this name.
    NotFound,
    /// The listing returned a store entry without an identifier.
    MissingId,
}

/// A document count together with the moment it was captured.
#[derive(Debug, Clone, Copy)]
pub struct DocumentCountSnapshot {
    pub count: usize,
    pub captured_at: SystemTime,
}

/// Trait for obtaining bearer credentials.
///
/// Callers request a token before every store call. Implementations must
/// not hand out stale tokens; the real provider performs a fresh exchange
/// each time and leaves caching deliberately out of scope.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Exchange the configured credential for a fresh bearer token.
    async fn bearer_token(&self) -> Result<BearerToken, AuthError>;
}

/// Trait for the document store the runbook entries are published into.
///
/// The trait is `Send` + `Sync` and intended for async/await usage. It is
/// implemented by the real watsonx Orchestrate client and by test mocks.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait KnowledgeStore: Send + Sync {
    /// Resolve a store name to a handle via the listing endpoint.
    async fn resolve_store(&self, name: &str) -> Result<StoreResolution, SyncError>;

    /// Probe how many documents the store currently holds.
    async fn document_count(&self, store: &StoreHandle)
        -> Result<DocumentCountSnapshot, SyncError>;

    /// Upload one plain-text document into the store.
    async fn upload_document(
        &self,
        store: &StoreHandle,
        filename: &str,
        body: &str,
    ) -> Result<(), SyncError>;
}
