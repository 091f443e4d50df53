//! High-level pipeline: compose → resolve → probe → upload → probe → judge.
//!
//! This module provides the top-level orchestration for publishing one
//! runbook entry into a knowledge base and verifying the result. It
//! implements a coordinated pipeline that:
//!   - Resolves the configured store name to a concrete store id
//!   - Probes the document count before the upload
//!   - Uploads the composed entry as a plain-text document
//!   - Probes the document count again and judges the delta
//!
//! # Major Types
//! - [`SyncVerdict`]: the judged outcome of one attempt
//! - [`crate::compose::RunbookEntry`]: the composed input document
//!
//! # Responsibilities
//! - Strictly sequential, fail-fast orchestration: each step starts only
//!   after the previous one returned, and the first error aborts the run
//! - Invokes logging throughout for traceability
//! - Holds no state between attempts: store handles and tokens are
//!   re-acquired on every run
//!
//! # Concurrency
//! Attempts are not serialized against each other. Two concurrent runs
//! against the same store can interleave their probes and each observe a
//! stale before-count, skewing both verdicts. Callers that need exact
//! counting must serialize externally.
//!
//! # Callable From
//! - Used by both the CLI crate and integration tests
//! - Expects a concrete (async) [`KnowledgeStore`] implementation
//!
//! # Error Handling
//! [`synchronise`] separates judged outcomes from infrastructure errors:
//! a missing store or a decreased count is a verdict, a failed request is
//! a [`SyncError`]. [`publish_entry`] then folds both into the status
//! string contract, so composition never loses its result to a sync
//! failure.
//!
//! # Navigation
//! - Main entrypoints: [`draft_runbook_entry`], [`synchronise`]

use tracing::{error, info};

use crate::compose::{IncidentFields, RunbookEntry};
use crate::contract::{KnowledgeStore, StoreResolution};
use crate::error::SyncError;
use crate::verify::{judge, SyncVerdict};

/// Run one publish-and-verify attempt for an already composed entry.
pub async fn synchronise<S>(
    store: &S,
    store_name: &str,
    entry: &RunbookEntry,
) -> Result<SyncVerdict, SyncError>
where
    S: KnowledgeStore + Sync,
{
    info!(
        store = store_name,
        filename = %entry.filename,
        "[SYNC] Starting publish-and-verify attempt"
    );

    let handle = match store.resolve_store(store_name).await? {
        StoreResolution::Resolved(handle) => handle,
        StoreResolution::NotFound => {
            error!(store = store_name, "[SYNC][ERROR] Knowledge base not found");
            return Ok(SyncVerdict::StoreNotFound {
                name: store_name.to_string(),
            });
        }
        StoreResolution::MissingId => {
            error!(store = store_name, "[SYNC][ERROR] Knowledge base listing entry has no id");
            return Ok(SyncVerdict::Failed {
                reason: "missing knowledge base id".to_string(),
            });
        }
    };

    let before = store.document_count(&handle).await?;
    info!(count = before.count, "[SYNC] Document count before upload");

    store.upload_document(&handle, &entry.filename, &entry.body).await?;
    info!(filename = %entry.filename, "[SYNC] Upload accepted");

    let after = store.document_count(&handle).await?;
    info!(count = after.count, "[SYNC] Document count after upload");

    let verdict = judge(before.count, after.count);
    if verdict.is_synced() {
        info!(verdict = %verdict, "[SYNC] Verified document count");
    } else {
        error!(verdict = %verdict, "[SYNC][ERROR] Count verification failed");
    }
    Ok(verdict)
}

/// Compose a runbook entry from incident fields and publish it.
///
/// Infallible by contract: whatever happens downstream, the caller gets a
/// status string naming the generated file, so the entry can be re-uploaded
/// by simply re-running the action.
pub async fn draft_runbook_entry<S>(
    store: &S,
    store_name: &str,
    fields: IncidentFields,
) -> String
where
    S: KnowledgeStore + Sync,
{
    let entry = RunbookEntry::new(fields);
    publish_entry(store, store_name, &entry).await
}

/// Publish an already composed entry and render the status string.
///
/// Split out from [`draft_runbook_entry`] so callers and tests can pin
/// the timestamp-bearing filename.
pub async fn publish_entry<S>(store: &S, store_name: &str, entry: &RunbookEntry) -> String
where
    S: KnowledgeStore + Sync,
{
    match synchronise(store, store_name, entry).await {
        Ok(verdict) => format!(
            "runbook_synced: {verdict}\nfilename: {filename}\nentry uploaded to {store_name}",
            filename = entry.filename,
        ),
        Err(e) => {
            error!(
                error = %e,
                filename = %entry.filename,
                "[SYNC][ERROR] Attempt aborted; reporting unsynced entry"
            );
            format!(
                "runbook_generated_but_sync_failed: {e}\nfilename: {filename}\nretry upload by re-running this action",
                filename = entry.filename,
            )
        }
    }
}
