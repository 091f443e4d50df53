//! Verdicts for a publish-and-verify attempt and the count comparison
//! that produces them.

use std::fmt;

/// Outcome of one sync attempt. The `Display` rendering is the
/// `kb_sync_ok:` / `kb_sync_failed:` status line consumed by callers and
/// by operators reading agent output, so its wording is load-bearing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncVerdict {
    /// The document count did not decrease across the upload.
    Synced { before: usize, after: usize },
    /// No store with the requested name exists.
    StoreNotFound { name: String },
    /// The attempt ran but its outcome cannot be trusted.
    Failed { reason: String },
}

impl SyncVerdict {
    /// True only for a verified upload.
    pub fn is_synced(&self) -> bool {
        matches!(self, SyncVerdict::Synced { .. })
    }
}

impl fmt::Display for SyncVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncVerdict::Synced { before, after } => {
                write!(f, "kb_sync_ok: documents {before} -> {after}")
            }
            SyncVerdict::StoreNotFound { name } => {
                write!(f, "kb_sync_failed: knowledge base '{name}' not found")
            }
            SyncVerdict::Failed { reason } => write!(f, "kb_sync_failed: {reason}"),
        }
    }
}

/// Judge an upload from the document counts probed before and after it.
///
/// A non-decreasing count passes, `after == before` included: an equal
/// count proves no documents were lost, not that the new one is already
/// visible, since the store ingests asynchronously and the second probe
/// may run before ingestion completes. Callers needing a stronger signal
/// must re-probe later. Only a decreased count is judged a failure.
pub fn judge(before: usize, after: usize) -> SyncVerdict {
    if after < before {
        SyncVerdict::Failed {
            reason: format!("document count decreased ({before} -> {after})"),
        }
    } else {
        SyncVerdict::Synced { before, after }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn increased_count_is_synced() {
        let verdict = judge(5, 6);
        assert_eq!(verdict, SyncVerdict::Synced { before: 5, after: 6 });
        assert!(verdict.is_synced());
        assert_eq!(verdict.to_string(), "kb_sync_ok: documents 5 -> 6");
    }

    #[test]
    fn equal_count_is_still_synced() {
        let verdict = judge(5, 5);
        assert!(verdict.is_synced(), "an unchanged count must not be judged a failure");
        assert_eq!(verdict.to_string(), "kb_sync_ok: documents 5 -> 5");
    }

    #[test]
    fn decreased_count_is_a_failure() {
        let verdict = judge(5, 4);
        assert!(!verdict.is_synced());
        assert_eq!(
            verdict.to_string(),
            "kb_sync_failed: document count decreased (5 -> 4)"
        );
    }

    #[test]
    fn empty_store_first_upload_is_synced() {
        assert_eq!(judge(0, 1), SyncVerdict::Synced { before: 0, after: 1 });
    }

    #[test]
    fn store_not_found_renders_the_requested_name() {
        let verdict = SyncVerdict::StoreNotFound {
            name: "incident_runbooks_kb".to_string(),
        };
        assert_eq!(
            verdict.to_string(),
            "kb_sync_failed: knowledge base 'incident_runbooks_kb' not found"
        );
    }
}
