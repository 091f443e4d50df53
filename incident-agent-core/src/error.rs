//! Error types for the sync workflow, split by stage so callers can tell
//! an authentication failure from a store API failure.

use thiserror::Error;

/// Failures while exchanging the long-lived API key for a bearer token.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The token endpoint could not be reached or the exchange timed out.
    #[error("token exchange request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// The token endpoint answered with a non-success status.
    #[error("token exchange returned status {status}: {body}")]
    ExchangeFailed { status: u16, body: String },
    /// The exchange succeeded but the response carried no usable token.
    #[error("missing access_token from IAM response")]
    MissingAccessToken,
}

/// Failures while talking to the knowledge base service.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request could not be sent or timed out.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// The service answered with a non-success status.
    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },
}

/// Anything that can abort a publish-and-verify attempt, tagged with the
/// stage it was raised in.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("auth error: {0}")]
    Auth(#[from] AuthError),
    #[error("knowledge base lookup failed: {0}")]
    Resolve(ApiError),
    #[error("document count probe failed: {0}")]
    Probe(ApiError),
    #[error("document upload failed: {0}")]
    Upload(ApiError),
    /// Writing the entry to its staging file failed before any upload.
    #[error("failed to stage upload body: {0}")]
    Staging(#[from] std::io::Error),
}
