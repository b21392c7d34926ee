//! Adapter errors and HTTP status classification.
//!
//! Request failures are reported to the engine as [`HostError`]; only client
//! construction has its own error type.

use domain::HostError;
use thiserror::Error;

use crate::wire::ErrorPayload;

/// Failure to build a [`crate::GitHubClient`].
#[derive(Debug, Error)]
pub enum GitHubClientError {
    /// The configured API base URL is unusable.
    #[error("Invalid GitHub API URL '{url}': {reason}")]
    InvalidApiUrl { url: String, reason: String },

    /// The underlying HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Maps a non-success response to a [`HostError`].
///
/// HTTP 404 is [`HostError::NotFound`]; every other status is a transport
/// failure carrying the status and GitHub's error message when present.
pub(crate) fn classify_status(status: u16, resource: &str, body: &str) -> HostError {
    if status == 404 {
        return HostError::not_found(resource);
    }

    let detail = serde_json::from_str::<ErrorPayload>(body)
        .map(|payload| payload.message)
        .unwrap_or_else(|_| body.trim().chars().take(200).collect());
    if detail.is_empty() {
        HostError::http_status(status, format!("{resource}: HTTP {status}"))
    } else {
        HostError::http_status(status, format!("{resource}: HTTP {status}: {detail}"))
    }
}

/// Maps a `reqwest` failure (connect, timeout, decode) to a [`HostError`].
pub(crate) fn transport_error(resource: &str, err: reqwest::Error) -> HostError {
    let kind = if err.is_timeout() {
        "timed out"
    } else if err.is_connect() {
        "connection failed"
    } else if err.is_decode() {
        "unreadable response"
    } else {
        "request failed"
    };
    HostError::transport(format!("{resource}: {kind}: {err}"))
}
