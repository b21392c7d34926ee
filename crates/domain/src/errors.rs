//! Error types for repository facet aggregation.
//!
//! [`HostError`] is what a [`crate::RepositoryHost`] reports for a single remote
//! call. [`AggregationError`] is what a caller of the query surface sees: one
//! descriptive failure for the whole request. Optional facet failures never
//! become an [`AggregationError`]; they are defaulted inside the engine.

use thiserror::Error;

use crate::RepositoryRef;

// ---------------------------------------------------------------------------
// Host-level errors
// ---------------------------------------------------------------------------

/// A failure of one call to the remote repository host.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    /// The requested resource does not exist (or is not visible to the credential).
    #[error("{resource} not found")]
    NotFound {
        /// Description of the missing resource (e.g. `"repository octocat/x"`).
        resource: String,
    },

    /// Network, HTTP, or decoding failure.
    ///
    /// `status` is set when the host answered with a non-success HTTP status.
    #[error("transport failure: {message}")]
    Transport {
        /// HTTP status code, when the host responded at all.
        status: Option<u16>,
        /// Human-readable description of the failure.
        message: String,
    },
}

impl HostError {
    /// Creates a [`HostError::NotFound`].
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    /// Creates a [`HostError::Transport`] without an HTTP status.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            status: None,
            message: message.into(),
        }
    }

    /// Creates a [`HostError::Transport`] for a non-success HTTP status.
    pub fn http_status(status: u16, message: impl Into<String>) -> Self {
        Self::Transport {
            status: Some(status),
            message: message.into(),
        }
    }

    /// Returns `true` for [`HostError::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

// ---------------------------------------------------------------------------
// Request-level errors
// ---------------------------------------------------------------------------

/// A request-level failure returned by the query surface.
///
/// Only mandatory facets (identity resolution, basic details) and the
/// repository listing produce these.
#[derive(Debug, Error)]
pub enum AggregationError {
    /// No credential was supplied.
    #[error("GitHub token is required")]
    MissingCredential,

    /// No repository name was supplied to a detail request.
    #[error("Repository name is required")]
    MissingRepositoryName,

    /// The "who am I" lookup for the credential failed.
    #[error("Failed to fetch authenticated user details: {source}")]
    AuthResolutionFailed {
        #[source]
        source: HostError,
    },

    /// The repository does not exist for the resolved owner.
    #[error("Repository {repository} not found")]
    RepositoryNotFound {
        /// The repository that was requested.
        repository: RepositoryRef,
    },

    /// A mandatory remote call failed below the HTTP-status level or with an
    /// unexpected status.
    #[error("Failed to {operation}: {source}")]
    Transport {
        /// Description of the operation, naming the repository where relevant.
        operation: String,
        #[source]
        source: HostError,
    },

    /// The aggregation queue shut down before the job could complete.
    #[error("Aggregation queue is closed")]
    QueueClosed,

    /// The engine or runtime configuration is invalid.
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration problem.
        message: String,
    },
}
