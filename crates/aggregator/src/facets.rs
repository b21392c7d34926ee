//! The four repository facets and their failure policy.
//!
//! Each facet is an independent read against the [`RepositoryHost`]. What
//! happens when a facet fails is decided by one table, [`Facet::policy`]:
//!
//! | Facet | Policy | Default |
//! |-------|--------|---------|
//! | [`Facet::BasicDetails`] | mandatory | none, the job fails |
//! | [`Facet::CiConfig`] | optional | [`NO_CI_CONFIG`] |
//! | [`Facet::Webhooks`] | optional | no webhooks |
//! | [`Facet::FileCount`] | optional | `0` |
//!
//! A fetch settles into a [`FacetOutcome`]: the fetched value, a default
//! (when an optional facet failed or came back empty), or a fatal error
//! (when a mandatory facet failed).

use domain::{
    AggregationError, Credential, HostError, RepositoryBasics, RepositoryHost, RepositoryRef,
    NO_CI_CONFIG,
};
use tracing::{debug, instrument, warn};

use crate::config::EngineConfig;
use crate::walker::DirectoryWalker;

#[cfg(test)]
#[path = "facets_tests.rs"]
mod tests;

// ---------------------------------------------------------------------------
// Policy table
// ---------------------------------------------------------------------------

/// One piece of repository metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Facet {
    BasicDetails,
    CiConfig,
    Webhooks,
    FileCount,
}

/// Whether a facet failure fails the whole job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FacetPolicy {
    /// Failure fails the job.
    Mandatory,
    /// Failure (or an empty result) is replaced with the facet's default.
    Optional,
}

impl Facet {
    /// All facets, in the order they are launched.
    pub const ALL: [Facet; 4] = [
        Facet::BasicDetails,
        Facet::CiConfig,
        Facet::Webhooks,
        Facet::FileCount,
    ];

    /// Returns the failure policy of this facet.
    pub fn policy(self) -> FacetPolicy {
        match self {
            Facet::BasicDetails => FacetPolicy::Mandatory,
            Facet::CiConfig | Facet::Webhooks | Facet::FileCount => FacetPolicy::Optional,
        }
    }

    /// Short human-readable name used in log fields and error messages.
    pub fn name(self) -> &'static str {
        match self {
            Facet::BasicDetails => "basic details",
            Facet::CiConfig => "CI config",
            Facet::Webhooks => "webhooks",
            Facet::FileCount => "file count",
        }
    }

    /// Converts a fatal failure of this facet into a request-level error.
    pub fn failure(self, repository: &RepositoryRef, source: HostError) -> AggregationError {
        match source {
            source if source.is_not_found() && self == Facet::BasicDetails => {
                AggregationError::RepositoryNotFound {
                    repository: repository.clone(),
                }
            }
            source => AggregationError::Transport {
                operation: format!("fetch {self} for {repository}"),
                source,
            },
        }
    }
}

impl std::fmt::Display for Facet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// Why an optional facet carries its default value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefaultCause {
    /// The host answered, but with nothing usable.
    Empty,
    /// The fetch failed.
    Failed(HostError),
}

/// The settled result of one facet fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FacetOutcome<T> {
    /// The host's value.
    Fetched(T),
    /// The facet's default, substituted under [`FacetPolicy::Optional`].
    Defaulted { value: T, cause: DefaultCause },
    /// A failure under [`FacetPolicy::Mandatory`].
    Fatal(HostError),
}

impl<T> FacetOutcome<T> {
    /// Applies `facet`'s policy to a raw fetch result.
    ///
    /// A facet without a `default` cannot be defaulted: its failures are
    /// fatal whatever its policy says.
    pub fn settle(
        facet: Facet,
        result: Result<T, HostError>,
        is_empty: fn(&T) -> bool,
        default: Option<fn() -> T>,
    ) -> Self {
        match (facet.policy(), default, result) {
            (FacetPolicy::Optional, Some(default), Ok(value)) if is_empty(&value) => {
                debug!(facet = %facet, "Facet empty; using default");
                Self::Defaulted {
                    value: default(),
                    cause: DefaultCause::Empty,
                }
            }
            (_, _, Ok(value)) => Self::Fetched(value),
            (FacetPolicy::Optional, Some(default), Err(err)) => {
                warn!(facet = %facet, error = %err, "Facet unavailable; using default");
                Self::Defaulted {
                    value: default(),
                    cause: DefaultCause::Failed(err),
                }
            }
            (_, _, Err(err)) => Self::Fatal(err),
        }
    }

    /// Returns the value to merge, or the fatal error.
    pub fn into_result(self) -> Result<T, HostError> {
        match self {
            Self::Fetched(value) | Self::Defaulted { value, .. } => Ok(value),
            Self::Fatal(err) => Err(err),
        }
    }

    /// Returns `true` if the default value was substituted.
    pub fn is_defaulted(&self) -> bool {
        matches!(self, Self::Defaulted { .. })
    }
}

// ---------------------------------------------------------------------------
// Sub-fetches
// ---------------------------------------------------------------------------

/// Runs the facet fetches for one repository.
pub struct FacetFetcher<'a> {
    host: &'a dyn RepositoryHost,
    credential: &'a Credential,
    repository: &'a RepositoryRef,
    config: &'a EngineConfig,
}

impl<'a> FacetFetcher<'a> {
    pub fn new(
        host: &'a dyn RepositoryHost,
        credential: &'a Credential,
        repository: &'a RepositoryRef,
        config: &'a EngineConfig,
    ) -> Self {
        Self {
            host,
            credential,
            repository,
            config,
        }
    }

    /// Name, size, owner and visibility.
    #[instrument(level = "debug", skip(self), fields(repository = %self.repository))]
    pub async fn basic_details(&self) -> FacetOutcome<RepositoryBasics> {
        let result = self
            .host
            .get_repository(self.credential, self.repository)
            .await;
        FacetOutcome::settle(Facet::BasicDetails, result, |_| false, None)
    }

    /// Content of the first entry under the CI config path.
    ///
    /// An empty listing, a missing directory, an entry without a download URL,
    /// an unreadable file, and an empty file all yield [`NO_CI_CONFIG`].
    #[instrument(level = "debug", skip(self), fields(repository = %self.repository))]
    pub async fn ci_config(&self) -> FacetOutcome<String> {
        let result = self.fetch_ci_config().await;
        FacetOutcome::settle(
            Facet::CiConfig,
            result,
            |content| content.is_empty(),
            Some(|| NO_CI_CONFIG.to_string()),
        )
    }

    async fn fetch_ci_config(&self) -> Result<String, HostError> {
        let entries = self
            .host
            .list_directory(
                self.credential,
                self.repository,
                &self.config.ci_config_path,
                1,
                self.config.page_size,
            )
            .await?;

        let Some(first) = entries.into_iter().next() else {
            return Ok(String::new());
        };
        let url = first.download_url.ok_or_else(|| {
            HostError::transport(format!("'{}' has no download URL", first.path))
        })?;
        self.host.fetch_raw_content(&url).await
    }

    /// Webhook delivery URLs in host order.
    #[instrument(level = "debug", skip(self), fields(repository = %self.repository))]
    pub async fn webhook_urls(&self) -> FacetOutcome<Vec<String>> {
        let result = self
            .host
            .list_webhook_urls(self.credential, self.repository)
            .await;
        FacetOutcome::settle(Facet::Webhooks, result, |urls| urls.is_empty(), Some(Vec::new))
    }

    /// Number of files in the whole repository tree.
    #[instrument(level = "debug", skip(self), fields(repository = %self.repository))]
    pub async fn file_count(&self) -> FacetOutcome<u64> {
        let walker = DirectoryWalker::new(
            self.host,
            self.credential,
            self.repository,
            self.config.page_size,
        );
        let result = walker.count_files("").await;
        FacetOutcome::settle(Facet::FileCount, result, |count| *count == 0, Some(|| 0))
    }
}
