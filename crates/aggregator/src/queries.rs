//! The query surface: the two read operations exposed to callers.
//!
//! [`RepositoryQueries::list_repositories`] pages through the caller's
//! repositories. [`RepositoryQueries::repository_details`] resolves the
//! caller's login, then submits one aggregation job through the shared
//! [`AggregationQueue`] and returns its record or a single request-level error.

use std::sync::Arc;

use domain::{
    AggregationError, Credential, RepositoryDetail, RepositoryHost, RepositoryName, RepositoryRef,
    RepositorySummary,
};
use tracing::{info, instrument};

use crate::config::EngineConfig;
use crate::fanout::aggregate_repository;
use crate::queue::AggregationQueue;

#[cfg(test)]
#[path = "queries_tests.rs"]
mod tests;

/// Entry point for callers of the aggregation engine.
#[derive(Clone)]
pub struct RepositoryQueries {
    host: Arc<dyn RepositoryHost>,
    queue: Arc<AggregationQueue>,
    config: Arc<EngineConfig>,
}

impl RepositoryQueries {
    /// Creates the query surface over an injected host and queue.
    pub fn new(
        host: Arc<dyn RepositoryHost>,
        queue: Arc<AggregationQueue>,
        config: EngineConfig,
    ) -> Self {
        Self {
            host,
            queue,
            config: Arc::new(config),
        }
    }

    /// Lists every repository visible to `token`, following pages while they
    /// come back exactly full.
    #[instrument(skip_all)]
    pub async fn list_repositories(
        &self,
        token: &str,
    ) -> Result<Vec<RepositorySummary>, AggregationError> {
        let credential = Credential::new(token).ok_or(AggregationError::MissingCredential)?;
        let per_page = self.config.page_size;

        let mut repositories = Vec::new();
        let mut page = 1;
        loop {
            let batch = self
                .host
                .list_user_repositories(&credential, page, per_page)
                .await
                .map_err(|source| AggregationError::Transport {
                    operation: "list repositories".to_string(),
                    source,
                })?;
            let fetched = batch.len();
            repositories.extend(batch);
            if fetched != per_page as usize {
                break;
            }
            page += 1;
        }

        info!(count = repositories.len(), "Listed repositories");
        Ok(repositories)
    }

    /// Aggregates the detail record of the caller's repository `name`.
    ///
    /// The caller's login is resolved before the job is queued; failing that
    /// is [`AggregationError::AuthResolutionFailed`].
    #[instrument(skip(self, token))]
    pub async fn repository_details(
        &self,
        token: &str,
        name: &str,
    ) -> Result<RepositoryDetail, AggregationError> {
        let credential = Credential::new(token).ok_or(AggregationError::MissingCredential)?;
        let name = RepositoryName::new(name).ok_or(AggregationError::MissingRepositoryName)?;

        let login = self
            .host
            .authenticated_login(&credential)
            .await
            .map_err(|source| AggregationError::AuthResolutionFailed { source })?;
        let repository = RepositoryRef::new(login.as_owner(), name);

        let host = Arc::clone(&self.host);
        let config = Arc::clone(&self.config);
        let ticket = self.queue.submit(move |job_id| async move {
            aggregate_repository(host.as_ref(), &config, &credential, &repository, job_id).await
        });

        let detail = ticket.wait().await??;
        info!(
            repository = %detail.name,
            file_count = detail.file_count,
            "Repository details aggregated"
        );
        Ok(detail)
    }
}
