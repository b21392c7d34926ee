//! Per-job facet fan-out.
//!
//! Launches the four facet fetches of one repository concurrently and merges
//! their settled outcomes into a [`RepositoryDetail`]. The merge waits for
//! every optional facet; a fatal outcome (only possible for a mandatory facet)
//! fails the job as soon as it settles.

use domain::{AggregationError, Credential, JobId, RepositoryDetail, RepositoryHost, RepositoryRef};
use tracing::{debug, instrument};

use crate::config::EngineConfig;
use crate::facets::{Facet, FacetFetcher, FacetOutcome};

#[cfg(test)]
#[path = "fanout_tests.rs"]
mod tests;

/// Aggregates every facet of `repository` into one record.
///
/// `repository.owner` must already be the resolved login of `credential`.
#[instrument(skip_all, fields(job_id = %job_id, repository = %repository))]
pub async fn aggregate_repository(
    host: &dyn RepositoryHost,
    config: &EngineConfig,
    credential: &Credential,
    repository: &RepositoryRef,
    job_id: JobId,
) -> Result<RepositoryDetail, AggregationError> {
    let fetcher = FacetFetcher::new(host, credential, repository, config);

    let (basics, ci_config, webhook_urls, file_count) = tokio::try_join!(
        merge(Facet::BasicDetails, repository, fetcher.basic_details()),
        merge(Facet::CiConfig, repository, fetcher.ci_config()),
        merge(Facet::Webhooks, repository, fetcher.webhook_urls()),
        merge(Facet::FileCount, repository, fetcher.file_count()),
    )?;

    debug!(
        file_count,
        webhooks = webhook_urls.len(),
        "Repository facets merged"
    );
    Ok(RepositoryDetail::assemble(
        basics,
        file_count,
        ci_config,
        webhook_urls,
    ))
}

/// Awaits one facet and turns a fatal outcome into the job's error.
async fn merge<T>(
    facet: Facet,
    repository: &RepositoryRef,
    fetch: impl std::future::Future<Output = FacetOutcome<T>>,
) -> Result<T, AggregationError> {
    fetch
        .await
        .into_result()
        .map_err(|source| facet.failure(repository, source))
}
