//! `reqwest`-backed implementation of [`RepositoryHost`] for the GitHub REST API.

use std::time::Duration;

use async_trait::async_trait;
use domain::{
    Credential, DirectoryEntry, HostError, RepositoryBasics, RepositoryHost, RepositoryRef,
    RepositorySummary, UserLogin,
};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::error::{classify_status, transport_error, GitHubClientError};
use crate::wire::{hook_urls, ContentEntryPayload, HookPayload, RepositoryPayload, UserPayload};

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;

/// Public GitHub API endpoint.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Request timeout applied when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const USER_AGENT: &str = concat!("repo-facets/", env!("CARGO_PKG_VERSION"));
const GITHUB_JSON: &str = "application/vnd.github+json";
const API_VERSION_HEADER: &str = "x-github-api-version";
const API_VERSION: &str = "2022-11-28";

/// Connection settings for [`GitHubClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitHubClientConfig {
    /// API base URL, e.g. `https://api.github.com` or a GitHub Enterprise
    /// `https://ghe.example.com/api/v3`.
    pub api_url: String,
    /// Per-request timeout; expiry is reported as a transport failure.
    pub timeout: Duration,
}

impl Default for GitHubClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// GitHub REST API client.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: Client,
    api_url: Url,
}

impl GitHubClient {
    /// Builds a client for the configured API endpoint.
    pub fn new(config: &GitHubClientConfig) -> Result<Self, GitHubClientError> {
        let api_url = Url::parse(&config.api_url).map_err(|err| GitHubClientError::InvalidApiUrl {
            url: config.api_url.clone(),
            reason: err.to_string(),
        })?;
        if api_url.cannot_be_a_base() {
            return Err(GitHubClientError::InvalidApiUrl {
                url: config.api_url.clone(),
                reason: "URL cannot be used as a base".to_string(),
            });
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_JSON));
        headers.insert(API_VERSION_HEADER, HeaderValue::from_static(API_VERSION));

        let http = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self { http, api_url })
    }

    /// Returns the API base URL.
    pub fn api_url(&self) -> &Url {
        &self.api_url
    }

    /// Appends path segments to the base URL, percent-encoding each one.
    fn endpoint<'s>(&self, segments: impl IntoIterator<Item = &'s str>) -> Url {
        let mut url = self.api_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn repository_endpoint<'s>(
        &self,
        repository: &'s RepositoryRef,
        rest: impl IntoIterator<Item = &'s str>,
    ) -> Url {
        let base = ["repos", repository.owner.as_str(), repository.name.as_str()];
        self.endpoint(base.into_iter().chain(rest))
    }

    fn contents_endpoint(&self, repository: &RepositoryRef, path: &str) -> Url {
        let path_segments = path.split('/').filter(|segment| !segment.is_empty());
        self.repository_endpoint(repository, std::iter::once("contents").chain(path_segments))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        credential: &Credential,
        url: Url,
        query: &[(&str, u32)],
        resource: &str,
    ) -> Result<T, HostError> {
        debug!(url = %url, "GET");
        let response = self
            .http
            .get(url)
            .bearer_auth(credential.expose())
            .query(query)
            .send()
            .await
            .map_err(|err| transport_error(resource, err))?;
        let response = ensure_success(response, resource).await?;
        response
            .json::<T>()
            .await
            .map_err(|err| transport_error(resource, err))
    }
}

async fn ensure_success(response: Response, resource: &str) -> Result<Response, HostError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    // The body only enriches the error message.
    let body = response.text().await.unwrap_or_default();
    Err(classify_status(status.as_u16(), resource, &body))
}

#[async_trait]
impl RepositoryHost for GitHubClient {
    #[instrument(level = "debug", skip(self, credential))]
    async fn list_user_repositories(
        &self,
        credential: &Credential,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<RepositorySummary>, HostError> {
        let url = self.endpoint(["user", "repos"]);
        let payloads: Vec<RepositoryPayload> = self
            .get_json(
                credential,
                url,
                &[("per_page", per_page), ("page", page)],
                "repositories of the authenticated user",
            )
            .await?;
        payloads
            .into_iter()
            .map(RepositoryPayload::into_summary)
            .collect()
    }

    #[instrument(level = "debug", skip_all)]
    async fn authenticated_login(&self, credential: &Credential) -> Result<UserLogin, HostError> {
        let url = self.endpoint(["user"]);
        let user: UserPayload = self
            .get_json(credential, url, &[], "authenticated user")
            .await?;
        user.into_login()
    }

    #[instrument(level = "debug", skip(self, credential), fields(repository = %repository))]
    async fn get_repository(
        &self,
        credential: &Credential,
        repository: &RepositoryRef,
    ) -> Result<RepositoryBasics, HostError> {
        let url = self.repository_endpoint(repository, []);
        let resource = format!("repository {repository}");
        let payload: RepositoryPayload = self.get_json(credential, url, &[], &resource).await?;
        payload.into_basics()
    }

    #[instrument(level = "debug", skip(self, credential), fields(repository = %repository))]
    async fn list_directory(
        &self,
        credential: &Credential,
        repository: &RepositoryRef,
        path: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<DirectoryEntry>, HostError> {
        let url = self.contents_endpoint(repository, path);
        let resource = format!("path '{path}' in {repository}");
        let entries: Vec<ContentEntryPayload> = self
            .get_json(
                credential,
                url,
                &[("per_page", per_page), ("page", page)],
                &resource,
            )
            .await?;
        Ok(entries.into_iter().map(DirectoryEntry::from).collect())
    }

    #[instrument(level = "debug", skip_all)]
    async fn fetch_raw_content(&self, url: &str) -> Result<String, HostError> {
        let url = Url::parse(url)
            .map_err(|err| HostError::transport(format!("invalid download URL: {err}")))?;
        // Private download URLs carry a token in the query string; keep it out of messages.
        let resource = format!(
            "raw content at {}{}",
            url.host_str().unwrap_or_default(),
            url.path()
        );
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|err| transport_error(&resource, err))?;
        let response = ensure_success(response, &resource).await?;
        response
            .text()
            .await
            .map_err(|err| transport_error(&resource, err))
    }

    #[instrument(level = "debug", skip(self, credential), fields(repository = %repository))]
    async fn list_webhook_urls(
        &self,
        credential: &Credential,
        repository: &RepositoryRef,
    ) -> Result<Vec<String>, HostError> {
        let url = self.repository_endpoint(repository, ["hooks"]);
        let resource = format!("webhooks of {repository}");
        let hooks: Vec<HookPayload> = self.get_json(credential, url, &[], &resource).await?;
        Ok(hook_urls(hooks))
    }
}
