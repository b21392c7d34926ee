//! Port trait for the remote repository-hosting API.
//!
//! The aggregation engine depends only on [`RepositoryHost`]. The `github`
//! crate implements it over HTTP; tests implement it in memory.

use async_trait::async_trait;

use crate::{
    Credential, DirectoryEntry, HostError, RepositoryBasics, RepositoryRef, RepositorySummary,
    UserLogin,
};

/// Read-only access to a repository host.
///
/// Every method is a single remote request/response mapping. Implementations
/// must not cache, retry, or aggregate; those decisions belong to the engine.
#[async_trait]
pub trait RepositoryHost: Send + Sync {
    /// Lists one page of the repositories visible to `credential`.
    ///
    /// `page` is 1-based.
    async fn list_user_repositories(
        &self,
        credential: &Credential,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<RepositorySummary>, HostError>;

    /// Resolves the login of the user `credential` authenticates as.
    async fn authenticated_login(&self, credential: &Credential) -> Result<UserLogin, HostError>;

    /// Fetches the basic details of a repository.
    ///
    /// Returns [`HostError::NotFound`] when the repository does not exist.
    async fn get_repository(
        &self,
        credential: &Credential,
        repository: &RepositoryRef,
    ) -> Result<RepositoryBasics, HostError>;

    /// Lists one page of the entries directly under `path`.
    ///
    /// An empty `path` denotes the repository root. `page` is 1-based.
    async fn list_directory(
        &self,
        credential: &Credential,
        repository: &RepositoryRef,
        path: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<DirectoryEntry>, HostError>;

    /// Downloads raw file content from a URL previously reported in a
    /// [`DirectoryEntry::download_url`].
    async fn fetch_raw_content(&self, url: &str) -> Result<String, HostError>;

    /// Lists the delivery URLs of the repository's webhooks, in host order.
    async fn list_webhook_urls(
        &self,
        credential: &Credential,
        repository: &RepositoryRef,
    ) -> Result<Vec<String>, HostError>;
}
