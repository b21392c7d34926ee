//! GitHub REST API payloads and their conversion into domain records.
//!
//! Only the fields the engine reads are modelled; everything else in the
//! responses is ignored by `serde`.

use domain::{
    DirectoryEntry, EntryKind, HostError, RepositoryBasics, RepositoryName, RepositoryOwner,
    RepositorySummary, UserLogin,
};
use serde::Deserialize;

#[cfg(test)]
#[path = "wire_tests.rs"]
mod tests;

#[derive(Debug, Deserialize)]
pub(crate) struct OwnerPayload {
    pub login: String,
}

/// `GET /repos/{owner}/{repo}` and each element of `GET /user/repos`.
#[derive(Debug, Deserialize)]
pub(crate) struct RepositoryPayload {
    pub name: String,
    /// Kilobytes.
    pub size: u64,
    pub owner: OwnerPayload,
    #[serde(default)]
    pub private: bool,
}

impl RepositoryPayload {
    fn identity(self) -> Result<(RepositoryName, u64, RepositoryOwner, bool), HostError> {
        let name = RepositoryName::new(self.name)
            .ok_or_else(|| HostError::transport("GitHub returned a repository without a name"))?;
        let owner = RepositoryOwner::new(self.owner.login)
            .ok_or_else(|| HostError::transport("GitHub returned a repository without an owner"))?;
        Ok((name, self.size, owner, self.private))
    }

    pub fn into_summary(self) -> Result<RepositorySummary, HostError> {
        let (name, size, owner, _) = self.identity()?;
        Ok(RepositorySummary { name, size, owner })
    }

    pub fn into_basics(self) -> Result<RepositoryBasics, HostError> {
        let (name, size, owner, is_private) = self.identity()?;
        Ok(RepositoryBasics {
            name,
            size,
            owner,
            is_private,
        })
    }
}

/// `GET /user`.
#[derive(Debug, Deserialize)]
pub(crate) struct UserPayload {
    pub login: String,
}

impl UserPayload {
    pub fn into_login(self) -> Result<UserLogin, HostError> {
        UserLogin::new(self.login)
            .ok_or_else(|| HostError::transport("GitHub returned an empty login"))
    }
}

/// One element of `GET /repos/{owner}/{repo}/contents/{path}`.
#[derive(Debug, Deserialize)]
pub(crate) struct ContentEntryPayload {
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub path: String,
    #[serde(default)]
    pub download_url: Option<String>,
}

impl From<ContentEntryPayload> for DirectoryEntry {
    fn from(payload: ContentEntryPayload) -> Self {
        DirectoryEntry {
            path: payload.path,
            kind: payload.kind,
            download_url: payload.download_url,
        }
    }
}

/// One element of `GET /repos/{owner}/{repo}/hooks`.
#[derive(Debug, Deserialize)]
pub(crate) struct HookPayload {
    pub config: HookConfigPayload,
}

#[derive(Debug, Deserialize)]
pub(crate) struct HookConfigPayload {
    /// Absent for hook types that do not deliver over HTTP.
    #[serde(default)]
    pub url: Option<String>,
}

/// Delivery URLs of `hooks`, in listing order. Hooks without a URL are skipped.
pub(crate) fn hook_urls(hooks: Vec<HookPayload>) -> Vec<String> {
    hooks.into_iter().filter_map(|hook| hook.config.url).collect()
}

/// Error body returned with non-success statuses.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorPayload {
    pub message: String,
}
